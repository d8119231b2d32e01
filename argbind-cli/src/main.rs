use anyhow::{Context, Result};
use argbind_core::{ArgsParser, ArgsProperties};
use tracing::debug;

mod args;

use args::DemoArgs;

/// Path of an optional properties file (TOML or JSON)
const PROPERTIES_ENV: &str = "ARGBIND_PROPERTIES";

/// Tracing filter override
const LOG_ENV: &str = "ARGBIND_LOG";

/// Name of the [`DemoArgs`] flag that turns on debug logging
const DEBUG_ARG: &str = "debug";

fn main() -> Result<()> {
    let tokens: Vec<String> = std::env::args().skip(1).collect();

    let mut parser = ArgsParser::new().with_sanity_check(true);
    let properties_path = std::env::var(PROPERTIES_ENV).ok();
    if let Some(path) = &properties_path {
        let properties = ArgsProperties::load(path)
            .with_context(|| format!("Failed to load argument properties from {}", path))?;
        parser = parser.with_properties(properties);
    }

    // Tracing has to be up before parsing so the binder's events are visible
    let properties = parser.properties_for::<DemoArgs>();
    init_tracing(debug_requested(&tokens, &properties));
    if let Some(path) = &properties_path {
        debug!(path = %path, prefix = %properties.id_prefix, "loaded argument properties");
    }

    // Help and failures terminate the process inside parse
    let Some(args) = parser.parse::<DemoArgs, _, _>(&tokens) else {
        return Ok(());
    };

    println!("user:          {}", args.user_name.as_deref().unwrap_or("-"));
    println!("password set:  {}", args.password.is_some());
    match (args.creation_time, &args.creation_date) {
        (Some(time), _) => println!("created at:    {} (unix)", time),
        (None, Some(date)) => println!("created on:    {}", date),
        (None, None) => println!("created:       -"),
    }
    if !args.tags.is_empty() {
        println!("tags:          {}", args.tags.join(", "));
    }
    if let Some((lower, upper)) = args.id_range {
        println!("id range:      {}..={}", lower, upper);
    }

    Ok(())
}

/// Whether the debug flag appears among `tokens`, spelled with the prefix in effect.
fn debug_requested(tokens: &[String], properties: &ArgsProperties) -> bool {
    let debug_id = if properties.uses_prefix() {
        format!("{}{DEBUG_ARG}", properties.id_prefix)
    } else {
        DEBUG_ARG.to_string()
    };
    tokens.iter().any(|token| *token == debug_id)
}

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "argbind_core=debug,argbind_demo=debug"
    } else {
        "argbind_core=warn,argbind_demo=info"
    };
    let filter = match std::env::var(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => default_filter.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

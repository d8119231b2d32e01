//! The parser facade.
//!
//! [`ArgsParser`] ties the pieces together: optional sanity check, binding,
//! validation, and the help/termination effects around them.

use tracing::{debug, warn};

use crate::binder::{validate, Binder, ParseOutcome};
use crate::descriptor::{Args, ArgumentTable};
use crate::effects::{Console, ProcessExit, StdConsole, Terminate, EXIT_FAILURE, EXIT_HELP};
use crate::error::{Result, ValueError};
use crate::help::render_help;
use crate::properties::ArgsProperties;
use crate::registry::{TokenCursor, TypeRegistry};
use crate::sanity::SanityChecker;

/// Default separator between array elements.
pub const DEFAULT_DELIMITER: &str = ";";

/// A bound and validated target together with what was supplied.
#[derive(Debug)]
pub struct Parsed<A> {
    pub target: A,
    pub outcome: ParseOutcome,
}

impl<A> Parsed<A> {
    pub fn help_requested(&self) -> bool {
        self.outcome.help_requested
    }

    pub fn into_target(self) -> A {
        self.target
    }
}

/// Parses token lists into [`Args`] targets.
pub struct ArgsParser {
    registry: TypeRegistry,
    delimiter: String,
    sanity_check: bool,
    properties: Option<ArgsProperties>,
    terminator: Box<dyn Terminate>,
    console: Box<dyn Console>,
}

impl Default for ArgsParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgsParser {
    /// A parser with the default registry, `;` as array delimiter, the sanity
    /// check disabled, stdout/stderr output and a real process exit.
    pub fn new() -> Self {
        Self {
            registry: TypeRegistry::with_defaults(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            sanity_check: false,
            properties: None,
            terminator: Box::new(ProcessExit),
            console: Box::new(StdConsole),
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Run the sanity check on every parse before any token is bound.
    pub fn with_sanity_check(mut self, enabled: bool) -> Self {
        self.sanity_check = enabled;
        self
    }

    /// Use `properties` instead of whatever the target declares.
    pub fn with_properties(mut self, properties: ArgsProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_terminator(mut self, terminator: impl Terminate + 'static) -> Self {
        self.terminator = Box::new(terminator);
        self
    }

    pub fn with_console(mut self, console: impl Console + 'static) -> Self {
        self.console = Box::new(console);
        self
    }

    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register an additional type parser.
    ///
    /// # Panics
    ///
    /// Panics if `T` already has a parser.
    pub fn add_parser<T, F>(mut self, parser: F) -> Self
    where
        T: std::any::Any + Send,
        F: Fn(&str, &mut TokenCursor<'_>) -> std::result::Result<T, ValueError>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register::<T, F>(parser);
        self
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// The properties in effect for `A`.
    pub fn properties_for<A: Args>(&self) -> ArgsProperties {
        if let Some(properties) = &self.properties {
            return properties.clone();
        }
        A::properties().unwrap_or_default()
    }

    /// Bind and validate `tokens` into a fresh `A::default()`.
    pub fn try_parse<A, I, S>(&self, tokens: I) -> Result<Parsed<A>>
    where
        A: Args + Default,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.try_parse_into(A::default(), tokens)
    }

    /// Bind and validate `tokens` into `target`.
    ///
    /// No help is printed and nothing terminates. When help was requested the
    /// constraint validation is skipped and the caller decides what to do.
    pub fn try_parse_into<A, I, S>(&self, mut target: A, tokens: I) -> Result<Parsed<A>>
    where
        A: Args,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(|t| t.as_ref().to_string()).collect();
        let properties = self.properties_for::<A>();
        let table = A::arguments();

        if self.sanity_check {
            if A::properties().is_none() && self.properties.is_none() {
                warn!(
                    target_type = std::any::type_name::<A>(),
                    "no argument properties declared, using defaults"
                );
            }
            SanityChecker::new(&self.registry, &properties)
                .check(&table, &mut target)?;
        }

        let outcome = Binder::new(&self.registry, &properties, &table, &self.delimiter)
            .bind(&mut target, &tokens)?;
        debug!(supplied = ?outcome.supplied, help = outcome.help_requested, "bound arguments");

        if !outcome.help_requested {
            validate(&outcome.supplied, table.descriptors())?;
        }

        Ok(Parsed { target, outcome })
    }

    /// Parse into a fresh `A::default()`, printing help and terminating as
    /// configured.
    pub fn parse<A, I, S>(&self, tokens: I) -> Option<A>
    where
        A: Args + Default,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parse_into(A::default(), tokens)
    }

    /// Parse into `target`.
    ///
    /// On help the help text is printed; the process is then terminated with
    /// status `0` if the target's properties say so and `None` is returned,
    /// otherwise the target is returned. On any error the message and the help
    /// text are printed, the process is terminated with status `-1` and `None`
    /// is returned.
    pub fn parse_into<A, I, S>(&self, target: A, tokens: I) -> Option<A>
    where
        A: Args,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let properties = self.properties_for::<A>();
        let info = target.program_info().to_string();

        match self.try_parse_into(target, tokens) {
            Ok(parsed) if parsed.help_requested() => {
                self.print_help::<A>(&info, &properties);
                if properties.terminate_after_help {
                    self.terminator.terminate(EXIT_HELP);
                    return None;
                }
                Some(parsed.into_target())
            }
            Ok(parsed) => Some(parsed.into_target()),
            Err(err) => {
                warn!(error = %err, "argument parsing failed");
                self.console.err(&format!("{err}\n\n"));
                self.print_help::<A>(&info, &properties);
                self.terminator.terminate(EXIT_FAILURE);
                None
            }
        }
    }

    /// The help text for `target`.
    pub fn help_text<A: Args>(&self, target: &A) -> String {
        let table = A::arguments();
        render_help(
            target.program_info(),
            &self.properties_for::<A>(),
            table.descriptors(),
        )
    }

    fn print_help<A: Args>(&self, program_info: &str, properties: &ArgsProperties) {
        let table: ArgumentTable<A> = A::arguments();
        let help = render_help(program_info, properties, table.descriptors());
        self.console.out(&help);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Argument;
    use crate::effects::MemoryConsole;
    use crate::error::{ArgsError, BindError};
    use crate::registry::TypeTag;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct Greeting {
        name: Option<String>,
        loud: bool,
    }

    impl Args for Greeting {
        fn program_info(&self) -> &str {
            "Says hello."
        }

        fn arguments() -> ArgumentTable<Self> {
            ArgumentTable::<Self>::new()
                .value::<String, _>(
                    Argument::new("name", "Who to greet").required(),
                    |g, v| g.name = Some(v),
                )
                .flag(Argument::new("loud", "Shout"), |g| &mut g.loud)
        }
    }

    #[derive(Debug, Default)]
    struct List {
        items: Vec<String>,
        count: Option<i32>,
    }

    impl Args for List {
        fn program_info(&self) -> &str {
            "Lists."
        }

        fn arguments() -> ArgumentTable<Self> {
            ArgumentTable::<Self>::new()
                .value::<Vec<String>, _>(Argument::new("i", "items"), |l, v| l.items = v)
                .value::<i32, _>(Argument::new("n", "count"), |l, v| l.count = Some(v))
        }
    }

    fn recording_parser() -> (ArgsParser, Rc<Cell<Option<i32>>>, MemoryConsole) {
        let status = Rc::new(Cell::new(None));
        let console = MemoryConsole::new();
        let recorder = Rc::clone(&status);
        let parser = ArgsParser::new()
            .with_console(console.clone())
            .with_terminator(move |code: i32| recorder.set(Some(code)));
        (parser, status, console)
    }

    #[test]
    fn parse_returns_target_without_terminating() {
        let (parser, status, console) = recording_parser();
        let greeting: Greeting = parser.parse(["-name", "world", "-loud"]).unwrap();
        assert_eq!(greeting.name.as_deref(), Some("world"));
        assert!(greeting.loud);
        assert_eq!(status.get(), None);
        assert!(console.stdout().is_empty());
    }

    #[test]
    fn failure_prints_message_and_help_then_terminates() {
        let (parser, status, console) = recording_parser();
        let parsed: Option<Greeting> = parser.parse(["-nope"]);
        assert!(parsed.is_none());
        assert_eq!(status.get(), Some(EXIT_FAILURE));
        assert!(console.stderr().contains("Unknown argument: -nope"));
        assert!(console.stdout().starts_with("Says hello."));
    }

    #[test]
    fn help_skips_validation_in_try_parse() {
        let parser = ArgsParser::new();
        let parsed = parser.try_parse::<Greeting, _, _>(["-h"]).unwrap();
        assert!(parsed.help_requested());
        assert!(parsed.target.name.is_none());
    }

    #[test]
    fn custom_help_ids_replace_the_defaults() {
        let properties = ArgsProperties::default().with_help_ids(["?"]);
        let parser = ArgsParser::new().with_properties(properties);

        let parsed = parser.try_parse::<Greeting, _, _>(["-?"]).unwrap();
        assert!(parsed.help_requested());

        let err = parser.try_parse::<Greeting, _, _>(["-h"]).unwrap_err();
        assert_eq!(
            err,
            ArgsError::Bind(BindError::UnrecognizedArgument("-h".into()))
        );
    }

    #[test]
    fn custom_delimiter_reaches_array_parsers() {
        let parser = ArgsParser::new().with_delimiter(",");
        assert_eq!(parser.delimiter(), ",");

        let parsed = parser.try_parse::<List, _, _>(["-i", "a,b"]).unwrap();
        assert_eq!(parsed.target.items, vec!["a", "b"]);
    }

    #[test]
    fn supplied_registry_replaces_the_defaults() {
        let mut registry = TypeRegistry::empty();
        registry.register_scalar::<String>();
        let mut parser = ArgsParser::new().with_registry(registry);
        assert!(!parser.registry().contains(TypeTag::of::<i32>()));

        let err = parser.try_parse::<List, _, _>(["-n", "3"]).unwrap_err();
        let missing_parser = matches!(err, ArgsError::Bind(BindError::MissingParser { .. }));
        assert!(missing_parser);

        parser.registry_mut().register_scalar::<i32>();
        let parsed = parser.try_parse::<List, _, _>(["-n", "3"]).unwrap();
        assert_eq!(parsed.target.count, Some(3));
    }

    #[test]
    fn help_text_matches_printed_help() {
        let (parser, _, console) = recording_parser();
        let text = parser.help_text(&Greeting::default());
        let expected = render_help(
            "Says hello.",
            &ArgsProperties::default(),
            Greeting::arguments().descriptors(),
        );
        assert_eq!(text, expected);

        let _: Option<Greeting> = parser.parse(["-h"]);
        assert_eq!(console.stdout(), text);
    }

    #[test]
    fn bind_errors_surface_through_try_parse() {
        let parser = ArgsParser::new();
        let err = parser.try_parse::<Greeting, _, _>(["name"]).unwrap_err();
        assert_eq!(
            err,
            ArgsError::Bind(BindError::UnrecognizedArgument("name".into()))
        );
    }
}

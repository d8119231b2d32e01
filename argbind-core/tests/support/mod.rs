//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use argbind_core::prelude::*;
use argbind_core::MemoryConsole;

/// Account creation arguments: a user needs a password, a creation time and
/// a creation date exclude each other.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AccountArgs {
    pub user_name: Option<String>,
    pub password: Option<String>,
    pub creation_time: Option<i64>,
    pub creation_date: Option<String>,
}

impl Args for AccountArgs {
    fn program_info(&self) -> &str {
        "This program tests the argbind crate."
    }

    fn properties() -> Option<ArgsProperties> {
        Some(ArgsProperties::default())
    }

    fn arguments() -> ArgumentTable<Self> {
        ArgumentTable::<Self>::new()
            .value::<String, _>(
                Argument::new("u", "The users name.").required().requires(["pw"]),
                |a, v| a.user_name = Some(v),
            )
            .value::<String, _>(
                Argument::new("pw", "The user password").requires(["u"]),
                |a, v| a.password = Some(v),
            )
            .value::<i64, _>(
                Argument::new("t", "The account creation date in unix time."),
                |a, v| a.creation_time = Some(v),
            )
            .value::<String, _>(
                Argument::new("d", "The account creation date").excludes(["t"]),
                |a, v| a.creation_date = Some(v),
            )
    }
}

impl AccountArgs {
    pub fn new(
        user: Option<&str>,
        password: Option<&str>,
        time: Option<i64>,
        date: Option<&str>,
    ) -> Self {
        Self {
            user_name: user.map(str::to_string),
            password: password.map(str::to_string),
            creation_time: time,
            creation_date: date.map(str::to_string),
        }
    }

    /// The token list that should bind to `self`.
    pub fn to_tokens(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        if let Some(user) = &self.user_name {
            tokens.extend(["-u".to_string(), user.clone()]);
        }
        if let Some(password) = &self.password {
            tokens.extend(["-pw".to_string(), password.clone()]);
        }
        if let Some(time) = self.creation_time {
            tokens.extend(["-t".to_string(), time.to_string()]);
        }
        if let Some(date) = &self.creation_date {
            tokens.extend(["-d".to_string(), date.clone()]);
        }
        tokens
    }
}

/// Records the status passed to the termination effect.
#[derive(Debug, Clone, Default)]
pub struct ExitRecorder(Rc<Cell<Option<i32>>>);

impl ExitRecorder {
    pub fn status(&self) -> Option<i32> {
        self.0.get()
    }
}

impl argbind_core::Terminate for ExitRecorder {
    fn terminate(&self, status: i32) {
        self.0.set(Some(status));
    }
}

/// A parser with the sanity check on, recording termination and output.
pub fn checked_parser() -> (ArgsParser, ExitRecorder, MemoryConsole) {
    let exit = ExitRecorder::default();
    let console = MemoryConsole::new();
    let parser = ArgsParser::new()
        .with_sanity_check(true)
        .with_terminator(exit.clone())
        .with_console(console.clone());
    (parser, exit, console)
}

pub fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

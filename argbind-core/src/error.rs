//! Error types for argument binding.
//!
//! Errors are split by who has to fix them: [`ConfigurationError`] is raised by
//! the sanity checker and points at the argument table, while [`BindError`] and
//! [`ValidationError`] point at the tokens the user supplied.

use std::fmt;
use thiserror::Error;

use crate::sanity::SanityIssue;

/// Main error type returned by the parser facade.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgsError {
    /// The argument table failed the sanity check
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A token could not be bound to the target
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The supplied arguments violate a requires/excludes/required constraint
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Result type alias for argbind operations
pub type Result<T> = std::result::Result<T, ArgsError>;

/// Errors raised while walking the token list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindError {
    /// The token lacks the id prefix or names no declared argument
    #[error("Unknown argument: {0}")]
    UnrecognizedArgument(String),

    /// The argument's type has no registered parser
    #[error("Couldn't find a parser for {type_name} (argument {argument})! Please register one.")]
    MissingParser {
        argument: String,
        type_name: &'static str,
    },

    /// A value token could not be converted to the argument's type
    #[error("Invalid value '{value}' for argument {argument} ({type_name}): {reason}")]
    ValueCoercion {
        argument: String,
        type_name: &'static str,
        value: String,
        reason: String,
    },

    /// The token list ended before the argument received its value
    #[error("Missing value of type {type_name} for argument {argument}")]
    MissingValue {
        argument: String,
        type_name: &'static str,
    },

    /// A handler took a parameter with a different type than it declared
    #[error("Argument {argument} took a handler parameter as {expected}, not as declared")]
    ParameterMismatch {
        argument: String,
        expected: &'static str,
    },
}

/// Constraint violations found after a successful bind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `argument` was supplied without the argument it requires
    #[error("The argument \"{argument}\" requires the argument \"{required}\"!")]
    MissingRequirement { argument: String, required: String },

    /// `argument` was supplied together with an argument it excludes
    #[error("The argument \"{argument}\" and the argument \"{excluded}\" exclude each other!")]
    MutualExclusion { argument: String, excluded: String },

    /// A required argument was never supplied
    #[error("The argument \"{0}\" is a required argument!")]
    RequiredArgumentMissing(String),
}

/// Every issue found by one sanity check run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationError {
    id_prefix: String,
    issues: Vec<SanityIssue>,
}

impl ConfigurationError {
    pub(crate) fn new(id_prefix: impl Into<String>, issues: Vec<SanityIssue>) -> Self {
        Self {
            id_prefix: id_prefix.into(),
            issues,
        }
    }

    /// The collected issues, in the order they were found.
    pub fn issues(&self) -> &[SanityIssue] {
        &self.issues
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Invalid argument configuration:")?;
        for issue in &self.issues {
            write!(f, "\n{}\n", issue.render(&self.id_prefix))?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigurationError {}

/// Error produced by a single type parser.
///
/// The binder attaches the argument name and target type when it converts
/// this into a [`BindError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// No token was left for a scalar value
    #[error("no value left to parse")]
    Exhausted,

    /// The token is not a valid representation of the type
    #[error("invalid value '{value}': {reason}")]
    Invalid { value: String, reason: String },
}

impl ValueError {
    pub fn invalid(value: impl Into<String>, reason: impl fmt::Display) -> Self {
        ValueError::Invalid {
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors loading [`ArgsProperties`](crate::ArgsProperties) from disk.
#[derive(Error, Debug)]
pub enum PropertiesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

//! Declarative command line argument binding.
//!
//! A target type declares its arguments in an explicit [`ArgumentTable`]:
//! name, help text, whether it is required, which other arguments it requires
//! or excludes, and a callback that writes the parsed value into the target.
//! [`ArgsParser`] binds a token list against that table using the parsers in a
//! [`TypeRegistry`], then validates the requires/excludes/required
//! constraints. An opt-in [`SanityChecker`] catches contradictions in the
//! table itself before any token is looked at.

mod binder;
mod descriptor;
mod effects;
mod error;
mod help;
mod parser;
mod properties;
mod registry;
mod sanity;

// Re-export core types
pub use binder::{validate, Binder, ParseOutcome};
pub use descriptor::{Args, Argument, ArgumentDescriptor, ArgumentTable, ParsedValues, ValueKind};
pub use effects::{
    Console, MemoryConsole, ProcessExit, StdConsole, Terminate, EXIT_FAILURE, EXIT_HELP,
};
pub use error::{
    ArgsError, BindError, ConfigurationError, PropertiesError, Result, ValidationError, ValueError,
};
pub use help::render_help;
pub use parser::{ArgsParser, Parsed, DEFAULT_DELIMITER};
pub use properties::ArgsProperties;
pub use registry::{parse_array, Scalar, TokenCursor, TypeParser, TypeRegistry, TypeTag, Value};
pub use sanity::{SanityChecker, SanityIssue};

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{
        Args, ArgsParser, ArgsProperties, Argument, ArgumentTable, ParsedValues, TypeTag,
        ValueError,
    };
}

//! Token binding and constraint validation.
//!
//! The binder walks the token list once, matching each identifier against the
//! argument table and writing parsed values into the target. The validator
//! then checks the requires/excludes/required relationships over the names
//! that were supplied.

mod validator;

pub use validator::validate;

use tracing::debug;

use crate::descriptor::{ArgumentTable, Binding, ParsedValues};
use crate::error::{BindError, ValueError};
use crate::properties::ArgsProperties;
use crate::registry::{TokenCursor, TypeRegistry, TypeTag, Value};

/// What a successful bind saw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// Bare names of the supplied arguments, in input order
    pub supplied: Vec<String>,

    /// Whether a help identifier was supplied
    pub help_requested: bool,
}

impl ParseOutcome {
    pub fn contains(&self, name: &str) -> bool {
        self.supplied.iter().any(|supplied| supplied == name)
    }
}

/// Binds tokens to a target through its argument table.
pub struct Binder<'a, A> {
    registry: &'a TypeRegistry,
    properties: &'a ArgsProperties,
    table: &'a ArgumentTable<A>,
    delimiter: &'a str,
}

impl<'a, A: 'static> Binder<'a, A> {
    pub fn new(
        registry: &'a TypeRegistry,
        properties: &'a ArgsProperties,
        table: &'a ArgumentTable<A>,
        delimiter: &'a str,
    ) -> Self {
        Self {
            registry,
            properties,
            table,
            delimiter,
        }
    }

    /// Bind `tokens` into `target`.
    ///
    /// Stops at the first token that cannot be bound; the target may then be
    /// partially written and must be discarded.
    pub fn bind(&self, target: &mut A, tokens: &[String]) -> Result<ParseOutcome, BindError> {
        let mut outcome = ParseOutcome::default();
        let mut cursor = TokenCursor::new(tokens);

        while let Some(token) = cursor.next_token() {
            let name = self.strip_prefix(token)?;

            if self.properties.is_help_id(name) {
                debug!(token, "help requested");
                outcome.help_requested = true;
                continue;
            }

            let entry = self
                .table
                .entry(name)
                .ok_or_else(|| BindError::UnrecognizedArgument(token.to_string()))?;

            match &entry.binding {
                Binding::Flag(field) => *field(target) = true,
                Binding::Switch(set) => set(target),
                Binding::Field(setter) => {
                    let tag = entry.descriptor.kind.value_types()[0];
                    let value = self.parse_value(name, tag, &mut cursor)?;
                    if let Err(expected) = setter(target, value) {
                        return Err(BindError::ParameterMismatch {
                            argument: name.to_string(),
                            expected,
                        });
                    }
                }
                Binding::Handler(handler) => {
                    let values = entry
                        .descriptor
                        .kind
                        .value_types()
                        .iter()
                        .map(|tag| self.parse_value(name, *tag, &mut cursor))
                        .collect::<Result<Vec<_>, _>>()?;
                    handler(target, &mut ParsedValues::new(name, values))?;
                }
            }

            debug!(argument = name, "bound argument");
            outcome.supplied.push(name.to_string());
        }

        Ok(outcome)
    }

    fn strip_prefix<'t>(&self, token: &'t str) -> Result<&'t str, BindError> {
        if !self.properties.uses_prefix() {
            return Ok(token);
        }
        token
            .strip_prefix(self.properties.id_prefix.as_str())
            .ok_or_else(|| BindError::UnrecognizedArgument(token.to_string()))
    }

    fn parse_value(
        &self,
        argument: &str,
        tag: TypeTag,
        cursor: &mut TokenCursor<'_>,
    ) -> Result<Value, BindError> {
        let parsed = self
            .registry
            .parse(tag, self.delimiter, cursor)
            .ok_or_else(|| BindError::MissingParser {
                argument: argument.to_string(),
                type_name: tag.name(),
            })?;

        parsed.map_err(|err| match err {
            ValueError::Exhausted => BindError::MissingValue {
                argument: argument.to_string(),
                type_name: tag.name(),
            },
            ValueError::Invalid { value, reason } => BindError::ValueCoercion {
                argument: argument.to_string(),
                type_name: tag.name(),
                value,
                reason,
            },
        })
    }
}

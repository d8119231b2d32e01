//! Pre-flight checks over an argument table.
//!
//! The sanity checker never looks at user input. It inspects the descriptor
//! table of a target for authoring mistakes that would make an argument
//! unusable and reports all of them at once.

use std::fmt;
use tracing::{debug, warn};

use crate::descriptor::{ArgumentTable, Binding};
use crate::error::ConfigurationError;
use crate::properties::ArgsProperties;
use crate::registry::{TypeRegistry, TypeTag};

/// One authoring defect in an argument table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanityIssue {
    /// An argument binds a type with no registered parser
    MissingParser {
        argument: String,
        type_name: &'static str,
    },

    /// A required argument excludes others, which can then never be used
    RequiredExcludes {
        argument: String,
        excluded: Vec<String>,
    },

    /// A flag defaults to `true` and can never end up `false`
    TriggeredDefault { argument: String },

    /// A `bool` declared through a value setter, whose default cannot be read
    UncheckedFlag { argument: String },

    /// An argument requires and excludes the same name
    RequiresAndExcludes { argument: String, name: String },

    /// An argument excludes a required argument and is therefore unusable
    ExcludesRequired { argument: String, required: String },

    /// Two arguments share a name
    DuplicateName { argument: String },

    /// An argument requires or excludes itself
    SelfReference { argument: String },

    /// An argument requires or excludes a name nobody declared
    UnknownReference { argument: String, name: String },

    /// An argument name collides with a help identifier
    ShadowedByHelp { argument: String },
}

impl SanityIssue {
    /// Render the issue with the identifier prefix in front of every name.
    pub fn render(&self, prefix: &str) -> String {
        match self {
            SanityIssue::MissingParser {
                argument,
                type_name,
            } => format!("Missing parser for type {type_name} used by {prefix}{argument}!"),
            SanityIssue::RequiredExcludes { argument, excluded } => format!(
                "The required argument {prefix}{argument} excludes the arguments {} \
                 and makes them unusable.",
                join_names(prefix, excluded)
            ),
            SanityIssue::TriggeredDefault { argument } => format!(
                "The flag {prefix}{argument} should not default to true, since this makes \
                 it impossible for its value to ever be false."
            ),
            SanityIssue::UncheckedFlag { argument } => format!(
                "The boolean argument {prefix}{argument} is declared as a value. \
                 Declare it as a flag so its default can be checked."
            ),
            SanityIssue::RequiresAndExcludes { argument, name } => {
                format!("The argument {prefix}{argument} requires and excludes {prefix}{name}!")
            }
            SanityIssue::ExcludesRequired { argument, required } => format!(
                "The argument {prefix}{argument} excludes the required argument \
                 {prefix}{required}. This makes {prefix}{argument} unusable."
            ),
            SanityIssue::DuplicateName { argument } => {
                format!("The argument {prefix}{argument} is declared more than once.")
            }
            SanityIssue::SelfReference { argument } => {
                format!("The argument {prefix}{argument} requires or excludes itself.")
            }
            SanityIssue::UnknownReference { argument, name } => format!(
                "The argument {prefix}{argument} refers to the undeclared argument \
                 {prefix}{name}."
            ),
            SanityIssue::ShadowedByHelp { argument } => format!(
                "The argument {prefix}{argument} is also a help identifier and can never \
                 be supplied."
            ),
        }
    }
}

impl fmt::Display for SanityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

/// Join names as `-a`, `-a & -b` or `-a, -b & -c`.
fn join_names(prefix: &str, names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => format!("{prefix}{only}"),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(|name| format!("{prefix}{name}")).collect();
            format!("{} & {prefix}{last}", head.join(", "))
        }
    }
}

/// Checks an argument table against a registry and properties.
pub struct SanityChecker<'r> {
    registry: &'r TypeRegistry,
    properties: &'r ArgsProperties,
}

impl<'r> SanityChecker<'r> {
    pub fn new(registry: &'r TypeRegistry, properties: &'r ArgsProperties) -> Self {
        Self {
            registry,
            properties,
        }
    }

    /// Collect every issue in `table`.
    ///
    /// `target` is a freshly constructed instance; it is only read, to find
    /// flags whose default is already `true`.
    pub fn issues<A: 'static>(&self, table: &ArgumentTable<A>, target: &mut A) -> Vec<SanityIssue> {
        let mut issues = Vec::new();

        for descriptor in table.descriptors() {
            for tag in descriptor.kind.value_types() {
                self.check_parser(&descriptor.name, *tag, &mut issues);
            }
        }

        let required: Vec<&str> = table
            .descriptors()
            .filter(|descriptor| descriptor.required)
            .map(|descriptor| descriptor.name.as_str())
            .collect();

        for (index, entry) in table.entries().iter().enumerate() {
            let descriptor = &entry.descriptor;
            let name = descriptor.name.clone();

            if descriptor.required && !descriptor.excludes.is_empty() {
                issues.push(SanityIssue::RequiredExcludes {
                    argument: name.clone(),
                    excluded: descriptor.excludes.clone(),
                });
            }

            match &entry.binding {
                Binding::Flag(field) if *field(target) => {
                    issues.push(SanityIssue::TriggeredDefault {
                        argument: name.clone(),
                    });
                }
                Binding::Switch(_) => {
                    issues.push(SanityIssue::UncheckedFlag {
                        argument: name.clone(),
                    });
                }
                _ => {}
            }

            let conflicts = descriptor
                .requires
                .iter()
                .filter(|r| descriptor.excludes.contains(r));
            for conflict in conflicts {
                issues.push(SanityIssue::RequiresAndExcludes {
                    argument: name.clone(),
                    name: conflict.clone(),
                });
            }

            let mut earlier = table.descriptors().take(index);
            if earlier.any(|other| other.name == name) {
                issues.push(SanityIssue::DuplicateName {
                    argument: name.clone(),
                });
            }

            let references = descriptor.requires.iter().chain(&descriptor.excludes);
            if references.clone().any(|reference| *reference == name) {
                issues.push(SanityIssue::SelfReference {
                    argument: name.clone(),
                });
            }
            for reference in references {
                if *reference != name && table.find(reference).is_none() {
                    issues.push(SanityIssue::UnknownReference {
                        argument: name.clone(),
                        name: reference.clone(),
                    });
                }
            }

            if self.properties.is_help_id(&name) {
                issues.push(SanityIssue::ShadowedByHelp { argument: name });
            }
        }

        for descriptor in table.descriptors() {
            for excluded in &descriptor.excludes {
                if required.contains(&excluded.as_str()) {
                    issues.push(SanityIssue::ExcludesRequired {
                        argument: descriptor.name.clone(),
                        required: excluded.clone(),
                    });
                }
            }
        }

        issues
    }

    /// Fail with a [`ConfigurationError`] carrying every issue, if any.
    pub fn check<A: 'static>(
        &self,
        table: &ArgumentTable<A>,
        target: &mut A,
    ) -> Result<(), ConfigurationError> {
        let issues = self.issues(table, target);
        if issues.is_empty() {
            debug!(arguments = table.len(), "sanity check passed");
            return Ok(());
        }
        warn!(
            count = issues.len(),
            "sanity check found issues in the argument table"
        );
        Err(ConfigurationError::new(
            self.properties.id_prefix.clone(),
            issues,
        ))
    }

    fn check_parser(&self, argument: &str, tag: TypeTag, issues: &mut Vec<SanityIssue>) {
        if !self.registry.contains(tag) {
            issues.push(SanityIssue::MissingParser {
                argument: argument.to_string(),
                type_name: tag.name(),
            });
        }
    }
}

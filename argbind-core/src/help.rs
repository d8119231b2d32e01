//! Help text rendering.

use std::fmt::Write;

use crate::descriptor::ArgumentDescriptor;
use crate::properties::ArgsProperties;

const ID_WIDTH: usize = 16;

/// Render the help text for a target.
///
/// ```text
/// <program info>
///
///  -h --help         display this help and exit.
///
///  -u                The users name. (required)
///  -pw               The user password
/// ```
pub fn render_help<'d, I>(program_info: &str, properties: &ArgsProperties, descriptors: I) -> String
where
    I: IntoIterator<Item = &'d ArgumentDescriptor>,
{
    let prefix = properties.id_prefix.as_str();
    let mut output = format!("{program_info}\n\n");

    let help_ids = properties
        .help_ids
        .iter()
        .map(|id| format!("{prefix}{id}"))
        .collect::<Vec<_>>()
        .join(" ");
    let help_action = if properties.terminate_after_help {
        "display this help and exit."
    } else {
        "display this help."
    };
    let _ = writeln!(output, " {help_ids:<ID_WIDTH$}  {help_action}\n");

    for descriptor in descriptors {
        let id = format!("{prefix}{}", descriptor.name);
        let _ = write!(output, " {id:<ID_WIDTH$}  {}", descriptor.info);
        if descriptor.required {
            output.push_str(" (required)");
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ValueKind;

    fn descriptor(name: &str, info: &str, required: bool) -> ArgumentDescriptor {
        ArgumentDescriptor {
            name: name.into(),
            info: info.into(),
            required,
            requires: Vec::new(),
            excludes: Vec::new(),
            kind: ValueKind::Flag,
        }
    }

    #[test]
    fn lists_help_ids_and_arguments() {
        let descriptors = [
            descriptor("u", "The users name.", true),
            descriptor("v", "Verbose", false),
        ];
        let text = render_help("Demo program.", &ArgsProperties::default(), &descriptors);
        assert_eq!(
            text,
            "Demo program.\n\n \
             -h --help         display this help and exit.\n\n \
             -u                The users name. (required)\n \
             -v                Verbose\n"
        );
    }

    #[test]
    fn continue_mode_changes_help_action() {
        let properties = ArgsProperties::default()
            .continue_after_help()
            .with_prefix("/");
        let text = render_help("Demo.", &properties, std::iter::empty());
        assert!(text.contains(" /h /-help         display this help.\n"));
    }
}

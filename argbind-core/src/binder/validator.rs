//! Requires/excludes/required validation over the supplied names.

use crate::descriptor::ArgumentDescriptor;
use crate::error::ValidationError;

/// Check the supplied names against every descriptor of the target.
///
/// First each supplied argument's `requires` and `excludes` are checked, then
/// every required descriptor must have been supplied. The first violation is
/// returned.
pub fn validate<'d, I>(supplied: &[String], descriptors: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'d ArgumentDescriptor>,
    I::IntoIter: Clone,
{
    let descriptors = descriptors.into_iter();
    let is_supplied = |name: &str| supplied.iter().any(|s| s == name);

    for name in supplied {
        let Some(descriptor) = descriptors.clone().find(|d| &d.name == name) else {
            continue;
        };
        if let Some(required) = descriptor.requires.iter().find(|r| !is_supplied(r.as_str())) {
            return Err(ValidationError::MissingRequirement {
                argument: name.clone(),
                required: required.clone(),
            });
        }
        if let Some(excluded) = descriptor.excludes.iter().find(|e| is_supplied(e.as_str())) {
            return Err(ValidationError::MutualExclusion {
                argument: name.clone(),
                excluded: excluded.clone(),
            });
        }
    }

    let mut required = descriptors.filter(|d| d.required);
    match required.find(|d| !is_supplied(&d.name)) {
        Some(missing) => Err(ValidationError::RequiredArgumentMissing(
            missing.name.clone(),
        )),
        None => Ok(()),
    }
}

//! `{{...}}` placeholder substitution in env values.

use crate::resolver::ResolvedAlias;

/// Token replaced by the name of the instance being created.
pub const INSTANCE_NAME_TOKEN: &str = "{{instance_name}}";

/// Replace every placeholder in `value`.
///
/// `{{instance_name}}` becomes `instance_name`; `{{<alias>}}` becomes the instance the
/// alias resolved to. Unknown tokens are left as they are.
#[must_use]
pub fn substitute(value: &str, instance_name: &str, aliases: &[ResolvedAlias]) -> String {
    if !value.contains("{{") {
        return value.to_string();
    }

    let mut out = value.replace(INSTANCE_NAME_TOKEN, instance_name);
    for alias in aliases {
        let token = alias.placeholder();
        if out.contains(&token) {
            out = out.replace(&token, &alias.instance);
        }
    }
    out
}

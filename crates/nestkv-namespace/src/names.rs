//! Namespace name validation.
//!
//! Valid namespace names:
//! - Must be non-empty
//! - Must not contain `:` (the key separator)
//! - Must not start or end with `/`
//! - Must not contain consecutive slashes (`//`)
//!
//! Subspace names are a single path segment: the same rules, plus no `/`.
//!
//! Local keys are not validated. A key may contain `:` or `/` because the
//! qualified key is always split at the first `:`, which belongs to the
//! namespace name.

use crate::error::{NamespaceError, Result};

/// Separator between a namespace name and a local key.
pub const KEY_SEPARATOR: char = ':';

/// Separator between a parent namespace and a subspace.
pub const PATH_SEPARATOR: char = '/';

fn invalid(name: &str, reason: impl Into<String>) -> NamespaceError {
    NamespaceError::InvalidName {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Validate a full namespace name such as `"jenkins-instance/log-categories"`.
///
/// # Examples
///
/// ```
/// use nestkv_namespace::names::validate_namespace_name;
///
/// assert!(validate_namespace_name("x").is_ok());
/// assert!(validate_namespace_name("x/y").is_ok());
/// assert!(validate_namespace_name("").is_err());
/// assert!(validate_namespace_name("x:y").is_err());
/// ```
pub fn validate_namespace_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid(name, "namespace name must not be empty"));
    }
    if name.contains(KEY_SEPARATOR) {
        return Err(invalid(name, "must not contain ':'"));
    }
    if name.starts_with(PATH_SEPARATOR) || name.ends_with(PATH_SEPARATOR) {
        return Err(invalid(name, "must not start or end with '/'"));
    }
    if name.contains("//") {
        return Err(invalid(name, "must not contain consecutive slashes '//'"));
    }
    Ok(())
}

/// Validate a single subspace segment such as `"log-categories"`.
pub fn validate_subspace_name(name: &str) -> Result<()> {
    if name.contains(PATH_SEPARATOR) {
        return Err(invalid(name, "subspace name must not contain '/'"));
    }
    validate_namespace_name(name)
}

/// Split a raw substrate key into `(namespace, local_key)` at the first `:`.
///
/// Returns `None` for unnamespaced keys.
pub fn split_qualified_key(raw: &str) -> Option<(&str, &str)> {
    raw.split_once(KEY_SEPARATOR)
}

/// Returns `true` if `candidate` is `name` itself or, when
/// `include_subspaces` is set, any namespace below it.
pub fn in_scope(name: &str, candidate: &str, include_subspaces: bool) -> bool {
    if candidate == name {
        return true;
    }
    include_subspaces
        && candidate.len() > name.len()
        && candidate.starts_with(name)
        && candidate[name.len()..].starts_with(PATH_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(validate_namespace_name("jenkins").is_ok());
        assert!(validate_namespace_name("jenkins-instance").is_ok());
        assert!(validate_namespace_name("a/b/c").is_ok());
        assert!(validate_namespace_name("org.jenkins").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(validate_namespace_name("").is_err());
        assert!(validate_subspace_name("").is_err());
    }

    #[test]
    fn reject_key_separator() {
        let err = validate_namespace_name("x:y").unwrap_err();
        assert!(matches!(err, NamespaceError::InvalidName { .. }));
        assert!(validate_subspace_name("y:z").is_err());
    }

    #[test]
    fn reject_slash_boundaries_and_doubles() {
        assert!(validate_namespace_name("/x").is_err());
        assert!(validate_namespace_name("x/").is_err());
        assert!(validate_namespace_name("x//y").is_err());
    }

    #[test]
    fn subspace_is_one_segment() {
        assert!(validate_subspace_name("y").is_ok());
        assert!(validate_subspace_name("y/z").is_err());
    }

    #[test]
    fn split_at_first_colon() {
        assert_eq!(split_qualified_key("x/y:a:b"), Some(("x/y", "a:b")));
        assert_eq!(split_qualified_key("x:"), Some(("x", "")));
        assert_eq!(split_qualified_key("plain"), None);
    }

    #[test]
    fn scope_matching() {
        assert!(in_scope("x", "x", false));
        assert!(in_scope("x", "x/y", true));
        assert!(in_scope("x", "x/y/z", true));
        assert!(!in_scope("x", "x/y", false));
        // Shared prefix is not containment.
        assert!(!in_scope("x", "xy", true));
        assert!(!in_scope("x/y", "x", true));
    }
}

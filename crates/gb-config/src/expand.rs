//! Environment variable expansion for configuration strings.
//!
//! Supports `${VAR}` (error when unset) and `${VAR:-default}` through
//! `shellexpand`. Paths additionally get `~` expansion.

use crate::ConfigError;

/// Expand `${VAR}` references in `value` using the process environment.
///
/// `field` names the config key for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_with(value, field, |name| std::env::var(name).ok())
}

/// Expand `${VAR}` references using a custom lookup.
///
/// Values without `${` are returned unchanged, so a bare `$` never triggers
/// expansion.
pub(crate) fn expand_with<F>(value: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| -> Result<Option<String>, Unset> {
        lookup(name).map(Some).ok_or_else(|| Unset {
            name: name.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.name),
    })
}

/// Lookup failure for a variable without a default.
struct Unset {
    name: String,
}

/// Expand a leading `~` to the user's home directory.
pub(crate) fn expand_home(path: &str) -> String {
    shellexpand::tilde(path).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "HOST" => Some("0.0.0.0".to_owned()),
            _ => None,
        }
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_with("127.0.0.1", "f", lookup).unwrap(), "127.0.0.1");
    }

    #[test]
    fn test_expands_set_variable() {
        assert_eq!(expand_with("${HOST}", "f", lookup).unwrap(), "0.0.0.0");
    }

    #[test]
    fn test_expands_inside_text() {
        assert_eq!(
            expand_with("http://${HOST}:80/", "f", lookup).unwrap(),
            "http://0.0.0.0:80/"
        );
    }

    #[test]
    fn test_default_used_when_unset() {
        assert_eq!(
            expand_with("${MISSING:-fallback}", "f", lookup).unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_empty_default() {
        assert_eq!(expand_with("${MISSING:-}", "f", lookup).unwrap(), "");
    }

    #[test]
    fn test_missing_variable_is_error() {
        let err = expand_with("${MISSING}", "session.secret", lookup).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("session.secret"));
        assert!(msg.contains("MISSING"));
    }

    #[test]
    fn test_multiple_references() {
        assert_eq!(
            expand_with("${HOST}:${PORT:-8080}", "f", lookup).unwrap(),
            "0.0.0.0:8080"
        );
    }

    #[test]
    fn test_lone_dollar_kept() {
        assert_eq!(expand_with("a$b", "f", lookup).unwrap(), "a$b");
    }

    #[test]
    fn test_expand_home_leaves_relative_paths() {
        assert_eq!(expand_home("guides"), "guides");
    }
}

//! Environment variable parsing with warn-level logging for invalid values.

/// Parse an environment variable with a default fallback.
///
/// - Unset variable: returns `default` silently (expected case).
/// - Set but unparsable: logs a warning and returns `default`, instead of
///   silently swallowing the failure.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Read an environment variable that has no sensible default.
///
/// Used for the TNS bot credentials; a refresh cannot run without them.
pub fn env_required(var: &'static str) -> Result<String, MissingEnvVar> {
    std::env::var(var).map_err(|_| MissingEnvVar(var))
}

/// A mandatory environment variable is not set.
#[derive(Debug, thiserror::Error)]
#[error("environment variable {0} must be set")]
pub struct MissingEnvVar(pub &'static str);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_falls_back_on_garbage() {
        let var = "TNS_MIRROR_TEST_GARBAGE_71";
        std::env::set_var(var, "one degree");
        let got: u64 = env_parse_with_default(var, 600);
        assert_eq!(got, 600);
        std::env::remove_var(var);
    }

    #[test]
    fn parse_uses_set_value() {
        let var = "TNS_MIRROR_TEST_SET_72";
        std::env::set_var(var, "30");
        let got: u64 = env_parse_with_default(var, 600);
        assert_eq!(got, 30);
        std::env::remove_var(var);
    }

    #[test]
    fn required_reports_the_variable_name() {
        let err = env_required("TNS_MIRROR_TEST_MISSING_73").unwrap_err();
        assert!(err.to_string().contains("TNS_MIRROR_TEST_MISSING_73"));
    }
}

use std::env;

use todo_atoms::lifecycle::{Retention, DEFAULT_RETENTION_DAYS};

pub const DEFAULT_TABLE_NAME: &str = "todo";
pub const DEFAULT_CORS_ORIGIN: &str = "*";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub table_name: String,
    pub cors_allowed_origin: String,
    pub retention: Retention,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            cors_allowed_origin: DEFAULT_CORS_ORIGIN.to_string(),
            retention: Retention::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Config {
        Config::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. Unset or blank values fall back to
    /// defaults; a retention that is not a positive, representable day count
    /// is ignored.
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let retention = match var("RETENTION_DAYS") {
            None => Retention::default(),
            Some(raw) => match raw.trim().parse::<i64>().ok().and_then(Retention::try_days) {
                Some(retention) => retention,
                None => {
                    tracing::warn!(
                        "Ignoring RETENTION_DAYS={:?}, using {}",
                        raw,
                        DEFAULT_RETENTION_DAYS
                    );
                    Retention::default()
                }
            },
        };

        Config {
            table_name: var("TABLE_NAME").unwrap_or_else(|| DEFAULT_TABLE_NAME.to_string()),
            cors_allowed_origin: var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            retention,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config(&[]), Config::default());
    }

    #[test]
    fn reads_overrides() {
        let c = config(&[
            ("TABLE_NAME", "todo-prod"),
            ("CORS_ALLOWED_ORIGIN", "https://todo.example.com"),
            ("RETENTION_DAYS", "7"),
        ]);
        assert_eq!(c.table_name, "todo-prod");
        assert_eq!(c.cors_allowed_origin, "https://todo.example.com");
        assert_eq!(c.retention, Retention::days(7));
    }

    #[test]
    fn bad_retention_falls_back() {
        assert_eq!(config(&[("RETENTION_DAYS", "0")]).retention, Retention::default());
        assert_eq!(config(&[("RETENTION_DAYS", "soon")]).retention, Retention::default());
        assert_eq!(config(&[("TABLE_NAME", "  ")]).table_name, DEFAULT_TABLE_NAME);
    }

    #[test]
    fn oversized_retention_falls_back_instead_of_panicking() {
        assert_eq!(
            config(&[("RETENTION_DAYS", "300000000000000")]).retention,
            Retention::default()
        );
        assert_eq!(
            config(&[("RETENTION_DAYS", "9223372036854775807")]).retention,
            Retention::default()
        );
    }
}

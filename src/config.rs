use crate::error::ConfigError;

pub const DEFAULT_MAX_BATCH_ITEMS: usize = 5000;

/// Sidecar settings loaded from the environment.
///
/// | Env Var                   | Default |
/// |---------------------------|---------|
/// | `FITRANK_MAX_BATCH_ITEMS` | `5000`  |
/// | `FITRANK_LOG`             | unset (falls back to `RUST_LOG`, then `info`) |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on items/records accepted by one bulk request.
    pub max_batch_items: usize,
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_batch_items: DEFAULT_MAX_BATCH_ITEMS,
            log_filter: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_batch_items = match lookup("FITRANK_MAX_BATCH_ITEMS") {
            None => DEFAULT_MAX_BATCH_ITEMS,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        key: "FITRANK_MAX_BATCH_ITEMS",
                        value: raw,
                        reason: "must be at least 1",
                    })
                }
                Err(_) => {
                    return Err(ConfigError::Invalid {
                        key: "FITRANK_MAX_BATCH_ITEMS",
                        value: raw,
                        reason: "must be a positive integer",
                    })
                }
            },
        };

        let log_filter = lookup("FITRANK_LOG")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            max_batch_items,
            log_filter,
        })
    }
}

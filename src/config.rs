use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::app_system::SystemError;

/// Runtime settings, read from `FOOD_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Mailbox capacity of every resource actor.
    pub mailbox_size: usize,
    /// Upper bound on each checkout step.
    pub step_timeout: Duration,
    pub card_code_length: usize,
    /// Fresh codes drawn before issuing a card gives up.
    pub card_code_retries: usize,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mailbox_size: 64,
            step_timeout: Duration::from_millis(2000),
            card_code_length: 16,
            card_code_retries: 8,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, SystemError> {
        let config = Self {
            mailbox_size: try_load("FOOD_MAILBOX_SIZE", "64")?,
            step_timeout: Duration::from_millis(try_load("FOOD_STEP_TIMEOUT_MS", "2000")?),
            card_code_length: try_load("FOOD_CARD_CODE_LENGTH", "16")?,
            card_code_retries: try_load("FOOD_CARD_CODE_RETRIES", "8")?,
            log_filter: try_load("FOOD_LOG", "info")?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), SystemError> {
        if self.mailbox_size == 0 {
            return Err(SystemError::Config("FOOD_MAILBOX_SIZE must be at least 1".to_string()));
        }
        if self.step_timeout.is_zero() {
            return Err(SystemError::Config("FOOD_STEP_TIMEOUT_MS must be at least 1".to_string()));
        }
        if self.card_code_length == 0 {
            return Err(SystemError::Config("FOOD_CARD_CODE_LENGTH must be at least 1".to_string()));
        }
        if self.card_code_retries == 0 {
            return Err(SystemError::Config("FOOD_CARD_CODE_RETRIES must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, SystemError>
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            SystemError::Config(format!("invalid {key}: {e}"))
        })
}

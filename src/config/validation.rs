//! Configuration validation logic.

use crate::config::loader::Config;
use crate::config::proxy::ProxyConfig;
use crate::error::{Error, Result};

/// Validate the resolved configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_session_id(&config.fanbox_session_id)?;
    validate_interval(config.interval)?;

    if let Some(proxy) = &config.proxy {
        ProxyConfig::parse(proxy)?;
    }

    Ok(())
}

/// Validate the session cookie value.
pub fn validate_session_id(session_id: &str) -> Result<()> {
    if session_id.is_empty() {
        return Err(Error::MissingConfig("fanboxSessionId".to_string()));
    }

    // Check for placeholder values
    let lower = session_id.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_session") {
        return Err(Error::ConfigValidation {
            field: "fanboxSessionId".to_string(),
            message: "Session id appears to be a placeholder. Copy the FANBOXSESSID cookie from your browser."
                .to_string(),
        });
    }

    Ok(())
}

/// Validate the daemon poll interval.
pub fn validate_interval(interval: u64) -> Result<()> {
    if interval == 0 {
        return Err(Error::ConfigValidation {
            field: "interval".to_string(),
            message: "Poll interval must be at least 1 second".to_string(),
        });
    }

    Ok(())
}

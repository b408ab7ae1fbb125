//! Utility module
//!
//! This module provides common utilities and helper functions used
//! throughout the library.

use std::time::Duration;

use crate::core::{Error, LinkConfig, Result};

/// Formats payload bytes as a comma separated list of decimal values
pub fn format_payload(payload: &[u8]) -> String {
    payload
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validates a link configuration
///
/// Checks that the tick interval is non-zero, so the async loop cannot spin,
/// and that the serial baud rate is usable.
pub fn validate_config(config: &LinkConfig) -> Result<()> {
    if config.tick_interval == Duration::ZERO {
        return Err(Error::config("Tick interval must be greater than zero"));
    }

    if config.serial.baud_rate == 0 {
        return Err(Error::config("Serial baud rate must be greater than zero"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_payload() {
        assert_eq!(format_payload(&[1, 20, 255]), "1, 20, 255");
        assert_eq!(format_payload(&[]), "");
    }

    #[test]
    fn test_config_validation() {
        let config = LinkConfig::default();
        assert!(validate_config(&config).is_ok());

        let config = LinkConfig {
            tick_interval: Duration::ZERO,
            ..LinkConfig::default()
        };
        assert!(matches!(validate_config(&config), Err(Error::Config(_))));

        let mut config = LinkConfig::default();
        config.serial.baud_rate = 0;
        assert!(validate_config(&config).is_err());
    }
}

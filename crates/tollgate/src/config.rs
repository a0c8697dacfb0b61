//! Session configuration
//!
//! Defaults live here as named constants; the CLI layers clap-parsed
//! overrides on top.

use std::time::Duration;

use crate::checkin::TokenUniverse;

/// Size of the generated token universe
pub const DEFAULT_TOTAL_TOKENS: usize = 400;
/// Prefix for generated token identifiers
pub const DEFAULT_TOKEN_PREFIX: &str = "TOKEN";
/// Zero-pad width of the generated ordinal
pub const DEFAULT_PAD_WIDTH: usize = 3;
/// Minimum spacing between admitted decode events
pub const DEFAULT_DEBOUNCE_MS: u64 = 1500;
/// Capture tick cadence; bounds throughput, not ledger correctness
pub const DEFAULT_TICK_MS: u64 = 100;

/// Name of the ledger file under the tollgate home directory
pub const LEDGER_FILE_NAME: &str = "ledger.json";

/// Configuration for a scan session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub total_tokens: usize,
    pub token_prefix: String,
    pub pad_width: usize,
    pub debounce: Duration,
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            total_tokens: DEFAULT_TOTAL_TOKENS,
            token_prefix: DEFAULT_TOKEN_PREFIX.to_string(),
            pad_width: DEFAULT_PAD_WIDTH,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}

impl SessionConfig {
    /// Generate the token universe this configuration describes.
    pub fn universe(&self) -> TokenUniverse {
        TokenUniverse::generate(&self.token_prefix, self.total_tokens, self.pad_width)
    }
}

/// Default store URL: the ledger file under the tollgate home directory.
pub fn default_store_url() -> String {
    format!(
        "file:{}",
        tollgate_logging::tollgate_home()
            .join(LEDGER_FILE_NAME)
            .display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_universe() {
        let universe = SessionConfig::default().universe();
        assert_eq!(universe.len(), DEFAULT_TOTAL_TOKENS);
        assert!(universe.contains("TOKEN001"));
        assert!(universe.contains("TOKEN400"));
    }

    #[test]
    fn test_default_store_url_is_file_scheme() {
        assert!(default_store_url().starts_with("file:"));
        assert!(default_store_url().ends_with(LEDGER_FILE_NAME));
    }
}

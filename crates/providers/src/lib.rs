//! LLM Provider implementations for Atlas.
//!
//! All providers implement the `atlas_core::Provider` trait.

pub mod gemini;

pub use gemini::GeminiProvider;

use atlas_config::AppConfig;
use atlas_core::error::ProviderError;

/// Build the provider from configuration.
///
/// Fails with `NotConfigured` when the mandatory API key is missing —
/// callers surface this before any pipeline work starts.
pub fn build_provider(config: &AppConfig) -> Result<GeminiProvider, ProviderError> {
    let api_key = config
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ProviderError::NotConfigured("GOOGLE_API_KEY is not set".into()))?;
    Ok(GeminiProvider::new(api_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_key_fails() {
        let config = AppConfig::default();
        let err = build_provider(&config).unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn build_with_blank_key_fails() {
        let config = AppConfig {
            api_key: Some("   ".into()),
            ..AppConfig::default()
        };
        let err = build_provider(&config).unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn build_with_key_succeeds() {
        let config = AppConfig {
            api_key: Some("test-key".into()),
            ..AppConfig::default()
        };
        let provider = build_provider(&config).unwrap();
        assert_eq!(atlas_core::Provider::name(&provider), "gemini");
    }
}

//! Web search backend implementations for Atlas.
//!
//! All backends implement the `atlas_core::SearchBackend` trait. Also home
//! to the raw URL fetcher, a collaborator tool the pipeline itself does not
//! call.

pub mod fetch;
pub mod google;

pub use fetch::fetch_url;
pub use google::GoogleSearchClient;

use atlas_config::AppConfig;

/// Build the search backend from configuration.
///
/// Returns `None` unless both search credentials are present and non-blank —
/// absent credentials mean "search disabled", not an error.
pub fn build_search_backend(config: &AppConfig) -> Option<GoogleSearchClient> {
    fn non_blank(value: Option<&str>) -> Option<&str> {
        value.filter(|v| !v.trim().is_empty())
    }
    match (
        non_blank(config.search.api_key.as_deref()),
        non_blank(config.search.engine_id.as_deref()),
    ) {
        (Some(api_key), Some(engine_id)) => Some(GoogleSearchClient::new(api_key, engine_id)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_config::SearchConfig;

    #[test]
    fn build_disabled_without_credentials() {
        assert!(build_search_backend(&AppConfig::default()).is_none());
    }

    #[test]
    fn build_disabled_with_partial_credentials() {
        let config = AppConfig {
            search: SearchConfig {
                api_key: Some("key".into()),
                engine_id: None,
            },
            ..AppConfig::default()
        };
        assert!(build_search_backend(&config).is_none());
    }

    #[test]
    fn build_disabled_with_blank_credentials() {
        let config = AppConfig {
            search: SearchConfig {
                api_key: Some("".into()),
                engine_id: Some("   ".into()),
            },
            ..AppConfig::default()
        };
        assert!(build_search_backend(&config).is_none());
    }

    #[test]
    fn build_enabled_with_both_credentials() {
        let config = AppConfig {
            search: SearchConfig {
                api_key: Some("key".into()),
                engine_id: Some("cx".into()),
            },
            ..AppConfig::default()
        };
        assert!(build_search_backend(&config).is_some());
    }
}

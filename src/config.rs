use std::time::Duration;

pub const TARGET_URL: &str = "http://results.jntuh.ac.in/jsp/home.jsp";
pub const BASE_URL: &str = "http://results.jntuh.ac.in";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const LABEL_FILTER: &str = "(r18)";
pub const RESULT_TAG: &str = "R18";

const TIMEOUT_SECS: u64 = 15;
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;
const STREAMING_MEMORY_LIMIT: usize = 8 * 1024 * 1024;

/// Fixed settings for one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub target_url: String,
    /// Prefix glued onto relative hrefs.
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Case-insensitive substring a label must contain.
    pub label_filter: String,
    /// Name shown in the report header.
    pub result_tag: String,
    pub max_response_size: usize,
    pub streaming_memory_limit: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            target_url: TARGET_URL.to_string(),
            base_url: BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: Duration::from_secs(TIMEOUT_SECS),
            label_filter: LABEL_FILTER.to_string(),
            result_tag: RESULT_TAG.to_string(),
            max_response_size: MAX_RESPONSE_SIZE,
            streaming_memory_limit: STREAMING_MEMORY_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_results_portal() {
        let config = ScrapeConfig::default();
        assert_eq!(config.target_url, "http://results.jntuh.ac.in/jsp/home.jsp");
        assert_eq!(config.base_url, "http://results.jntuh.ac.in");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.label_filter, "(r18)");
        assert!(config.target_url.starts_with(&config.base_url));
    }
}

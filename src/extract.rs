use url::Url;

use crate::parser::AnchorCandidate;

/// A labelled result link that passed the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub label: String,
    /// Always absolute.
    pub link: String,
}

/// Case-insensitive substring match on label text.
#[derive(Debug, Clone)]
pub struct LabelFilter {
    needle: String,
}

impl LabelFilter {
    pub fn new(needle: &str) -> Self {
        Self {
            needle: needle.to_lowercase(),
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        label.to_lowercase().contains(&self.needle)
    }
}

/// Absolute hrefs are returned unchanged; anything else is appended to
/// `base_url` byte for byte.
pub fn resolve_link(base_url: &str, href: &str) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    format!("{}{}", base_url, href)
}

pub fn extract_results(
    anchors: &[AnchorCandidate],
    base_url: &str,
    filter: &LabelFilter,
) -> Vec<ResultEntry> {
    anchors
        .iter()
        .filter_map(|anchor| {
            let label = anchor.label.trim();
            if !filter.matches(label) {
                return None;
            }
            Some(ResultEntry {
                label: label.to_string(),
                link: resolve_link(base_url, &anchor.href),
            })
        })
        .collect()
}

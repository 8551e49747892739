//! Fetches the results portal homepage and lists the result links whose
//! label matches a fixed filter.
//!
//! A run is strictly sequential: fetch, parse, extract, report. A failed
//! fetch is reported and ends the run before any parsing happens.

pub mod charset;
pub mod config;
pub mod extract;
pub mod http_client;
pub mod logging;
pub mod parser;
pub mod report;

use std::io::{self, Write};

use tracing::{debug, info, instrument};

use config::ScrapeConfig;
use extract::{LabelFilter, ResultEntry};
use report::Reporter;

/// Terminal state of a run.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Found(Vec<ResultEntry>),
    NotFound,
    FetchFailed,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::FetchFailed)
    }
}

#[instrument(skip_all, fields(url = %config.target_url))]
pub async fn run<W: Write>(config: &ScrapeConfig, reporter: &mut Reporter<W>) -> io::Result<Outcome> {
    reporter.fetching(&config.target_url)?;

    let page = match http_client::fetch_page(config).await {
        Ok(page) => page,
        Err(e) => {
            info!(error = %e, timeout = e.is_timeout(), "fetch failed");
            reporter.fetch_failed(&e)?;
            return Ok(Outcome::FetchFailed);
        }
    };
    info!(status = %page.status, bytes = page.body.len(), "fetched");

    let (html, encoding) = charset::decode_document(&page.body, page.charset.as_deref());
    debug!(encoding = encoding.name(), "decoded");

    let document = parser::parse_document(&html, config.streaming_memory_limit);
    if let Some(reason) = &document.fallback_reason {
        reporter.parser_fallback(reason)?;
    }
    info!(backend = ?document.backend, anchors = document.anchors.len(), "parsed");

    let filter = LabelFilter::new(&config.label_filter);
    let entries = extract::extract_results(&document.anchors, &config.base_url, &filter);
    info!(results = entries.len(), "extracted");

    reporter.results(&entries)?;

    if entries.is_empty() {
        Ok(Outcome::NotFound)
    } else {
        Ok(Outcome::Found(entries))
    }
}

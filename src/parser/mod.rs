//! HTML parsing backends.
//!
//! The streaming backend (`lol_html`) is tried first. When it cannot handle a
//! document it reports itself unavailable and the tree backend (`scraper`)
//! parses the same bytes instead.

pub mod streaming;
pub mod tree;

use tracing::{debug, warn};

/// An `<a href>` element together with the text of its first nested `<p>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorCandidate {
    pub href: String,
    /// Untrimmed text content of the nested paragraph.
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Streaming,
    Tree,
}

/// Result of trying the streaming backend on a document.
#[derive(Debug)]
pub enum ParserProbe {
    Available(Vec<AnchorCandidate>),
    Unavailable(String),
}

#[derive(Debug)]
pub struct ParsedDocument {
    pub backend: Backend,
    pub anchors: Vec<AnchorCandidate>,
    /// Set when the streaming backend gave up and the tree backend was used.
    pub fallback_reason: Option<String>,
}

pub fn parse_document(html: &str, memory_limit: usize) -> ParsedDocument {
    select_backend(streaming::probe(html, memory_limit), html)
}

pub fn select_backend(probe: ParserProbe, html: &str) -> ParsedDocument {
    match probe {
        ParserProbe::Available(anchors) => {
            debug!(anchors = anchors.len(), "parsed with streaming backend");
            ParsedDocument {
                backend: Backend::Streaming,
                anchors,
                fallback_reason: None,
            }
        }
        ParserProbe::Unavailable(reason) => {
            warn!(%reason, "streaming backend unavailable, using tree backend");
            ParsedDocument {
                backend: Backend::Tree,
                anchors: tree::scan(html),
                fallback_reason: Some(reason),
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const PORTAL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>JNTUH Results</title></head>
<body>
  <table>
    <tr><td><a href="/jsp/SearchResult.jsp?degree=btech&amp;examCode=1662"><p> B.Tech IV Year I Semester (R18) Regular </p></a></td></tr>
    <tr><td><a href="/jsp/Other.jsp"><p>Some Other Exam</p></a></td></tr>
    <tr><td><a href="/jsp/NoLabel.jsp">B.Tech (R18) without paragraph</a></td></tr>
    <tr><td><a name="anchor-only"><p>B.Tech (R18) no href</p></a></td></tr>
    <tr><td><a href="https://elsewhere.example/r18"><p>M.Tech <b>(r18)</b> Supply</p><p>second paragraph</p></a></td></tr>
  </table>
</body>
</html>"#;
}

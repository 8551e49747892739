use std::io::{self, Write};

use crate::extract::ResultEntry;
use crate::http_client::FetchError;

const SEPARATOR_WIDTH: usize = 60;

/// Writes the user-facing transcript of a run.
pub struct Reporter<W: Write> {
    out: W,
    result_tag: String,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, result_tag: &str) -> Self {
        Self {
            out,
            result_tag: result_tag.to_string(),
        }
    }

    pub fn fetching(&mut self, url: &str) -> io::Result<()> {
        writeln!(self.out, "Attempting to fetch data from: {}", url)
    }

    pub fn fetch_failed(&mut self, err: &FetchError) -> io::Result<()> {
        writeln!(self.out, "An error occurred while fetching the URL: {}", err)
    }

    pub fn parser_fallback(&mut self, reason: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "Streaming HTML parser unavailable ({}), falling back to tree parser.",
            reason
        )
    }

    pub fn results(&mut self, entries: &[ResultEntry]) -> io::Result<()> {
        if entries.is_empty() {
            writeln!(self.out)?;
            writeln!(
                self.out,
                "Could not find any '{}' results matching the criteria.",
                self.result_tag
            )?;
            writeln!(
                self.out,
                "The website's structure may have changed or no {} results are listed.",
                self.result_tag
            )?;
        } else {
            writeln!(self.out)?;
            writeln!(self.out, "--- Found {} Results ---", self.result_tag)?;
            writeln!(self.out)?;
            for entry in entries {
                writeln!(self.out, "Name: {}", entry.label)?;
                writeln!(self.out, "Link: {}", entry.link)?;
                writeln!(self.out, "{}", "-".repeat(SEPARATOR_WIDTH))?;
            }
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(f: impl FnOnce(&mut Reporter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut reporter = Reporter::new(Vec::new(), "R18");
        f(&mut reporter).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn lists_entries_with_separators() {
        let entries = vec![
            ResultEntry {
                label: "B.Tech (R18) Regular".to_string(),
                link: "http://results.jntuh.ac.in/jsp/SearchResult.jsp?x=1".to_string(),
            },
            ResultEntry {
                label: "M.Tech (R18) Supply".to_string(),
                link: "http://results.jntuh.ac.in/jsp/SearchResult.jsp?x=2".to_string(),
            },
        ];
        let out = transcript(|r| r.results(&entries));
        let dashes = "-".repeat(60);
        let expected = format!(
            "\n--- Found R18 Results ---\n\n\
             Name: B.Tech (R18) Regular\n\
             Link: http://results.jntuh.ac.in/jsp/SearchResult.jsp?x=1\n\
             {dashes}\n\
             Name: M.Tech (R18) Supply\n\
             Link: http://results.jntuh.ac.in/jsp/SearchResult.jsp?x=2\n\
             {dashes}\n"
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn empty_results_print_not_found_notice() {
        let out = transcript(|r| r.results(&[]));
        assert_eq!(
            out,
            "\nCould not find any 'R18' results matching the criteria.\n\
             The website's structure may have changed or no R18 results are listed.\n"
        );
    }

    #[test]
    fn fallback_and_failure_are_single_lines() {
        let out = transcript(|r| {
            r.parser_fallback("memory limit exceeded")?;
            r.fetch_failed(&FetchError::TooLarge(11))
        });
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("memory limit exceeded"));
        assert_eq!(
            lines[1],
            "An error occurred while fetching the URL: Response too large: 11 bytes"
        );
    }
}

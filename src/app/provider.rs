use std::path::{Path, PathBuf};
use std::process::{Command as ProcessCommand, Stdio};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::{debug, warn};

use super::results::{ResultItem, ResultSet};

/// Above this many requested items a page fetch is logged as expensive.
pub(crate) const DEEP_REQUEST_WARN: usize = 100;

/// Top-N lookup: returns at most `count` items for `query`, best first.
pub(crate) trait SearchProvider {
    fn search(&self, query: &str, count: usize) -> Result<Vec<ResultItem>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FetchOutcome {
    Page(ResultSet),
    Empty,
}

/// Fetches page `page` (1-based) by requesting `page_size * page` items and
/// keeping the last `page_size` of them, since the provider has no offsets.
pub(crate) fn fetch_page(
    provider: &dyn SearchProvider,
    query: &str,
    page_size: usize,
    page: u32,
) -> Result<FetchOutcome> {
    let page_size = page_size.max(1);
    let page_idx = page.max(1) as usize;
    let requested = page_size.saturating_mul(page_idx);
    if requested > DEEP_REQUEST_WARN {
        warn!(query, page, requested, "deep page requested, fetching every earlier result again");
    }
    debug!(query, page, requested, "searching");

    let entries = provider.search(query, requested)?;
    let start = (page_idx - 1) * page_size;
    if entries.len() <= start {
        debug!(query, page, returned = entries.len(), "no results for page");
        return Ok(FetchOutcome::Empty);
    }
    let items = entries.into_iter().skip(start).take(page_size).collect();
    Ok(FetchOutcome::Page(ResultSet::new(query, page, items)))
}

pub(crate) struct YtDlpProvider {
    bin: PathBuf,
}

impl YtDlpProvider {
    pub(crate) fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    pub(crate) fn bin(&self) -> &Path {
        &self.bin
    }
}

impl SearchProvider for YtDlpProvider {
    fn search(&self, query: &str, count: usize) -> Result<Vec<ResultItem>> {
        let output = ProcessCommand::new(&self.bin)
            .arg("--quiet")
            .arg("--no-warnings")
            .arg("--flat-playlist")
            .arg("--dump-single-json")
            .arg(format!("ytsearch{count}:{query}"))
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to launch {}", self.bin.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if stderr.is_empty() {
                return Err(anyhow!("{} exited with {}", self.bin.display(), output.status));
            }
            let truncated = stderr.chars().take(240).collect::<String>();
            return Err(anyhow!(
                "{} exited with {} ({truncated})",
                self.bin.display(),
                output.status
            ));
        }

        let raw = String::from_utf8(output.stdout).context("yt-dlp output was not valid UTF-8")?;
        parse_search_entries(&raw)
    }
}

pub(crate) fn parse_search_entries(raw: &str) -> Result<Vec<ResultItem>> {
    let parsed: Value = serde_json::from_str(raw).context("failed to parse yt-dlp output")?;
    let Some(entries) = parsed.get("entries").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    Ok(entries
        .iter()
        .filter_map(|entry| {
            let address = entry_address(entry)?;
            let title = entry
                .get("title")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .unwrap_or("(untitled)");
            Some(ResultItem {
                title: title.to_string(),
                address,
            })
        })
        .collect())
}

fn entry_address(entry: &Value) -> Option<String> {
    let url = entry
        .get("url")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty());
    if let Some(url) = url {
        return Some(url.to_string());
    }
    let id = entry
        .get("id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())?;
    Some(format!("https://www.youtube.com/watch?v={id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct RecordingProvider {
        total: usize,
        requests: RefCell<Vec<usize>>,
    }

    impl RecordingProvider {
        fn with_total(total: usize) -> Self {
            Self {
                total,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl SearchProvider for RecordingProvider {
        fn search(&self, _query: &str, count: usize) -> Result<Vec<ResultItem>> {
            self.requests.borrow_mut().push(count);
            Ok((1..=count.min(self.total))
                .map(|n| ResultItem {
                    title: format!("Video {n}"),
                    address: format!("https://example.test/{n}"),
                })
                .collect())
        }
    }

    fn titles(outcome: &FetchOutcome) -> Vec<String> {
        match outcome {
            FetchOutcome::Page(set) => (1..=set.len())
                .filter_map(|idx| set.get(idx))
                .map(|item| item.title.clone())
                .collect(),
            FetchOutcome::Empty => Vec::new(),
        }
    }

    #[test]
    fn page_slices_match_single_oversized_request() {
        for page_size in [1_usize, 3, 10] {
            for page in 1_u32..=4 {
                let provider = RecordingProvider::with_total(1_000);
                let outcome = fetch_page(&provider, "lofi", page_size, page).expect("fetch");
                let requested = page_size * page as usize;
                assert_eq!(*provider.requests.borrow(), vec![requested]);

                let full = provider.search("lofi", requested).expect("full");
                let start = (page as usize - 1) * page_size;
                let expected: Vec<String> =
                    full[start..start + page_size].iter().map(|i| i.title.clone()).collect();
                assert_eq!(titles(&outcome), expected, "size {page_size} page {page}");
            }
        }
    }

    #[test]
    fn last_page_may_be_short() {
        let provider = RecordingProvider::with_total(15);
        let outcome = fetch_page(&provider, "lofi", 10, 2).expect("fetch");
        assert_eq!(titles(&outcome).len(), 5);
        match outcome {
            FetchOutcome::Page(set) => assert_eq!(set.page(), 2),
            FetchOutcome::Empty => panic!("expected a page"),
        }
    }

    #[test]
    fn exhausted_results_are_empty() {
        let provider = RecordingProvider::with_total(10);
        assert_eq!(
            fetch_page(&provider, "lofi", 10, 2).expect("fetch"),
            FetchOutcome::Empty
        );
        let nothing = RecordingProvider::with_total(0);
        assert_eq!(
            fetch_page(&nothing, "obscure12345", 10, 1).expect("fetch"),
            FetchOutcome::Empty
        );
    }

    #[test]
    fn parse_search_entries_reads_titles_and_urls() {
        let raw = r#"{
            "_type": "playlist",
            "entries": [
                {"id": "a1", "title": " First ", "url": "https://www.youtube.com/watch?v=a1"},
                {"id": "b2", "title": "Second"},
                {"title": "No address"},
                {"id": "c3", "url": "https://www.youtube.com/watch?v=c3"}
            ]
        }"#;
        let items = parse_search_entries(raw).expect("parse");
        assert_eq!(
            items,
            vec![
                ResultItem {
                    title: "First".to_string(),
                    address: "https://www.youtube.com/watch?v=a1".to_string(),
                },
                ResultItem {
                    title: "Second".to_string(),
                    address: "https://www.youtube.com/watch?v=b2".to_string(),
                },
                ResultItem {
                    title: "(untitled)".to_string(),
                    address: "https://www.youtube.com/watch?v=c3".to_string(),
                },
            ]
        );
    }

    #[test]
    fn parse_search_entries_without_entries_is_empty() {
        assert!(parse_search_entries(r#"{"_type": "video"}"#).expect("parse").is_empty());
    }

    #[test]
    fn parse_search_entries_rejects_garbage() {
        assert!(parse_search_entries("not json").is_err());
    }
}

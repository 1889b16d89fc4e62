#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResultItem {
    pub(crate) title: String,
    pub(crate) address: String,
}

/// One page of results for one query. Replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResultSet {
    query: String,
    page: u32,
    items: Vec<ResultItem>,
}

impl ResultSet {
    pub(crate) fn new(query: impl Into<String>, page: u32, items: Vec<ResultItem>) -> Self {
        Self {
            query: query.into(),
            page,
            items,
        }
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn page(&self) -> u32 {
        self.page
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// Looks up a 1-based display index.
    pub(crate) fn get(&self, index: usize) -> Option<&ResultItem> {
        index.checked_sub(1).and_then(|idx| self.items.get(idx))
    }

    pub(crate) fn listing(&self) -> String {
        let rows = self
            .items
            .iter()
            .enumerate()
            .map(|(idx, item)| format!("{}. {}", idx + 1, item.title))
            .collect::<Vec<_>>()
            .join("\n");
        format!("Search Results (Page {}):\n{rows}", self.page)
    }
}

/// Tracks the active query, the page number and the last page fetched for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pager {
    query: Option<String>,
    page: u32,
    results: Option<ResultSet>,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            query: None,
            page: 1,
            results: None,
        }
    }
}

impl Pager {
    pub(crate) fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub(crate) fn page(&self) -> u32 {
        self.page
    }

    pub(crate) fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    pub(crate) fn new_search(&mut self, query: impl Into<String>) {
        self.query = Some(query.into());
        self.page = 1;
        self.results = None;
    }

    pub(crate) fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
        self.results = None;
    }

    pub(crate) fn redo(&mut self) {
        self.query = None;
        self.page = 1;
        self.results = None;
    }

    /// Replaces the held page with a freshly fetched one.
    pub(crate) fn install(&mut self, results: ResultSet) {
        self.results = Some(results);
    }

    /// An empty fetch drops the query but keeps the page number; the next
    /// `new_search` resets it.
    pub(crate) fn abandon(&mut self) {
        self.query = None;
        self.results = None;
    }

    pub(crate) fn resolve(&self, index: usize) -> Option<&str> {
        self.results
            .as_ref()
            .and_then(|results| results.get(index))
            .map(|item| item.address.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(count: usize) -> Vec<ResultItem> {
        (1..=count)
            .map(|n| ResultItem {
                title: format!("Title {n}"),
                address: format!("https://example.test/{n}"),
            })
            .collect()
    }

    #[test]
    fn get_uses_one_based_indices() {
        let set = ResultSet::new("q", 1, items(3));
        assert!(set.get(0).is_none());
        assert_eq!(set.get(1).map(|i| i.title.as_str()), Some("Title 1"));
        assert_eq!(set.get(3).map(|i| i.title.as_str()), Some("Title 3"));
        assert!(set.get(4).is_none());
    }

    #[test]
    fn listing_numbers_titles_and_names_page() {
        let set = ResultSet::new("q", 2, items(2));
        assert_eq!(
            set.listing(),
            "Search Results (Page 2):\n1. Title 1\n2. Title 2"
        );
    }

    #[test]
    fn new_search_resets_page_and_results() {
        let mut pager = Pager::default();
        pager.new_search("first");
        pager.next_page();
        pager.next_page();
        assert_eq!(pager.page(), 3);

        pager.new_search("second");
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.query(), Some("second"));
        assert!(pager.results().is_none());
    }

    #[test]
    fn next_page_clears_results_and_increments() {
        let mut pager = Pager::default();
        pager.new_search("lofi");
        pager.install(ResultSet::new("lofi", 1, items(2)));
        pager.next_page();
        assert_eq!(pager.page(), 2);
        assert!(pager.results().is_none());
        assert_eq!(pager.query(), Some("lofi"));
    }

    #[test]
    fn redo_clears_query_and_resets_page() {
        let mut pager = Pager::default();
        pager.new_search("lofi");
        pager.next_page();
        pager.redo();
        assert_eq!(pager.page(), 1);
        assert!(pager.query().is_none());
    }

    #[test]
    fn install_replaces_held_page_wholesale() {
        let mut pager = Pager::default();
        pager.new_search("lofi");
        pager.install(ResultSet::new("lofi", 1, items(3)));
        pager.install(ResultSet::new("lofi", 1, items(1)));

        assert_eq!(pager.results().map(ResultSet::len), Some(1));
        assert_eq!(pager.resolve(1), Some("https://example.test/1"));
        assert_eq!(pager.resolve(2), None);
    }

    #[test]
    fn next_page_saturates_at_max() {
        let mut pager = Pager::default();
        pager.new_search("lofi");
        pager.page = u32::MAX;
        pager.next_page();
        assert_eq!(pager.page(), u32::MAX);
    }

    #[test]
    fn abandon_keeps_page_number() {
        let mut pager = Pager::default();
        pager.new_search("lofi");
        pager.next_page();
        pager.abandon();
        assert_eq!(pager.page(), 2);
        assert!(pager.query().is_none());
        assert!(pager.results().is_none());
    }

    #[test]
    fn resolve_maps_index_to_address() {
        let mut pager = Pager::default();
        pager.new_search("lofi");
        pager.install(ResultSet::new("lofi", 1, items(3)));
        assert_eq!(pager.resolve(2), Some("https://example.test/2"));
        assert_eq!(pager.resolve(4), None);
    }
}

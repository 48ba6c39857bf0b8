//! Catalog of tradable symbols and the search filter over it.

use chrono::{DateTime, Utc};

/// Exchange symbol identifier, e.g. `"BTCUSDT"`.
pub type Symbol = String;

/// Alphabetically sorted, duplicate-free set of tradable symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    symbols: Vec<Symbol>,
}

impl Catalog {
    /// Build a catalog from any collection of symbols.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let mut symbols: Vec<Symbol> = symbols.into_iter().map(Into::into).collect();
        symbols.sort();
        symbols.dedup();
        Self { symbols }
    }

    /// All symbols in ascending order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the catalog has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether the catalog lists `symbol`.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols
            .binary_search_by(|s| s.as_str().cmp(symbol))
            .is_ok()
    }

    /// Symbols matching `query`, see [`filter`].
    pub fn filter(&self, query: &str) -> Vec<Symbol> {
        filter(self, query)
    }
}

/// Derive the visible subset of `catalog` for a search query.
///
/// Matching is a case-insensitive substring test. The result is sorted
/// ascending; an empty query yields the whole catalog.
pub fn filter(catalog: &Catalog, query: &str) -> Vec<Symbol> {
    if query.is_empty() {
        return catalog.symbols.clone();
    }

    let needle = query.to_lowercase();
    let mut visible: Vec<Symbol> = catalog
        .symbols
        .iter()
        .filter(|s| s.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    visible.sort();
    visible
}

/// Loading status of the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogStatus {
    /// No fetch has been started yet.
    #[default]
    Pending,
    /// A fetch is in flight.
    Loading,
    /// The catalog is available.
    Ready(Catalog),
    /// The last fetch failed with the given cause.
    Failed(String),
}

/// Catalog plus its loading lifecycle.
#[derive(Debug, Default)]
pub struct CatalogState {
    /// Current status.
    pub status: CatalogStatus,
    /// When the catalog was last loaded successfully.
    pub last_updated: Option<DateTime<Utc>>,
}

impl CatalogState {
    /// Get the loaded catalog, if any.
    pub fn catalog(&self) -> Option<&Catalog> {
        match &self.status {
            CatalogStatus::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.status == CatalogStatus::Loading
    }

    /// Whether the catalog has been loaded.
    pub fn is_ready(&self) -> bool {
        matches!(self.status, CatalogStatus::Ready(_))
    }

    /// Cause of the last failed fetch.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            CatalogStatus::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Mark a fetch as started.
    pub fn set_loading(&mut self) {
        self.status = CatalogStatus::Loading;
    }

    /// Store a freshly loaded catalog.
    pub fn set_ready(&mut self, catalog: Catalog) {
        self.status = CatalogStatus::Ready(catalog);
        self.last_updated = Some(Utc::now());
    }

    /// Record a failed fetch.
    pub fn set_failed(&mut self, cause: impl Into<String>) {
        self.status = CatalogStatus::Failed(cause.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_catalog() -> Catalog {
        Catalog::from_symbols(["ETHUSDT", "BTCUSDT", "DOGEUSDT", "ADAUSDT", "ETCUSDT"])
    }

    #[test]
    fn test_catalog_is_sorted_and_deduplicated() {
        let catalog = Catalog::from_symbols(["XRPUSDT", "BTCUSDT", "XRPUSDT"]);
        assert_eq!(catalog.symbols(), &["BTCUSDT", "XRPUSDT"]);
        assert!(catalog.contains("XRPUSDT"));
        assert!(!catalog.contains("XRP"));
    }

    #[test]
    fn test_empty_query_returns_full_catalog() {
        let catalog = create_test_catalog();
        assert_eq!(filter(&catalog, ""), catalog.symbols().to_vec());
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let catalog = create_test_catalog();
        assert_eq!(filter(&catalog, "et"), vec!["ETCUSDT", "ETHUSDT"]);
        assert_eq!(filter(&catalog, "ET"), vec!["ETCUSDT", "ETHUSDT"]);
        assert_eq!(filter(&catalog, "eTh"), vec!["ETHUSDT"]);
    }

    #[test]
    fn test_filter_results_contain_query_and_are_sorted() {
        let catalog = create_test_catalog();
        let visible = filter(&catalog, "usdt");
        assert_eq!(visible.len(), catalog.len());
        assert!(visible.windows(2).all(|w| w[0] <= w[1]));

        let visible = filter(&catalog, "o");
        assert!(visible.iter().all(|s| s.to_lowercase().contains('o')));
        assert_eq!(visible, vec!["DOGEUSDT"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let catalog = create_test_catalog();
        assert_eq!(filter(&catalog, "a"), filter(&catalog, "a"));
    }

    #[test]
    fn test_filter_no_match() {
        let catalog = create_test_catalog();
        assert!(filter(&catalog, "SOL").is_empty());
    }

    #[test]
    fn test_catalog_state_lifecycle() {
        let mut state = CatalogState::default();
        assert_eq!(state.status, CatalogStatus::Pending);

        state.set_loading();
        assert!(state.is_loading());

        state.set_failed("request timed out");
        assert_eq!(state.error(), Some("request timed out"));
        assert!(state.catalog().is_none());

        state.set_ready(create_test_catalog());
        assert!(state.is_ready());
        assert_eq!(state.catalog().map(Catalog::len), Some(5));
        assert!(state.last_updated.is_some());
    }
}

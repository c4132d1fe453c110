//! Decision-history view: one server-side page of bot decisions at a time.
//!
//! Owns its own [`Pagination`], independent of the trade table. Pages are
//! fetched by the caller using [`DecisionHistory::query`] and handed back
//! through [`DecisionHistory::apply_page`].

use btdash_core::domain::{DecisionPage, DecisionRecord, ResponseError};
use btdash_core::pagination::Pagination;
use btdash_core::request::HistoryQuery;
use tracing::{debug, info};

use crate::view::{self, DecisionRow, LatestDecisionCard};

/// What changed when a page was applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryUpdate {
    /// The first decision on the page differs from the last one seen.
    pub new_latest: bool,
    /// A new decision arrived while page 1 was showing.
    pub scroll_to_top: bool,
}

#[derive(Debug, Clone)]
pub struct DecisionHistory {
    pages: Pagination,
    symbol: String,
    records: Vec<DecisionRecord>,
    latest_key: Option<String>,
}

impl DecisionHistory {
    pub fn new(symbol: impl Into<String>, page_size: usize) -> Self {
        Self {
            pages: Pagination::new(page_size),
            symbol: symbol.into(),
            records: Vec::new(),
            latest_key: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Switch symbols. The next fetch starts from page 1.
    pub fn set_symbol(&mut self, symbol: impl Into<String>) {
        self.symbol = symbol.into();
        self.pages.reset(self.pages.total());
    }

    /// The request for the page currently selected.
    pub fn query(&self) -> HistoryQuery {
        HistoryQuery::for_page(&self.pages, self.symbol.clone())
    }

    /// Take in the server page for the current selection. The page number is
    /// clamped to the new total, never raised.
    pub fn apply_page(&mut self, page: DecisionPage) -> Result<HistoryUpdate, ResponseError> {
        self.apply_page_at(self.pages.page(), page)
    }

    /// Take in a server page fetched as page `requested`, which may lie past
    /// the total known before the fetch. The selection moves there, clamped
    /// to the new total.
    pub fn apply_page_at(
        &mut self,
        requested: usize,
        page: DecisionPage,
    ) -> Result<HistoryUpdate, ResponseError> {
        let total = page.total_or_zero();
        let records = page.into_records()?;
        self.pages.set_total(total);
        self.pages.go_to(requested);
        self.records = records;
        debug!(
            page = self.pages.page(),
            rows = self.records.len(),
            total = self.pages.total(),
            "history page applied"
        );

        let mut update = HistoryUpdate::default();
        if let Some(key) = self.records.first().map(DecisionRecord::latest_key) {
            if self.latest_key.as_deref() != Some(key.as_str()) {
                info!(key = %key, "new latest decision");
                self.latest_key = Some(key);
                update.new_latest = true;
                update.scroll_to_top = self.pages.page() == 1;
            }
        }
        Ok(update)
    }

    pub fn records(&self) -> &[DecisionRecord] {
        &self.records
    }

    pub fn rows(&self) -> Vec<DecisionRow> {
        self.records.iter().map(DecisionRow::new).collect()
    }

    /// Card for the first decision on the current page.
    pub fn latest(&self) -> Option<LatestDecisionCard> {
        self.records.first().map(LatestDecisionCard::new)
    }

    pub fn pages(&self) -> &Pagination {
        &self.pages
    }

    pub fn page_info(&self) -> String {
        self.pages.page_info()
    }

    pub fn empty_notice(&self) -> Option<&'static str> {
        self.records.is_empty().then_some(view::NO_DATA)
    }

    /// Step forward. Returns true when a new page must be fetched.
    pub fn next_page(&mut self) -> bool {
        self.pages.next()
    }

    pub fn prev_page(&mut self) -> bool {
        self.pages.prev()
    }

    pub fn set_page_size(&mut self, size: usize) -> bool {
        self.pages.set_page_size(size)
    }

    pub fn set_page_size_str(&mut self, raw: &str) -> bool {
        self.pages.set_page_size_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: &str, action: &str) -> DecisionRecord {
        DecisionRecord {
            timestamp: Some(ts.into()),
            action: Some(action.into()),
            ..Default::default()
        }
    }

    fn page(total: u64, rows: Vec<DecisionRecord>) -> DecisionPage {
        DecisionPage {
            total: Some(total),
            data: rows,
            ..Default::default()
        }
    }

    #[test]
    fn first_page_signals_scroll() {
        let mut h = DecisionHistory::new("ETH", 10);
        let update = h.apply_page(page(25, vec![record("t1", "BUY")])).unwrap();
        assert_eq!(
            update,
            HistoryUpdate {
                new_latest: true,
                scroll_to_top: true
            }
        );
        let again = h.apply_page(page(25, vec![record("t1", "BUY")])).unwrap();
        assert_eq!(again, HistoryUpdate::default());
    }

    #[test]
    fn new_latest_off_first_page_does_not_scroll() {
        let mut h = DecisionHistory::new("ETH", 10);
        h.apply_page(page(25, vec![record("t1", "BUY")])).unwrap();
        assert!(h.next_page());
        assert_eq!(h.query().page, 2);
        let update = h.apply_page(page(25, vec![record("t0", "HOLD")])).unwrap();
        assert!(update.new_latest);
        assert!(!update.scroll_to_top);
    }

    #[test]
    fn shrinking_total_clamps_page() {
        let mut h = DecisionHistory::new("ETH", 10);
        h.apply_page(page(50, vec![])).unwrap();
        for _ in 0..4 {
            h.next_page();
        }
        assert_eq!(h.pages().page(), 5);
        h.apply_page(page(12, vec![])).unwrap();
        assert_eq!(h.pages().page(), 2);
        assert_eq!(h.empty_notice(), Some(view::NO_DATA));
    }

    #[test]
    fn page_requested_before_total_is_known() {
        let mut h = DecisionHistory::new("ETH", 10);
        let update = h.apply_page_at(3, page(50, vec![record("t9", "SELL")])).unwrap();
        assert_eq!(h.pages().page(), 3);
        assert_eq!(h.page_info(), "Page 3 / 5 (50 total)");
        assert!(update.new_latest);
        assert!(!update.scroll_to_top);
        assert_eq!(h.query().page, 3);
    }

    #[test]
    fn requested_page_past_total_is_clamped() {
        let mut h = DecisionHistory::new("ETH", 10);
        h.apply_page_at(9, page(42, vec![])).unwrap();
        assert_eq!(h.pages().page(), 5);
        assert_eq!(h.query().page, 5);
    }

    #[test]
    fn rejected_page_keeps_rows() {
        let mut h = DecisionHistory::new("ETH", 10);
        h.apply_page(page(1, vec![record("t1", "BUY")])).unwrap();
        let bad = DecisionPage {
            success: false,
            error: Some("db locked".into()),
            ..Default::default()
        };
        assert!(h.apply_page(bad).is_err());
        assert_eq!(h.records().len(), 1);
        assert_eq!(h.latest().unwrap().action, "BUY");
    }

    #[test]
    fn symbol_switch_returns_to_first_page() {
        let mut h = DecisionHistory::new("ETH", 10);
        h.apply_page(page(30, vec![])).unwrap();
        h.next_page();
        h.set_symbol("BTC");
        let q = h.query();
        assert_eq!((q.symbol.as_str(), q.page, q.page_size), ("BTC", 1, 10));
    }
}

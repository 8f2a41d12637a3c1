use crate::models::SearchRecord;
use serde::Serialize;

/// Where a search session sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    /// Empty input, no results, dropdown hidden
    Idle,
    /// Input changed, debounce timer running
    Pending,
    /// Lookup in flight for the debounced text
    Loading,
    /// Results (possibly empty) shown for the debounced text
    Resolved,
    /// Caller may not search; nothing is looked up
    Denied,
}

/// Read-only copy of a session's state, published after every event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSnapshot<R> {
    pub phase: SearchPhase,
    pub raw_text: String,
    pub debounced_text: String,
    pub results: Vec<R>,
    pub loading: bool,
    pub dropdown_open: bool,
    /// Last user-visible notice (lookup failure or denial)
    pub notice: Option<String>,
    pub generation: u64,
}

impl<R> Default for SearchSnapshot<R> {
    fn default() -> Self {
        Self {
            phase: SearchPhase::Idle,
            raw_text: String::new(),
            debounced_text: String::new(),
            results: Vec::new(),
            loading: false,
            dropdown_open: false,
            notice: None,
            generation: 0,
        }
    }
}

/// What the presentation layer should draw for a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchView<'a, R> {
    Hidden,
    Loading,
    Empty { message: String },
    Results(&'a [R]),
    Denied { notice: String },
}

impl<R: SearchRecord> SearchSnapshot<R> {
    pub fn view(&self) -> SearchView<'_, R> {
        if self.phase == SearchPhase::Denied {
            return SearchView::Denied {
                notice: self
                    .notice
                    .clone()
                    .unwrap_or_else(|| "You don't have permission to search patients.".to_string()),
            };
        }
        if !self.dropdown_open {
            return SearchView::Hidden;
        }
        if self.loading {
            return SearchView::Loading;
        }
        if self.results.is_empty() {
            return SearchView::Empty {
                message: format!("No patients match \"{}\"", self.raw_text),
            };
        }
        SearchView::Results(&self.results)
    }

    pub fn result_ids(&self) -> Vec<&str> {
        self.results.iter().map(SearchRecord::record_id).collect()
    }
}

use serde::{Deserialize, Serialize};

use super::engine::SearchResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptionsState {
    pub case_sensitive: bool,
    pub use_regex: bool,
    pub whole_word: bool,
}

/// Partial options update; unset fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptionsPatch {
    #[serde(default)]
    pub case_sensitive: Option<bool>,
    #[serde(default)]
    pub use_regex: Option<bool>,
    #[serde(default)]
    pub whole_word: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub searching: bool,
    pub search_time_ms: u64,
    pub options: SearchOptionsState,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum SearchAction {
    SetQuery(String),
    SetOptions(SearchOptionsPatch),
    SetResults {
        results: Vec<SearchResult>,
        #[serde(rename = "timeMs")]
        time_ms: u64,
    },
    SetSearching(bool),
    Reset,
}

impl SearchState {
    pub fn apply(&mut self, action: SearchAction) {
        match action {
            SearchAction::SetQuery(query) => self.query = query,
            SearchAction::SetOptions(patch) => {
                if let Some(v) = patch.case_sensitive {
                    self.options.case_sensitive = v;
                }
                if let Some(v) = patch.use_regex {
                    self.options.use_regex = v;
                }
                if let Some(v) = patch.whole_word {
                    self.options.whole_word = v;
                }
            }
            SearchAction::SetResults { results, time_ms } => {
                self.results = results;
                self.search_time_ms = time_ms;
                self.searching = false;
            }
            SearchAction::SetSearching(searching) => self.searching = searching,
            SearchAction::Reset => *self = SearchState::default(),
        }
    }
}

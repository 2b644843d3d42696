pub mod engine;
pub mod state;

pub use engine::{global_search, SearchMatch, SearchOptions, SearchResult};
pub use state::{SearchAction, SearchOptionsPatch, SearchOptionsState, SearchState};

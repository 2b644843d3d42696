pub mod config;
pub mod session;
pub mod state;

pub use config::{load_config, save_config, WorkspaceConfig};
pub use session::{load_session, save_session, SavedState};
pub use state::{OpenFile, WorkspaceAction, WorkspaceState};

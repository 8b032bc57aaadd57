pub mod storage;
pub mod view_state;

pub use storage::{FileStore, MemoryStore, SettingsStore};
pub use view_state::{ViewAction, ViewState};

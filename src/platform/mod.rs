//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Key-value storage (LocalStorage on web, a JSON file directory on native)
//! - Theme side-effects (body class on web, a log line on native)
//! - Wall-clock time

pub mod clock;
pub mod storage;
pub mod theme;

pub use clock::{Clock, ManualClock, SystemClock};
pub use storage::{KeyValueStore, MemoryStorage, StorageError};
pub use theme::{LogTheme, RecordingTheme, ThemeSink};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
#[cfg(target_arch = "wasm32")]
pub use theme::BodyClassTheme;

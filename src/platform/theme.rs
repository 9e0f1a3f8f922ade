//! Presentation theme side-effect
//!
//! Settings changes to dark mode are pushed here, separately from persistence.

use std::cell::RefCell;
use std::rc::Rc;

/// Receiver of the global dark-mode flag
pub trait ThemeSink {
    fn apply_dark_mode(&self, enabled: bool);
}

/// Native sink: there is no document to style, so just log the change
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTheme;

impl ThemeSink for LogTheme {
    fn apply_dark_mode(&self, enabled: bool) {
        log::info!("Theme: dark mode {}", if enabled { "on" } else { "off" });
    }
}

/// Records every applied value (newest last). Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingTheme {
    applied: Rc<RefCell<Vec<bool>>>,
}

impl RecordingTheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> Vec<bool> {
        self.applied.borrow().clone()
    }

    pub fn last(&self) -> Option<bool> {
        self.applied.borrow().last().copied()
    }
}

impl ThemeSink for RecordingTheme {
    fn apply_dark_mode(&self, enabled: bool) {
        self.applied.borrow_mut().push(enabled);
    }
}

/// Toggles the `dark` class on `document.body` (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyClassTheme;

#[cfg(target_arch = "wasm32")]
impl ThemeSink for BodyClassTheme {
    fn apply_dark_mode(&self, enabled: bool) {
        let body = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body());

        match body {
            Some(body) => {
                if let Err(err) = body.class_list().toggle_with_force("dark", enabled) {
                    log::warn!("Failed to toggle dark class: {:?}", err);
                }
            }
            None => log::warn!("No document body, dark mode not applied"),
        }
    }
}

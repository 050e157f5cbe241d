//! Host modal capability surface
//!
//! The host application owns modal presentation; the controller only ever
//! calls through this trait. Implementations wrap whatever the host offers
//! (a real modal API, or an in-process channel in tests and headless runs).

use welkin_core::protocol::{Envelope, Viewport};

/// Presentation options for `show`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShowOptions {
    /// CSS background behind the dialog, e.g. `"#0000"`
    pub background: String,
}

impl ShowOptions {
    pub fn with_background(background: impl Into<String>) -> Self {
        Self {
            background: background.into(),
        }
    }
}

/// Modal presentation and viewport metrics offered by the host
#[cfg_attr(test, mockall::automock)]
pub trait ModalHost {
    /// Current size of the host viewer viewport
    fn viewport(&self) -> Viewport;

    /// Present the modal with the given (opaque) markup
    fn show(&mut self, markup: &str, options: ShowOptions);

    /// Post an envelope to the embedded view
    fn post_message(&mut self, envelope: Envelope);

    /// Close the modal; cannot be cancelled
    fn close(&mut self);
}

//! welkin-host - Host-side half of the welkin onboarding dialog
//!
//! The host application embeds the dialog view inside a modal it owns. This
//! crate provides the [`Controller`] that mediates between the view's
//! messages, the host's modal surface ([`ModalHost`]), and persisted
//! dismissal state ([`ClientStorage`]).

pub mod controller;
pub mod modal;
pub mod storage;

// Re-export primary types
pub use controller::{Controller, DEFAULT_MODAL_BACKGROUND};
pub use modal::{ModalHost, ShowOptions};
pub use storage::{ClientStorage, FileStorage, LocalClientStorage, MemoryStorage};

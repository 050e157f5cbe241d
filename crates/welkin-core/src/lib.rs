//! # welkin-core - Core Domain Types
//!
//! Foundation crate for the welkin onboarding dialog. Provides the widget
//! configuration model, the host/view message envelopes, storage-key
//! derivation, error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, thiserror, tracing, sha2).
//!
//! ## Public API
//!
//! ### Pages (`pages`)
//! - [`RawWidgetData`] / [`RawPage`] - Loosely-typed wire configuration
//! - [`WidgetConfig`] / [`Page`] / [`PageBody`] - Typed page model
//! - [`PageId`] - Stable page identifier (map key, never ordering)
//!
//! ### Protocol (`protocol`)
//! - [`Envelope`] - `{action, payload}` messages crossing the modal boundary
//! - [`Viewport`] - Host viewer viewport metrics
//!
//! ### Fingerprinting (`fingerprint`)
//! - [`storage_key()`] - Dismissal key derived from agreement content
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with recoverability classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use welkin_core::prelude::*;
//! ```

pub mod error;
pub mod fingerprint;
pub mod logging;
pub mod pages;
pub mod protocol;

/// Prelude for common imports used throughout all welkin crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result, ResultExt};
pub use fingerprint::{content_digest, storage_key, STORAGE_KEY_PREFIX};
pub use pages::{
    Appearance, MediaSource, Page, PageBody, PageId, RawPage, RawWidgetData, WidgetConfig,
};
pub use protocol::{ClosePayload, Envelope, Viewport, ViewportPayload};

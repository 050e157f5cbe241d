//! welkin-view - Embedded-view presenter for the welkin onboarding dialog
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the
//! presenter running inside the sandboxed modal view: a message enum, a pure
//! `update()` function over [`PresenterState`], and pure projections of that
//! state into render descriptors. It talks to the host exclusively through
//! [`welkin_core::protocol::Envelope`] values returned as update actions.

pub mod handler;
pub mod layout;
pub mod message;
pub mod render;
pub mod state;

// Re-export primary types
pub use handler::{can_advance, initialize, update, UpdateAction, UpdateResult};
pub use layout::{panel_size, PanelSize, DEFAULT_PANEL_SCALE};
pub use message::ViewMessage;
pub use render::{nav_controls, page_dots, resolve_page, DotIndicator, NavControls, RenderDescriptor};
pub use state::{NavigationState, Phase, PresenterState};

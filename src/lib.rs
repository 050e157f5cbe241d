//! Welkin onboarding dialog driver
//!
//! Ties the host-side controller and the embedded-view presenter together in
//! a single process for scripted and end-to-end use. The reusable pieces
//! live in the `welkin-core`, `welkin-host`, and `welkin-view` crates; this
//! crate only adds the headless stdio loop and the binary entry point.

// Module declarations
pub mod headless;

// Re-export main entry points
pub use headless::runner::{run_session, ChannelModalHost, SessionOptions};
pub use headless::{Command, HeadlessEvent};

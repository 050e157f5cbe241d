//! Headless mode - JSON event output for driving the dialog without a UI
//!
//! This module runs the full host/view round trip in one process and speaks
//! NDJSON on stdio: commands arrive one per line on stdin, events leave one
//! per line on stdout. Test scripts get the exact state machine a real
//! embedding would see, without any markup rendering.
//!
//! # Event Format
//!
//! Each event has an "event" field indicating its type, along with
//! event-specific data.
//!
//! # Example Output
//!
//! ```json
//! {"event":"modal_shown","background":"#0000","timestamp":1704700001000}
//! {"event":"page","index":0,"total":3,"descriptor":{"kind":"welcome"},"timestamp":1704700002000}
//! {"event":"modal_closed","timestamp":1704700003000}
//! ```

pub mod runner;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use tracing::error;

use welkin_view::{DotIndicator, NavControls, RenderDescriptor};

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// The modal opened
    ModalShown { background: String, timestamp: i64 },

    /// The dismissal gate suppressed the dialog; nothing else follows
    ModalSuppressed { storage_key: String, timestamp: i64 },

    /// The modal closed; the session is over
    ModalClosed { timestamp: i64 },

    /// Snapshot of the currently presented page
    Page {
        index: usize,
        total: usize,
        descriptor: RenderDescriptor,
        dots: Vec<DotIndicator>,
        controls: NavControls,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Emit this event to stdout as JSON
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json) {
            error!("Failed to write headless event to stdout: {}", e);
            return;
        }

        // Flush to ensure immediate output
        if let Err(e) = stdout.flush() {
            error!("Failed to flush headless stdout: {}", e);
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn modal_shown(background: &str) -> Self {
        Self::ModalShown {
            background: background.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn modal_suppressed(storage_key: &str) -> Self {
        Self::ModalSuppressed {
            storage_key: storage_key.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn modal_closed() -> Self {
        Self::ModalClosed {
            timestamp: Self::now(),
        }
    }

    pub fn page(
        index: usize,
        total: usize,
        descriptor: RenderDescriptor,
        dots: Vec<DotIndicator>,
        controls: NavControls,
    ) -> Self {
        Self::Page {
            index,
            total,
            descriptor,
            dots,
            controls,
            timestamp: Self::now(),
        }
    }
}

/// Commands accepted on stdin, one JSON object per line
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Advance to the next page
    Next,

    /// Go back one page
    Prev,

    /// Toggle an agreement checkbox; defaults to the current page
    Agree {
        #[serde(default)]
        page: Option<String>,
        #[serde(default = "default_true")]
        checked: bool,
    },

    /// Toggle the "don't show this again" checkbox
    DontShowAgain {
        #[serde(default = "default_true")]
        checked: bool,
    },

    /// Finish from the last page ("Start to Use")
    Complete,

    /// Close without completing
    Dismiss,

    /// End the session without closing the modal
    Quit,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_shown_serialization() {
        let event = HeadlessEvent::modal_shown("#0000");
        let json = serde_json::to_string(&event).expect("serialization failed");

        let value: serde_json::Value = serde_json::from_str(&json).expect("invalid JSON");

        assert_eq!(value["event"], "modal_shown");
        assert_eq!(value["background"], "#0000");
        assert!(value["timestamp"].is_number());
    }

    #[test]
    fn test_modal_suppressed_serialization() {
        let event = HeadlessEvent::modal_suppressed("welkin-welcome-page-dont-show-this-again");
        let json = serde_json::to_string(&event).expect("serialization failed");

        let value: serde_json::Value = serde_json::from_str(&json).expect("invalid JSON");

        assert_eq!(value["event"], "modal_suppressed");
        assert_eq!(
            value["storage_key"],
            "welkin-welcome-page-dont-show-this-again"
        );
    }

    #[test]
    fn test_page_event_serialization() {
        let event = HeadlessEvent::page(
            1,
            3,
            RenderDescriptor::Markdown {
                content: Some("# hi".into()),
            },
            vec![],
            NavControls {
                prev_visible: true,
                next_enabled: true,
                is_last: false,
                show_dont_show_again: false,
            },
        );
        let json = serde_json::to_string(&event).expect("serialization failed");

        let value: serde_json::Value = serde_json::from_str(&json).expect("invalid JSON");

        assert_eq!(value["event"], "page");
        assert_eq!(value["index"], 1);
        assert_eq!(value["total"], 3);
        assert_eq!(value["descriptor"]["kind"], "markdown");
        assert_eq!(value["controls"]["prev_visible"], true);
    }

    #[test]
    fn test_command_parsing() {
        let cmd: Command = serde_json::from_str(r#"{"cmd":"next"}"#).unwrap();
        assert_eq!(cmd, Command::Next);

        let cmd: Command = serde_json::from_str(r#"{"cmd":"agree"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Agree {
                page: None,
                checked: true
            }
        );

        let cmd: Command =
            serde_json::from_str(r#"{"cmd":"agree","page":"terms","checked":false}"#).unwrap();
        assert_eq!(
            cmd,
            Command::Agree {
                page: Some("terms".into()),
                checked: false
            }
        );

        let cmd: Command = serde_json::from_str(r#"{"cmd":"dont_show_again"}"#).unwrap();
        assert_eq!(cmd, Command::DontShowAgain { checked: true });
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(serde_json::from_str::<Command>(r#"{"cmd":"explode"}"#).is_err());
    }
}

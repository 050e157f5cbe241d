//! Host/view message envelopes
//!
//! Both directions of the modal channel carry informal JSON envelopes of the
//! shape `{ "action": ..., "payload"?: ... }`. Parsing goes through a raw
//! envelope first and matches the action string into the typed [`Envelope`]
//! enum; unrecognized actions and malformed payloads land in
//! [`Envelope::Unknown`] so both sides stay forward compatible.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::pages::RawWidgetData;

pub const ACTION_GET_VIEWPORT_SIZE: &str = "getViewportSize";
pub const ACTION_VIEWPORT_SIZE: &str = "viewportSize";
pub const ACTION_CLOSE_MODAL: &str = "closeModal";

/// Current size of the host viewer viewport, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Payload of the `viewportSize` reply (Controller → Presenter)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportPayload {
    pub width: f64,
    pub height: f64,
    #[serde(rename = "widgetData")]
    pub widget_data: RawWidgetData,
}

/// Payload of the `closeModal` completion message (Presenter → Controller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePayload {
    #[serde(rename = "dontShowThisAgain")]
    pub dont_show_this_again: bool,
}

/// A typed message envelope
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Presenter requests the current size + configuration (no payload)
    GetViewportSize,
    /// Controller delivers size + configuration
    ViewportSize(ViewportPayload),
    /// Presenter signals completion; may trigger persistence
    CloseModal(ClosePayload),
    /// Anything else: preserved but ignored (forward compatibility)
    Unknown {
        action: String,
        payload: Option<Value>,
    },
}

/// The wire shape of an envelope (before parsing into typed variants)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawEnvelope {
    action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

impl Envelope {
    pub fn viewport_size(viewport: Viewport, widget_data: RawWidgetData) -> Self {
        Self::ViewportSize(ViewportPayload {
            width: viewport.width,
            height: viewport.height,
            widget_data,
        })
    }

    pub fn close_modal(dont_show_this_again: bool) -> Self {
        Self::CloseModal(ClosePayload {
            dont_show_this_again,
        })
    }

    /// The wire action tag of this envelope
    pub fn action(&self) -> &str {
        match self {
            Envelope::GetViewportSize => ACTION_GET_VIEWPORT_SIZE,
            Envelope::ViewportSize(_) => ACTION_VIEWPORT_SIZE,
            Envelope::CloseModal(_) => ACTION_CLOSE_MODAL,
            Envelope::Unknown { action, .. } => action,
        }
    }

    /// Parse a JSON string into an envelope
    ///
    /// Returns `None` only when the line is not an envelope at all; a valid
    /// envelope with an unknown action parses to [`Envelope::Unknown`].
    pub fn parse(json: &str) -> Option<Self> {
        let raw: RawEnvelope = serde_json::from_str(json).ok()?;
        Some(from_raw(raw))
    }

    /// Serialize this envelope to its JSON wire form
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_raw()?)?)
    }

    fn to_raw(&self) -> Result<RawEnvelope> {
        let (action, payload) = match self {
            Envelope::GetViewportSize => (ACTION_GET_VIEWPORT_SIZE.to_string(), None),
            Envelope::ViewportSize(payload) => (
                ACTION_VIEWPORT_SIZE.to_string(),
                Some(serde_json::to_value(payload)?),
            ),
            Envelope::CloseModal(payload) => (
                ACTION_CLOSE_MODAL.to_string(),
                Some(serde_json::to_value(payload)?),
            ),
            Envelope::Unknown { action, payload } => (action.clone(), payload.clone()),
        };
        Ok(RawEnvelope { action, payload })
    }
}

fn from_raw(raw: RawEnvelope) -> Envelope {
    match raw.action.as_str() {
        ACTION_GET_VIEWPORT_SIZE => Envelope::GetViewportSize,
        ACTION_VIEWPORT_SIZE => raw
            .payload
            .clone()
            .and_then(|p| serde_json::from_value(p).ok())
            .map(Envelope::ViewportSize)
            .unwrap_or_else(|| unknown(raw)),
        ACTION_CLOSE_MODAL => raw
            .payload
            .clone()
            .and_then(|p| serde_json::from_value(p).ok())
            .map(Envelope::CloseModal)
            .unwrap_or_else(|| unknown(raw)),
        _ => unknown(raw),
    }
}

fn unknown(raw: RawEnvelope) -> Envelope {
    Envelope::Unknown {
        action: raw.action,
        payload: raw.payload,
    }
}

//! Panel sizing derived from the host viewport
//!
//! The embedded view's root element is sized to a fraction of the host
//! viewport. Halving is the observed host convention; the factor is kept
//! configurable per presenter.

use welkin_core::protocol::Viewport;

/// Default fraction of the viewport occupied by the dialog panel
pub const DEFAULT_PANEL_SCALE: f64 = 0.5;

/// Size applied to the embedded view's root element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSize {
    pub width: f64,
    pub height: f64,
}

/// Compute the panel size for a viewport and scale factor
pub fn panel_size(viewport: Viewport, scale: f64) -> PanelSize {
    PanelSize {
        width: viewport.width * scale,
        height: viewport.height * scale,
    }
}

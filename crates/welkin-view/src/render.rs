//! Pure resolution of presenter state into render descriptors
//!
//! Nothing here touches markup or styling; the functions project the current
//! state into plain data the embedding view (or the headless driver) turns
//! into output. All control states derive from the same
//! [`can_advance`](crate::handler::can_advance) predicate as the state
//! machine's own guards.

use serde::Serialize;

use welkin_core::pages::{MediaSource, PageBody};

use crate::handler::can_advance;
use crate::state::PresenterState;

/// Fallback accent color when `appearance.primary_color` is unset
pub const DEFAULT_PRIMARY_COLOR: &str = "#0085BE";

/// Color of the non-current pagination dots
pub const INACTIVE_DOT_COLOR: &str = "#ccc";

/// Bundled image shown on a tutorial page with no configured URL
pub const DEFAULT_TUTORIAL_IMAGE: &str = "assets/tutorial_img.svg";

/// Notice shown on an agreement page whose content is missing
pub const AGREEMENT_CONTENT_MISSING_NOTICE: &str =
    "Agreement content is unavailable. Enter the data and reload the page.";

/// Message shown when the configuration contains no pages
pub const EMPTY_STATE_MESSAGE: &str = "No content available";

/// Placeholder while the index is transiently out of range
pub const LOADING_MESSAGE: &str = "Loading...";

/// What the view should render for the current page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderDescriptor {
    /// No pages configured; navigation is suppressed
    Empty { message: String },

    /// Index out of range (transient)
    Loading { message: String },

    Welcome {
        title: Option<String>,
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        media: Option<MediaSource>,
    },

    Tutorial {
        image_url: String,
    },

    Markdown {
        /// Raw markdown; rendering to HTML is the embedding view's concern
        content: Option<String>,
    },

    Agreement {
        content: Option<String>,
        /// Set when content is absent; the checkbox stays available either way
        #[serde(skip_serializing_if = "Option::is_none")]
        notice: Option<String>,
        checked: bool,
    },
}

/// One pagination dot, mirroring `current_index` 1:1
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DotIndicator {
    pub color: String,
    pub active: bool,
}

/// Enablement/visibility of the navigation controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NavControls {
    /// Prev is hidden (not merely disabled) on the first page
    pub prev_visible: bool,
    /// Next / "Start to Use" enablement, via the gating predicate
    pub next_enabled: bool,
    /// The last page shows "Start to Use" instead of "Next"
    pub is_last: bool,
    /// The "don't show this again" checkbox is offered on page 0 only
    pub show_dont_show_again: bool,
}

/// Resolve the current page into a render descriptor
pub fn resolve_page(state: &PresenterState) -> RenderDescriptor {
    if state.pages().is_empty() {
        return RenderDescriptor::Empty {
            message: EMPTY_STATE_MESSAGE.to_string(),
        };
    }
    let Some(page) = state.current_page() else {
        return RenderDescriptor::Loading {
            message: LOADING_MESSAGE.to_string(),
        };
    };

    match &page.body {
        PageBody::Welcome {
            title,
            description,
            media,
        } => RenderDescriptor::Welcome {
            title: title.clone(),
            description: description.clone(),
            media: media.clone(),
        },
        PageBody::Tutorial { image_url } => RenderDescriptor::Tutorial {
            image_url: image_url
                .clone()
                .unwrap_or_else(|| DEFAULT_TUTORIAL_IMAGE.to_string()),
        },
        PageBody::Markdown { content } => RenderDescriptor::Markdown {
            content: content.clone(),
        },
        PageBody::Agreement { content } => RenderDescriptor::Agreement {
            content: content.clone(),
            notice: content
                .is_none()
                .then(|| AGREEMENT_CONTENT_MISSING_NOTICE.to_string()),
            checked: state.nav.is_accepted(&page.id),
        },
    }
}

/// Pagination dots: current index in the primary color, rest neutral
pub fn page_dots(state: &PresenterState) -> Vec<DotIndicator> {
    let primary = state
        .config
        .as_ref()
        .and_then(|c| c.appearance.primary_color.clone())
        .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string());

    (0..state.pages().len())
        .map(|index| {
            let active = index == state.nav.current_index;
            DotIndicator {
                color: if active {
                    primary.clone()
                } else {
                    INACTIVE_DOT_COLOR.to_string()
                },
                active,
            }
        })
        .collect()
}

/// Control states for the navigation row
pub fn nav_controls(state: &PresenterState) -> NavControls {
    let Some(page) = state.current_page() else {
        return NavControls {
            prev_visible: false,
            next_enabled: false,
            is_last: false,
            show_dont_show_again: false,
        };
    };

    NavControls {
        prev_visible: state.nav.current_index > 0,
        next_enabled: can_advance(page, &state.nav.agreement_acceptance),
        is_last: state.is_last_page(),
        show_dont_show_again: state.nav.current_index == 0,
    }
}

//! Widget configuration: loosely-typed wire structs and the typed page model
//!
//! The host hands the widget its configuration as a loosely-typed payload
//! whose pages are discriminated by a `page_type` string. That wire shape is
//! kept as [`RawWidgetData`]/[`RawPage`] and converted exactly once into the
//! closed [`PageBody`] sum type; the conversion is the only place that ever
//! sees an unknown or missing tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

// ─────────────────────────────────────────────────────────
// Wire tags
// ─────────────────────────────────────────────────────────

pub const PAGE_TYPE_WELCOME: &str = "welcome_page";
pub const PAGE_TYPE_TUTORIAL: &str = "tutorial_page";
pub const PAGE_TYPE_MARKDOWN: &str = "md_page";
pub const PAGE_TYPE_AGREEMENT: &str = "agreement_page";

pub const MEDIA_TYPE_IMAGE: &str = "image_type";
pub const MEDIA_TYPE_VIDEO: &str = "video_type";

// ─────────────────────────────────────────────────────────
// Wire format (as received from the host)
// ─────────────────────────────────────────────────────────

/// Optional cosmetic appearance settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
}

/// One page of the onboarding sequence, as it crosses the trust boundary
///
/// Every field is optional; the `page_type` tag selects the page kind and
/// decides which of the remaining fields are meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutorial_page_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agree_content: Option<String>,
}

/// The full widget configuration payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWidgetData {
    #[serde(default)]
    pub page_setting: Vec<RawPage>,
    #[serde(default)]
    pub appearance: Appearance,
}

// ─────────────────────────────────────────────────────────
// Typed page model
// ─────────────────────────────────────────────────────────

/// Stable identifier of a page within one configuration
///
/// Used only as a map key (agreement acceptance tracking); page order is
/// given by position in `pages`, never by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(String);

impl PageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Media shown on a welcome page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MediaSource {
    Image {
        url: String,
    },
    Video {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        poster: Option<String>,
    },
}

/// The four page kinds (closed sum type)
///
/// Conversion from the wire format maps a missing or unknown `page_type`
/// tag onto `Welcome`, so downstream matches are exhaustive without a
/// catch-all arm.
#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    Welcome {
        title: Option<String>,
        description: Option<String>,
        media: Option<MediaSource>,
    },
    Tutorial {
        image_url: Option<String>,
    },
    Markdown {
        content: Option<String>,
    },
    Agreement {
        content: Option<String>,
    },
}

/// One typed page with its stable id
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: PageId,
    pub body: PageBody,
}

impl Page {
    pub fn is_agreement(&self) -> bool {
        matches!(self.body, PageBody::Agreement { .. })
    }
}

/// Immutable per-session widget configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    pub pages: Vec<Page>,
    pub appearance: Appearance,
}

impl WidgetConfig {
    /// Convert the wire payload into the typed model
    ///
    /// Ids default to `page-{index}` when the host did not assign one.
    pub fn from_raw(raw: &RawWidgetData) -> Self {
        let pages = raw
            .page_setting
            .iter()
            .enumerate()
            .map(|(index, page)| Page {
                id: page
                    .id
                    .clone()
                    .map(PageId::new)
                    .unwrap_or_else(|| PageId::new(format!("page-{index}"))),
                body: body_from_raw(page),
            })
            .collect();

        Self {
            pages,
            appearance: raw.appearance.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterate the agreement pages in display order
    pub fn agreement_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|p| p.is_agreement())
    }
}

fn body_from_raw(raw: &RawPage) -> PageBody {
    match raw.page_type.as_deref() {
        Some(PAGE_TYPE_TUTORIAL) => PageBody::Tutorial {
            image_url: raw.tutorial_page_image_url.clone(),
        },
        Some(PAGE_TYPE_MARKDOWN) => PageBody::Markdown {
            content: raw.md_content.clone(),
        },
        Some(PAGE_TYPE_AGREEMENT) => PageBody::Agreement {
            content: raw.agree_content.clone(),
        },
        Some(PAGE_TYPE_WELCOME) | None => welcome_from_raw(raw),
        Some(other) => {
            // Older or newer host configs may carry tags we do not know;
            // render them as the default page kind instead of failing.
            debug!(page_type = other, "unknown page_type tag, treating as welcome page");
            welcome_from_raw(raw)
        }
    }
}

fn welcome_from_raw(raw: &RawPage) -> PageBody {
    PageBody::Welcome {
        title: raw.page_title.clone(),
        description: raw.page_description.clone(),
        media: media_from_raw(raw),
    }
}

fn media_from_raw(raw: &RawPage) -> Option<MediaSource> {
    match raw.media_type.as_deref() {
        Some(MEDIA_TYPE_IMAGE) => raw
            .media_url
            .clone()
            .map(|url| MediaSource::Image { url }),
        Some(MEDIA_TYPE_VIDEO) => raw.video_url.clone().map(|url| MediaSource::Video {
            url,
            poster: raw.thumbnail_video_url.clone(),
        }),
        _ => None,
    }
}

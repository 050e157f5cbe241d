//! Presenter state (Model in TEA pattern)

use std::collections::BTreeMap;

use welkin_core::pages::{Page, PageId, WidgetConfig};

use crate::layout::{PanelSize, DEFAULT_PANEL_SCALE};

/// Lifecycle phase of the embedded view
///
/// `AwaitingData` is entered by `initialize()` and exited exactly once, when
/// the `viewportSize` reply arrives. Nothing ever transitions back into it;
/// there is no terminal phase because teardown is host-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Fresh mount, no request sent yet
    #[default]
    Uninitialized,

    /// `getViewportSize` sent, waiting for the reply
    AwaitingData,

    /// Configuration received, pages are being shown
    Ready,
}

/// Per-session navigation state, owned exclusively by the presenter
#[derive(Debug, Clone, Default)]
pub struct NavigationState {
    /// Index into `pages`; always within bounds while pages are non-empty
    pub current_index: usize,

    /// "Don't show this again" checkbox, offered on the first page only.
    /// Once set it survives navigation and is read at completion.
    pub dont_show_again: bool,

    /// Acceptance checkbox per agreement page. Entries exist only for
    /// agreement pages and reset whenever the configuration is applied.
    pub agreement_acceptance: BTreeMap<PageId, bool>,
}

impl NavigationState {
    /// Fresh navigation state for a page list, acceptance all-false
    pub fn for_pages(pages: &[Page]) -> Self {
        let agreement_acceptance = pages
            .iter()
            .filter(|p| p.is_agreement())
            .map(|p| (p.id.clone(), false))
            .collect();
        Self {
            current_index: 0,
            dont_show_again: false,
            agreement_acceptance,
        }
    }

    pub fn is_accepted(&self, id: &PageId) -> bool {
        self.agreement_acceptance.get(id).copied().unwrap_or(false)
    }
}

/// Full presenter state
#[derive(Debug, Clone)]
pub struct PresenterState {
    pub phase: Phase,
    pub config: Option<WidgetConfig>,
    pub nav: NavigationState,
    /// Size applied to the view root once the viewport is known
    pub panel: Option<PanelSize>,
    /// Fraction of the viewport the panel occupies
    pub panel_scale: f64,
}

impl PresenterState {
    pub fn new(panel_scale: f64) -> Self {
        Self {
            phase: Phase::default(),
            config: None,
            nav: NavigationState::default(),
            panel: None,
            panel_scale,
        }
    }

    /// The configured pages, empty until data arrives
    pub fn pages(&self) -> &[Page] {
        self.config.as_ref().map(|c| c.pages.as_slice()).unwrap_or(&[])
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.pages().get(self.nav.current_index)
    }

    pub fn is_last_page(&self) -> bool {
        let pages = self.pages();
        !pages.is_empty() && self.nav.current_index == pages.len() - 1
    }
}

impl Default for PresenterState {
    fn default() -> Self {
        Self::new(DEFAULT_PANEL_SCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use welkin_core::pages::{RawPage, RawWidgetData, PAGE_TYPE_AGREEMENT};

    fn two_page_config() -> WidgetConfig {
        WidgetConfig::from_raw(&RawWidgetData {
            page_setting: vec![
                RawPage::default(),
                RawPage {
                    page_type: Some(PAGE_TYPE_AGREEMENT.into()),
                    agree_content: Some("terms".into()),
                    ..RawPage::default()
                },
            ],
            ..RawWidgetData::default()
        })
    }

    #[test]
    fn test_navigation_state_tracks_agreement_pages_only() {
        let config = two_page_config();
        let nav = NavigationState::for_pages(&config.pages);
        assert_eq!(nav.agreement_acceptance.len(), 1);
        assert!(!nav.is_accepted(&config.pages[1].id));
        // the welcome page has no acceptance entry
        assert!(!nav.agreement_acceptance.contains_key(&config.pages[0].id));
    }

    #[test]
    fn test_fresh_state_has_no_pages() {
        let state = PresenterState::default();
        assert_eq!(state.phase, Phase::Uninitialized);
        assert!(state.pages().is_empty());
        assert!(state.current_page().is_none());
        assert!(!state.is_last_page());
    }

    #[test]
    fn test_is_last_page() {
        let mut state = PresenterState::default();
        state.config = Some(two_page_config());
        assert!(!state.is_last_page());
        state.nav.current_index = 1;
        assert!(state.is_last_page());
    }
}

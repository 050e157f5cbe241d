//! Presenter update function - handles state transitions (TEA pattern)
//!
//! All gating flows through [`can_advance`]; the render layer's control
//! states and the navigation guards here consume the same predicate so the
//! two can never drift apart.

use std::collections::BTreeMap;

use tracing::debug;

use welkin_core::pages::{Page, PageBody, PageId, WidgetConfig};
use welkin_core::protocol::{Envelope, Viewport, ViewportPayload};

use crate::layout;
use crate::message::ViewMessage;
use crate::state::{NavigationState, Phase, PresenterState};

/// Actions the embedding loop should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Post an envelope to the host
    Send(Envelope),
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional action for the embedding loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn send(envelope: Envelope) -> Self {
        Self {
            action: Some(UpdateAction::Send(envelope)),
        }
    }
}

/// Request sizing and data from the host
///
/// Sends `getViewportSize` exactly once per mount; repeated calls are
/// no-ops. There is no retry and no timeout -- if the host never replies the
/// presenter stays in `AwaitingData`.
pub fn initialize(state: &mut PresenterState) -> UpdateResult {
    match state.phase {
        Phase::Uninitialized => {
            state.phase = Phase::AwaitingData;
            UpdateResult::send(Envelope::GetViewportSize)
        }
        Phase::AwaitingData | Phase::Ready => UpdateResult::none(),
    }
}

/// The single gating predicate: may the user move forward past `page`?
///
/// Agreement pages require their acceptance entry to be true; every other
/// page kind always allows advancing.
pub fn can_advance(page: &Page, acceptance: &BTreeMap<PageId, bool>) -> bool {
    match &page.body {
        PageBody::Agreement { .. } => acceptance.get(&page.id).copied().unwrap_or(false),
        PageBody::Welcome { .. } | PageBody::Tutorial { .. } | PageBody::Markdown { .. } => true,
    }
}

/// Process a message and update state
pub fn update(state: &mut PresenterState, message: ViewMessage) -> UpdateResult {
    match message {
        ViewMessage::Host(Envelope::ViewportSize(payload)) => {
            apply_viewport(state, payload);
            UpdateResult::none()
        }

        ViewMessage::Host(envelope) => {
            // Only viewportSize is host-bound traffic we act on
            debug!(action = envelope.action(), "ignoring envelope");
            UpdateResult::none()
        }

        ViewMessage::NextPage => {
            let Some(page) = state.current_page() else {
                return UpdateResult::none();
            };
            if state.is_last_page() {
                return UpdateResult::none();
            }
            // The UI disables the button too, but the state machine must
            // hold the invariant on its own.
            if !can_advance(page, &state.nav.agreement_acceptance) {
                debug!(page = %page.id, "next refused: agreement not accepted");
                return UpdateResult::none();
            }
            state.nav.current_index += 1;
            UpdateResult::none()
        }

        ViewMessage::PrevPage => {
            if state.nav.current_index > 0 {
                state.nav.current_index -= 1;
            }
            UpdateResult::none()
        }

        ViewMessage::SetAgreementChecked { page, checked } => {
            match state.nav.agreement_acceptance.get_mut(&page) {
                Some(entry) => *entry = checked,
                None => debug!(page = %page, "acceptance toggle for unknown page id"),
            }
            UpdateResult::none()
        }

        ViewMessage::SetDontShowAgain(checked) => {
            state.nav.dont_show_again = checked;
            UpdateResult::none()
        }

        ViewMessage::Complete => {
            if state.phase != Phase::Ready || !state.is_last_page() {
                return UpdateResult::none();
            }
            let Some(page) = state.current_page() else {
                return UpdateResult::none();
            };
            if !can_advance(page, &state.nav.agreement_acceptance) {
                debug!(page = %page.id, "complete refused: agreement not accepted");
                return UpdateResult::none();
            }
            UpdateResult::send(Envelope::close_modal(state.nav.dont_show_again))
        }

        ViewMessage::Dismiss => UpdateResult::send(Envelope::close_modal(false)),
    }
}

/// Apply a `viewportSize` reply: size the panel, adopt the configuration,
/// and reset navigation. Replayed deliveries simply re-apply state.
fn apply_viewport(state: &mut PresenterState, payload: ViewportPayload) {
    let config = WidgetConfig::from_raw(&payload.widget_data);
    state.panel = Some(layout::panel_size(
        Viewport::new(payload.width, payload.height),
        state.panel_scale,
    ));
    state.nav = NavigationState::for_pages(&config.pages);
    state.config = Some(config);
    state.phase = Phase::Ready;
}

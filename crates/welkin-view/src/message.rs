//! Messages driving the presenter (TEA pattern)

use welkin_core::pages::PageId;
use welkin_core::protocol::Envelope;

/// All possible messages the presenter can receive
///
/// Envelope arrivals come from the host channel; the rest are user intents
/// forwarded by the rendering layer.
#[derive(Debug, Clone)]
pub enum ViewMessage {
    /// An envelope delivered on the modal channel
    Host(Envelope),

    /// Advance to the next page (gated on agreement pages)
    NextPage,

    /// Go back one page (never gated)
    PrevPage,

    /// Toggle the acceptance checkbox of an agreement page
    SetAgreementChecked { page: PageId, checked: bool },

    /// Toggle the "don't show this again" checkbox (first page)
    SetDontShowAgain(bool),

    /// Finish the sequence from the last page ("Start to Use")
    Complete,

    /// Close without completing (the ✕ button); never persists a dismissal
    Dismiss,
}

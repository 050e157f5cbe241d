//! Headless mode runner - dialog session loop without a UI
//!
//! Wires a real [`Controller`] to a real presenter state machine through an
//! in-process channel standing in for the modal's message port, and drives
//! the presenter from stdin commands.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use welkin_core::pages::{PageId, RawWidgetData};
use welkin_core::prelude::*;
use welkin_core::protocol::{Envelope, Viewport};
use welkin_host::{ClientStorage, Controller, ModalHost, ShowOptions};
use welkin_view::{
    initialize, nav_controls, page_dots, resolve_page, update, Phase, PresenterState, UpdateAction,
    ViewMessage, DEFAULT_PANEL_SCALE,
};

use super::{Command, HeadlessEvent};

/// Modal surface backed by an in-process channel
///
/// `post_message` forwards envelopes to the presenter loop; `show` and
/// `close` become stdout events. Close is latched so the loop can observe it.
pub struct ChannelModalHost {
    viewport: Viewport,
    to_view: mpsc::UnboundedSender<Envelope>,
    closed: Arc<AtomicBool>,
}

impl ChannelModalHost {
    pub fn new(
        viewport: Viewport,
        to_view: mpsc::UnboundedSender<Envelope>,
        closed: Arc<AtomicBool>,
    ) -> Self {
        Self {
            viewport,
            to_view,
            closed,
        }
    }
}

impl ModalHost for ChannelModalHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn show(&mut self, _markup: &str, options: ShowOptions) {
        HeadlessEvent::modal_shown(&options.background).emit();
    }

    fn post_message(&mut self, envelope: Envelope) {
        if self.to_view.send(envelope).is_err() {
            warn!("presenter channel closed, dropping envelope");
        }
    }

    fn close(&mut self) {
        // Emit once even if the host closes twice
        if !self.closed.swap(true, Ordering::SeqCst) {
            HeadlessEvent::modal_closed().emit();
        }
    }
}

/// Everything a headless session needs besides storage
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub widget_data: RawWidgetData,
    pub viewport: Viewport,
    pub markup: String,
    pub panel_scale: f64,
}

impl SessionOptions {
    pub fn new(widget_data: RawWidgetData, viewport: Viewport) -> Self {
        Self {
            widget_data,
            viewport,
            markup: String::new(),
            panel_scale: DEFAULT_PANEL_SCALE,
        }
    }
}

/// Run one dialog session over stdio
///
/// Returns after the modal closes, stdin ends, or a `quit` command.
pub async fn run_session<S: ClientStorage>(options: SessionOptions, storage: S) -> Result<()> {
    info!("welkin starting in headless mode");

    let (to_view_tx, mut to_view_rx) = mpsc::unbounded_channel();
    let closed = Arc::new(AtomicBool::new(false));
    let modal = ChannelModalHost::new(options.viewport, to_view_tx, closed.clone());

    let mut controller = Controller::new(options.widget_data, options.markup, storage, modal);
    let mut state = PresenterState::new(options.panel_scale);

    if !controller.startup().await {
        HeadlessEvent::modal_suppressed(controller.storage_key()).emit();
        return Ok(());
    }

    // The presenter requests the viewport as soon as it loads
    let result = initialize(&mut state);
    dispatch(&mut controller, result.action).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if closed.load(Ordering::SeqCst) {
            break;
        }

        tokio::select! {
            envelope = to_view_rx.recv() => {
                match envelope {
                    Some(envelope) => {
                        let result = update(&mut state, ViewMessage::Host(envelope));
                        dispatch(&mut controller, result.action).await;
                        if let Some(event) = page_snapshot(&state, &closed) {
                            event.emit();
                        }
                    }
                    None => {
                        info!("modal channel closed");
                        break;
                    }
                }
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        let command: Command = match serde_json::from_str(line) {
                            Ok(command) => command,
                            Err(err) => {
                                warn!(%err, %line, "ignoring unparseable command");
                                continue;
                            }
                        };
                        if matches!(command, Command::Quit) {
                            info!("quit requested");
                            break;
                        }
                        let Some(message) = command_to_message(&state, command) else {
                            continue;
                        };
                        let result = update(&mut state, message);
                        dispatch(&mut controller, result.action).await;
                        if let Some(event) = page_snapshot(&state, &closed) {
                            event.emit();
                        }
                    }
                    None => {
                        info!("stdin closed");
                        break;
                    }
                }
            }
        }
    }

    info!("welkin headless session exiting");
    Ok(())
}

/// Forward an update action back to the controller
async fn dispatch<S: ClientStorage, M: ModalHost>(
    controller: &mut Controller<S, M>,
    action: Option<UpdateAction>,
) {
    if let Some(UpdateAction::Send(envelope)) = action {
        controller.on_message(envelope).await;
    }
}

/// Translate a stdin command into a presenter message
fn command_to_message(state: &PresenterState, command: Command) -> Option<ViewMessage> {
    match command {
        Command::Next => Some(ViewMessage::NextPage),
        Command::Prev => Some(ViewMessage::PrevPage),
        Command::Agree { page, checked } => {
            let page = match page {
                Some(id) => PageId::new(id),
                // Default to the current page when it is an agreement page
                None => {
                    let current = state.current_page()?;
                    if !current.is_agreement() {
                        debug!("agree command on non-agreement page, ignoring");
                        return None;
                    }
                    current.id.clone()
                }
            };
            Some(ViewMessage::SetAgreementChecked { page, checked })
        }
        Command::DontShowAgain { checked } => Some(ViewMessage::SetDontShowAgain(checked)),
        Command::Complete => Some(ViewMessage::Complete),
        Command::Dismiss => Some(ViewMessage::Dismiss),
        Command::Quit => None,
    }
}

/// Snapshot the current page once the presenter has data
///
/// `None` before the `viewportSize` reply and after the modal closed, so
/// `modal_closed` stays the final event of the stream.
fn page_snapshot(state: &PresenterState, closed: &Arc<AtomicBool>) -> Option<HeadlessEvent> {
    if state.phase != Phase::Ready || closed.load(Ordering::SeqCst) {
        return None;
    }
    Some(HeadlessEvent::page(
        state.nav.current_index,
        state.pages().len(),
        resolve_page(state),
        page_dots(state),
        nav_controls(state),
    ))
}

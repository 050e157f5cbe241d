//! Host-side controller for the onboarding dialog
//!
//! One controller per configuration. It decides whether the dialog opens at
//! all (the dismissal gate), answers the view's viewport request, and turns
//! the close request into an optional storage write plus an unconditional
//! modal close.

use serde_json::Value;

use welkin_core::fingerprint::storage_key;
use welkin_core::pages::{RawWidgetData, WidgetConfig};
use welkin_core::prelude::*;
use welkin_core::protocol::Envelope;

use crate::modal::{ModalHost, ShowOptions};
use crate::storage::ClientStorage;

/// Background used when `appearance.bg_color` is unset: fully transparent
pub const DEFAULT_MODAL_BACKGROUND: &str = "#0000";

/// Host-side coordinator between storage, the modal surface, and the view
pub struct Controller<S, M> {
    widget_data: RawWidgetData,
    config: WidgetConfig,
    storage_key: String,
    markup: String,
    storage: S,
    modal: M,
}

impl<S: ClientStorage, M: ModalHost> Controller<S, M> {
    /// Build a controller for one widget configuration
    ///
    /// `markup` is the opaque document handed to [`ModalHost::show`]; the
    /// controller never inspects it.
    pub fn new(widget_data: RawWidgetData, markup: impl Into<String>, storage: S, modal: M) -> Self {
        let config = WidgetConfig::from_raw(&widget_data);
        let storage_key = storage_key(&config);
        Self {
            widget_data,
            config,
            storage_key,
            markup: markup.into(),
            storage,
            modal,
        }
    }

    /// The derived dismissal key for this configuration
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Run the dismissal gate and, unless suppressed, present the modal
    ///
    /// Returns `true` when the modal was shown. The storage read fails open:
    /// any error counts as "not previously dismissed".
    pub async fn startup(&mut self) -> bool {
        let dismissed = match self.storage.get(&self.storage_key).await {
            Ok(value) => value.map(|v| is_truthy(&v)).unwrap_or(false),
            Err(err) => {
                warn!(%err, key = %self.storage_key, "dismissal read failed, showing dialog");
                false
            }
        };
        if dismissed {
            info!(key = %self.storage_key, "dialog previously dismissed, suppressing");
            return false;
        }

        let background = self
            .widget_data
            .appearance
            .bg_color
            .clone()
            .unwrap_or_else(|| DEFAULT_MODAL_BACKGROUND.to_string());
        let markup = self.markup.clone();
        self.modal
            .show(&markup, ShowOptions::with_background(background));
        true
    }

    /// Handle one envelope arriving from the view
    pub async fn on_message(&mut self, envelope: Envelope) {
        match envelope {
            Envelope::GetViewportSize => {
                if self.config.is_empty() {
                    // Nothing to present; close instead of answering
                    info!("no pages configured, closing dialog");
                    self.modal.close();
                    return;
                }
                let viewport = self.modal.viewport();
                self.modal
                    .post_message(Envelope::viewport_size(viewport, self.widget_data.clone()));
            }
            Envelope::CloseModal(payload) => {
                if payload.dont_show_this_again {
                    // Best effort: a failed write must not keep the modal open
                    if let Err(err) = self
                        .storage
                        .set(&self.storage_key, Value::Bool(true))
                        .await
                    {
                        warn!(%err, key = %self.storage_key, "failed to persist dismissal");
                    }
                }
                self.modal.close();
            }
            other => {
                debug!(action = other.action(), "ignoring unexpected envelope");
            }
        }
    }
}

/// Truthiness of a stored dismissal value
///
/// Booleans, numbers, and strings carry their natural truthiness; null and
/// structured values count as false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::MockModalHost;
    use crate::storage::MemoryStorage;
    use serde_json::json;
    use welkin_core::pages::{Appearance, RawPage, PAGE_TYPE_AGREEMENT};
    use welkin_core::protocol::{ClosePayload, Viewport};

    fn widget_data(pages: Vec<RawPage>) -> RawWidgetData {
        RawWidgetData {
            page_setting: pages,
            appearance: Appearance::default(),
        }
    }

    /// Storage whose every operation fails
    struct FailingStorage;

    impl ClientStorage for FailingStorage {
        async fn get(&self, _key: &str) -> Result<Option<Value>> {
            Err(Error::storage("backend unavailable"))
        }

        async fn set(&self, _key: &str, _value: Value) -> Result<()> {
            Err(Error::storage("backend unavailable"))
        }
    }

    #[tokio::test]
    async fn test_startup_shows_when_no_prior_dismissal() {
        let mut modal = MockModalHost::new();
        modal
            .expect_show()
            .withf(|markup, options| markup == "<doc>" && options.background == DEFAULT_MODAL_BACKGROUND)
            .times(1)
            .return_const(());

        let mut controller = Controller::new(
            widget_data(vec![RawPage::default()]),
            "<doc>",
            MemoryStorage::new(),
            modal,
        );
        assert!(controller.startup().await);
    }

    #[tokio::test]
    async fn test_startup_suppressed_by_stored_truthy_value() {
        let data = widget_data(vec![RawPage::default()]);
        let key = storage_key(&WidgetConfig::from_raw(&data));
        let storage = MemoryStorage::new().preload(key, json!(true));

        let mut modal = MockModalHost::new();
        modal.expect_show().times(0);

        let mut controller = Controller::new(data, "<doc>", storage, modal);
        assert!(!controller.startup().await);
    }

    #[tokio::test]
    async fn test_startup_shows_on_stored_falsy_value() {
        let data = widget_data(vec![RawPage::default()]);
        let key = storage_key(&WidgetConfig::from_raw(&data));

        for falsy in [json!(false), json!(0), json!(""), json!(null), json!([])] {
            let storage = MemoryStorage::new().preload(key.clone(), falsy);
            let mut modal = MockModalHost::new();
            modal.expect_show().times(1).return_const(());
            let mut controller = Controller::new(data.clone(), "<doc>", storage, modal);
            assert!(controller.startup().await);
        }
    }

    #[tokio::test]
    async fn test_startup_fails_open_on_storage_error() {
        let mut modal = MockModalHost::new();
        modal.expect_show().times(1).return_const(());

        let mut controller = Controller::new(
            widget_data(vec![RawPage::default()]),
            "<doc>",
            FailingStorage,
            modal,
        );
        assert!(controller.startup().await);
    }

    #[tokio::test]
    async fn test_startup_uses_configured_background() {
        let mut data = widget_data(vec![RawPage::default()]);
        data.appearance.bg_color = Some("#112233".into());

        let mut modal = MockModalHost::new();
        modal
            .expect_show()
            .withf(|_, options| options.background == "#112233")
            .times(1)
            .return_const(());

        let mut controller = Controller::new(data, "<doc>", MemoryStorage::new(), modal);
        assert!(controller.startup().await);
    }

    #[tokio::test]
    async fn test_viewport_request_answered_with_widget_data() {
        let data = widget_data(vec![RawPage::default()]);
        let mut modal = MockModalHost::new();
        modal
            .expect_viewport()
            .return_const(Viewport {
                width: 800.0,
                height: 600.0,
            });
        modal
            .expect_post_message()
            .withf(|envelope| match envelope {
                Envelope::ViewportSize(p) => {
                    p.width == 800.0 && p.height == 600.0 && p.widget_data.page_setting.len() == 1
                }
                _ => false,
            })
            .times(1)
            .return_const(());
        modal.expect_close().times(0);

        let mut controller = Controller::new(data, "<doc>", MemoryStorage::new(), modal);
        controller.on_message(Envelope::GetViewportSize).await;
    }

    #[tokio::test]
    async fn test_viewport_request_with_no_pages_closes() {
        let mut modal = MockModalHost::new();
        modal.expect_post_message().times(0);
        modal.expect_close().times(1).return_const(());

        let mut controller =
            Controller::new(widget_data(vec![]), "<doc>", MemoryStorage::new(), modal);
        controller.on_message(Envelope::GetViewportSize).await;
    }

    #[tokio::test]
    async fn test_close_with_flag_persists_and_closes() {
        let data = widget_data(vec![RawPage {
            page_type: Some(PAGE_TYPE_AGREEMENT.into()),
            agree_content: Some("terms".into()),
            ..RawPage::default()
        }]);

        let mut modal = MockModalHost::new();
        modal.expect_close().times(1).return_const(());

        let mut controller = Controller::new(data, "<doc>", MemoryStorage::new(), modal);
        let key = controller.storage_key().to_string();
        controller
            .on_message(Envelope::CloseModal(ClosePayload {
                dont_show_this_again: true,
            }))
            .await;

        assert_eq!(
            controller.storage.get(&key).await.unwrap(),
            Some(json!(true))
        );
    }

    #[tokio::test]
    async fn test_close_without_flag_writes_nothing() {
        let mut modal = MockModalHost::new();
        modal.expect_close().times(1).return_const(());

        let mut controller = Controller::new(
            widget_data(vec![RawPage::default()]),
            "<doc>",
            MemoryStorage::new(),
            modal,
        );
        let key = controller.storage_key().to_string();
        controller
            .on_message(Envelope::CloseModal(ClosePayload {
                dont_show_this_again: false,
            }))
            .await;

        assert_eq!(controller.storage.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_close_proceeds_when_write_fails() {
        let mut modal = MockModalHost::new();
        modal.expect_close().times(1).return_const(());

        let mut controller = Controller::new(
            widget_data(vec![RawPage::default()]),
            "<doc>",
            FailingStorage,
            modal,
        );
        controller
            .on_message(Envelope::CloseModal(ClosePayload {
                dont_show_this_again: true,
            }))
            .await;
    }

    #[tokio::test]
    async fn test_unexpected_envelopes_ignored() {
        let mut modal = MockModalHost::new();
        modal.expect_post_message().times(0);
        modal.expect_close().times(0);

        let mut controller = Controller::new(
            widget_data(vec![RawPage::default()]),
            "<doc>",
            MemoryStorage::new(),
            modal,
        );
        controller
            .on_message(Envelope::Unknown {
                action: "mystery".into(),
                payload: None,
            })
            .await;
    }

    #[test]
    fn test_truthiness_rules() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!(-2.5)));
        assert!(is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!([true])));
        assert!(!is_truthy(&json!({"a": 1})));
    }
}

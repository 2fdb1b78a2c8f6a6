use crate::gateway::{Gateway, Operation, Params};
use crate::host::Host;
use crate::models::LikeStatus;
use crate::prefs::{PREF_ACTIVITY_OBJECT, PREF_DOC_ID, PreferenceStore};
use crate::ui::Presentation;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

pub struct LikeToggle<G, P, H> {
    gateway: G,
    prefs: P,
    host: H,
    ui: Arc<Presentation>,
    status: Option<LikeStatus>,
    content: String,
}

impl<G, P, H> LikeToggle<G, P, H>
where
    G: Gateway,
    P: PreferenceStore,
    H: Host,
{
    pub fn new(gateway: G, prefs: P, host: H, ui: Arc<Presentation>) -> Self {
        Self {
            gateway,
            prefs,
            host,
            ui,
            status: None,
            content: String::new(),
        }
    }

    pub fn status(&self) -> Option<LikeStatus> {
        self.status
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub async fn load(&mut self) {
        self.run(Operation::GetLikeStatus).await;
    }

    pub async fn click(&mut self) {
        let liked = self.status.is_some_and(|status| status.viewer_liked());
        let operation = if liked {
            Operation::CancelLike
        } else {
            Operation::Like
        };
        self.run(operation).await;
    }

    fn params(&self) -> Params {
        let mut params = Params::new();
        params.insert(
            "document".to_string(),
            Value::String(self.prefs.get(PREF_DOC_ID).unwrap_or_default()),
        );
        params.insert(
            "activityObject".to_string(),
            Value::String(self.prefs.get(PREF_ACTIVITY_OBJECT).unwrap_or_default()),
        );
        params
    }

    async fn run(&mut self, operation: Operation) {
        let response = match self.gateway.invoke(operation, self.params()).await {
            Ok(response) => response,
            Err(err) => {
                warn!(operation = operation.name(), "like status not updated: {err}");
                return;
            }
        };

        let Some(data) = response.data else {
            warn!(operation = operation.name(), "like status response had no data");
            return;
        };
        match serde_json::from_value::<LikeStatus>(data) {
            Ok(status) => {
                info!(
                    operation = operation.name(),
                    likes = status.likes_count,
                    liked = status.viewer_liked(),
                    "like status updated"
                );
                self.status = Some(status);
                self.content = self.ui.render_like_status(&status);
                self.host.adjust_height();
            }
            Err(err) => warn!(operation = operation.name(), "malformed like status: {err}"),
        }
    }
}

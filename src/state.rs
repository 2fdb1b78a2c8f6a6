use crate::errors::AppError;
use crate::gateway::Gateway;
use crate::host::HeightSignal;
use crate::leaderboard::Leaderboard;
use crate::like::LikeToggle;
use crate::models::AppData;
use crate::prefs::MemoryPreferences;
use crate::storage::{persist_data, store_widget_prefs};
use crate::ui::Presentation;
use std::{collections::HashMap, path::PathBuf, sync::Arc};
use tokio::sync::Mutex;
use tracing::debug;

pub type LikeWidget<G> = LikeToggle<G, MemoryPreferences, HeightSignal>;
pub type BoardWidget<G> = Leaderboard<G, MemoryPreferences, HeightSignal>;

pub const DEFAULT_MOUNT_LIMIT: usize = 256;

pub struct Mounted<W> {
    pub widget: Mutex<W>,
    pub prefs: MemoryPreferences,
    pub host: HeightSignal,
}

struct Registry<W> {
    entries: HashMap<String, (u64, Arc<Mounted<W>>)>,
    serial: u64,
    limit: usize,
}

impl<W> Registry<W> {
    fn new(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            serial: 0,
            limit: limit.max(1),
        }
    }

    fn insert(&mut self, instance: &str, mounted: Mounted<W>) -> Option<String> {
        let mut evicted = None;
        if !self.entries.contains_key(instance) && self.entries.len() >= self.limit {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, (serial, _))| *serial)
                .map(|(name, _)| name.clone());
            if let Some(name) = oldest {
                self.entries.remove(&name);
                evicted = Some(name);
            }
        }
        self.serial += 1;
        self.entries
            .insert(instance.to_string(), (self.serial, Arc::new(mounted)));
        evicted
    }

    fn get(&self, instance: &str) -> Option<Arc<Mounted<W>>> {
        self.entries.get(instance).map(|(_, mounted)| mounted.clone())
    }
}

#[derive(Clone)]
pub struct AppState<G> {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
    pub gateway: G,
    pub ui: Arc<Presentation>,
    likes: Arc<Mutex<Registry<LikeWidget<G>>>>,
    boards: Arc<Mutex<Registry<BoardWidget<G>>>>,
}

impl<G: Gateway + Clone> AppState<G> {
    pub fn new(data_path: PathBuf, data: AppData, gateway: G, ui: Presentation) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
            gateway,
            ui: Arc::new(ui),
            likes: Arc::new(Mutex::new(Registry::new(DEFAULT_MOUNT_LIMIT))),
            boards: Arc::new(Mutex::new(Registry::new(DEFAULT_MOUNT_LIMIT))),
        }
    }

    pub fn with_mount_limit(mut self, limit: usize) -> Self {
        self.likes = Arc::new(Mutex::new(Registry::new(limit)));
        self.boards = Arc::new(Mutex::new(Registry::new(limit)));
        self
    }

    pub async fn preferences(&self, instance: &str) -> MemoryPreferences {
        let data = self.data.lock().await;
        MemoryPreferences::from_entries(data.widgets.get(instance).cloned().unwrap_or_default())
    }

    pub async fn save_preferences(
        &self,
        instance: &str,
        prefs: &MemoryPreferences,
    ) -> Result<(), AppError> {
        let mut data = self.data.lock().await;
        if store_widget_prefs(&mut data, instance, prefs.snapshot()) {
            persist_data(&self.data_path, &data).await?;
        }
        Ok(())
    }

    pub async fn mount_like(&self, instance: &str, mounted: Mounted<LikeWidget<G>>) {
        if let Some(evicted) = self.likes.lock().await.insert(instance, mounted) {
            debug!(instance = %evicted, "like gadget unmounted");
        }
    }

    pub async fn like(&self, instance: &str) -> Option<Arc<Mounted<LikeWidget<G>>>> {
        self.likes.lock().await.get(instance)
    }

    pub async fn mount_board(&self, instance: &str, mounted: Mounted<BoardWidget<G>>) {
        if let Some(evicted) = self.boards.lock().await.insert(instance, mounted) {
            debug!(instance = %evicted, "most liked gadget unmounted");
        }
    }

    pub async fn board(&self, instance: &str) -> Option<Arc<Mounted<BoardWidget<G>>>> {
        self.boards.lock().await.get(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;

    fn state(limit: usize) -> AppState<MockGateway> {
        AppState::new(
            PathBuf::from("unused.json"),
            AppData::default(),
            MockGateway::new(),
            Presentation::new("/nuxeo/"),
        )
        .with_mount_limit(limit)
    }

    fn like(state: &AppState<MockGateway>) -> Mounted<LikeWidget<MockGateway>> {
        let prefs = MemoryPreferences::new();
        let host = HeightSignal::new();
        Mounted {
            widget: Mutex::new(LikeToggle::new(
                state.gateway.clone(),
                prefs.clone(),
                host.clone(),
                state.ui.clone(),
            )),
            prefs,
            host,
        }
    }

    #[tokio::test]
    async fn oldest_instance_is_dropped_past_the_limit() {
        let state = state(2);
        state.mount_like("a", like(&state)).await;
        state.mount_like("b", like(&state)).await;
        state.mount_like("c", like(&state)).await;

        assert!(state.like("a").await.is_none());
        assert!(state.like("b").await.is_some());
        assert!(state.like("c").await.is_some());
    }

    #[tokio::test]
    async fn remounting_replaces_without_evicting() {
        let state = state(2);
        state.mount_like("a", like(&state)).await;
        state.mount_like("b", like(&state)).await;
        let first = state.like("a").await.unwrap();
        state.mount_like("a", like(&state)).await;

        assert!(!Arc::ptr_eq(&first, &state.like("a").await.unwrap()));
        assert!(state.like("b").await.is_some());

        state.mount_like("c", like(&state)).await;
        assert!(state.like("b").await.is_none());
        assert!(state.like("a").await.is_some());
    }
}

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub const PREF_DOC_ID: &str = "docId";
pub const PREF_ACTIVITY_OBJECT: &str = "activityObject";
pub const PREF_CONTEXT_PATH: &str = "contextPath";
pub const PREF_DATE_RANGE: &str = "dateRange";

pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).filter(|value| !value.is_empty()).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.lock().insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let prefs = MemoryPreferences::new();
        let other = prefs.clone();
        other.set(PREF_CONTEXT_PATH, "/demo");
        assert_eq!(prefs.get(PREF_CONTEXT_PATH).as_deref(), Some("/demo"));
        assert_eq!(prefs.snapshot().len(), 1);
    }

    #[test]
    fn empty_values_read_as_unset() {
        let prefs = MemoryPreferences::new();
        prefs.set(PREF_DOC_ID, "");
        assert_eq!(prefs.get(PREF_DOC_ID), None);
        assert_eq!(prefs.get(PREF_DATE_RANGE), None);
    }
}

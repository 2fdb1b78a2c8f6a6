use crate::errors::AppError;
use crate::models::AppData;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error};

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse preferences file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read preferences file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    debug!(path = %path.display(), widgets = data.widgets.len(), "preferences saved");
    Ok(())
}

pub fn store_widget_prefs(
    data: &mut AppData,
    instance: &str,
    entries: BTreeMap<String, String>,
) -> bool {
    if data.widgets.get(instance) == Some(&entries) {
        return false;
    }
    if entries.is_empty() && !data.widgets.contains_key(instance) {
        return false;
    }
    data.widgets.insert(instance.to_string(), entries);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn unchanged_preferences_are_not_rewritten() {
        let mut data = AppData::default();
        assert!(!store_widget_prefs(&mut data, "w1", BTreeMap::new()));
        assert!(store_widget_prefs(&mut data, "w1", entries(&[("contextPath", "/demo")])));
        assert!(!store_widget_prefs(&mut data, "w1", entries(&[("contextPath", "/demo")])));
        assert!(store_widget_prefs(&mut data, "w1", entries(&[("contextPath", "/sales")])));
        assert_eq!(data.widgets["w1"]["contextPath"], "/sales");
    }

    #[tokio::test]
    async fn preferences_file_round_trips() {
        let mut path = std::env::temp_dir();
        path.push(format!("like_gadgets_prefs_{}.json", std::process::id()));

        let mut data = AppData::default();
        store_widget_prefs(&mut data, "board", entries(&[("dateRange", "last_week")]));
        persist_data(&path, &data).await.unwrap();

        assert_eq!(load_data(&path).await, data);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn unreadable_file_yields_empty_preferences() {
        let mut path = std::env::temp_dir();
        path.push(format!("like_gadgets_corrupt_{}.json", std::process::id()));
        std::fs::write(&path, b"{not json").unwrap();

        assert_eq!(load_data(&path).await, AppData::default());
        let _ = std::fs::remove_file(&path);
    }
}

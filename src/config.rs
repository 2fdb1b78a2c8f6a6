use crate::state::DEFAULT_MOUNT_LIMIT;
use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub data_path: PathBuf,
    pub automation_url: String,
    pub automation_user: String,
    pub automation_password: String,
    pub icon_base_url: String,
    pub mount_limit: usize,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(8081),
            data_path: env::var("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/prefs.json")),
            automation_url: var_or("AUTOMATION_URL", "http://localhost:8080/nuxeo"),
            automation_user: var_or("AUTOMATION_USER", "Administrator"),
            automation_password: var_or("AUTOMATION_PASSWORD", "Administrator"),
            icon_base_url: var_or("ICON_BASE_URL", "/nuxeo/"),
            mount_limit: env::var("MOUNT_LIMIT")
                .ok()
                .and_then(|value| value.parse::<usize>().ok())
                .unwrap_or(DEFAULT_MOUNT_LIMIT),
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub user_like_status: i32,
    pub likes_count: u64,
}

impl LikeStatus {
    pub fn viewer_liked(&self) -> bool {
        self.user_like_status == 1
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RankedObject {
    Document(RankedDocument),
    Minimessage(RankedMessage),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedDocument {
    pub rating: f64,
    #[serde(default, deserialize_with = "flag")]
    pub has_user_liked: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub document: Option<DocumentEntity>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedMessage {
    pub rating: f64,
    #[serde(default, deserialize_with = "flag")]
    pub has_user_liked: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub actor: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DocumentEntity {
    #[serde(default)]
    pub properties: DocumentProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DocumentProperties {
    #[serde(rename = "common:icon", default)]
    pub icon: Option<String>,
    #[serde(rename = "dc:title", default)]
    pub title: Option<String>,
    #[serde(rename = "dc:creator", default)]
    pub creator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainOption {
    pub path: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentList {
    #[serde(default)]
    pub entries: Vec<DomainOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppData {
    pub widgets: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
pub struct LikeQuery {
    pub document: Option<String>,
    #[serde(rename = "activityObject")]
    pub activity_object: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub variant: Option<String>,
    #[serde(rename = "contextPath")]
    pub context_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScopeForm {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeForm {
    pub range: String,
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}

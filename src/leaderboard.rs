use crate::date_range::DateRange;
use crate::gateway::{Gateway, Operation, Params};
use crate::host::Host;
use crate::models::{DocumentList, DomainOption, RankedObject};
use crate::prefs::{PREF_CONTEXT_PATH, PREF_DATE_RANGE, PreferenceStore};
use crate::ui::Presentation;
use chrono::{Local, NaiveDateTime};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const ROOT_PATH: &str = "/";
pub const DEFAULT_SCOPE: &str = "/default-domain";
pub const RESULT_LIMIT: u64 = 10;
pub const DOMAIN_QUERY: &str = r#"Select * from Domain where ecm:mixinType <> "HiddenInNavigation" AND ecm:currentLifeCycleState != "deleted""#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LeaderboardOptions {
    pub scope_selector: bool,
    pub date_filter: bool,
}

impl LeaderboardOptions {
    pub fn simple() -> Self {
        Self::default()
    }

    pub fn with_scope_selector() -> Self {
        Self {
            scope_selector: true,
            date_filter: false,
        }
    }

    pub fn with_date_filter() -> Self {
        Self {
            scope_selector: false,
            date_filter: true,
        }
    }

    pub fn from_variant(name: &str) -> Option<Self> {
        match name {
            "simple" => Some(Self::simple()),
            "domains" => Some(Self::with_scope_selector()),
            "dates" => Some(Self::with_date_filter()),
            _ => None,
        }
    }
}

pub struct Leaderboard<G, P, H> {
    gateway: G,
    prefs: P,
    host: H,
    ui: Arc<Presentation>,
    options: LeaderboardOptions,
    target: String,
    scope: Option<String>,
    domains: Option<Vec<DomainOption>>,
    date_range: DateRange,
    results: String,
    toolbar_changed: bool,
    clock: fn() -> NaiveDateTime,
}

impl<G, P, H> Leaderboard<G, P, H>
where
    G: Gateway,
    P: PreferenceStore,
    H: Host,
{
    pub fn new(
        gateway: G,
        prefs: P,
        host: H,
        ui: Arc<Presentation>,
        options: LeaderboardOptions,
        target: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            prefs,
            host,
            ui,
            options,
            target: target.into(),
            scope: None,
            domains: None,
            date_range: DateRange::Ever,
            results: String::new(),
            toolbar_changed: false,
            clock: local_now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn options(&self) -> LeaderboardOptions {
        self.options
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub async fn load(&mut self) {
        if self.options.date_filter {
            self.date_range = self
                .prefs
                .get(PREF_DATE_RANGE)
                .and_then(|value| value.parse().ok())
                .unwrap_or_default();
        }

        if self.options.scope_selector && self.target == ROOT_PATH {
            self.load_domains().await;
        } else {
            self.scope = Some(self.target.clone());
            self.refresh().await;
        }
    }

    pub async fn select_scope(&mut self, path: &str) {
        info!(path, "leaderboard scope selected");
        self.prefs.set(PREF_CONTEXT_PATH, path);
        self.scope = Some(path.to_string());
        self.refresh().await;
    }

    pub async fn select_date_range(&mut self, range: DateRange) {
        info!(range = range.as_str(), "leaderboard period selected");
        self.prefs.set(PREF_DATE_RANGE, range.as_str());
        self.date_range = range;
        self.refresh().await;
    }

    async fn load_domains(&mut self) {
        let mut params = Params::new();
        params.insert("query".to_string(), Value::String(DOMAIN_QUERY.to_string()));
        let response = match self.gateway.invoke(Operation::DocumentQuery, params).await {
            Ok(response) => response,
            Err(err) => {
                warn!("domain list not loaded: {err}");
                return;
            }
        };
        let Some(data) = response.data else {
            return;
        };
        let list: DocumentList = match serde_json::from_value(data) {
            Ok(list) => list,
            Err(err) => {
                warn!("malformed domain list: {err}");
                return;
            }
        };

        let saved = self
            .prefs
            .get(PREF_CONTEXT_PATH)
            .unwrap_or_else(|| DEFAULT_SCOPE.to_string());
        let selected = list
            .entries
            .iter()
            .find(|entry| entry.path == saved)
            .or_else(|| list.entries.first())
            .map(|entry| entry.path.clone());
        debug!(domains = list.entries.len(), ?selected, "domain list loaded");
        self.domains = Some(list.entries);
        self.toolbar_changed = true;

        match selected {
            Some(path) => self.select_scope(&path).await,
            None => self.resized(),
        }
    }

    pub async fn refresh(&mut self) {
        let Some(scope) = self.scope.clone() else {
            return;
        };
        let mut params = Params::new();
        params.insert("contextPath".to_string(), Value::String(scope));
        params.insert("limit".to_string(), Value::from(RESULT_LIMIT));
        if self.options.date_filter {
            self.date_range.apply((self.clock)(), &mut params);
        }

        let response = match self.gateway.invoke(Operation::MostLiked, params).await {
            Ok(response) => response,
            Err(err) => {
                warn!("leaderboard not refreshed: {err}");
                if self.toolbar_changed {
                    self.resized();
                }
                return;
            }
        };

        self.results.clear();
        if let Some(data) = response.data {
            let items = decode_items(&data);
            debug!(items = items.len(), "leaderboard refreshed");
            self.results = self.ui.render_leaderboard(&items);
        }
        self.resized();
    }

    fn resized(&mut self) {
        self.toolbar_changed = false;
        self.host.adjust_height();
    }

    pub fn content(&self) -> String {
        let mut html = String::new();
        if let Some(domains) = &self.domains {
            html.push_str(&self.ui.render_scope_selector(domains, self.scope.as_deref()));
        }
        if self.options.date_filter {
            html.push_str(&self.ui.render_date_range_selector(self.date_range));
        }
        html.push_str(r#"<div class="results">"#);
        html.push_str(&self.results);
        html.push_str("</div>");
        html
    }
}

fn decode_items(data: &Value) -> Vec<RankedObject> {
    let Some(items) = data.get("items").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<RankedObject>(item.clone()) {
            Ok(RankedObject::Unknown) => {
                debug!(kind = ?item.get("type"), "skipping unsupported leaderboard item");
                None
            }
            Ok(object) => Some(object),
            Err(err) => {
                warn!("skipping malformed leaderboard item: {err}");
                None
            }
        })
        .collect()
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

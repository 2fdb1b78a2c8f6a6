use crate::date_range::DateRange;
use crate::errors::AppError;
use crate::gateway::Gateway;
use crate::host::HeightSignal;
use crate::leaderboard::{Leaderboard, LeaderboardOptions, ROOT_PATH};
use crate::like::LikeToggle;
use crate::models::{DateRangeForm, LeaderboardQuery, LikeQuery, ScopeForm};
use crate::prefs::{PREF_ACTIVITY_OBJECT, PREF_DOC_ID, PreferenceStore};
use crate::state::{AppState, BoardWidget, Mounted};
use crate::ui::render_page;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

pub const ADJUST_HEIGHT_HEADER: &str = "x-gadget-adjust-height";

pub async fn health() -> &'static str {
    "ok"
}

pub async fn like_page<G: Gateway + Clone + 'static>(
    State(state): State<AppState<G>>,
    Path(instance): Path<String>,
    Query(query): Query<LikeQuery>,
) -> Result<Html<String>, AppError> {
    let prefs = state.preferences(&instance).await;
    if let Some(document) = query.document {
        prefs.set(PREF_DOC_ID, &document);
    }
    if let Some(activity_object) = query.activity_object {
        prefs.set(PREF_ACTIVITY_OBJECT, &activity_object);
    }
    state.save_preferences(&instance, &prefs).await?;

    info!(instance = %instance, "like gadget loaded");
    let host = HeightSignal::new();
    let mut widget = LikeToggle::new(
        state.gateway.clone(),
        prefs.clone(),
        host.clone(),
        state.ui.clone(),
    );
    widget.load().await;

    let page = render_page(
        "Like",
        &format!("/gadgets/like/{instance}"),
        widget.content(),
    );
    state
        .mount_like(
            &instance,
            Mounted {
                widget: Mutex::new(widget),
                prefs,
                host,
            },
        )
        .await;
    Ok(Html(page))
}

pub async fn like_toggle<G: Gateway + Clone + 'static>(
    State(state): State<AppState<G>>,
    Path(instance): Path<String>,
) -> Result<Response, AppError> {
    let mounted = state
        .like(&instance)
        .await
        .ok_or_else(|| AppError::not_found(format!("no like gadget '{instance}'")))?;

    let mut widget = mounted.widget.lock().await;
    let before = mounted.host.requests();
    widget.click().await;
    let resized = mounted.host.requests() != before;
    Ok(fragment(widget.content().to_string(), resized))
}

pub async fn board_page<G: Gateway + Clone + 'static>(
    State(state): State<AppState<G>>,
    Path(instance): Path<String>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Html<String>, AppError> {
    let variant = query.variant.as_deref().unwrap_or("simple");
    let options = LeaderboardOptions::from_variant(variant).ok_or_else(|| {
        AppError::bad_request(format!("unknown leaderboard variant '{variant}'"))
    })?;
    let target = query
        .context_path
        .filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| ROOT_PATH.to_string());

    info!(instance = %instance, variant, target = %target, "most liked gadget loaded");
    let prefs = state.preferences(&instance).await;
    let host = HeightSignal::new();
    let mut widget = Leaderboard::new(
        state.gateway.clone(),
        prefs.clone(),
        host.clone(),
        state.ui.clone(),
        options,
        target,
    );
    widget.load().await;
    state.save_preferences(&instance, &prefs).await?;

    let page = render_page(
        "Most liked",
        &format!("/gadgets/most-liked/{instance}"),
        &widget.content(),
    );
    state
        .mount_board(
            &instance,
            Mounted {
                widget: Mutex::new(widget),
                prefs,
                host,
            },
        )
        .await;
    Ok(Html(page))
}

pub async fn board_scope<G: Gateway + Clone + 'static>(
    State(state): State<AppState<G>>,
    Path(instance): Path<String>,
    Form(form): Form<ScopeForm>,
) -> Result<Response, AppError> {
    let path = form.path.trim();
    if path.is_empty() {
        return Err(AppError::bad_request("path must not be empty"));
    }
    let mounted = mounted_board(&state, &instance).await?;

    let mut widget = mounted.widget.lock().await;
    if !widget.options().scope_selector {
        return Err(AppError::bad_request("this gadget has no scope selector"));
    }
    let before = mounted.host.requests();
    widget.select_scope(path).await;
    let resized = mounted.host.requests() != before;
    let html = widget.content();
    drop(widget);

    state.save_preferences(&instance, &mounted.prefs).await?;
    Ok(fragment(html, resized))
}

pub async fn board_date_range<G: Gateway + Clone + 'static>(
    State(state): State<AppState<G>>,
    Path(instance): Path<String>,
    Form(form): Form<DateRangeForm>,
) -> Result<Response, AppError> {
    let range: DateRange = form.range.parse().map_err(AppError::bad_request)?;
    let mounted = mounted_board(&state, &instance).await?;

    let mut widget = mounted.widget.lock().await;
    if !widget.options().date_filter {
        return Err(AppError::bad_request("this gadget has no date filter"));
    }
    let before = mounted.host.requests();
    widget.select_date_range(range).await;
    let resized = mounted.host.requests() != before;
    let html = widget.content();
    drop(widget);

    state.save_preferences(&instance, &mounted.prefs).await?;
    Ok(fragment(html, resized))
}

async fn mounted_board<G: Gateway + Clone>(
    state: &AppState<G>,
    instance: &str,
) -> Result<Arc<Mounted<BoardWidget<G>>>, AppError> {
    state
        .board(instance)
        .await
        .ok_or_else(|| AppError::not_found(format!("no most liked gadget '{instance}'")))
}

fn fragment(html: String, resized: bool) -> Response {
    if resized {
        ([(ADJUST_HEIGHT_HEADER, "1")], Html(html)).into_response()
    } else {
        Html(html).into_response()
    }
}

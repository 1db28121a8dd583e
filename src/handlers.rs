use crate::errors::AppError;
use crate::models::{CheckForm, HistoryEntry, IndexQuery, Notice, UrlDetail};
use crate::state::AppState;
use crate::ui::{render_index, render_metrics, IndexView, MAIN_JS};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use chrono::Local;
use tracing::info;

pub async fn index(
    State(state): State<AppState>,
    query: Option<Query<IndexQuery>>,
) -> Result<Html<String>, AppError> {
    let notice = query.and_then(|Query(query)| query.notice);
    let history = snapshot_history(&state).await;
    let page = render_index(&IndexView {
        results: &[],
        history: &history,
        now: now_string(),
        notice,
    })?;
    Ok(Html(page))
}

pub async fn check_urls(
    State(state): State<AppState>,
    Form(form): Form<CheckForm>,
) -> Result<Response, AppError> {
    let text = form.urls.trim();
    if text.is_empty() {
        return Ok(Redirect::to(Notice::EmptyInput.location()).into_response());
    }

    let urls: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if urls.is_empty() {
        return Ok(Redirect::to(Notice::NoUrls.location()).into_response());
    }

    let mut results = Vec::with_capacity(urls.len());
    for url in &urls {
        let Some(result) = state.checker.check(url).await else {
            continue;
        };
        state
            .metrics
            .lock()
            .await
            .record(url, result.status.is_up(), result.time);
        results.push(result);
    }

    let up = results.iter().filter(|result| result.status.is_up()).count();
    info!(checked = results.len(), up, "check run finished");

    if !results.is_empty() {
        state.history.lock().await.record(results.clone());
    }

    let history = snapshot_history(&state).await;
    let page = render_index(&IndexView {
        results: &results,
        history: &history,
        now: now_string(),
        notice: None,
    })?;
    Ok(Html(page).into_response())
}

pub async fn clear_history(State(state): State<AppState>) -> Redirect {
    state.history.lock().await.clear();
    info!("history cleared");
    Redirect::to(Notice::Cleared.location())
}

pub async fn show_metrics(State(state): State<AppState>) -> Html<String> {
    let summaries = state.metrics.lock().await.summaries();
    Html(render_metrics(&summaries))
}

pub async fn url_metrics(
    State(state): State<AppState>,
    Path(url): Path<String>,
) -> Result<Json<UrlDetail>, AppError> {
    state
        .metrics
        .lock()
        .await
        .detail(&url)
        .map(Json)
        .ok_or_else(|| AppError::not_found("URL not found"))
}

pub async fn get_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(snapshot_history(&state).await)
}

pub async fn main_script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], MAIN_JS)
}

async fn snapshot_history(state: &AppState) -> Vec<HistoryEntry> {
    state.history.lock().await.entries().to_vec()
}

fn now_string() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

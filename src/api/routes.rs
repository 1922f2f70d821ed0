use axum::{
    routing::{get, post},
    Router,
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode, Uri},
    response::IntoResponse,
};
use chrono::Utc;
use tower_http::cors::{CorsLayer, Any};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{AppError, Result};
use crate::api::extract::AppJson;
use crate::api::models::{
    AdvisoryQuery, AssessmentOptions, ContactQuery, FaqQuery, LoginResponse, NotificationQuery, ResourceQuery,
    StatusResponse, TipQuery,
};
use crate::api::response;
use crate::health::{self, Condition, HealthAssessmentInput, Symptoms};
use crate::models::{advisory, help, notification, resource, tip, ContactMethod, ProfileUpdate};
use crate::session::Credentials;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    let data_dir = app_state.config.data_dir.clone();

    Router::new()
        .route("/api/advisories", get(list_advisories))
        .route("/api/advisories/current", get(current_advisory))
        .route("/api/advisories/group", get(group_advisories))
        .route("/api/advisories/:id", get(advisory_by_id))
        .route("/api/tips", get(list_tips))
        .route("/api/tips/categories", get(tip_categories))
        .route("/api/tips/:id", get(tip_by_id))
        .route("/api/resources", get(list_resources))
        .route("/api/help/faqs", get(list_faqs))
        .route("/api/help/contact-methods", get(list_contact_methods))
        .route("/api/notifications/urgent", get(urgent_alerts))
        .route("/api/dashboard", get(dashboard))
        .route("/api/health-assessment", post(health_assessment))
        .route("/api/health-assessment/options", get(assessment_options))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/profile", get(profile).put(update_profile))
        .route("/api/status", get(status))
        .nest_service("/data", ServeDir::new(data_dir))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn list_advisories(
    State(state): State<AppState>,
    Query(query): Query<AdvisoryQuery>,
) -> impl IntoResponse {
    let mut advisories = state.services.advisories.fetch_advisories().await;
    if let Some(severity) = query.severity {
        advisories = advisory::by_severity(&advisories, severity);
    }
    if let Some(q) = query.q.as_deref() {
        advisories = advisory::search(&advisories, q);
    }
    if query.active {
        advisories = advisory::active_at(&advisories, Utc::now());
    }
    response::list(advisories)
}

async fn current_advisory(State(state): State<AppState>) -> impl IntoResponse {
    response::success(state.services.advisories.fetch_current_advisory().await)
}

async fn group_advisories(State(state): State<AppState>) -> impl IntoResponse {
    response::list(state.services.advisories.fetch_group_advisories().await)
}

async fn advisory_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let advisories = state.services.advisories.fetch_advisories().await;
    let found = advisory::find_by_id(&advisories, &id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("advisory {}", id)))?;
    Ok(response::success(found))
}

async fn list_tips(
    State(state): State<AppState>,
    Query(query): Query<TipQuery>,
) -> impl IntoResponse {
    let mut tips = state.services.tips.fetch_tips().await;
    if let Some(category) = query.category.as_deref() {
        tips = tip::by_category(&tips, category);
    }
    if let Some(priority) = query.priority {
        tips = tip::by_priority(&tips, priority);
    }
    if let Some(q) = query.q.as_deref() {
        tips = tip::search(&tips, q);
    }
    response::list(tips)
}

async fn tip_categories(State(state): State<AppState>) -> impl IntoResponse {
    response::list(tip::categories(&state.services.tips.fetch_tips().await))
}

async fn tip_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let tips = state.services.tips.fetch_tips().await;
    let found = tip::find_by_id(&tips, &id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("tip {}", id)))?;
    Ok(response::success(found))
}

async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ResourceQuery>,
) -> impl IntoResponse {
    let mut resources = state.services.resources.fetch_resources().await;
    if let Some(category) = query.category.as_deref() {
        resources = resource::by_category(&resources, category);
    }
    if let Some(resource_type) = query.resource_type.as_deref() {
        resources = resource::by_type(&resources, resource_type);
    }
    response::list(resources)
}

async fn list_faqs(
    State(state): State<AppState>,
    Query(query): Query<FaqQuery>,
) -> impl IntoResponse {
    let mut faqs = state.services.help.fetch_faqs().await;
    if let Some(category) = query.category.as_deref() {
        faqs = help::faqs_by_category(&faqs, category);
    }
    if let Some(q) = query.q.as_deref() {
        faqs = help::search_faqs(&faqs, q);
    }
    response::list(faqs)
}

async fn list_contact_methods(
    State(state): State<AppState>,
    Query(query): Query<ContactQuery>,
) -> impl IntoResponse {
    let mut methods: Vec<ContactMethod> = state.services.help.fetch_contact_methods().await;
    if let Some(kind) = query.kind {
        methods = help::contacts_by_kind(&methods, kind);
    }
    response::list(methods)
}

async fn urgent_alerts(
    State(state): State<AppState>,
    Query(query): Query<NotificationQuery>,
) -> impl IntoResponse {
    let mut alerts = state.services.notifications.fetch_urgent_alerts().await;
    if let Some(priority) = query.priority {
        alerts = notification::by_priority(&alerts, priority);
    }
    if query.unread {
        alerts = notification::unread(&alerts);
    }
    response::list(alerts)
}

async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    response::success(state.services.dashboard.fetch_dashboard().await)
}

async fn health_assessment(AppJson(body): AppJson<serde_json::Value>) -> Result<impl IntoResponse> {
    let input = HealthAssessmentInput::from_value(&body).map_err(AppError::Validation)?;
    let result = health::assess(&input)?;
    info!(score = result.score, risk = ?result.risk_level, "health assessment scored");
    Ok(response::success(result))
}

async fn assessment_options() -> impl IntoResponse {
    response::success(AssessmentOptions {
        conditions: Condition::ALL.to_vec(),
        symptoms: Symptoms::NAMES.to_vec(),
        activity_levels: vec!["low", "moderate", "high"],
    })
}

async fn login(
    State(state): State<AppState>,
    AppJson(credentials): AppJson<Credentials>,
) -> Result<impl IntoResponse> {
    let (token, user) = state.sessions.login(&credentials)?;
    Ok(response::success(LoginResponse { token, user }))
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse> {
    let token = bearer_token(&headers)?;
    state.sessions.logout(token)?;
    Ok(response::success("logged out"))
}

async fn profile(State(state): State<AppState>, headers: HeaderMap) -> Result<impl IntoResponse> {
    let token = bearer_token(&headers)?;
    Ok(response::success(state.sessions.current_user(token)?))
}

async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(update): AppJson<ProfileUpdate>,
) -> Result<impl IntoResponse> {
    let token = bearer_token(&headers)?;
    Ok(response::success(state.sessions.update_profile(token, update)?))
}

async fn status(State(state): State<AppState>) -> impl IntoResponse {
    response::success(StatusResponse {
        resources: state.services.status(),
        active_sessions: state.sessions.active_sessions(),
    })
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    response::error::<()>(StatusCode::NOT_FOUND, format!("No route for {}", uri.path()))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer mock-token-1"));
        assert_eq!(bearer_token(&headers).unwrap(), "mock-token-1");
    }
}

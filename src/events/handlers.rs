use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{dto::EventRequest, repo_types::Event};
use crate::{
    auth::extractors::AuthUser,
    dto::MessageResponse,
    error::{AppError, AppJson, AppPath},
    ownership::{affected, ensure_owner, owned, Resource},
    state::AppState,
};

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
}

#[instrument(skip(state, payload, user), fields(user_id = user.id))]
pub async fn create_event(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<EventRequest>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let payload = payload.validate()?;
    let event = state.store.create_event(user.id, &payload).await?;
    info!(event_id = event.id, user_id = user.id, "event created");
    Ok((StatusCode::CREATED, Json(event)))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_events(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.store.list_events_for_owner(user.id).await?))
}

/// Unauthenticated. The only single-row read without an owner filter.
#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Event>, AppError> {
    state
        .store
        .find_event(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Event"))
}

#[instrument(skip(state, payload, user), fields(user_id = user.id))]
pub async fn update_event(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<EventRequest>,
) -> Result<Json<Event>, AppError> {
    ensure_owner(state.store.as_ref(), &user, Resource::Event, id).await?;
    let payload = payload.validate()?;
    let event = state.store.update_event(id, user.id, &payload).await?;
    let event = owned(Resource::Event, event)?;
    info!(event_id = id, user_id = user.id, "event updated");
    Ok(Json(event))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_event(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    ensure_owner(state.store.as_ref(), &user, Resource::Event, id).await?;
    affected(Resource::Event, state.store.delete_event(id, user.id).await?)?;
    info!(event_id = id, user_id = user.id, "event deleted");
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

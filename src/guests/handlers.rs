use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{GuestRequest, GuestUpdate},
    repo_types::Guest,
};
use crate::{
    auth::extractors::AuthUser,
    dto::MessageResponse,
    error::{AppError, AppJson, AppPath},
    ownership::{affected, ensure_owner, owned, Resource},
    state::AppState,
};

pub fn guest_routes() -> Router<AppState> {
    Router::new()
        .route("/guests", post(create_guest).get(list_guests))
        .route("/guests/event/:event_id", get(list_event_guests))
        .route(
            "/guests/:id",
            get(get_guest).put(update_guest).delete(delete_guest),
        )
}

/// Adds a guest to one of the caller's events, then sends the invitation.
/// The row is kept whatever happens to the email.
#[instrument(skip(state, payload, user), fields(user_id = user.id))]
pub async fn create_guest(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<GuestRequest>,
) -> Result<(StatusCode, Json<Guest>), AppError> {
    let payload = payload.validate()?;
    ensure_owner(state.store.as_ref(), &user, Resource::Event, payload.event_id).await?;

    let guest = state.store.create_guest(user.id, &payload).await?;
    info!(guest_id = guest.id, event_id = guest.event_id, "guest added");

    state
        .notifier
        .notify(&guest.email, &guest.name, guest.event_id)
        .await;

    Ok((StatusCode::CREATED, Json(guest)))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_guests(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Guest>>, AppError> {
    Ok(Json(state.store.list_guests_for_owner(user.id).await?))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_event_guests(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(event_id): AppPath<i64>,
) -> Result<Json<Vec<Guest>>, AppError> {
    Ok(Json(
        state.store.list_guests_for_event(event_id, user.id).await?,
    ))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_guest(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Guest>, AppError> {
    let guest = state.store.find_guest(id, user.id).await?;
    Ok(Json(owned(Resource::Guest, guest)?))
}

#[instrument(skip(state, payload, user), fields(user_id = user.id))]
pub async fn update_guest(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<GuestUpdate>,
) -> Result<Json<Guest>, AppError> {
    ensure_owner(state.store.as_ref(), &user, Resource::Guest, id).await?;
    let payload = payload.validate()?;
    let guest = state.store.update_guest(id, user.id, &payload).await?;
    let guest = owned(Resource::Guest, guest)?;
    info!(guest_id = id, "guest updated");
    Ok(Json(guest))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_guest(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    ensure_owner(state.store.as_ref(), &user, Resource::Guest, id).await?;
    affected(Resource::Guest, state.store.delete_guest(id, user.id).await?)?;
    info!(guest_id = id, "guest deleted");
    Ok(Json(MessageResponse::new("Guest deleted successfully")))
}

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{TaskRequest, TaskUpdate},
    repo_types::Task,
};
use crate::{
    auth::extractors::AuthUser,
    dto::MessageResponse,
    error::{AppError, AppJson, AppPath},
    ownership::{affected, ensure_owner, owned, Resource},
    state::AppState,
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", post(create_task).get(list_tasks))
        .route("/tasks/event/:event_id", get(list_event_tasks))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}

#[instrument(skip(state, payload, user), fields(user_id = user.id))]
pub async fn create_task(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<TaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let payload = payload.validate()?;
    ensure_owner(state.store.as_ref(), &user, Resource::Event, payload.event_id).await?;
    let task = state.store.create_task(user.id, &payload).await?;
    info!(task_id = task.id, event_id = task.event_id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_tasks(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(state.store.list_tasks_for_owner(user.id).await?))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_event_tasks(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(event_id): AppPath<i64>,
) -> Result<Json<Vec<Task>>, AppError> {
    Ok(Json(state.store.list_tasks_for_event(event_id, user.id).await?))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_task(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Task>, AppError> {
    let task = state.store.find_task(id, user.id).await?;
    Ok(Json(owned(Resource::Task, task)?))
}

#[instrument(skip(state, payload, user), fields(user_id = user.id))]
pub async fn update_task(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<TaskUpdate>,
) -> Result<Json<Task>, AppError> {
    ensure_owner(state.store.as_ref(), &user, Resource::Task, id).await?;
    let payload = payload.validate()?;
    let task = state.store.update_task(id, user.id, &payload).await?;
    let task = owned(Resource::Task, task)?;
    info!(task_id = id, "task updated");
    Ok(Json(task))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_task(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    ensure_owner(state.store.as_ref(), &user, Resource::Task, id).await?;
    affected(Resource::Task, state.store.delete_task(id, user.id).await?)?;
    info!(task_id = id, "task deleted");
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{ExpenseRequest, ExpenseUpdate},
    repo_types::Expense,
};
use crate::{
    auth::extractors::AuthUser,
    dto::MessageResponse,
    error::{AppError, AppJson, AppPath},
    ownership::{affected, ensure_owner, owned, Resource},
    state::AppState,
};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", post(create_expense).get(list_expenses))
        .route("/expenses/event/:event_id", get(list_event_expenses))
        .route(
            "/expenses/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}

#[instrument(skip(state, payload, user), fields(user_id = user.id))]
pub async fn create_expense(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<ExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let payload = payload.validate()?;
    ensure_owner(state.store.as_ref(), &user, Resource::Event, payload.event_id).await?;
    let expense = state.store.create_expense(user.id, &payload).await?;
    info!(expense_id = expense.id, event_id = expense.event_id, "expense recorded");
    Ok((StatusCode::CREATED, Json(expense)))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_expenses(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Expense>>, AppError> {
    Ok(Json(state.store.list_expenses_for_owner(user.id).await?))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn list_event_expenses(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(event_id): AppPath<i64>,
) -> Result<Json<Vec<Expense>>, AppError> {
    Ok(Json(
        state.store.list_expenses_for_event(event_id, user.id).await?,
    ))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_expense(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<Expense>, AppError> {
    let expense = state.store.find_expense(id, user.id).await?;
    Ok(Json(owned(Resource::Expense, expense)?))
}

#[instrument(skip(state, payload, user), fields(user_id = user.id))]
pub async fn update_expense(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
    AppJson(payload): AppJson<ExpenseUpdate>,
) -> Result<Json<Expense>, AppError> {
    ensure_owner(state.store.as_ref(), &user, Resource::Expense, id).await?;
    let payload = payload.validate()?;
    let expense = state.store.update_expense(id, user.id, &payload).await?;
    let expense = owned(Resource::Expense, expense)?;
    info!(expense_id = id, "expense updated");
    Ok(Json(expense))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_expense(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    ensure_owner(state.store.as_ref(), &user, Resource::Expense, id).await?;
    affected(Resource::Expense, state.store.delete_expense(id, user.id).await?)?;
    info!(expense_id = id, "expense deleted");
    Ok(Json(MessageResponse::new("Expense deleted successfully")))
}

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
    extractors::AuthUser,
    password::{hash_password, verify_password},
    services::{normalize_email, validate_registration},
};
use crate::{
    dto::MessageResponse,
    error::{AppError, AppJson},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(mut payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    validate_registration(&mut payload)?;

    let hash = hash_password(&payload.password).map_err(AppError::Internal)?;

    // A duplicate email is a unique violation here and is reported like any
    // other store failure.
    let user = state
        .store
        .create_user(&payload.name, &payload.email, &hash)
        .await?;

    info!(user_id = user.id, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = normalize_email(&payload.email);

    let Some(user) = state.store.find_user_by_email(&email).await? else {
        warn!("login unknown email");
        return Err(AppError::UserNotFound);
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(AppError::Internal)?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = state
        .jwt
        .sign(user.id, &user.email)
        .map_err(|e| AppError::Internal(e.into()))?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state, caller), fields(user_id = caller.id))]
pub async fn get_me(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = state
        .store
        .find_user_by_id(caller.id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = caller.id, "token for deleted user");
            AppError::InvalidToken
        })?;
    Ok(Json(user.into()))
}

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use shelfmark_accounts::{
    check_password_strength, verify_password, PasswordStrength, RegisterRequest, User,
    WEAK_PASSWORD_MESSAGE,
};
use shelfmark_database::AccountError;
use shelfmark_mailer::AccountEmail;

use crate::{util::require_bearer, ApiError, AppState};

pub const WRONG_PASSWORD_MESSAGE: &str = "Wrong password";
pub const INCORRECT_CURRENT_PASSWORD_MESSAGE: &str = "The current password entered is incorrect";

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteAccountPayload {
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmailParams {
    pub new_email: String,
    pub current_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordParams {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.accounts().list_users().await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    match state.accounts().get_user(user_id).await {
        Ok(user) => Ok(Json(user)),
        Err(AccountError::UserNotFound) => Err(ApiError::not_found(format!(
            "Could not find the user with ID {user_id}"
        ))),
        Err(other) => Err(other.into()),
    }
}

/// Register a new account and send the confirmation mail.
///
/// The account is kept even when the mail cannot be delivered; the delivery
/// failure is surfaced to the caller instead.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = RegisterRequest {
        email: payload.email,
        password: payload.password,
        display_name: payload.display_name,
    };
    let user = state.accounts().register(request).await?;

    state
        .mailer()
        .send(&user.email, user.salutation(), AccountEmail::Created)
        .await
        .map_err(|e| ApiError::from(AccountError::Notification(e.to_string())))?;

    Ok(Json(MessageResponse {
        message: "user created".to_string(),
    }))
}

pub async fn delete_current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<DeleteAccountPayload>,
) -> Result<StatusCode, ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.current_user(&token).await?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(ApiError::unauthorized(WRONG_PASSWORD_MESSAGE));
    }

    let deleted = state.accounts().delete_user_by_id(user.id).await?;

    // Unlike registration, a mail failure here is not caught.
    state
        .mailer()
        .send(&deleted.email, deleted.salutation(), AccountEmail::Deleted)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<UpdateEmailParams>,
) -> Result<Json<MessageResponse>, ApiError> {
    let token = require_bearer(&headers)?;
    let user = state.current_user(&token).await?;

    if !verify_password(&params.current_password, &user.password_hash)? {
        return Err(ApiError::unauthorized(INCORRECT_CURRENT_PASSWORD_MESSAGE));
    }

    state
        .accounts()
        .change_user_email(user.id, &params.new_email)
        .await?;

    // No notification mail is sent for an email change.
    Ok(Json(MessageResponse {
        message: "email updated".to_string(),
    }))
}

pub async fn update_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<UpdatePasswordParams>,
) -> Result<Json<bool>, ApiError> {
    // The strength gate comes before session or user resolution.
    if check_password_strength(&params.new_password) < PasswordStrength::Strong {
        return Err(ApiError::validation(vec![WEAK_PASSWORD_MESSAGE.to_string()]));
    }

    let token = require_bearer(&headers)?;
    let user = state.current_user(&token).await?;

    if !verify_password(&params.current_password, &user.password_hash)? {
        return Err(ApiError::unauthorized(INCORRECT_CURRENT_PASSWORD_MESSAGE));
    }

    state
        .accounts()
        .change_user_password(user.id, &params.new_password)
        .await?;

    state
        .mailer()
        .send(&user.email, user.salutation(), AccountEmail::PasswordChanged)
        .await?;

    Ok(Json(true))
}

use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use validator::{Validate, ValidationError};

use crate::constants::USER_DELETED_MESSAGE;
use crate::error::ServerError;
use crate::handlers::{UserId, ValidatedJson};
use crate::models::UserResponse;
use crate::server::State;

/// The JSON input for `POST /users/`
#[derive(Debug, Validate, Deserialize)]
pub(crate) struct NewUserInput {
    /// The provided display name.
    #[validate(custom = "not_blank")]
    pub(crate) name: String,
    /// The provided email.
    #[validate(email(message = "Must be a valid email address."))]
    pub(crate) email: String,
    /// The provided password, stored as given.
    #[validate(length(min = 1, message = "Must not be empty."))]
    pub(crate) password: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("Must not be empty."));
        return Err(error);
    }
    Ok(())
}

/// Lowercase the domain of an already validated address. The local part is kept as given.
fn normalize_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_owned(),
    }
}

/// The response output for `DELETE /users/:id`
#[derive(Debug, Serialize)]
pub(crate) struct DeletedResponse {
    pub(crate) detail: &'static str,
}

/// Handler for `POST /users/`
pub(crate) async fn create_user(
    state: Extension<Arc<State>>,
    ValidatedJson(input): ValidatedJson<NewUserInput>,
) -> Result<(StatusCode, Json<UserResponse>), ServerError> {
    let email = normalize_email(&input.email);
    let user = state
        .store
        .insert(&input.name, &email, &input.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Handler for `GET /users/`
pub(crate) async fn list_users(
    state: Extension<Arc<State>>,
) -> Result<Json<Vec<UserResponse>>, ServerError> {
    let users = state.store.list_all().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Handler for `GET /users/:id`
pub(crate) async fn get_user(
    UserId(id): UserId,
    state: Extension<Arc<State>>,
) -> Result<Json<UserResponse>, ServerError> {
    let user = state.store.find_by_id(id).await?;

    Ok(Json(user.into()))
}

/// Handler for `DELETE /users/:id`
pub(crate) async fn delete_user(
    UserId(id): UserId,
    state: Extension<Arc<State>>,
) -> Result<Json<DeletedResponse>, ServerError> {
    state.store.delete(id).await?;

    Ok(Json(DeletedResponse {
        detail: USER_DELETED_MESSAGE,
    }))
}

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::constants::{
    EMAIL_ALREADY_REGISTERED_MESSAGE, INTERNAL_SERVER_ERROR_MESSAGE, INVALID_INPUT_MESSAGE,
    USER_NOT_FOUND_MESSAGE,
};
use crate::store::StoreError;

/// Field name to the messages explaining why it was rejected.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub(crate) struct FieldErrors(pub(crate) BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub(crate) fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(field.to_owned(), vec![message.into()]);
        Self(errors)
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        write!(f, "{}", fields.join(", "))
    }
}

/// Any possible server errors
#[derive(Debug, Error)]
pub(crate) enum ServerError {
    #[error("invalid input: [{0}]")]
    InvalidInput(FieldErrors),

    #[error("email already registered")]
    EmailAlreadyRegistered,

    #[error("user not found")]
    UserNotFound,

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<validator::ValidationErrors> for ServerError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => e.code.to_string(),
                    })
                    .collect();
                (field.to_owned(), messages)
            })
            .collect();

        ServerError::InvalidInput(FieldErrors(fields))
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::InvalidInput(FieldErrors::single("body", rejection.body_text()))
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        ServerError::InvalidInput(FieldErrors::single("id", rejection.body_text()))
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateKey => ServerError::EmailAlreadyRegistered,
            StoreError::NotFound(_) => ServerError::UserNotFound,
            StoreError::Sqlx(e) => ServerError::Database(e),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match self {
            ServerError::InvalidInput(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": INVALID_INPUT_MESSAGE, "errors": errors })),
            ),
            ServerError::EmailAlreadyRegistered => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "detail": EMAIL_ALREADY_REGISTERED_MESSAGE })),
            ),
            ServerError::UserNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": USER_NOT_FOUND_MESSAGE })),
            ),
            ServerError::Database(e) => {
                tracing::error!("Sqlx error occurred: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": INTERNAL_SERVER_ERROR_MESSAGE })),
                )
            }
        }
        .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_outcomes_translate_to_client_errors() {
        assert!(matches!(
            ServerError::from(StoreError::DuplicateKey),
            ServerError::EmailAlreadyRegistered
        ));
        assert!(matches!(
            ServerError::from(StoreError::NotFound(7)),
            ServerError::UserNotFound
        ));
        assert!(matches!(
            ServerError::from(StoreError::Sqlx(sqlx::Error::PoolTimedOut)),
            ServerError::Database(_)
        ));
    }

    #[test]
    fn status_codes() {
        let cases = [
            (
                ServerError::InvalidInput(FieldErrors::single("email", "bad")),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (ServerError::EmailAlreadyRegistered, StatusCode::BAD_REQUEST),
            (ServerError::UserNotFound, StatusCode::NOT_FOUND),
            (
                ServerError::Database(sqlx::Error::PoolClosed),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}

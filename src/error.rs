use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::{seo::llm::LlmError, store::StoreError, validation::ValidationErrors};

/// Request-scoped failures surfaced by the services.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid fields")]
    Validation(ValidationErrors),

    #[error("This slug is already in use. Please choose a unique one.")]
    DuplicateSlug,

    #[error("A category with this name already exists.")]
    DuplicateCategory,

    #[error("Email already in use.")]
    DuplicateEmail,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Something went wrong")]
    Store(#[source] StoreError),

    #[error("Something went wrong")]
    Internal(#[from] anyhow::Error),

    #[error("SEO suggestions are unavailable right now")]
    SuggestionGeneration(#[source] LlmError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateSlug | AppError::DuplicateCategory | AppError::DuplicateEmail => {
                StatusCode::CONFLICT
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SuggestionGeneration(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Validation messages for `field`, if this is a validation error.
    pub fn field_messages(&self, field: &str) -> &[String] {
        match self {
            AppError::Validation(errors) => errors.messages(field),
            _ => &[],
        }
    }
}

/// Reads outside a specific write path only ever see `NotFound` or backend
/// failures; duplicates are mapped per entity by the mutation services.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("Record"),
            other => AppError::Store(other),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a ValidationErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Store(source) => error!(error = %source, "store failure"),
            AppError::Internal(source) => error!(error = %source, "internal failure"),
            AppError::SuggestionGeneration(source) => {
                error!(error = %source, "suggestion generation failed")
            }
            _ => {}
        }

        let fields = match &self {
            AppError::Validation(errors) => Some(errors),
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            status: status.as_u16(),
            fields,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            AppError::Validation(ValidationErrors::new()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::DuplicateSlug.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::DuplicateCategory.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::DuplicateEmail.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::NotFound("Blog").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::SuggestionGeneration(LlmError::MissingApiKey).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn store_not_found_maps_to_not_found() {
        let err: AppError = StoreError::NotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn backend_details_stay_out_of_the_message() {
        let err: AppError = StoreError::Backend(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.to_string(), "Something went wrong");
    }
}

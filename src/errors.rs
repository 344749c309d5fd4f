use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::repository::RepositoryError;
use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{message}")]
    Rejected {
        message: String,
        errors: ValidationErrors,
    },
    #[error("One or more validation errors occurred.")]
    Validation(ValidationErrors),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn company_not_found(id: Uuid) -> Self {
        Self::NotFound(format!(
            "The company with id: {} doesn't exist in the database.",
            id
        ))
    }

    pub fn employee_not_found(id: Uuid) -> Self {
        Self::NotFound(format!(
            "Employee with id: {} doesn't exist in the database.",
            id
        ))
    }

    pub fn id_parameters_missing() -> Self {
        Self::BadRequest("Parameter ids is null".into())
    }

    pub fn collection_by_ids_mismatch() -> Self {
        Self::BadRequest("Collection count mismatch comparing to ids.".into())
    }

    pub fn company_collection_missing() -> Self {
        Self::BadRequest("Company collection sent from client is null.".into())
    }

    pub fn max_age_range() -> Self {
        Self::BadRequest("Max age can't be less than min age.".into())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails<'a> {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<&'a ValidationErrors>,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Rejected { .. } => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let errors = match self {
            ApiError::Validation(errors) | ApiError::Rejected { errors, .. } => Some(errors),
            _ => None,
        };
        HttpResponse::build(status).json(ErrorDetails {
            status_code: status.as_u16(),
            message: self.to_string(),
            errors,
        })
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        error!("Repository failure: {}", e);
        ApiError::Internal
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(e: bcrypt::BcryptError) -> Self {
        error!("Failed to hash or verify password: {}", e);
        ApiError::Internal
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        error!("Failed to serialize response payload: {}", e);
        ApiError::Internal
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::error::ServiceError;
use log::error;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Machine readable code, e.g. `conflict`
    pub error: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Sign in to continue")]
    Unauthenticated,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("identity provider error: {0}")]
    BadGateway(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "validation",
            Self::Unauthenticated | Self::Unauthorized(_) => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::BadGateway(_) => "identity_provider",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            Self::Internal(_) => {
                error!("{self}");
                "Something went wrong, please try again".to_string()
            }
            Self::BadGateway(_) => {
                error!("{self}");
                "The identity provider could not be reached".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorBody {
            error: self.code(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(e) => Self::BadRequest(e.to_string()),
            ServiceError::Conflict(msg) => Self::Conflict(msg),
            ServiceError::NotFound(_) => Self::NotFound(capitalize(&err.to_string())),
            ServiceError::Unauthorized(msg) => Self::Unauthorized(msg),
            ServiceError::Forbidden(msg) => Self::Forbidden(msg),
            ServiceError::Database(_) | ServiceError::Internal(_) => Self::Internal(err.to_string()),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::validation::ValidationError;

    #[test]
    fn test_service_errors_map_to_status() {
        let cases = [
            (ServiceError::Conflict("taken".into()), StatusCode::CONFLICT),
            (ServiceError::NotFound("teacher"), StatusCode::NOT_FOUND),
            (
                ServiceError::Validation(ValidationError::CreditsOutOfRange(11)),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (ServiceError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiError::from(ServiceError::NotFound("teacher"));
        assert_eq!(err.to_string(), "Teacher not found");
    }
}

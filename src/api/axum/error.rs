use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::BlogError;
use crate::api::ApiResponse;

/// The `<resource>.<operation>` a response belongs to. It prefixes the
/// `translate` key of the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub resource: &'static str,
    pub operation: &'static str,
}

impl Scope {
    pub const fn new(resource: &'static str, operation: &'static str) -> Self {
        Self {
            resource,
            operation,
        }
    }

    pub fn translate(self, outcome: &str) -> String {
        format!("{}.{}.{}", self.resource, self.operation, outcome)
    }

    pub fn success_message(self) -> String {
        let done = match self.operation {
            "create" => "created",
            "get" | "list" => "retrieved",
            "update" => "updated",
            "delete" => "deleted",
            "login" => "logged in",
            "logout" => "logged out",
            other => other,
        };
        format!("{} successfully {done}", self.resource)
    }

    /// `map_err` adapter: `.map_err(USER_CREATE.err())`.
    pub fn err(self) -> impl Fn(BlogError) -> AppError + Copy {
        move |error| AppError::new(error, self)
    }
}

/// converts `BlogError` into a status code and an error envelope
#[derive(Debug)]
pub struct AppError {
    pub error: BlogError,
    pub scope: Scope,
}

impl AppError {
    pub fn new(error: BlogError, scope: Scope) -> Self {
        Self { error, scope }
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            BlogError::Validation(_) | BlogError::BadRequest(_) | BlogError::AlreadyExists(_) => {
                StatusCode::BAD_REQUEST
            }
            BlogError::TokenRequired
            | BlogError::TokenInvalid
            | BlogError::TokenExpired
            | BlogError::SessionMismatch
            | BlogError::SessionUnavailable(_)
            | BlogError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            BlogError::NotFound(_) => StatusCode::NOT_FOUND,
            BlogError::PasswordHashError
            | BlogError::Database(_)
            | BlogError::Cache(..)
            | BlogError::Serialization(_)
            | BlogError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn translate(&self) -> String {
        match &self.error {
            BlogError::InvalidCredentials => "email.or.password.not.found".to_owned(),
            e if e.is_unauthorized() => "unauthorized".to_owned(),
            BlogError::NotFound(kind) => format!("{kind}.not.found"),
            BlogError::Cache(op, _) => format!("{}.cache.{op}.error", self.scope.resource),
            _ => self.scope.translate("error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let translate = self.translate();

        let message = if status.is_server_error() {
            tracing::error!(error = %self.error, translate = %translate, "request failed");
            "internal server error".to_owned()
        } else {
            self.error.to_string()
        };

        (status, Json(ApiResponse::<()>::error(message, translate))).into_response()
    }
}

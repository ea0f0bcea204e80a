//! `SchoolSystemError` 到 HTTP 响应的统一转换
//!
//! 服务层返回的错误经 `?` 传播到 actix 后，由这里映射为状态码与统一响应体。

use crate::errors::SchoolSystemError;
use crate::models::{ApiResponse, ErrorCode};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};

impl SchoolSystemError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            SchoolSystemError::Validation(_) | SchoolSystemError::DateParse(_) => {
                StatusCode::BAD_REQUEST
            }
            SchoolSystemError::Authentication(_) => StatusCode::UNAUTHORIZED,
            SchoolSystemError::Authorization(_) => StatusCode::FORBIDDEN,
            SchoolSystemError::NotFound(_) => StatusCode::NOT_FOUND,
            SchoolSystemError::Conflict(_) => StatusCode::CONFLICT,
            err if err.is_unique_violation() => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn api_code(&self) -> ErrorCode {
        match self.http_status() {
            StatusCode::BAD_REQUEST => ErrorCode::BadRequest,
            StatusCode::UNAUTHORIZED => ErrorCode::Unauthorized,
            StatusCode::FORBIDDEN => ErrorCode::Forbidden,
            StatusCode::NOT_FOUND => ErrorCode::NotFound,
            StatusCode::CONFLICT => ErrorCode::Conflict,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 转换为响应，业务码可由调用方指定
    pub fn to_response_with(&self, code: ErrorCode) -> HttpResponse {
        let status = self.http_status();
        let message = if status.is_server_error() {
            tracing::error!("{}", self.format_simple());
            "Internal server error".to_string()
        } else {
            self.message().to_string()
        };
        HttpResponse::build(status).json(ApiResponse::error_empty(code, message))
    }
}

impl ResponseError for SchoolSystemError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        self.to_response_with(self.api_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            SchoolSystemError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SchoolSystemError::authentication("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            SchoolSystemError::authorization("x").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            SchoolSystemError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SchoolSystemError::database_operation("UNIQUE constraint failed: subjects.name")
                .http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            SchoolSystemError::database_operation("disk I/O error").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let response = SchoolSystemError::database_operation("secret table").error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

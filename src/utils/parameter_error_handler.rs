//! JSON / 查询参数 / 路径参数解析失败时的统一响应

use crate::models::{ApiResponse, ErrorCode};
use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, PathError, QueryPayloadError},
};

fn bad_request(message: String) -> actix_web::Error {
    tracing::debug!("Rejected request parameters: {}", message);
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::OverflowKnownLength { length, limit } => {
            format!("Payload too large: {length} bytes (limit {limit})")
        }
        JsonPayloadError::Overflow { limit } => format!("Payload too large (limit {limit})"),
        JsonPayloadError::Deserialize(e) => format!("Invalid JSON body: {e}"),
        _ => format!("Invalid JSON body: {err}"),
    };
    bad_request(message)
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    bad_request(format!("Invalid query parameters: {err}"))
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    bad_request(format!("Invalid path parameters: {err}"))
}

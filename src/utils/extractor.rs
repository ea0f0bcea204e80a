//! 路径参数提取器
//!
//! 路径中的 ID 必须是正整数，否则直接返回 400 与统一响应体，不进入业务逻辑。

/// 定义一个从路径参数中提取正整数 ID 的提取器
///
/// ```ignore
/// define_safe_i64_extractor!(SafeStudentId, "student_id");
/// ```
#[macro_export]
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl actix_web::FromRequest for $name {
            type Error = actix_web::Error;
            type Future = std::future::Ready<Result<Self, Self::Error>>;

            fn from_request(
                req: &actix_web::HttpRequest,
                _payload: &mut actix_web::dev::Payload,
            ) -> Self::Future {
                std::future::ready($crate::utils::extractor::parse_positive_id(req, $param).map($name))
            }
        }
    };
}

use crate::models::{ApiResponse, ErrorCode};
use actix_web::{HttpRequest, HttpResponse, error::InternalError};

/// 读取并校验路径参数
pub fn parse_positive_id(req: &HttpRequest, param: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(param).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let message = format!("Invalid path parameter '{param}': {raw}");
            let response = HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
            Err(InternalError::from_response(message, response).into())
        }
    }
}

define_safe_i64_extractor!(SafeIDI64, "id");
define_safe_i64_extractor!(SafeStudentIdI64, "student_id");

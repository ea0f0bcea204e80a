use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{UserService, user_not_found};
use crate::models::ApiResponse;

pub async fn get_user(
    service: &UserService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_user_by_id(user_id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            user,
            "User information retrieved successfully",
        ))),
        None => Ok(user_not_found()),
    }
}

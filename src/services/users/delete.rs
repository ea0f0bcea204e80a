use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, user_not_found};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn delete_user(
    service: &UserService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let operator = current_user(request)?;
    if operator.id == user_id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CannotDeleteSelf,
            "Cannot delete current user",
        )));
    }

    let storage = service.get_storage(request)?;

    if storage.delete_user(user_id).await? {
        info!("User {} deleted by {}", user_id, operator.id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
    } else {
        Ok(user_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, body_json, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_cannot_delete_self() {
        let (raw, shared) = storage().await;
        let me = admin(&shared).await;
        let request = request_as(me.clone());
        let service = UserService::with_storage(shared.clone());

        let resp = delete_user(&service, &request, me.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::CannotDeleteSelf as i32);

        let teacher = fixtures::teacher(&raw, "teacher01").await;
        let resp = delete_user(&service, &request, teacher.user_id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(shared.get_user_by_id(teacher.user_id).await.unwrap().is_none());
    }
}

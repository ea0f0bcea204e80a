use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TeacherService, teacher_not_found};
use crate::models::ApiResponse;

/// 删除教师档案与账号，所任班主任置空
pub async fn delete_teacher(
    service: &TeacherService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.delete_teacher(id).await? {
        info!("Teacher {} deleted", id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Teacher deleted successfully")))
    } else {
        Ok(teacher_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_delete_clears_homeroom() {
        let (raw, shared) = storage().await;
        let teacher = fixtures::teacher(&raw, "teacher01").await;
        let classroom = fixtures::classroom(&raw, 2025, 1, Some(teacher.id)).await;
        let request = request_as(admin(&shared).await);
        let service = TeacherService::with_storage(shared.clone());

        let resp = delete_teacher(&service, &request, teacher.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let classroom = shared
            .get_classroom_by_id(classroom.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(classroom.homeroom_teacher_id, None);
        assert!(shared.get_user_by_id(teacher.user_id).await.unwrap().is_none());

        let resp = delete_teacher(&service, &request, teacher.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

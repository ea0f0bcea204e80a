use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassroomStudentService;
use crate::models::{ApiResponse, classroom_students::responses::ClassroomStudentListResponse};
use crate::services::classrooms::classroom_not_found;

pub async fn list_classroom_students(
    service: &ClassroomStudentService,
    request: &HttpRequest,
    classroom_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.get_classroom_by_id(classroom_id).await?.is_none() {
        return Ok(classroom_not_found());
    }
    let items = storage.list_classroom_students(classroom_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassroomStudentListResponse {
            classroom_id,
            items,
        },
        "Classroom roster retrieved successfully",
    )))
}

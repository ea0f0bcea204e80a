use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassroomStudentService, entry_not_found};
use crate::errors::SchoolSystemError;
use crate::models::{
    ApiResponse, ErrorCode,
    classroom_students::requests::{AddClassroomStudentRequest, UpdateClassroomStudentRequest},
};
use crate::services::classrooms::classroom_not_found;
use crate::services::students::student_not_found;

fn validate_number(number: i32) -> Result<(), SchoolSystemError> {
    if number < 1 {
        return Err(SchoolSystemError::validation("Number must be at least 1"));
    }
    Ok(())
}

fn roster_conflict(message: &str) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::ClassroomStudentConflict,
        message,
    ))
}

pub async fn add_classroom_student(
    service: &ClassroomStudentService,
    request: &HttpRequest,
    classroom_id: i64,
    body: AddClassroomStudentRequest,
) -> ActixResult<HttpResponse> {
    if let Some(number) = body.number {
        validate_number(number)?;
    }

    let storage = service.get_storage(request)?;

    if storage.get_classroom_by_id(classroom_id).await?.is_none() {
        return Ok(classroom_not_found());
    }
    if storage.get_student_by_id(body.student_id).await?.is_none() {
        return Ok(student_not_found());
    }

    match storage
        .add_classroom_student(classroom_id, body.student_id, body.number)
        .await
    {
        Ok(entry) => {
            info!(
                "Student {} added to classroom {} as number {}",
                entry.student_id, classroom_id, entry.number
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                entry,
                "Student added to classroom",
            )))
        }
        Err(SchoolSystemError::Conflict(msg)) => Ok(roster_conflict(&msg)),
        Err(e) if e.is_unique_violation() => Ok(roster_conflict(
            "Student or number already exists in this classroom",
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn update_classroom_student(
    service: &ClassroomStudentService,
    request: &HttpRequest,
    classroom_id: i64,
    student_id: i64,
    body: UpdateClassroomStudentRequest,
) -> ActixResult<HttpResponse> {
    validate_number(body.number)?;

    let storage = service.get_storage(request)?;

    match storage
        .update_classroom_student_number(classroom_id, student_id, body.number)
        .await
    {
        Ok(Some(entry)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            entry,
            "Roll number updated",
        ))),
        Ok(None) => Ok(entry_not_found()),
        Err(e) if e.is_unique_violation() => Ok(roster_conflict(
            "Number already taken in this classroom",
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn remove_classroom_student(
    service: &ClassroomStudentService,
    request: &HttpRequest,
    classroom_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage
        .remove_classroom_student(classroom_id, student_id)
        .await?
    {
        info!("Student {} removed from classroom {}", student_id, classroom_id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Student removed from classroom",
        )))
    } else {
        Ok(entry_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, body_json, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_roster_numbers_and_conflicts() {
        let (raw, shared) = storage().await;
        let classroom = fixtures::classroom(&raw, 2025, 1, None).await;
        let other = fixtures::classroom(&raw, 2025, 2, None).await;
        let first = fixtures::student(&raw, "S001").await;
        let second = fixtures::student(&raw, "S002").await;
        let request = request_as(admin(&shared).await);
        let service = ClassroomStudentService::with_storage(shared.clone());

        let resp = add_classroom_student(
            &service,
            &request,
            classroom.id,
            AddClassroomStudentRequest {
                student_id: first.id,
                number: Some(5),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        // 缺省学号取最大值 + 1
        let resp = add_classroom_student(
            &service,
            &request,
            classroom.id,
            AddClassroomStudentRequest {
                student_id: second.id,
                number: None,
            },
        )
        .await
        .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["data"]["number"], 6);

        // 同一学年不能加入第二个班级
        let resp = add_classroom_student(
            &service,
            &request,
            other.id,
            AddClassroomStudentRequest {
                student_id: first.id,
                number: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = body_json(resp).await;
        assert_eq!(body["code"], ErrorCode::ClassroomStudentConflict as i32);

        // 学号重复
        let resp = update_classroom_student(
            &service,
            &request,
            classroom.id,
            second.id,
            UpdateClassroomStudentRequest { number: 5 },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = remove_classroom_student(&service, &request, classroom.id, first.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = remove_classroom_student(&service, &request, classroom.id, first.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

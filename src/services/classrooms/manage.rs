use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassroomService, classroom_not_found};
use crate::errors::{Result, SchoolSystemError};
use crate::models::{
    ApiResponse, ErrorCode,
    classrooms::requests::{CreateClassroomRequest, UpdateClassroomRequest},
};
use crate::utils::validate::{validate_grade, validate_school_year};

fn validate_class_number(class_number: i32) -> Result<()> {
    if class_number < 1 {
        return Err(SchoolSystemError::validation("Class number must be at least 1"));
    }
    Ok(())
}

fn classroom_conflict() -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(
        ErrorCode::ClassroomAlreadyExists,
        "Classroom already exists for this year, grade and number",
    ))
}

fn teacher_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::TeacherNotFound,
        "Homeroom teacher not found",
    ))
}

pub async fn create_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    body: CreateClassroomRequest,
) -> ActixResult<HttpResponse> {
    validate_school_year(body.year).map_err(SchoolSystemError::validation)?;
    validate_grade(body.grade).map_err(SchoolSystemError::validation)?;
    validate_class_number(body.class_number)?;

    let storage = service.get_storage(request)?;

    if let Some(teacher_id) = body.homeroom_teacher_id
        && storage.get_teacher_by_id(teacher_id).await?.is_none()
    {
        return Ok(teacher_not_found());
    }

    match storage.create_classroom(body).await {
        Ok(classroom) => {
            info!(
                "Classroom {}-{} ({}) created",
                classroom.grade, classroom.class_number, classroom.year
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                classroom,
                "Classroom created successfully",
            )))
        }
        Err(e) if e.is_unique_violation() => Ok(classroom_conflict()),
        Err(e) => Err(e.into()),
    }
}

pub async fn update_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    id: i64,
    body: UpdateClassroomRequest,
) -> ActixResult<HttpResponse> {
    if let Some(year) = body.year {
        validate_school_year(year).map_err(SchoolSystemError::validation)?;
    }
    if let Some(grade) = body.grade {
        validate_grade(grade).map_err(SchoolSystemError::validation)?;
    }
    if let Some(class_number) = body.class_number {
        validate_class_number(class_number)?;
    }

    let storage = service.get_storage(request)?;

    if let Some(Some(teacher_id)) = body.homeroom_teacher_id
        && storage.get_teacher_by_id(teacher_id).await?.is_none()
    {
        return Ok(teacher_not_found());
    }

    match storage.update_classroom(id, body).await {
        Ok(Some(classroom)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            classroom,
            "Classroom updated successfully",
        ))),
        Ok(None) => Ok(classroom_not_found()),
        Err(e) if e.is_unique_violation() => Ok(classroom_conflict()),
        Err(e) => Err(e.into()),
    }
}

/// 删除班级，名单随之删除，学生档案保留
pub async fn delete_classroom(
    service: &ClassroomService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if storage.delete_classroom(id).await? {
        info!("Classroom {} deleted", id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Classroom deleted successfully")))
    } else {
        Ok(classroom_not_found())
    }
}

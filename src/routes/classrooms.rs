use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classroom_students::requests::{
    AddClassroomStudentRequest, UpdateClassroomStudentRequest,
};
use crate::models::classrooms::requests::{
    ClassroomListParams, CreateClassroomRequest, UpdateClassroomRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{ClassroomService, ClassroomStudentService};
use crate::utils::{SafeIDI64, SafeStudentIdI64};

use super::exports;

static CLASSROOM_SERVICE: Lazy<ClassroomService> = Lazy::new(ClassroomService::new_lazy);
static CLASSROOM_STUDENT_SERVICE: Lazy<ClassroomStudentService> =
    Lazy::new(ClassroomStudentService::new_lazy);

pub async fn list_classrooms(
    req: HttpRequest,
    query: web::Query<ClassroomListParams>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .list_classrooms(&req, query.into_inner())
        .await
}

pub async fn get_classroom(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.get_classroom(&req, path.0).await
}

pub async fn create_classroom(
    req: HttpRequest,
    body: web::Json<CreateClassroomRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .create_classroom(&req, body.into_inner())
        .await
}

pub async fn update_classroom(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateClassroomRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE
        .update_classroom(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_classroom(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASSROOM_SERVICE.delete_classroom(&req, path.0).await
}

// 班级名单

pub async fn list_classroom_students(
    req: HttpRequest,
    path: SafeIDI64,
) -> ActixResult<HttpResponse> {
    CLASSROOM_STUDENT_SERVICE
        .list_classroom_students(&req, path.0)
        .await
}

pub async fn add_classroom_student(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<AddClassroomStudentRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_STUDENT_SERVICE
        .add_classroom_student(&req, path.0, body.into_inner())
        .await
}

pub async fn update_classroom_student(
    req: HttpRequest,
    path: SafeIDI64,
    student: SafeStudentIdI64,
    body: web::Json<UpdateClassroomStudentRequest>,
) -> ActixResult<HttpResponse> {
    CLASSROOM_STUDENT_SERVICE
        .update_classroom_student(&req, path.0, student.0, body.into_inner())
        .await
}

pub async fn remove_classroom_student(
    req: HttpRequest,
    path: SafeIDI64,
    student: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    CLASSROOM_STUDENT_SERVICE
        .remove_classroom_student(&req, path.0, student.0)
        .await
}

pub fn configure_classroom_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classrooms")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_classrooms))
                    .route(
                        web::post()
                            .to(create_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_classroom))
                    .route(
                        web::put()
                            .to(update_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_classroom)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            // 名单修改仅限管理员或该班班主任
            .service(
                web::resource("/{id}/students")
                    .route(web::get().to(list_classroom_students))
                    .route(
                        web::post()
                            .to(add_classroom_student)
                            .wrap(middlewares::RequireHomeroom),
                    ),
            )
            .service(
                web::resource("/{id}/students/{student_id}")
                    .wrap(middlewares::RequireHomeroom)
                    .route(web::put().to(update_classroom_student))
                    .route(web::delete().to(remove_classroom_student)),
            )
            .configure(exports::configure_classroom_export_routes),
    );
}

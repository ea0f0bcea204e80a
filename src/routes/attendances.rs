use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendances::requests::{
    AttendanceListParams, AttendanceSummaryParams, CreateAttendanceRequest,
    UpdateAttendanceRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::SafeIDI64;

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn list_attendances(
    req: HttpRequest,
    query: web::Query<AttendanceListParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_attendances(&req, query.into_inner())
        .await
}

pub async fn attendance_summary(
    req: HttpRequest,
    query: web::Query<AttendanceSummaryParams>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .attendance_summary(&req, query.into_inner())
        .await
}

pub async fn get_attendance(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.get_attendance(&req, path.0).await
}

pub async fn create_attendance(
    req: HttpRequest,
    body: web::Json<CreateAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .create_attendance(&req, body.into_inner())
        .await
}

pub async fn update_attendance(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .update_attendance(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_attendance(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.delete_attendance(&req, path.0).await
}

pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendances")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_attendances))
            .route("", web::post().to(create_attendance))
            // 必须在 /{id} 之前注册
            .route("/summary", web::get().to(attendance_summary))
            .route("/{id}", web::get().to(get_attendance))
            .route("/{id}", web::put().to(update_attendance))
            .route("/{id}", web::delete().to(delete_attendance)),
    );
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::exports::requests::{ClassroomScoreExportParams, ReportExportParams};
use crate::services::ExportService;
use crate::utils::SafeIDI64;

static EXPORT_SERVICE: Lazy<ExportService> = Lazy::new(ExportService::new_lazy);

pub async fn export_roster(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    EXPORT_SERVICE.export_roster(&req, path.0).await
}

pub async fn export_classroom_scores(
    req: HttpRequest,
    path: SafeIDI64,
    query: web::Query<ClassroomScoreExportParams>,
) -> ActixResult<HttpResponse> {
    EXPORT_SERVICE
        .export_classroom_scores(&req, path.0, query.into_inner())
        .await
}

pub async fn export_report(
    req: HttpRequest,
    path: SafeIDI64,
    query: web::Query<ReportExportParams>,
) -> ActixResult<HttpResponse> {
    EXPORT_SERVICE
        .export_report(&req, path.0, query.into_inner())
        .await
}

/// 挂在 `/api/v1/classrooms` 作用域内
pub fn configure_classroom_export_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{id}/export/roster")
            .wrap(middlewares::RateLimit::export())
            .route(web::get().to(export_roster)),
    )
    .service(
        web::resource("/{id}/export/scores")
            .wrap(middlewares::RateLimit::export())
            .route(web::get().to(export_classroom_scores)),
    );
}

/// 挂在 `/api/v1/students` 作用域内
pub fn configure_student_export_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{id}/export/report")
            .wrap(middlewares::RateLimit::export())
            .route(web::get().to(export_report)),
    );
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::counsels::requests::{
    CounselListParams, CreateCounselRequest, UpdateCounselRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CounselService;
use crate::utils::SafeIDI64;

static COUNSEL_SERVICE: Lazy<CounselService> = Lazy::new(CounselService::new_lazy);

pub async fn list_counsels(
    req: HttpRequest,
    query: web::Query<CounselListParams>,
) -> ActixResult<HttpResponse> {
    COUNSEL_SERVICE.list_counsels(&req, query.into_inner()).await
}

pub async fn get_counsel(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    COUNSEL_SERVICE.get_counsel(&req, path.0).await
}

pub async fn create_counsel(
    req: HttpRequest,
    body: web::Json<CreateCounselRequest>,
) -> ActixResult<HttpResponse> {
    COUNSEL_SERVICE.create_counsel(&req, body.into_inner()).await
}

pub async fn update_counsel(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateCounselRequest>,
) -> ActixResult<HttpResponse> {
    COUNSEL_SERVICE
        .update_counsel(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_counsel(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    COUNSEL_SERVICE.delete_counsel(&req, path.0).await
}

pub fn configure_counsel_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/counsels")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_counsels))
            .route("", web::post().to(create_counsel))
            .route("/{id}", web::get().to(get_counsel))
            .route("/{id}", web::put().to(update_counsel))
            .route("/{id}", web::delete().to(delete_counsel)),
    );
}

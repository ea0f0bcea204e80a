use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::behaviors::requests::{
    BehaviorListParams, CreateBehaviorRequest, UpdateBehaviorRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::BehaviorService;
use crate::utils::SafeIDI64;

static BEHAVIOR_SERVICE: Lazy<BehaviorService> = Lazy::new(BehaviorService::new_lazy);

pub async fn list_behaviors(
    req: HttpRequest,
    query: web::Query<BehaviorListParams>,
) -> ActixResult<HttpResponse> {
    BEHAVIOR_SERVICE
        .list_behaviors(&req, query.into_inner())
        .await
}

pub async fn get_behavior(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    BEHAVIOR_SERVICE.get_behavior(&req, path.0).await
}

pub async fn create_behavior(
    req: HttpRequest,
    body: web::Json<CreateBehaviorRequest>,
) -> ActixResult<HttpResponse> {
    BEHAVIOR_SERVICE
        .create_behavior(&req, body.into_inner())
        .await
}

pub async fn update_behavior(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateBehaviorRequest>,
) -> ActixResult<HttpResponse> {
    BEHAVIOR_SERVICE
        .update_behavior(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_behavior(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    BEHAVIOR_SERVICE.delete_behavior(&req, path.0).await
}

pub fn configure_behavior_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/behaviors")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_behaviors))
            .route("", web::post().to(create_behavior))
            .route("/{id}", web::get().to(get_behavior))
            .route("/{id}", web::put().to(update_behavior))
            .route("/{id}", web::delete().to(delete_behavior)),
    );
}

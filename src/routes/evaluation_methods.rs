use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::evaluation_methods::requests::{
    CreateEvaluationMethodRequest, EvaluationMethodListParams, UpdateEvaluationMethodRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::EvaluationMethodService;
use crate::utils::SafeIDI64;

static EVALUATION_METHOD_SERVICE: Lazy<EvaluationMethodService> =
    Lazy::new(EvaluationMethodService::new_lazy);

pub async fn list_evaluation_methods(
    req: HttpRequest,
    query: web::Query<EvaluationMethodListParams>,
) -> ActixResult<HttpResponse> {
    EVALUATION_METHOD_SERVICE
        .list_evaluation_methods(&req, query.into_inner())
        .await
}

pub async fn get_evaluation_method(
    req: HttpRequest,
    path: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_METHOD_SERVICE
        .get_evaluation_method(&req, path.0)
        .await
}

pub async fn create_evaluation_method(
    req: HttpRequest,
    body: web::Json<CreateEvaluationMethodRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_METHOD_SERVICE
        .create_evaluation_method(&req, body.into_inner())
        .await
}

pub async fn update_evaluation_method(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateEvaluationMethodRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_METHOD_SERVICE
        .update_evaluation_method(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_evaluation_method(
    req: HttpRequest,
    path: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EVALUATION_METHOD_SERVICE
        .delete_evaluation_method(&req, path.0)
        .await
}

pub fn configure_evaluation_method_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluation-methods")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_evaluation_methods))
            .route("", web::post().to(create_evaluation_method))
            .route("/{id}", web::get().to(get_evaluation_method))
            .route("/{id}", web::put().to(update_evaluation_method))
            .route("/{id}", web::delete().to(delete_evaluation_method)),
    );
}

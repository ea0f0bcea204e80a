use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::score_summaries::requests::{RecalculateRequest, ScoreSummaryListParams};
use crate::models::scores::requests::{BatchScoreRequest, ScoreListParams, UpsertScoreRequest};
use crate::models::users::entities::UserRole;
use crate::services::{ScoreService, ScoreSummaryService};
use crate::utils::SafeIDI64;

static SCORE_SERVICE: Lazy<ScoreService> = Lazy::new(ScoreService::new_lazy);
static SCORE_SUMMARY_SERVICE: Lazy<ScoreSummaryService> =
    Lazy::new(ScoreSummaryService::new_lazy);

pub async fn list_scores(
    req: HttpRequest,
    query: web::Query<ScoreListParams>,
) -> ActixResult<HttpResponse> {
    SCORE_SERVICE.list_scores(&req, query.into_inner()).await
}

pub async fn upsert_score(
    req: HttpRequest,
    body: web::Json<UpsertScoreRequest>,
) -> ActixResult<HttpResponse> {
    SCORE_SERVICE.upsert_score(&req, body.into_inner()).await
}

pub async fn batch_upsert_scores(
    req: HttpRequest,
    body: web::Json<BatchScoreRequest>,
) -> ActixResult<HttpResponse> {
    SCORE_SERVICE
        .batch_upsert_scores(&req, body.into_inner())
        .await
}

pub async fn delete_score(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SCORE_SERVICE.delete_score(&req, path.0).await
}

pub async fn list_score_summaries(
    req: HttpRequest,
    query: web::Query<ScoreSummaryListParams>,
) -> ActixResult<HttpResponse> {
    SCORE_SUMMARY_SERVICE
        .list_score_summaries(&req, query.into_inner())
        .await
}

pub async fn recalculate(
    req: HttpRequest,
    body: web::Json<RecalculateRequest>,
) -> ActixResult<HttpResponse> {
    SCORE_SUMMARY_SERVICE
        .recalculate(&req, body.into_inner())
        .await
}

pub fn configure_score_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/scores")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_scores))
            .route("", web::put().to(upsert_score))
            .route("/batch", web::put().to(batch_upsert_scores))
            .route("/{id}", web::delete().to(delete_score)),
    )
    .service(
        web::scope("/api/v1/score-summaries")
            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_score_summaries))
            .route("/recalculate", web::post().to(recalculate)),
    );
}

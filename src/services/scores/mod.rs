pub mod delete;
pub mod list;
pub mod upsert;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::scores::requests::{BatchScoreRequest, ScoreListParams, UpsertScoreRequest};

crate::services::define_service!(
    /// 成绩录入与查询，每次写入后同步重算汇总
    ScoreService
);

impl ScoreService {
    pub async fn list_scores(
        &self,
        request: &HttpRequest,
        query: ScoreListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_scores(self, request, query).await
    }

    pub async fn upsert_score(
        &self,
        request: &HttpRequest,
        body: UpsertScoreRequest,
    ) -> ActixResult<HttpResponse> {
        upsert::upsert_score(self, request, body).await
    }

    pub async fn batch_upsert_scores(
        &self,
        request: &HttpRequest,
        body: BatchScoreRequest,
    ) -> ActixResult<HttpResponse> {
        upsert::batch_upsert_scores(self, request, body).await
    }

    pub async fn delete_score(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        delete::delete_score(self, request, id).await
    }
}

pub mod calculate;
pub mod list;
pub mod lock;
pub mod recalculate;

pub use lock::lock_scope;
pub use recalculate::recalculate_scope;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::score_summaries::requests::{RecalculateRequest, ScoreSummaryListParams};

crate::services::define_service!(
    /// 成绩汇总：查询与手动重算
    ScoreSummaryService
);

impl ScoreSummaryService {
    pub async fn list_score_summaries(
        &self,
        request: &HttpRequest,
        query: ScoreSummaryListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_score_summaries(self, request, query).await
    }

    pub async fn recalculate(
        &self,
        request: &HttpRequest,
        body: RecalculateRequest,
    ) -> ActixResult<HttpResponse> {
        recalculate::handle_recalculate(self, request, body).await
    }
}

use super::entities::Score;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/score.ts")]
pub struct ScoreListResponse {
    pub items: Vec<Score>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/score.ts")]
pub struct BatchScoreResponse {
    pub evaluation_method_id: i64,
    pub items: Vec<Score>,
}

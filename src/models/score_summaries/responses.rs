use super::entities::ScoreSummary;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/score_summary.ts")]
pub struct ScoreSummaryListResponse {
    pub items: Vec<ScoreSummary>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/score_summary.ts")]
pub struct RecalculateResponse {
    pub student_count: i32,
    pub items: Vec<ScoreSummary>,
}

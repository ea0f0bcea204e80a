use super::entities::EvaluationMethod;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/evaluation_method.ts")]
pub struct EvaluationMethodListResponse {
    pub items: Vec<EvaluationMethod>,
    pub pagination: PaginationInfo,
}

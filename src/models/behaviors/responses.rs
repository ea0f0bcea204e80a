use super::entities::Behavior;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/behavior.ts")]
pub struct BehaviorListResponse {
    pub items: Vec<Behavior>,
    pub pagination: PaginationInfo,
}

use super::entities::Counsel;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "bindings/counsel.ts")]
pub struct CounselListResponse {
    pub items: Vec<Counsel>,
    pub pagination: PaginationInfo,
}

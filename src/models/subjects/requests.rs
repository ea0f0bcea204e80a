use crate::models::common::{PaginationQuery, deserialize_nullable};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/subject.ts")]
pub struct SubjectListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/subject.ts")]
pub struct CreateSubjectRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "bindings/subject.ts")]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional)]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct SubjectListQuery {
    pub page: u64,
    pub size: u64,
    pub search: Option<String>,
}

impl From<SubjectListParams> for SubjectListQuery {
    fn from(params: SubjectListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            search: params.search,
        }
    }
}

use super::entities::ExamType;
use crate::models::common::{PaginationQuery, deserialize_optional_from_str};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/evaluation_method.ts")]
pub struct EvaluationMethodListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub semester: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub grade: Option<i32>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/evaluation_method.ts")]
pub struct CreateEvaluationMethodRequest {
    pub subject_id: i64,
    pub year: i32,
    pub semester: i32,
    pub grade: i32,
    pub exam_type: ExamType,
    pub title: String,
    pub weight: f64,
    pub full_score: f64,
}

// 范围字段（科目/学年/学期/年级）创建后不可修改
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "bindings/evaluation_method.ts")]
pub struct UpdateEvaluationMethodRequest {
    pub exam_type: Option<ExamType>,
    pub title: Option<String>,
    pub weight: Option<f64>,
    pub full_score: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationMethodListQuery {
    pub page: u64,
    pub size: u64,
    pub subject_id: Option<i64>,
    pub year: Option<i32>,
    pub semester: Option<i32>,
    pub grade: Option<i32>,
}

impl From<EvaluationMethodListParams> for EvaluationMethodListQuery {
    fn from(params: EvaluationMethodListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            subject_id: params.subject_id,
            year: params.year,
            semester: params.semester,
            grade: params.grade,
        }
    }
}

use crate::models::common::{PaginationQuery, deserialize_nullable, deserialize_optional_from_str};
use serde::Deserialize;
use ts_rs::TS;

// 教师查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/teacher.ts")]
pub struct TeacherListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub subject_id: Option<i64>,
}

// 创建教师请求：同时创建登录账号（角色固定为 teacher）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/teacher.ts")]
pub struct CreateTeacherRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub subject_id: Option<i64>,
}

// 更新教师请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "bindings/teacher.ts")]
pub struct UpdateTeacherRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional)]
    pub subject_id: Option<Option<i64>>,
}

// 教师列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct TeacherListQuery {
    pub page: u64,
    pub size: u64,
    pub search: Option<String>,
    pub subject_id: Option<i64>,
}

impl From<TeacherListParams> for TeacherListQuery {
    fn from(params: TeacherListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            search: params.search,
            subject_id: params.subject_id,
        }
    }
}

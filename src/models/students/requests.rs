use super::entities::Gender;
use crate::models::common::{PaginationQuery, deserialize_nullable};
use serde::Deserialize;
use ts_rs::TS;

// 学生查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    // 按姓名或学号搜索
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/student.ts")]
pub struct CreateStudentRequest {
    pub student_number: String,
    pub name: String,
    pub gender: Gender,
    pub birth_date: Option<chrono::NaiveDate>,
    pub phone: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
}

// 更新学生请求，显式 null 表示清空可选字段
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "bindings/student.ts")]
pub struct UpdateStudentRequest {
    pub student_number: Option<String>,
    pub name: Option<String>,
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional)]
    pub birth_date: Option<Option<chrono::NaiveDate>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional)]
    pub guardian_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional)]
    pub guardian_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[ts(optional)]
    pub address: Option<Option<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: u64,
    pub size: u64,
    pub search: Option<String>,
}

impl From<StudentListParams> for StudentListQuery {
    fn from(params: StudentListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            search: params.search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_parses_birth_date() {
        let req: CreateStudentRequest = serde_json::from_str(
            r#"{"student_number":"20250101","name":"Kim Minji","gender":"female","birth_date":"2012-03-15"}"#,
        )
        .unwrap();
        assert_eq!(req.gender, Gender::Female);
        assert_eq!(
            req.birth_date,
            chrono::NaiveDate::from_ymd_opt(2012, 3, 15)
        );
        assert!(req.phone.is_none());
    }

    #[test]
    fn test_update_request_distinguishes_null() {
        let req: UpdateStudentRequest =
            serde_json::from_str(r#"{"phone":null,"name":"Lee"}"#).unwrap();
        assert_eq!(req.phone, Some(None));
        assert_eq!(req.address, None);
        assert_eq!(req.name.as_deref(), Some("Lee"));
    }
}

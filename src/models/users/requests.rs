use super::entities::{UserRole, UserStatus};
use crate::models::common::{PaginationQuery, deserialize_optional_from_str};
use serde::Deserialize;
use ts_rs::TS;

// 账号查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub role: Option<UserRole>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

// 账号创建请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

// 账号更新请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "bindings/user.ts")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

// 账号列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub page: u64,
    pub size: u64,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

impl From<UserListParams> for UserListQuery {
    fn from(params: UserListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            role: params.role,
            status: params.status,
            search: params.search,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Query;

    #[test]
    fn test_list_params_parse_filters() {
        let params = Query::<UserListParams>::from_query("page=2&size=500&role=teacher&status=active")
            .unwrap()
            .into_inner();
        let query = UserListQuery::from(params);
        assert_eq!(query.page, 2);
        assert_eq!(query.size, 100);
        assert_eq!(query.role, Some(UserRole::Teacher));
        assert_eq!(query.status, Some(UserStatus::Active));
    }

    #[test]
    fn test_list_params_reject_unknown_role() {
        assert!(Query::<UserListParams>::from_query("role=student").is_err());
    }
}

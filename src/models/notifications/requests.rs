use crate::models::common::{PaginationQuery, deserialize_optional_from_str};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/notification.ts")]
pub struct NotificationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub unread_only: Option<bool>,
}

/// 发送公告
///
/// 接收人为 `user_ids` 与 `classroom_id` 班主任的并集，至少指定一项。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/notification.ts")]
pub struct CreateNotificationRequest {
    #[serde(default)]
    pub user_ids: Vec<i64>,
    pub classroom_id: Option<i64>,
    pub title: String,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationListQuery {
    pub page: u64,
    pub size: u64,
    pub unread_only: bool,
}

impl From<NotificationListParams> for NotificationListQuery {
    fn from(params: NotificationListParams) -> Self {
        let (page, size) = params.pagination.normalized();
        Self {
            page,
            size,
            unread_only: params.unread_only.unwrap_or(false),
        }
    }
}

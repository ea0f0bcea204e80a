use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 通知类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/notification.ts")]
pub enum NotificationType {
    Announcement,   // 公告
    CounselCreated, // 新咨询记录
    ScoreUpdated,   // 成绩变更
    System,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NotificationType::Announcement => "announcement",
            NotificationType::CounselCreated => "counsel_created",
            NotificationType::ScoreUpdated => "score_updated",
            NotificationType::System => "system",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "announcement" => Ok(NotificationType::Announcement),
            "counsel_created" => Ok(NotificationType::CounselCreated),
            "score_updated" => Ok(NotificationType::ScoreUpdated),
            "system" => Ok(NotificationType::System),
            _ => Err(format!("Invalid notification type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/notification.ts")]
pub struct Notification {
    pub id: i64,
    // 接收人（账号ID）
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    // 关联对象，例如 ("counsel", 12)
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 待写入的通知（存储层入参）
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
}

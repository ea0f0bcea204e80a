use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教师档案，附带登录账号的用户名与邮箱
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/teacher.ts")]
pub struct Teacher {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub phone: Option<String>,
    // 担任科目
    pub subject_id: Option<i64>,
    pub username: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

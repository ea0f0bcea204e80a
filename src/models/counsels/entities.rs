use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 咨询类别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/counsel.ts")]
pub enum CounselCategory {
    Academic, // 学业
    Career,   // 升学就业
    Personal, // 个人
    Family,   // 家庭
    Behavior, // 行为
    Other,
}

impl std::fmt::Display for CounselCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CounselCategory::Academic => "academic",
            CounselCategory::Career => "career",
            CounselCategory::Personal => "personal",
            CounselCategory::Family => "family",
            CounselCategory::Behavior => "behavior",
            CounselCategory::Other => "other",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for CounselCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "academic" => Ok(CounselCategory::Academic),
            "career" => Ok(CounselCategory::Career),
            "personal" => Ok(CounselCategory::Personal),
            "family" => Ok(CounselCategory::Family),
            "behavior" => Ok(CounselCategory::Behavior),
            "other" => Ok(CounselCategory::Other),
            _ => Err(format!("Invalid counsel category: {s}")),
        }
    }
}

/// 咨询记录
///
/// `is_shared = false` 时仅撰写教师本人与管理员可见。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/counsel.ts")]
pub struct Counsel {
    pub id: i64,
    pub student_id: i64,
    // 撰写教师（教师档案ID）
    pub teacher_id: i64,
    pub counsel_date: chrono::NaiveDate,
    pub category: CounselCategory,
    pub content: String,
    // 后续计划
    pub next_plan: Option<String>,
    pub next_counsel_date: Option<chrono::NaiveDate>,
    pub is_shared: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

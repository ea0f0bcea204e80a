use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 成就等级
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, TS)]
#[ts(export, export_to = "bindings/score_summary.ts")]
pub enum AchievementLevel {
    A,
    B,
    C,
    D,
    E,
}

impl std::fmt::Display for AchievementLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AchievementLevel::A => "A",
            AchievementLevel::B => "B",
            AchievementLevel::C => "C",
            AchievementLevel::D => "D",
            AchievementLevel::E => "E",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for AchievementLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(AchievementLevel::A),
            "B" => Ok(AchievementLevel::B),
            "C" => Ok(AchievementLevel::C),
            "D" => Ok(AchievementLevel::D),
            "E" => Ok(AchievementLevel::E),
            _ => Err(format!("Invalid achievement level: {s}")),
        }
    }
}

/// 学生在某科目某学期的成绩汇总
///
/// 由成绩写入时同步重算，不接受直接修改。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/score_summary.ts")]
pub struct ScoreSummary {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub year: i32,
    pub semester: i32,
    pub grade: i32,
    // 折算总分
    pub total_score: f64,
    // 科目平均分
    pub subject_average: f64,
    // 总体标准差
    pub standard_deviation: f64,
    // 名次（并列同名次）
    pub rank: i32,
    // 参与排名人数
    pub student_count: i32,
    // 等级 1..=9
    pub grade_band: i32,
    pub achievement_level: AchievementLevel,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 重算得到的一行汇总，尚未落库
#[derive(Debug, Clone, PartialEq)]
pub struct NewScoreSummary {
    pub student_id: i64,
    pub total_score: f64,
    pub subject_average: f64,
    pub standard_deviation: f64,
    pub rank: i32,
    pub student_count: i32,
    pub grade_band: i32,
    pub achievement_level: AchievementLevel,
}

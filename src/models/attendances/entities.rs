use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 出勤类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/attendance.ts")]
pub enum AttendanceType {
    Absence,    // 缺席
    Tardy,      // 迟到
    EarlyLeave, // 早退
    Skipped,    // 缺课
}

impl std::fmt::Display for AttendanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceType::Absence => write!(f, "absence"),
            AttendanceType::Tardy => write!(f, "tardy"),
            AttendanceType::EarlyLeave => write!(f, "early_leave"),
            AttendanceType::Skipped => write!(f, "skipped"),
        }
    }
}

impl std::str::FromStr for AttendanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absence" => Ok(AttendanceType::Absence),
            "tardy" => Ok(AttendanceType::Tardy),
            "early_leave" => Ok(AttendanceType::EarlyLeave),
            "skipped" => Ok(AttendanceType::Skipped),
            _ => Err(format!("Invalid attendance type: {s}")),
        }
    }
}

// 事由
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/attendance.ts")]
pub enum AttendanceReason {
    Illness,      // 病假
    Authorized,   // 事假（已批准）
    Unauthorized, // 无故
    Other,
}

impl std::fmt::Display for AttendanceReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceReason::Illness => write!(f, "illness"),
            AttendanceReason::Authorized => write!(f, "authorized"),
            AttendanceReason::Unauthorized => write!(f, "unauthorized"),
            AttendanceReason::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for AttendanceReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "illness" => Ok(AttendanceReason::Illness),
            "authorized" => Ok(AttendanceReason::Authorized),
            "unauthorized" => Ok(AttendanceReason::Unauthorized),
            "other" => Ok(AttendanceReason::Other),
            _ => Err(format!("Invalid attendance reason: {s}")),
        }
    }
}

// 出勤记录，每名学生每天至多一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/attendance.ts")]
pub struct Attendance {
    pub id: i64,
    pub student_id: i64,
    pub date: chrono::NaiveDate,
    pub attendance_type: AttendanceType,
    pub reason: AttendanceReason,
    pub note: Option<String>,
    // 记录人（账号ID）
    pub recorded_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 按类型计数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/attendance.ts")]
pub struct AttendanceTypeCounts {
    pub absence: i64,
    pub tardy: i64,
    pub early_leave: i64,
    pub skipped: i64,
}

// 按事由计数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/attendance.ts")]
pub struct AttendanceReasonCounts {
    pub illness: i64,
    pub authorized: i64,
    pub unauthorized: i64,
    pub other: i64,
}

// 出勤汇总
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/attendance.ts")]
pub struct AttendanceSummary {
    pub student_id: i64,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
    pub total: i64,
    pub by_type: AttendanceTypeCounts,
    pub by_reason: AttendanceReasonCounts,
}

impl AttendanceSummary {
    /// 从出勤记录累计汇总
    pub fn tally(
        student_id: i64,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
        records: &[Attendance],
    ) -> Self {
        let mut by_type = AttendanceTypeCounts::default();
        let mut by_reason = AttendanceReasonCounts::default();

        for record in records {
            match record.attendance_type {
                AttendanceType::Absence => by_type.absence += 1,
                AttendanceType::Tardy => by_type.tardy += 1,
                AttendanceType::EarlyLeave => by_type.early_leave += 1,
                AttendanceType::Skipped => by_type.skipped += 1,
            }
            match record.reason {
                AttendanceReason::Illness => by_reason.illness += 1,
                AttendanceReason::Authorized => by_reason.authorized += 1,
                AttendanceReason::Unauthorized => by_reason.unauthorized += 1,
                AttendanceReason::Other => by_reason.other += 1,
            }
        }

        Self {
            student_id,
            from,
            to,
            total: records.len() as i64,
            by_type,
            by_reason,
        }
    }
}

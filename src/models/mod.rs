//! 数据模型定义
//!
//! 每个业务模块按 `entities`（业务实体）/ `requests`（请求参数）/ `responses`（响应体）拆分。

pub mod attendances;
pub mod auth;
pub mod behaviors;
pub mod classroom_students;
pub mod classrooms;
pub mod common;
pub mod counsels;
pub mod evaluation_methods;
pub mod exports;
pub mod notifications;
pub mod score_summaries;
pub mod scores;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 业务错误码
///
/// 0 表示成功；1xxx 为通用错误；2xxx 起按业务模块分段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    UserInactive = 2001,
    PasswordPolicyViolation = 2002,

    // 账号
    UserNotFound = 2100,
    UserAlreadyExists = 2101,
    CannotDeleteSelf = 2102,

    // 教师
    TeacherNotFound = 2200,
    TeacherPermissionDenied = 2201,

    // 学生
    StudentNotFound = 2300,
    StudentAlreadyExists = 2301,

    // 班级
    ClassroomNotFound = 2400,
    ClassroomAlreadyExists = 2401,
    ClassroomPermissionDenied = 2402,

    // 班级名单
    ClassroomStudentNotFound = 2500,
    ClassroomStudentConflict = 2501,

    // 科目
    SubjectNotFound = 2600,
    SubjectAlreadyExists = 2601,

    // 评价方式
    EvaluationMethodNotFound = 2700,
    EvaluationMethodAlreadyExists = 2701,
    EvaluationWeightExceeded = 2702,

    // 成绩
    ScoreNotFound = 2800,
    ScoreOutOfRange = 2801,
    ScoreGradeConflict = 2802,

    // 出勤
    AttendanceNotFound = 2900,
    AttendanceAlreadyRecorded = 2901,

    // 行为 / 咨询记录
    BehaviorNotFound = 3000,
    CounselNotFound = 3100,
    RecordPermissionDenied = 3101,

    // 通知
    NotificationNotFound = 3200,

    // 导出
    ExportFailed = 3300,
}

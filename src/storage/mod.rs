use crate::models::{
    attendances::{
        entities::Attendance,
        requests::{AttendanceListQuery, CreateAttendanceRequest, UpdateAttendanceRequest},
        responses::AttendanceListResponse,
    },
    behaviors::{
        entities::Behavior,
        requests::{BehaviorListQuery, CreateBehaviorRequest, UpdateBehaviorRequest},
        responses::BehaviorListResponse,
    },
    classroom_students::entities::ClassroomStudent,
    classrooms::{
        entities::Classroom,
        requests::{ClassroomListQuery, CreateClassroomRequest, UpdateClassroomRequest},
        responses::ClassroomListResponse,
    },
    counsels::{
        entities::Counsel,
        requests::{CounselListQuery, CreateCounselRequest, UpdateCounselRequest},
        responses::CounselListResponse,
    },
    evaluation_methods::{
        entities::{EvaluationMethod, EvaluationScope, MethodWrite},
        requests::{
            CreateEvaluationMethodRequest, EvaluationMethodListQuery, UpdateEvaluationMethodRequest,
        },
        responses::EvaluationMethodListResponse,
    },
    notifications::{
        entities::{NewNotification, Notification},
        requests::NotificationListQuery,
        responses::NotificationListResponse,
    },
    score_summaries::{
        entities::{NewScoreSummary, ScoreSummary},
        requests::ScoreSummaryListQuery,
        responses::ScoreSummaryListResponse,
    },
    scores::{
        entities::{Score, ScoreWrite},
        requests::ScoreListQuery,
        responses::ScoreListResponse,
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
        responses::SubjectListResponse,
    },
    teachers::{
        entities::Teacher,
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::TeacherListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use std::sync::Arc;

use crate::errors::Result;

pub mod sea_orm_storage;

/// 由一个范围内的评价方式和成绩算出全部学生汇总
///
/// 汇总写入与触发它的成绩或评价方式写入处于同一事务，
/// 存储层在事务内读取数据后调用该函数。
pub type ScopeAggregator = fn(&[EvaluationMethod], &[Score]) -> Vec<NewScoreSummary>;

/// 存储抽象
///
/// 涉及密码的请求在进入存储层之前已完成哈希，`password` 字段保存的是哈希值。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 账号管理方法
    // 创建账号
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取账号
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取账号
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取账号
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取账号
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出账号
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新账号
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除账号
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 更新（或清除）推送设备令牌
    async fn update_device_token(&self, id: i64, token: Option<String>) -> Result<bool>;
    // 账号总数
    async fn count_users(&self) -> Result<u64>;

    /// 教师管理方法
    // 在同一事务中创建账号与教师档案
    async fn create_teacher(&self, teacher: CreateTeacherRequest) -> Result<Teacher>;
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>>;
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse>;
    async fn update_teacher(&self, id: i64, update: UpdateTeacherRequest)
    -> Result<Option<Teacher>>;
    // 删除教师档案及其账号，班主任引用置空
    async fn delete_teacher(&self, id: i64) -> Result<bool>;

    /// 学生管理方法
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn update_student(&self, id: i64, update: UpdateStudentRequest)
    -> Result<Option<Student>>;
    async fn delete_student(&self, id: i64) -> Result<bool>;

    /// 班级管理方法
    async fn create_classroom(&self, classroom: CreateClassroomRequest) -> Result<Classroom>;
    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>>;
    async fn list_classrooms_with_pagination(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse>;
    async fn update_classroom(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>>;
    async fn delete_classroom(&self, id: i64) -> Result<bool>;
    // 学生在某学年所在的班级；year 为 None 时取最近学年
    async fn get_classroom_of_student(
        &self,
        student_id: i64,
        year: Option<i32>,
    ) -> Result<Option<Classroom>>;

    /// 班级名单方法
    // 按出勤号排序
    async fn list_classroom_students(&self, classroom_id: i64) -> Result<Vec<ClassroomStudent>>;
    async fn get_classroom_student(
        &self,
        classroom_id: i64,
        student_id: i64,
    ) -> Result<Option<ClassroomStudent>>;
    // number 为 None 时取当前最大号 + 1
    async fn add_classroom_student(
        &self,
        classroom_id: i64,
        student_id: i64,
        number: Option<i32>,
    ) -> Result<ClassroomStudent>;
    async fn update_classroom_student_number(
        &self,
        classroom_id: i64,
        student_id: i64,
        number: i32,
    ) -> Result<Option<ClassroomStudent>>;
    async fn remove_classroom_student(&self, classroom_id: i64, student_id: i64) -> Result<bool>;

    /// 科目管理方法
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse>;
    async fn list_all_subjects(&self) -> Result<Vec<Subject>>;
    async fn update_subject(&self, id: i64, update: UpdateSubjectRequest)
    -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;

    /// 评价方式方法
    // 写入操作都在一个事务中完成权重校验与汇总刷新
    async fn create_evaluation_method(
        &self,
        method: CreateEvaluationMethodRequest,
        aggregate: ScopeAggregator,
    ) -> Result<MethodWrite>;
    async fn get_evaluation_method_by_id(&self, id: i64) -> Result<Option<EvaluationMethod>>;
    async fn list_evaluation_methods_with_pagination(
        &self,
        query: EvaluationMethodListQuery,
    ) -> Result<EvaluationMethodListResponse>;
    // 权重或满分变化时同一事务内重算折算分
    async fn update_evaluation_method(
        &self,
        id: i64,
        update: UpdateEvaluationMethodRequest,
        aggregate: ScopeAggregator,
    ) -> Result<MethodWrite>;
    // 删除评价方式及其全部成绩
    async fn delete_evaluation_method(&self, id: i64, aggregate: ScopeAggregator)
    -> Result<bool>;

    /// 成绩方法
    async fn get_score_by_id(&self, id: i64) -> Result<Option<Score>>;
    async fn list_scores_with_pagination(&self, query: ScoreListQuery)
    -> Result<ScoreListResponse>;
    // 在一个事务中写入 (student_id, raw_score) 并刷新汇总，已存在则覆盖
    async fn save_scores(
        &self,
        method_id: i64,
        entries: &[(i64, f64)],
        aggregate: ScopeAggregator,
    ) -> Result<ScoreWrite>;
    async fn delete_score(&self, id: i64, aggregate: ScopeAggregator) -> Result<bool>;
    // 学生某学期的成绩及对应评价方式
    async fn list_student_scores(
        &self,
        student_id: i64,
        year: i32,
        semester: i32,
    ) -> Result<Vec<(EvaluationMethod, Score)>>;

    /// 成绩汇总方法
    // 重算整个范围的汇总并整体替换
    async fn summarize_scope(
        &self,
        scope: EvaluationScope,
        aggregate: ScopeAggregator,
    ) -> Result<Vec<ScoreSummary>>;
    async fn list_score_summaries_with_pagination(
        &self,
        query: ScoreSummaryListQuery,
    ) -> Result<ScoreSummaryListResponse>;
    // 学生在某学期的全部科目汇总
    async fn list_student_score_summaries(
        &self,
        student_id: i64,
        year: i32,
        semester: i32,
    ) -> Result<Vec<ScoreSummary>>;

    /// 出勤方法
    async fn create_attendance(
        &self,
        attendance: CreateAttendanceRequest,
        recorded_by: i64,
    ) -> Result<Attendance>;
    async fn get_attendance_by_id(&self, id: i64) -> Result<Option<Attendance>>;
    async fn list_attendances_with_pagination(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse>;
    // 学生在日期区间内的全部出勤记录（闭区间）
    async fn list_student_attendances(
        &self,
        student_id: i64,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> Result<Vec<Attendance>>;
    async fn update_attendance(
        &self,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<Attendance>>;
    async fn delete_attendance(&self, id: i64) -> Result<bool>;

    /// 行为记录方法
    async fn create_behavior(
        &self,
        behavior: CreateBehaviorRequest,
        written_by: i64,
    ) -> Result<Behavior>;
    async fn get_behavior_by_id(&self, id: i64) -> Result<Option<Behavior>>;
    async fn list_behaviors_with_pagination(
        &self,
        query: BehaviorListQuery,
    ) -> Result<BehaviorListResponse>;
    async fn update_behavior(
        &self,
        id: i64,
        update: UpdateBehaviorRequest,
    ) -> Result<Option<Behavior>>;
    async fn delete_behavior(&self, id: i64) -> Result<bool>;

    /// 咨询记录方法
    async fn create_counsel(&self, counsel: CreateCounselRequest, teacher_id: i64)
    -> Result<Counsel>;
    async fn get_counsel_by_id(&self, id: i64) -> Result<Option<Counsel>>;
    async fn list_counsels_with_pagination(
        &self,
        query: CounselListQuery,
    ) -> Result<CounselListResponse>;
    async fn update_counsel(&self, id: i64, update: UpdateCounselRequest)
    -> Result<Option<Counsel>>;
    async fn delete_counsel(&self, id: i64) -> Result<bool>;

    /// 通知方法
    async fn create_notifications(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<Vec<Notification>>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse>;
    async fn count_unread_notifications(&self, user_id: i64) -> Result<i64>;
    // 仅接收人本人可操作，返回是否命中
    async fn mark_notification_read(&self, user_id: i64, id: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<i64>;
    async fn delete_notification(&self, user_id: i64, id: i64) -> Result<bool>;
}

/// 按配置连接数据库并完成迁移
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

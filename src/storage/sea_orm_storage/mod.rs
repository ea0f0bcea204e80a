//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendances;
mod behaviors;
mod classroom_students;
mod classrooms;
mod counsels;
mod evaluation_methods;
#[cfg(test)]
pub(crate) mod fixtures;
mod notifications;
mod score_summaries;
mod scores;
mod students;
mod subjects;
mod teachers;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolSystemError};
use crate::models::PaginationInfo;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Select,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| {
                SchoolSystemError::database_connection(format!("SQLite 连接失败: {e}"))
            })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 分页查询，page 从 1 开始
    pub(crate) async fn fetch_page<E>(
        &self,
        select: Select<E>,
        page: u64,
        size: u64,
    ) -> Result<(Vec<E::Model>, PaginationInfo)>
    where
        E: EntityTrait,
        E::Model: Send + Sync,
    {
        let page = page.max(1);
        let size = size.max(1);
        let paginator = select.paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询列表失败: {e}")))?;

        Ok((
            items,
            PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        ))
    }

    /// 内存 SQLite，跑真实迁移，供存储层测试使用
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .expect("connect in-memory sqlite");
        Migrator::up(&db, None).await.expect("run migrations");
        Self { db }
    }
}

// Storage trait 实现
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
        entities::ScoreSummary,
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
use crate::storage::{ScopeAggregator, Storage};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 账号模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn update_device_token(&self, id: i64, token: Option<String>) -> Result<bool> {
        self.update_device_token_impl(id, token).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 教师模块
    async fn create_teacher(&self, teacher: CreateTeacherRequest) -> Result<Teacher> {
        self.create_teacher_impl(teacher).await
    }

    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_id_impl(id).await
    }

    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_user_id_impl(user_id).await
    }

    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        self.list_teachers_with_pagination_impl(query).await
    }

    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        self.update_teacher_impl(id, update).await
    }

    async fn delete_teacher(&self, id: i64) -> Result<bool> {
        self.delete_teacher_impl(id).await
    }

    // 学生模块
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    // 班级模块
    async fn create_classroom(&self, classroom: CreateClassroomRequest) -> Result<Classroom> {
        self.create_classroom_impl(classroom).await
    }

    async fn get_classroom_by_id(&self, id: i64) -> Result<Option<Classroom>> {
        self.get_classroom_by_id_impl(id).await
    }

    async fn list_classrooms_with_pagination(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        self.list_classrooms_with_pagination_impl(query).await
    }

    async fn update_classroom(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>> {
        self.update_classroom_impl(id, update).await
    }

    async fn delete_classroom(&self, id: i64) -> Result<bool> {
        self.delete_classroom_impl(id).await
    }

    async fn get_classroom_of_student(
        &self,
        student_id: i64,
        year: Option<i32>,
    ) -> Result<Option<Classroom>> {
        self.get_classroom_of_student_impl(student_id, year).await
    }

    // 班级名单模块
    async fn list_classroom_students(&self, classroom_id: i64) -> Result<Vec<ClassroomStudent>> {
        self.list_classroom_students_impl(classroom_id).await
    }

    async fn get_classroom_student(
        &self,
        classroom_id: i64,
        student_id: i64,
    ) -> Result<Option<ClassroomStudent>> {
        self.get_classroom_student_impl(classroom_id, student_id)
            .await
    }

    async fn add_classroom_student(
        &self,
        classroom_id: i64,
        student_id: i64,
        number: Option<i32>,
    ) -> Result<ClassroomStudent> {
        self.add_classroom_student_impl(classroom_id, student_id, number)
            .await
    }

    async fn update_classroom_student_number(
        &self,
        classroom_id: i64,
        student_id: i64,
        number: i32,
    ) -> Result<Option<ClassroomStudent>> {
        self.update_classroom_student_number_impl(classroom_id, student_id, number)
            .await
    }

    async fn remove_classroom_student(&self, classroom_id: i64, student_id: i64) -> Result<bool> {
        self.remove_classroom_student_impl(classroom_id, student_id)
            .await
    }

    // 科目模块
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse> {
        self.list_subjects_with_pagination_impl(query).await
    }

    async fn list_all_subjects(&self) -> Result<Vec<Subject>> {
        self.list_all_subjects_impl().await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    // 评价方式模块
    async fn create_evaluation_method(
        &self,
        method: CreateEvaluationMethodRequest,
        aggregate: ScopeAggregator,
    ) -> Result<MethodWrite> {
        self.create_evaluation_method_impl(method, aggregate).await
    }

    async fn get_evaluation_method_by_id(&self, id: i64) -> Result<Option<EvaluationMethod>> {
        self.get_evaluation_method_by_id_impl(id).await
    }

    async fn list_evaluation_methods_with_pagination(
        &self,
        query: EvaluationMethodListQuery,
    ) -> Result<EvaluationMethodListResponse> {
        self.list_evaluation_methods_with_pagination_impl(query)
            .await
    }

    async fn update_evaluation_method(
        &self,
        id: i64,
        update: UpdateEvaluationMethodRequest,
        aggregate: ScopeAggregator,
    ) -> Result<MethodWrite> {
        self.update_evaluation_method_impl(id, update, aggregate)
            .await
    }

    async fn delete_evaluation_method(
        &self,
        id: i64,
        aggregate: ScopeAggregator,
    ) -> Result<bool> {
        self.delete_evaluation_method_impl(id, aggregate).await
    }

    // 成绩模块
    async fn get_score_by_id(&self, id: i64) -> Result<Option<Score>> {
        self.get_score_by_id_impl(id).await
    }

    async fn list_scores_with_pagination(
        &self,
        query: ScoreListQuery,
    ) -> Result<ScoreListResponse> {
        self.list_scores_with_pagination_impl(query).await
    }

    async fn save_scores(
        &self,
        method_id: i64,
        entries: &[(i64, f64)],
        aggregate: ScopeAggregator,
    ) -> Result<ScoreWrite> {
        self.save_scores_impl(method_id, entries, aggregate).await
    }

    async fn delete_score(&self, id: i64, aggregate: ScopeAggregator) -> Result<bool> {
        self.delete_score_impl(id, aggregate).await
    }

    async fn list_student_scores(
        &self,
        student_id: i64,
        year: i32,
        semester: i32,
    ) -> Result<Vec<(EvaluationMethod, Score)>> {
        self.list_student_scores_impl(student_id, year, semester)
            .await
    }

    // 成绩汇总模块
    async fn summarize_scope(
        &self,
        scope: EvaluationScope,
        aggregate: ScopeAggregator,
    ) -> Result<Vec<ScoreSummary>> {
        self.summarize_scope_impl(scope, aggregate).await
    }

    async fn list_score_summaries_with_pagination(
        &self,
        query: ScoreSummaryListQuery,
    ) -> Result<ScoreSummaryListResponse> {
        self.list_score_summaries_with_pagination_impl(query).await
    }

    async fn list_student_score_summaries(
        &self,
        student_id: i64,
        year: i32,
        semester: i32,
    ) -> Result<Vec<ScoreSummary>> {
        self.list_student_score_summaries_impl(student_id, year, semester)
            .await
    }

    // 出勤模块
    async fn create_attendance(
        &self,
        attendance: CreateAttendanceRequest,
        recorded_by: i64,
    ) -> Result<Attendance> {
        self.create_attendance_impl(attendance, recorded_by).await
    }

    async fn get_attendance_by_id(&self, id: i64) -> Result<Option<Attendance>> {
        self.get_attendance_by_id_impl(id).await
    }

    async fn list_attendances_with_pagination(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        self.list_attendances_with_pagination_impl(query).await
    }

    async fn list_student_attendances(
        &self,
        student_id: i64,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> Result<Vec<Attendance>> {
        self.list_student_attendances_impl(student_id, from, to)
            .await
    }

    async fn update_attendance(
        &self,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<Attendance>> {
        self.update_attendance_impl(id, update).await
    }

    async fn delete_attendance(&self, id: i64) -> Result<bool> {
        self.delete_attendance_impl(id).await
    }

    // 行为记录模块
    async fn create_behavior(
        &self,
        behavior: CreateBehaviorRequest,
        written_by: i64,
    ) -> Result<Behavior> {
        self.create_behavior_impl(behavior, written_by).await
    }

    async fn get_behavior_by_id(&self, id: i64) -> Result<Option<Behavior>> {
        self.get_behavior_by_id_impl(id).await
    }

    async fn list_behaviors_with_pagination(
        &self,
        query: BehaviorListQuery,
    ) -> Result<BehaviorListResponse> {
        self.list_behaviors_with_pagination_impl(query).await
    }

    async fn update_behavior(
        &self,
        id: i64,
        update: UpdateBehaviorRequest,
    ) -> Result<Option<Behavior>> {
        self.update_behavior_impl(id, update).await
    }

    async fn delete_behavior(&self, id: i64) -> Result<bool> {
        self.delete_behavior_impl(id).await
    }

    // 咨询记录模块
    async fn create_counsel(
        &self,
        counsel: CreateCounselRequest,
        teacher_id: i64,
    ) -> Result<Counsel> {
        self.create_counsel_impl(counsel, teacher_id).await
    }

    async fn get_counsel_by_id(&self, id: i64) -> Result<Option<Counsel>> {
        self.get_counsel_by_id_impl(id).await
    }

    async fn list_counsels_with_pagination(
        &self,
        query: CounselListQuery,
    ) -> Result<CounselListResponse> {
        self.list_counsels_with_pagination_impl(query).await
    }

    async fn update_counsel(
        &self,
        id: i64,
        update: UpdateCounselRequest,
    ) -> Result<Option<Counsel>> {
        self.update_counsel_impl(id, update).await
    }

    async fn delete_counsel(&self, id: i64) -> Result<bool> {
        self.delete_counsel_impl(id).await
    }

    // 通知模块
    async fn create_notifications(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<Vec<Notification>> {
        self.create_notifications_impl(notifications).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, query)
            .await
    }

    async fn count_unread_notifications(&self, user_id: i64) -> Result<i64> {
        self.count_unread_notifications_impl(user_id).await
    }

    async fn mark_notification_read(&self, user_id: i64, id: i64) -> Result<bool> {
        self.mark_notification_read_impl(user_id, id).await
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<i64> {
        self.mark_all_notifications_read_impl(user_id).await
    }

    async fn delete_notification(&self, user_id: i64, id: i64) -> Result<bool> {
        self.delete_notification_impl(user_id, id).await
    }
}

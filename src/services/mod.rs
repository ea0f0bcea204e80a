//! 业务逻辑层
//!
//! 每个服务是路由层的懒加载单例，存储从 actix app data 中获取；
//! 测试中可用 `with_storage` 直接注入。

pub mod attendances;
pub mod auth;
pub mod behaviors;
pub mod classroom_students;
pub mod classrooms;
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

pub use attendances::AttendanceService;
pub use auth::AuthService;
pub use behaviors::BehaviorService;
pub use classroom_students::ClassroomStudentService;
pub use classrooms::ClassroomService;
pub use counsels::CounselService;
pub use evaluation_methods::EvaluationMethodService;
pub use exports::ExportService;
pub use notifications::NotificationService;
pub use score_summaries::ScoreSummaryService;
pub use scores::ScoreService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use teachers::TeacherService;
pub use users::UserService;

use actix_web::{HttpRequest, web};
use std::sync::Arc;

use crate::errors::{Result, SchoolSystemError};
use crate::middlewares::RequireJWT;
use crate::models::teachers::entities::Teacher;
use crate::models::users::entities::User;
use crate::storage::Storage;

/// 定义服务单例的公共部分
macro_rules! define_service {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            storage: Option<std::sync::Arc<dyn $crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            #[cfg(test)]
            pub fn with_storage(storage: std::sync::Arc<dyn $crate::storage::Storage>) -> Self {
                Self {
                    storage: Some(storage),
                }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> $crate::errors::Result<std::sync::Arc<dyn $crate::storage::Storage>> {
                match &self.storage {
                    Some(storage) => Ok(storage.clone()),
                    None => $crate::services::storage_from_request(request),
                }
            }
        }
    };
}
pub(crate) use define_service;

pub(crate) fn storage_from_request(request: &HttpRequest) -> Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| SchoolSystemError::database_config("Storage not found in app data"))
}

/// 当前登录账号
pub(crate) fn current_user(request: &HttpRequest) -> Result<User> {
    RequireJWT::extract_user_claims(request)
        .ok_or_else(|| SchoolSystemError::authentication("Unauthorized: missing user"))
}

/// 当前账号对应的教师档案（管理员通常没有）
pub(crate) async fn current_teacher(
    storage: &Arc<dyn Storage>,
    user: &User,
) -> Result<Option<Teacher>> {
    storage.get_teacher_by_user_id(user.id).await
}

pub mod attendances;
pub mod auth;
pub mod behaviors;
pub mod classrooms;
pub mod counsels;
pub mod evaluation_methods;
pub mod exports;
pub mod notifications;
pub mod scores;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;

pub use attendances::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use behaviors::configure_behavior_routes;
pub use classrooms::configure_classroom_routes;
pub use counsels::configure_counsel_routes;
pub use evaluation_methods::configure_evaluation_method_routes;
pub use notifications::configure_notification_routes;
pub use scores::configure_score_routes;
pub use students::configure_student_routes;
pub use subjects::configure_subject_routes;
pub use teachers::configure_teacher_routes;
pub use users::configure_user_routes;

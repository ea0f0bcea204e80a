//! SeaORM 实体定义
//!
//! 实体与 models 模块中的业务实体分离：
//! Storage 层用实体完成 CRUD，再转换为 models 中的业务实体返回。

pub mod prelude;

pub mod attendances;
pub mod behaviors;
pub mod classroom_students;
pub mod classrooms;
pub mod counsels;
pub mod evaluation_methods;
pub mod notifications;
pub mod score_summaries;
pub mod scores;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod users;

//! 预导入模块，方便使用

pub use super::attendances::{
    ActiveModel as AttendanceActiveModel, Entity as Attendances, Model as AttendanceModel,
};
pub use super::behaviors::{
    ActiveModel as BehaviorActiveModel, Entity as Behaviors, Model as BehaviorModel,
};
pub use super::classroom_students::{
    ActiveModel as ClassroomStudentActiveModel, Entity as ClassroomStudents,
    Model as ClassroomStudentModel,
};
pub use super::classrooms::{
    ActiveModel as ClassroomActiveModel, Entity as Classrooms, Model as ClassroomModel,
};
pub use super::counsels::{
    ActiveModel as CounselActiveModel, Entity as Counsels, Model as CounselModel,
};
pub use super::evaluation_methods::{
    ActiveModel as EvaluationMethodActiveModel, Entity as EvaluationMethods,
    Model as EvaluationMethodModel,
};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::score_summaries::{
    ActiveModel as ScoreSummaryActiveModel, Entity as ScoreSummaries, Model as ScoreSummaryModel,
};
pub use super::scores::{ActiveModel as ScoreActiveModel, Entity as Scores, Model as ScoreModel};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};

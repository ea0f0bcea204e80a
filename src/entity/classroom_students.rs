//! 班级名单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classroom_students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub classroom_id: i64,
    pub student_id: i64,
    pub number: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classrooms::Entity",
        from = "Column::ClassroomId",
        to = "super::classrooms::Column::Id"
    )]
    Classroom,
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::classrooms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classroom.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_classroom_student(
        self,
        student: super::students::Model,
    ) -> crate::models::classroom_students::entities::ClassroomStudent {
        use crate::models::classroom_students::entities::ClassroomStudent;
        use chrono::{DateTime, Utc};

        ClassroomStudent {
            id: self.id,
            classroom_id: self.classroom_id,
            student_id: self.student_id,
            number: self.number,
            student: student.into_student(),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}

//! 班级实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classrooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub year: i32,
    pub grade: i32,
    pub class_number: i32,
    pub homeroom_teacher_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::HomeroomTeacherId",
        to = "super::teachers::Column::Id"
    )]
    HomeroomTeacher,
    #[sea_orm(has_many = "super::classroom_students::Entity")]
    ClassroomStudents,
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HomeroomTeacher.def()
    }
}

impl Related<super::classroom_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassroomStudents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_classroom(self, student_count: i64) -> crate::models::classrooms::entities::Classroom {
        use crate::models::classrooms::entities::Classroom;
        use chrono::{DateTime, Utc};

        Classroom {
            id: self.id,
            year: self.year,
            grade: self.grade,
            class_number: self.class_number,
            homeroom_teacher_id: self.homeroom_teacher_id,
            student_count,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub student_number: String,
    pub name: String,
    pub gender: String,
    pub birth_date: Option<chrono::NaiveDate>,
    pub phone: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::classroom_students::Entity")]
    ClassroomStudents,
    #[sea_orm(has_many = "super::scores::Entity")]
    Scores,
    #[sea_orm(has_many = "super::attendances::Entity")]
    Attendances,
}

impl Related<super::classroom_students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassroomStudents.def()
    }
}

impl Related<super::scores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scores.def()
    }
}

impl Related<super::attendances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use crate::models::students::entities::{Gender, Student};
        use chrono::{DateTime, Utc};

        Student {
            id: self.id,
            student_number: self.student_number,
            name: self.name,
            gender: self.gender.parse::<Gender>().unwrap_or(Gender::Male),
            birth_date: self.birth_date,
            phone: self.phone,
            guardian_name: self.guardian_name,
            guardian_phone: self.guardian_phone,
            address: self.address,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

//! 咨询记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "counsels")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub teacher_id: i64,
    pub counsel_date: chrono::NaiveDate,
    pub category: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub next_plan: Option<String>,
    pub next_counsel_date: Option<chrono::NaiveDate>,
    pub is_shared: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id"
    )]
    Teacher,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_counsel(self) -> crate::models::counsels::entities::Counsel {
        use crate::models::counsels::entities::{Counsel, CounselCategory};
        use chrono::{DateTime, Utc};

        Counsel {
            id: self.id,
            student_id: self.student_id,
            teacher_id: self.teacher_id,
            counsel_date: self.counsel_date,
            category: self
                .category
                .parse::<CounselCategory>()
                .unwrap_or(CounselCategory::Other),
            content: self.content,
            next_plan: self.next_plan,
            next_counsel_date: self.next_counsel_date,
            is_shared: self.is_shared,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

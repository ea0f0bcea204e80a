//! 评价方式实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluation_methods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub subject_id: i64,
    pub year: i32,
    pub semester: i32,
    pub grade: i32,
    pub exam_type: String,
    pub title: String,
    pub weight: f64,
    pub full_score: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
    #[sea_orm(has_many = "super::scores::Entity")]
    Scores,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::scores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation_method(
        self,
    ) -> crate::models::evaluation_methods::entities::EvaluationMethod {
        use crate::models::evaluation_methods::entities::{EvaluationMethod, ExamType};
        use chrono::{DateTime, Utc};

        EvaluationMethod {
            id: self.id,
            subject_id: self.subject_id,
            year: self.year,
            semester: self.semester,
            grade: self.grade,
            exam_type: self
                .exam_type
                .parse::<ExamType>()
                .unwrap_or(ExamType::Written),
            title: self.title,
            weight: self.weight,
            full_score: self.full_score,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

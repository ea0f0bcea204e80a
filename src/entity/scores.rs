//! 成绩实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub evaluation_method_id: i64,
    pub raw_score: f64,
    pub weighted_score: f64,
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
        belongs_to = "super::evaluation_methods::Entity",
        from = "Column::EvaluationMethodId",
        to = "super::evaluation_methods::Column::Id"
    )]
    EvaluationMethod,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::evaluation_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EvaluationMethod.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_score(self) -> crate::models::scores::entities::Score {
        use crate::models::scores::entities::Score;
        use chrono::{DateTime, Utc};

        Score {
            id: self.id,
            student_id: self.student_id,
            evaluation_method_id: self.evaluation_method_id,
            raw_score: self.raw_score,
            weighted_score: self.weighted_score,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

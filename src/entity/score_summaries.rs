//! 成绩汇总实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "score_summaries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub year: i32,
    pub semester: i32,
    pub grade: i32,
    pub total_score: f64,
    pub subject_average: f64,
    pub standard_deviation: f64,
    pub rank: i32,
    pub student_count: i32,
    pub grade_band: i32,
    pub achievement_level: String,
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
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_score_summary(self) -> crate::models::score_summaries::entities::ScoreSummary {
        use crate::models::score_summaries::entities::{AchievementLevel, ScoreSummary};
        use chrono::{DateTime, Utc};

        ScoreSummary {
            id: self.id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            year: self.year,
            semester: self.semester,
            grade: self.grade,
            total_score: self.total_score,
            subject_average: self.subject_average,
            standard_deviation: self.standard_deviation,
            rank: self.rank,
            student_count: self.student_count,
            grade_band: self.grade_band,
            achievement_level: self
                .achievement_level
                .parse::<AchievementLevel>()
                .unwrap_or(AchievementLevel::E),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}

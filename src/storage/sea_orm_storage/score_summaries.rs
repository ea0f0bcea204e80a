//! 成绩汇总存储操作

use super::SeaOrmStorage;
use super::evaluation_methods::methods_in_scope_on;
use super::scores::scores_by_methods_on;
use crate::entity::score_summaries::{ActiveModel, Column, Entity as ScoreSummaries};
use crate::errors::{Result, SchoolSystemError};
use crate::models::{
    evaluation_methods::entities::EvaluationScope,
    score_summaries::{
        entities::ScoreSummary, requests::ScoreSummaryListQuery,
        responses::ScoreSummaryListResponse,
    },
};
use crate::storage::ScopeAggregator;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

fn scope_condition(scope: EvaluationScope) -> Condition {
    Condition::all()
        .add(Column::SubjectId.eq(scope.subject_id))
        .add(Column::Year.eq(scope.year))
        .add(Column::Semester.eq(scope.semester))
        .add(Column::Grade.eq(scope.grade))
}

/// 在给定连接上重算一个范围的汇总并整体替换
///
/// 不在新结果中的学生汇总被删除，其余覆盖写入。调用方负责事务。
///
/// 汇总行按 (学生, 科目, 学年, 学期) 唯一，一个学生在同科目同学期只属于一个年级；
/// 成绩写入时已拒绝跨年级录入，因此按该键找到的已有行必然属于本范围。
pub(super) async fn summarize_scope_on<C: ConnectionTrait>(
    conn: &C,
    scope: EvaluationScope,
    aggregate: ScopeAggregator,
) -> Result<usize> {
    let methods = methods_in_scope_on(conn, scope).await?;
    let method_ids: Vec<i64> = methods.iter().map(|m| m.id).collect();
    let scores = scores_by_methods_on(conn, &method_ids).await?;
    let rows = aggregate(&methods, &scores);

    let now = chrono::Utc::now().timestamp();
    let student_ids: Vec<i64> = rows.iter().map(|r| r.student_id).collect();

    ScoreSummaries::delete_many()
        .filter(scope_condition(scope))
        .filter(Column::StudentId.is_not_in(student_ids))
        .exec(conn)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("删除过期汇总失败: {e}")))?;

    let count = rows.len();
    for row in rows {
        let existing = ScoreSummaries::find()
            .filter(Column::StudentId.eq(row.student_id))
            .filter(Column::SubjectId.eq(scope.subject_id))
            .filter(Column::Year.eq(scope.year))
            .filter(Column::Semester.eq(scope.semester))
            .one(conn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询汇总失败: {e}")))?;

        if let Some(summary) = existing.as_ref().filter(|s| s.grade != scope.grade) {
            return Err(SchoolSystemError::conflict(format!(
                "Student {} already has a grade {} summary for this term",
                row.student_id, summary.grade
            )));
        }

        let mut model = ActiveModel {
            student_id: Set(row.student_id),
            subject_id: Set(scope.subject_id),
            year: Set(scope.year),
            semester: Set(scope.semester),
            grade: Set(scope.grade),
            total_score: Set(row.total_score),
            subject_average: Set(row.subject_average),
            standard_deviation: Set(row.standard_deviation),
            rank: Set(row.rank),
            student_count: Set(row.student_count),
            grade_band: Set(row.grade_band),
            achievement_level: Set(row.achievement_level.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };

        match existing {
            Some(summary) => {
                model.id = Set(summary.id);
                model.update(conn).await.map_err(|e| {
                    SchoolSystemError::database_operation(format!("更新汇总失败: {e}"))
                })?;
            }
            None => {
                model.insert(conn).await.map_err(|e| {
                    SchoolSystemError::database_operation(format!("写入汇总失败: {e}"))
                })?;
            }
        }
    }

    Ok(count)
}

impl SeaOrmStorage {
    /// 在独立事务中重算一个范围的汇总
    pub async fn summarize_scope_impl(
        &self,
        scope: EvaluationScope,
        aggregate: ScopeAggregator,
    ) -> Result<Vec<ScoreSummary>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        summarize_scope_on(&txn, scope, aggregate).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        let summaries = ScoreSummaries::find()
            .filter(scope_condition(scope))
            .order_by_asc(Column::Rank)
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询汇总失败: {e}")))?;

        Ok(summaries
            .into_iter()
            .map(|m| m.into_score_summary())
            .collect())
    }

    /// 分页列出汇总
    pub async fn list_score_summaries_with_pagination_impl(
        &self,
        query: ScoreSummaryListQuery,
    ) -> Result<ScoreSummaryListResponse> {
        let mut select = ScoreSummaries::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(classroom_id) = query.classroom_id {
            let student_ids = self.student_ids_in_classroom(classroom_id).await?;
            select = select.filter(Column::StudentId.is_in(student_ids));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(year) = query.year {
            select = select.filter(Column::Year.eq(year));
        }
        if let Some(semester) = query.semester {
            select = select.filter(Column::Semester.eq(semester));
        }

        select = select
            .order_by_desc(Column::Year)
            .order_by_asc(Column::Semester)
            .order_by_asc(Column::SubjectId)
            .order_by_asc(Column::Rank)
            .order_by_asc(Column::StudentId);

        let (summaries, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(ScoreSummaryListResponse {
            items: summaries
                .into_iter()
                .map(|m| m.into_score_summary())
                .collect(),
            pagination,
        })
    }

    /// 学生某学期的全部科目汇总
    pub async fn list_student_score_summaries_impl(
        &self,
        student_id: i64,
        year: i32,
        semester: i32,
    ) -> Result<Vec<ScoreSummary>> {
        let summaries = ScoreSummaries::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Year.eq(year))
            .filter(Column::Semester.eq(semester))
            .order_by_asc(Column::SubjectId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生汇总失败: {e}")))?;

        Ok(summaries
            .into_iter()
            .map(|m| m.into_score_summary())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation_methods::entities::EvaluationMethod;
    use crate::models::score_summaries::entities::{AchievementLevel, NewScoreSummary};
    use crate::models::scores::entities::Score;
    use crate::services::score_summaries::calculate::aggregate;
    use crate::storage::sea_orm_storage::fixtures;

    // 无视成绩，给每个学生固定写一行
    fn flat(_methods: &[EvaluationMethod], scores: &[Score]) -> Vec<NewScoreSummary> {
        scores
            .iter()
            .map(|s| NewScoreSummary {
                student_id: s.student_id,
                total_score: 1.0,
                subject_average: 1.0,
                standard_deviation: 0.0,
                rank: 1,
                student_count: scores.len() as i32,
                grade_band: 1,
                achievement_level: AchievementLevel::E,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_summarize_upserts_and_drops_stale_rows() {
        let storage = SeaOrmStorage::in_memory().await;
        let subject = fixtures::subject(&storage, "Math").await;
        let method = fixtures::method(&storage, subject.id, "Midterm", 100.0, 100.0).await;
        let a = fixtures::student(&storage, "20250101").await;
        let b = fixtures::student(&storage, "20250102").await;
        let scope = method.scope();

        let saved = fixtures::scores(&storage, &method, &[(a.id, 80.0), (b.id, 60.0)]).await;
        let first = storage.summarize_scope_impl(scope, aggregate).await.unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].student_id, a.id);

        // 换一个聚合函数，行被原地覆盖
        let flattened = storage.summarize_scope_impl(scope, flat).await.unwrap();
        assert_eq!(flattened.len(), 2);
        assert!(flattened.iter().all(|s| s.total_score == 1.0));
        let b_row = flattened.iter().find(|s| s.student_id == b.id).unwrap();
        assert_eq!(b_row.id, first[1].id);

        let a_score = saved.iter().find(|s| s.student_id == a.id).unwrap();
        storage.delete_score_impl(a_score.id, aggregate).await.unwrap();
        let second = storage.summarize_scope_impl(scope, aggregate).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].student_id, b.id);
        assert_eq!(second[0].total_score, 60.0);
        assert_eq!(second[0].id, first[1].id);

        let for_a = storage
            .list_student_score_summaries_impl(a.id, 2025, 1)
            .await
            .unwrap();
        assert!(for_a.is_empty());

        storage
            .delete_evaluation_method_impl(method.id, aggregate)
            .await
            .unwrap();
        let cleared = storage.summarize_scope_impl(scope, aggregate).await.unwrap();
        assert!(cleared.is_empty());
    }
}

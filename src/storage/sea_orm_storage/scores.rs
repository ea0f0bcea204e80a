//! 成绩存储操作

use super::SeaOrmStorage;
use super::score_summaries::summarize_scope_on;
use crate::entity::evaluation_methods::{
    Column as EvaluationMethodColumn, Entity as EvaluationMethods,
};
use crate::entity::scores::{ActiveModel, Column, Entity as Scores};
use crate::errors::{Result, SchoolSystemError};
use crate::models::{
    evaluation_methods::entities::EvaluationMethod,
    scores::{
        entities::{Score, ScoreWrite},
        requests::ScoreListQuery,
        responses::ScoreListResponse,
    },
};
use crate::storage::ScopeAggregator;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

/// 多个评价方式下的全部成绩
pub(super) async fn scores_by_methods_on<C: ConnectionTrait>(
    conn: &C,
    method_ids: &[i64],
) -> Result<Vec<Score>> {
    if method_ids.is_empty() {
        return Ok(Vec::new());
    }

    let scores = Scores::find()
        .filter(Column::EvaluationMethodId.is_in(method_ids.to_vec()))
        .order_by_asc(Column::StudentId)
        .all(conn)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("查询成绩失败: {e}")))?;

    Ok(scores.into_iter().map(|m| m.into_score()).collect())
}

/// 学生在同科目同学期下、属于其他年级的一条成绩
///
/// 返回 (student_id, 该成绩所属年级)。
async fn grade_conflict_on<C: ConnectionTrait>(
    conn: &C,
    method: &EvaluationMethod,
    student_ids: &[i64],
) -> Result<Option<(i64, i32)>> {
    let row = Scores::find()
        .filter(Column::StudentId.is_in(student_ids.to_vec()))
        .find_also_related(EvaluationMethods)
        .filter(EvaluationMethodColumn::SubjectId.eq(method.subject_id))
        .filter(EvaluationMethodColumn::Year.eq(method.year))
        .filter(EvaluationMethodColumn::Semester.eq(method.semester))
        .filter(EvaluationMethodColumn::Grade.ne(method.grade))
        .one(conn)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("查询成绩失败: {e}")))?;

    Ok(row.and_then(|(score, m)| m.map(|m| (score.student_id, m.grade))))
}

/// 写入 (student_id, raw_score)，已存在则覆盖原始分
async fn write_scores_on<C: ConnectionTrait>(
    conn: &C,
    method: &EvaluationMethod,
    entries: &[(i64, f64)],
) -> Result<Vec<Score>> {
    let now = chrono::Utc::now().timestamp();

    let mut saved = Vec::with_capacity(entries.len());
    for &(student_id, raw_score) in entries {
        let weighted_score = method.weighted_score(raw_score);

        let existing = Scores::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::EvaluationMethodId.eq(method.id))
            .one(conn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询成绩失败: {e}")))?;

        let model = match existing {
            Some(score) => ActiveModel {
                id: Set(score.id),
                raw_score: Set(raw_score),
                weighted_score: Set(weighted_score),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(conn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("更新成绩失败: {e}")))?,
            None => ActiveModel {
                student_id: Set(student_id),
                evaluation_method_id: Set(method.id),
                raw_score: Set(raw_score),
                weighted_score: Set(weighted_score),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("写入成绩失败: {e}")))?,
        };
        saved.push(model.into_score());
    }

    Ok(saved)
}

impl SeaOrmStorage {
    pub async fn get_score_by_id_impl(&self, id: i64) -> Result<Option<Score>> {
        let result = Scores::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.into_score()))
    }

    /// 分页列出成绩
    pub async fn list_scores_with_pagination_impl(
        &self,
        query: ScoreListQuery,
    ) -> Result<ScoreListResponse> {
        let mut select = Scores::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(method_id) = query.evaluation_method_id {
            select = select.filter(Column::EvaluationMethodId.eq(method_id));
        }
        if let Some(classroom_id) = query.classroom_id {
            let student_ids = self.student_ids_in_classroom(classroom_id).await?;
            select = select.filter(Column::StudentId.is_in(student_ids));
        }

        select = select
            .order_by_asc(Column::EvaluationMethodId)
            .order_by_asc(Column::StudentId);

        let (scores, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(ScoreListResponse {
            items: scores.into_iter().map(|m| m.into_score()).collect(),
            pagination,
        })
    }

    /// 学生某学期的成绩及对应评价方式
    pub async fn list_student_scores_impl(
        &self,
        student_id: i64,
        year: i32,
        semester: i32,
    ) -> Result<Vec<(EvaluationMethod, Score)>> {
        let rows = Scores::find()
            .filter(Column::StudentId.eq(student_id))
            .find_also_related(EvaluationMethods)
            .filter(EvaluationMethodColumn::Year.eq(year))
            .filter(EvaluationMethodColumn::Semester.eq(semester))
            .order_by_asc(EvaluationMethodColumn::SubjectId)
            .order_by_asc(EvaluationMethodColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生成绩失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(score, method)| {
                method.map(|m| (m.into_evaluation_method(), score.into_score()))
            })
            .collect())
    }

    /// 批量写入成绩并刷新所在范围的汇总
    ///
    /// 评价方式在事务内重新读取，分数区间与年级冲突也在事务内校验；
    /// 任何一条失败则整体回滚。
    pub async fn save_scores_impl(
        &self,
        method_id: i64,
        entries: &[(i64, f64)],
        aggregate: ScopeAggregator,
    ) -> Result<ScoreWrite> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(method) = EvaluationMethods::find_by_id(method_id)
            .one(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询评价方式失败: {e}")))?
            .map(|m| m.into_evaluation_method())
        else {
            return Ok(ScoreWrite::MethodNotFound);
        };

        if let Some(&(student_id, raw_score)) =
            entries.iter().find(|(_, raw)| !method.accepts(*raw))
        {
            return Ok(ScoreWrite::OutOfRange {
                student_id,
                raw_score,
                full_score: method.full_score,
            });
        }

        let student_ids: Vec<i64> = entries.iter().map(|(id, _)| *id).collect();
        if let Some((student_id, grade)) = grade_conflict_on(&txn, &method, &student_ids).await? {
            return Ok(ScoreWrite::GradeConflict { student_id, grade });
        }

        let saved = write_scores_on(&txn, &method, entries).await?;
        summarize_scope_on(&txn, method.scope(), aggregate).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(ScoreWrite::Saved(saved))
    }

    /// 删除成绩并刷新所在范围的汇总
    pub async fn delete_score_impl(&self, id: i64, aggregate: ScopeAggregator) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let Some((score, method)) = Scores::find_by_id(id)
            .find_also_related(EvaluationMethods)
            .one(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询成绩失败: {e}")))?
        else {
            return Ok(false);
        };

        let result = Scores::delete_by_id(score.id)
            .exec(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除成绩失败: {e}")))?;

        if let Some(method) = method {
            summarize_scope_on(&txn, method.into_evaluation_method().scope(), aggregate).await?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation_methods::{
        entities::{ExamType, MethodWrite},
        requests::CreateEvaluationMethodRequest,
    };
    use crate::services::score_summaries::calculate::aggregate;
    use crate::storage::sea_orm_storage::fixtures;

    async fn save(storage: &SeaOrmStorage, method_id: i64, entries: &[(i64, f64)]) -> ScoreWrite {
        storage
            .save_scores_impl(method_id, entries, aggregate)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_upsert_overwrites_existing_score() {
        let storage = SeaOrmStorage::in_memory().await;
        let subject = fixtures::subject(&storage, "Math").await;
        let method = fixtures::method(&storage, subject.id, "Midterm", 30.0, 100.0).await;
        let student = fixtures::student(&storage, "20250101").await;

        let first = fixtures::scores(&storage, &method, &[(student.id, 85.0)]).await;
        assert_eq!(first[0].weighted_score, 25.5);

        let second = fixtures::scores(&storage, &method, &[(student.id, 90.0)]).await;
        assert_eq!(second[0].id, first[0].id);
        assert_eq!(second[0].weighted_score, 27.0);

        let all = scores_by_methods_on(&storage.db, &[method.id])
            .await
            .unwrap();
        assert_eq!(all.len(), 1);

        let summaries = storage
            .list_student_score_summaries_impl(student.id, 2025, 1)
            .await
            .unwrap();
        assert_eq!(summaries[0].total_score, 27.0);
    }

    #[tokio::test]
    async fn test_batch_rolls_back_on_failure() {
        let storage = SeaOrmStorage::in_memory().await;
        let subject = fixtures::subject(&storage, "Math").await;
        let method = fixtures::method(&storage, subject.id, "Midterm", 30.0, 100.0).await;
        let student = fixtures::student(&storage, "20250101").await;
        fixtures::scores(&storage, &method, &[(student.id, 40.0)]).await;

        // 第二条引用不存在的学生，外键失败
        let result = storage
            .save_scores_impl(method.id, &[(student.id, 70.0), (9999, 60.0)], aggregate)
            .await;
        assert!(result.is_err());

        let scores = scores_by_methods_on(&storage.db, &[method.id])
            .await
            .unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].raw_score, 40.0);
        let summaries = storage
            .list_student_score_summaries_impl(student.id, 2025, 1)
            .await
            .unwrap();
        assert_eq!(summaries[0].total_score, 12.0);
    }

    #[tokio::test]
    async fn test_range_checked_against_stored_method() {
        let storage = SeaOrmStorage::in_memory().await;
        let subject = fixtures::subject(&storage, "Math").await;
        let method = fixtures::method(&storage, subject.id, "Quiz", 10.0, 20.0).await;
        let student = fixtures::student(&storage, "20250101").await;

        let written = save(&storage, method.id, &[(student.id, 20.5)]).await;
        assert!(matches!(
            written,
            ScoreWrite::OutOfRange { full_score, .. } if full_score == 20.0
        ));
        assert!(matches!(
            save(&storage, method.id + 100, &[(student.id, 10.0)]).await,
            ScoreWrite::MethodNotFound
        ));
        assert!(
            scores_by_methods_on(&storage.db, &[method.id])
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_scores_in_other_grade_conflict() {
        let storage = SeaOrmStorage::in_memory().await;
        let subject = fixtures::subject(&storage, "Math").await;
        let third = fixtures::method(&storage, subject.id, "Midterm", 50.0, 100.0).await;
        let MethodWrite::Saved(fourth) = storage
            .create_evaluation_method_impl(
                CreateEvaluationMethodRequest {
                    subject_id: subject.id,
                    year: 2025,
                    semester: 1,
                    grade: 4,
                    exam_type: ExamType::Written,
                    title: "Midterm".to_string(),
                    weight: 50.0,
                    full_score: 100.0,
                },
                aggregate,
            )
            .await
            .unwrap()
        else {
            panic!("grade 4 method not created");
        };
        let student = fixtures::student(&storage, "20250101").await;
        let other = fixtures::student(&storage, "20250102").await;
        fixtures::scores(&storage, &third, &[(student.id, 80.0)]).await;

        let written = save(&storage, fourth.id, &[(other.id, 60.0), (student.id, 70.0)]).await;
        assert!(matches!(
            written,
            ScoreWrite::GradeConflict { student_id, grade: 3 } if student_id == student.id
        ));

        // 原年级的汇总保持不变，冲突批次整体未写入
        let summaries = storage
            .list_student_score_summaries_impl(student.id, 2025, 1)
            .await
            .unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].grade, 3);
        assert!(
            scores_by_methods_on(&storage.db, &[fourth.id])
                .await
                .unwrap()
                .is_empty()
        );

        assert!(matches!(
            save(&storage, fourth.id, &[(other.id, 60.0)]).await,
            ScoreWrite::Saved(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_refreshes_summaries() {
        let storage = SeaOrmStorage::in_memory().await;
        let subject = fixtures::subject(&storage, "Math").await;
        let method = fixtures::method(&storage, subject.id, "Midterm", 100.0, 100.0).await;
        let student = fixtures::student(&storage, "20250101").await;
        let saved = fixtures::scores(&storage, &method, &[(student.id, 70.0)]).await;

        assert!(storage.delete_score_impl(saved[0].id, aggregate).await.unwrap());
        assert!(
            storage
                .list_student_score_summaries_impl(student.id, 2025, 1)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(!storage.delete_score_impl(saved[0].id, aggregate).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_filters_by_classroom() {
        let storage = SeaOrmStorage::in_memory().await;
        let subject = fixtures::subject(&storage, "Math").await;
        let method = fixtures::method(&storage, subject.id, "Midterm", 30.0, 100.0).await;
        let classroom = fixtures::classroom(&storage, 2025, 1, None).await;
        let inside = fixtures::student(&storage, "20250101").await;
        let outside = fixtures::student(&storage, "20250102").await;
        storage
            .add_classroom_student_impl(classroom.id, inside.id, None)
            .await
            .unwrap();
        fixtures::scores(&storage, &method, &[(inside.id, 70.0), (outside.id, 60.0)]).await;

        let listed = storage
            .list_scores_with_pagination_impl(ScoreListQuery {
                page: 1,
                size: 10,
                classroom_id: Some(classroom.id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 1);
        assert_eq!(listed.items[0].student_id, inside.id);

        let report = storage
            .list_student_scores_impl(inside.id, 2025, 1)
            .await
            .unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].0.title, "Midterm");
    }
}

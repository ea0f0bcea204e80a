//! 评价方式存储操作

use super::SeaOrmStorage;
use super::score_summaries::summarize_scope_on;
use crate::entity::evaluation_methods::{ActiveModel, Column, Entity as EvaluationMethods};
use crate::entity::scores::{
    ActiveModel as ScoreActiveModel, Column as ScoreColumn, Entity as Scores,
};
use crate::errors::{Result, SchoolSystemError};
use crate::models::evaluation_methods::{
    entities::{EvaluationMethod, EvaluationScope, MethodWrite, weight_fits},
    requests::{
        CreateEvaluationMethodRequest, EvaluationMethodListQuery, UpdateEvaluationMethodRequest,
    },
    responses::EvaluationMethodListResponse,
};
use crate::storage::ScopeAggregator;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

/// 汇总范围内的全部评价方式
pub(super) async fn methods_in_scope_on<C: ConnectionTrait>(
    conn: &C,
    scope: EvaluationScope,
) -> Result<Vec<EvaluationMethod>> {
    let methods = EvaluationMethods::find()
        .filter(Column::SubjectId.eq(scope.subject_id))
        .filter(Column::Year.eq(scope.year))
        .filter(Column::Semester.eq(scope.semester))
        .filter(Column::Grade.eq(scope.grade))
        .order_by_asc(Column::Id)
        .all(conn)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("查询评价方式失败: {e}")))?;

    Ok(methods
        .into_iter()
        .map(|m| m.into_evaluation_method())
        .collect())
}

impl SeaOrmStorage {
    /// 创建评价方式
    ///
    /// 权重上限校验、写入与汇总刷新在同一事务中完成。
    pub async fn create_evaluation_method_impl(
        &self,
        req: CreateEvaluationMethodRequest,
        aggregate: ScopeAggregator,
    ) -> Result<MethodWrite> {
        let now = chrono::Utc::now().timestamp();
        let scope = EvaluationScope {
            subject_id: req.subject_id,
            year: req.year,
            semester: req.semester,
            grade: req.grade,
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let siblings = methods_in_scope_on(&txn, scope).await?;
        if !weight_fits(siblings.iter().map(|m| m.weight), req.weight) {
            return Ok(MethodWrite::WeightExceeded);
        }

        let result = ActiveModel {
            subject_id: Set(req.subject_id),
            year: Set(req.year),
            semester: Set(req.semester),
            grade: Set(req.grade),
            exam_type: Set(req.exam_type.to_string()),
            title: Set(req.title),
            weight: Set(req.weight),
            full_score: Set(req.full_score),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("创建评价方式失败: {e}")))?;

        // 权重之和变化会影响成就等级
        summarize_scope_on(&txn, scope, aggregate).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(MethodWrite::Saved(result.into_evaluation_method()))
    }

    pub async fn get_evaluation_method_by_id_impl(
        &self,
        id: i64,
    ) -> Result<Option<EvaluationMethod>> {
        let result = EvaluationMethods::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询评价方式失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation_method()))
    }

    /// 分页列出评价方式
    pub async fn list_evaluation_methods_with_pagination_impl(
        &self,
        query: EvaluationMethodListQuery,
    ) -> Result<EvaluationMethodListResponse> {
        let mut select = EvaluationMethods::find();

        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(year) = query.year {
            select = select.filter(Column::Year.eq(year));
        }
        if let Some(semester) = query.semester {
            select = select.filter(Column::Semester.eq(semester));
        }
        if let Some(grade) = query.grade {
            select = select.filter(Column::Grade.eq(grade));
        }

        select = select
            .order_by_desc(Column::Year)
            .order_by_asc(Column::Semester)
            .order_by_asc(Column::Grade)
            .order_by_asc(Column::SubjectId)
            .order_by_asc(Column::Id);

        let (methods, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(EvaluationMethodListResponse {
            items: methods
                .into_iter()
                .map(|m| m.into_evaluation_method())
                .collect(),
            pagination,
        })
    }

    /// 更新评价方式
    ///
    /// 权重或满分变化时，在同一事务里重算该方式下的所有折算分并刷新汇总。
    /// 缩小满分时若已有原始分超出新满分则拒绝。
    pub async fn update_evaluation_method_impl(
        &self,
        id: i64,
        update: UpdateEvaluationMethodRequest,
        aggregate: ScopeAggregator,
    ) -> Result<MethodWrite> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = EvaluationMethods::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询评价方式失败: {e}")))?
        else {
            return Ok(MethodWrite::NotFound);
        };
        let scope = existing.clone().into_evaluation_method().scope();

        if let Some(weight) = update.weight.filter(|w| *w != existing.weight) {
            let siblings = methods_in_scope_on(&txn, scope).await?;
            let others = siblings.iter().filter(|m| m.id != id).map(|m| m.weight);
            if !weight_fits(others, weight) {
                return Ok(MethodWrite::WeightExceeded);
            }
        }

        let scores = Scores::find()
            .filter(ScoreColumn::EvaluationMethodId.eq(id))
            .order_by_asc(ScoreColumn::StudentId)
            .all(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询成绩失败: {e}")))?;

        if let Some(full_score) = update.full_score.filter(|f| *f < existing.full_score)
            && let Some(over) = scores.iter().find(|s| s.raw_score > full_score)
        {
            return Ok(MethodWrite::ScoreAboveFullScore {
                student_id: over.student_id,
                raw_score: over.raw_score,
            });
        }

        let rescale = update.weight.is_some_and(|w| w != existing.weight)
            || update.full_score.is_some_and(|f| f != existing.full_score);

        let now = chrono::Utc::now().timestamp();
        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(now);
        if let Some(exam_type) = update.exam_type {
            model.exam_type = Set(exam_type.to_string());
        }
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(weight) = update.weight {
            model.weight = Set(weight);
        }
        if let Some(full_score) = update.full_score {
            model.full_score = Set(full_score);
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("更新评价方式失败: {e}")))?
            .into_evaluation_method();

        if rescale {
            for score in scores {
                let weighted = updated.weighted_score(score.raw_score);
                ScoreActiveModel {
                    id: Set(score.id),
                    weighted_score: Set(weighted),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .update(&txn)
                .await
                .map_err(|e| SchoolSystemError::database_operation(format!("重算折算分失败: {e}")))?;
            }
            summarize_scope_on(&txn, scope, aggregate).await?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(MethodWrite::Saved(updated))
    }

    /// 删除评价方式（成绩级联删除）并刷新汇总
    pub async fn delete_evaluation_method_impl(
        &self,
        id: i64,
        aggregate: ScopeAggregator,
    ) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = EvaluationMethods::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询评价方式失败: {e}")))?
        else {
            return Ok(false);
        };
        let scope = existing.into_evaluation_method().scope();

        let result = EvaluationMethods::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除评价方式失败: {e}")))?;

        summarize_scope_on(&txn, scope, aggregate).await?;

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::score_summaries::calculate::aggregate;
    use crate::storage::sea_orm_storage::{fixtures, scores::scores_by_methods_on};

    fn update(weight: Option<f64>, full_score: Option<f64>) -> UpdateEvaluationMethodRequest {
        UpdateEvaluationMethodRequest {
            weight,
            full_score,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_rescale_updates_weighted_scores() {
        let storage = SeaOrmStorage::in_memory().await;
        let subject = fixtures::subject(&storage, "Math").await;
        let method = fixtures::method(&storage, subject.id, "Midterm", 30.0, 100.0).await;
        let student = fixtures::student(&storage, "20250101").await;
        fixtures::scores(&storage, &method, &[(student.id, 80.0)]).await;

        let written = storage
            .update_evaluation_method_impl(method.id, update(Some(40.0), None), aggregate)
            .await
            .unwrap();
        let MethodWrite::Saved(updated) = written else {
            panic!("unexpected outcome: {written:?}");
        };
        assert_eq!(updated.weight, 40.0);

        let scores = scores_by_methods_on(&storage.db, &[method.id])
            .await
            .unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].raw_score, 80.0);
        assert_eq!(scores[0].weighted_score, 32.0);

        let summaries = storage
            .list_student_score_summaries_impl(student.id, 2025, 1)
            .await
            .unwrap();
        assert_eq!(summaries[0].total_score, 32.0);
    }

    #[tokio::test]
    async fn test_full_score_cannot_drop_below_existing_raw_score() {
        let storage = SeaOrmStorage::in_memory().await;
        let subject = fixtures::subject(&storage, "Math").await;
        let method = fixtures::method(&storage, subject.id, "Midterm", 100.0, 100.0).await;
        let student = fixtures::student(&storage, "20250101").await;
        fixtures::scores(&storage, &method, &[(student.id, 80.0)]).await;

        let written = storage
            .update_evaluation_method_impl(method.id, update(None, Some(50.0)), aggregate)
            .await
            .unwrap();
        assert!(matches!(
            written,
            MethodWrite::ScoreAboveFullScore { student_id, raw_score }
                if student_id == student.id && raw_score == 80.0
        ));

        // 满分与折算分均保持原样
        let kept = storage
            .get_evaluation_method_by_id_impl(method.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.full_score, 100.0);
        let scores = scores_by_methods_on(&storage.db, &[method.id])
            .await
            .unwrap();
        assert_eq!(scores[0].weighted_score, 80.0);

        // 仍不低于现有原始分时允许缩小
        let written = storage
            .update_evaluation_method_impl(method.id, update(None, Some(80.0)), aggregate)
            .await
            .unwrap();
        assert!(matches!(written, MethodWrite::Saved(_)));
        let scores = scores_by_methods_on(&storage.db, &[method.id])
            .await
            .unwrap();
        assert_eq!(scores[0].weighted_score, 100.0);
    }

    #[tokio::test]
    async fn test_weight_cap_checked_in_transaction() {
        let storage = SeaOrmStorage::in_memory().await;
        let subject = fixtures::subject(&storage, "Math").await;
        let first = fixtures::method(&storage, subject.id, "Midterm", 60.0, 100.0).await;
        fixtures::method(&storage, subject.id, "Final", 40.0, 100.0).await;

        let written = storage
            .create_evaluation_method_impl(
                CreateEvaluationMethodRequest {
                    subject_id: subject.id,
                    year: 2025,
                    semester: 1,
                    grade: 3,
                    exam_type: crate::models::evaluation_methods::entities::ExamType::Written,
                    title: "Quiz".to_string(),
                    weight: 1.0,
                    full_score: 10.0,
                },
                aggregate,
            )
            .await
            .unwrap();
        assert!(matches!(written, MethodWrite::WeightExceeded));

        let written = storage
            .update_evaluation_method_impl(first.id, update(Some(61.0), None), aggregate)
            .await
            .unwrap();
        assert!(matches!(written, MethodWrite::WeightExceeded));

        let in_scope = methods_in_scope_on(&storage.db, first.scope())
            .await
            .unwrap();
        assert_eq!(in_scope.len(), 2);
        assert_eq!(in_scope[0].weight, 60.0);
    }

    #[tokio::test]
    async fn test_scope_listing_and_unique_title() {
        let storage = SeaOrmStorage::in_memory().await;
        let math = fixtures::subject(&storage, "Math").await;
        let science = fixtures::subject(&storage, "Science").await;
        let midterm = fixtures::method(&storage, math.id, "Midterm", 30.0, 100.0).await;
        fixtures::method(&storage, math.id, "Final", 40.0, 100.0).await;
        fixtures::method(&storage, science.id, "Midterm", 50.0, 100.0).await;

        let in_scope = methods_in_scope_on(&storage.db, midterm.scope())
            .await
            .unwrap();
        assert_eq!(in_scope.len(), 2);

        let err = storage
            .create_evaluation_method_impl(
                CreateEvaluationMethodRequest {
                    subject_id: math.id,
                    year: 2025,
                    semester: 1,
                    grade: 3,
                    exam_type: crate::models::evaluation_methods::entities::ExamType::Performance,
                    title: "Midterm".to_string(),
                    weight: 10.0,
                    full_score: 20.0,
                },
                aggregate,
            )
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_delete_cascades_scores() {
        let storage = SeaOrmStorage::in_memory().await;
        let subject = fixtures::subject(&storage, "Math").await;
        let method = fixtures::method(&storage, subject.id, "Midterm", 30.0, 100.0).await;
        let student = fixtures::student(&storage, "20250101").await;
        fixtures::scores(&storage, &method, &[(student.id, 50.0)]).await;

        assert!(
            storage
                .delete_evaluation_method_impl(method.id, aggregate)
                .await
                .unwrap()
        );
        assert!(
            scores_by_methods_on(&storage.db, &[method.id])
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            storage
                .list_student_score_summaries_impl(student.id, 2025, 1)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(
            !storage
                .delete_evaluation_method_impl(method.id, aggregate)
                .await
                .unwrap()
        );
    }
}

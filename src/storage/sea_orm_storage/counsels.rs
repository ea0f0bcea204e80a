//! 咨询记录存储操作

use super::SeaOrmStorage;
use crate::entity::counsels::{ActiveModel, Column, Entity as Counsels};
use crate::errors::{Result, SchoolSystemError};
use crate::models::counsels::{
    entities::Counsel,
    requests::{CounselListQuery, CreateCounselRequest, UpdateCounselRequest},
    responses::CounselListResponse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_counsel_impl(
        &self,
        req: CreateCounselRequest,
        teacher_id: i64,
    ) -> Result<Counsel> {
        let now = chrono::Utc::now().timestamp();

        let result = ActiveModel {
            student_id: Set(req.student_id),
            teacher_id: Set(teacher_id),
            counsel_date: Set(req.counsel_date),
            category: Set(req.category.to_string()),
            content: Set(req.content),
            next_plan: Set(req.next_plan),
            next_counsel_date: Set(req.next_counsel_date),
            is_shared: Set(req.is_shared),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("创建咨询记录失败: {e}")))?;

        Ok(result.into_counsel())
    }

    pub async fn get_counsel_by_id_impl(&self, id: i64) -> Result<Option<Counsel>> {
        let result = Counsels::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询咨询记录失败: {e}")))?;

        Ok(result.map(|m| m.into_counsel()))
    }

    /// 分页列出咨询记录
    ///
    /// 指定 `viewer_teacher_id` 时，非共享记录只对撰写人可见。
    pub async fn list_counsels_with_pagination_impl(
        &self,
        query: CounselListQuery,
    ) -> Result<CounselListResponse> {
        let mut select = Counsels::find();

        if let Some(viewer) = query.viewer_teacher_id {
            select = select.filter(
                Condition::any()
                    .add(Column::IsShared.eq(true))
                    .add(Column::TeacherId.eq(viewer)),
            );
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(category) = query.category {
            select = select.filter(Column::Category.eq(category.to_string()));
        }

        select = select
            .order_by_desc(Column::CounselDate)
            .order_by_desc(Column::Id);

        let (records, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(CounselListResponse {
            items: records.into_iter().map(|m| m.into_counsel()).collect(),
            pagination,
        })
    }

    pub async fn update_counsel_impl(
        &self,
        id: i64,
        update: UpdateCounselRequest,
    ) -> Result<Option<Counsel>> {
        if self.get_counsel_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(counsel_date) = update.counsel_date {
            model.counsel_date = Set(counsel_date);
        }
        if let Some(category) = update.category {
            model.category = Set(category.to_string());
        }
        if let Some(content) = update.content {
            model.content = Set(content);
        }
        if let Some(next_plan) = update.next_plan {
            model.next_plan = Set(next_plan);
        }
        if let Some(next_counsel_date) = update.next_counsel_date {
            model.next_counsel_date = Set(next_counsel_date);
        }
        if let Some(is_shared) = update.is_shared {
            model.is_shared = Set(is_shared);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("更新咨询记录失败: {e}")))?;

        self.get_counsel_by_id_impl(id).await
    }

    pub async fn delete_counsel_impl(&self, id: i64) -> Result<bool> {
        let result = Counsels::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除咨询记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::counsels::entities::CounselCategory;
    use crate::storage::sea_orm_storage::fixtures;

    fn counsel(student_id: i64, is_shared: bool) -> CreateCounselRequest {
        CreateCounselRequest {
            student_id,
            counsel_date: chrono::NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(),
            category: CounselCategory::Career,
            content: "Talked about elective choices".to_string(),
            next_plan: None,
            next_counsel_date: None,
            is_shared,
        }
    }

    #[tokio::test]
    async fn test_private_counsels_hidden_from_other_teachers() {
        let storage = SeaOrmStorage::in_memory().await;
        let author = fixtures::teacher(&storage, "teacher01").await;
        let other = fixtures::teacher(&storage, "teacher02").await;
        let student = fixtures::student(&storage, "20250101").await;

        storage
            .create_counsel_impl(counsel(student.id, false), author.id)
            .await
            .unwrap();
        storage
            .create_counsel_impl(counsel(student.id, true), author.id)
            .await
            .unwrap();

        let query = |viewer| CounselListQuery {
            page: 1,
            size: 10,
            viewer_teacher_id: viewer,
            ..Default::default()
        };

        let as_author = storage
            .list_counsels_with_pagination_impl(query(Some(author.id)))
            .await
            .unwrap();
        assert_eq!(as_author.pagination.total, 2);

        let as_other = storage
            .list_counsels_with_pagination_impl(query(Some(other.id)))
            .await
            .unwrap();
        assert_eq!(as_other.pagination.total, 1);
        assert!(as_other.items[0].is_shared);

        let as_admin = storage
            .list_counsels_with_pagination_impl(query(None))
            .await
            .unwrap();
        assert_eq!(as_admin.pagination.total, 2);
    }
}

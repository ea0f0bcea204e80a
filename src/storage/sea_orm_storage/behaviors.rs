use super::SeaOrmStorage;
use crate::entity::behaviors::{ActiveModel, Column, Entity as Behaviors};
use crate::errors::{Result, SchoolSystemError};
use crate::models::behaviors::{
    entities::Behavior,
    requests::{BehaviorListQuery, CreateBehaviorRequest, UpdateBehaviorRequest},
    responses::BehaviorListResponse,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_behavior_impl(
        &self,
        req: CreateBehaviorRequest,
        written_by: i64,
    ) -> Result<Behavior> {
        let now = chrono::Utc::now().timestamp();

        let result = ActiveModel {
            student_id: Set(req.student_id),
            year: Set(req.year),
            semester: Set(req.semester),
            content: Set(req.content),
            written_by: Set(Some(written_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("创建行为记录失败: {e}")))?;

        Ok(result.into_behavior())
    }

    pub async fn get_behavior_by_id_impl(&self, id: i64) -> Result<Option<Behavior>> {
        let result = Behaviors::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询行为记录失败: {e}")))?;

        Ok(result.map(|m| m.into_behavior()))
    }

    pub async fn list_behaviors_with_pagination_impl(
        &self,
        query: BehaviorListQuery,
    ) -> Result<BehaviorListResponse> {
        let mut select = Behaviors::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(year) = query.year {
            select = select.filter(Column::Year.eq(year));
        }
        if let Some(semester) = query.semester {
            select = select.filter(Column::Semester.eq(semester));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let (records, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(BehaviorListResponse {
            items: records.into_iter().map(|m| m.into_behavior()).collect(),
            pagination,
        })
    }

    pub async fn update_behavior_impl(
        &self,
        id: i64,
        update: UpdateBehaviorRequest,
    ) -> Result<Option<Behavior>> {
        if self.get_behavior_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(year) = update.year {
            model.year = Set(year);
        }
        if let Some(semester) = update.semester {
            model.semester = Set(semester);
        }
        if let Some(content) = update.content {
            model.content = Set(content);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("更新行为记录失败: {e}")))?;

        self.get_behavior_by_id_impl(id).await
    }

    pub async fn delete_behavior_impl(&self, id: i64) -> Result<bool> {
        let result = Behaviors::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除行为记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

//! 通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{Result, SchoolSystemError};
use crate::models::notifications::{
    entities::{NewNotification, Notification},
    requests::NotificationListQuery,
    responses::NotificationListResponse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 批量创建通知（一个接收人一行）
    pub async fn create_notifications_impl(
        &self,
        notifications: Vec<NewNotification>,
    ) -> Result<Vec<Notification>> {
        if notifications.is_empty() {
            return Ok(Vec::new());
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let mut created = Vec::with_capacity(notifications.len());
        for n in notifications {
            let model = ActiveModel {
                user_id: Set(n.user_id),
                notification_type: Set(n.notification_type.to_string()),
                title: Set(n.title),
                content: Set(n.content),
                reference_type: Set(n.reference_type),
                reference_id: Set(n.reference_id),
                is_read: Set(false),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("创建通知失败: {e}")))?;
            created.push(model.into_notification());
        }

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }

    /// 分页列出某用户的通知，最新在前
    pub async fn list_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));
        if query.unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }
        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let (records, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(NotificationListResponse {
            items: records.into_iter().map(|m| m.into_notification()).collect(),
            pagination,
        })
    }

    pub async fn count_unread_notifications_impl(&self, user_id: i64) -> Result<i64> {
        let count = Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计未读通知失败: {e}")))?;

        Ok(count as i64)
    }

    pub async fn mark_notification_read_impl(&self, user_id: i64, id: i64) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn mark_all_notifications_read_impl(&self, user_id: i64) -> Result<i64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("标记全部已读失败: {e}")))?;

        Ok(result.rows_affected as i64)
    }

    pub async fn delete_notification_impl(&self, user_id: i64, id: i64) -> Result<bool> {
        let result = Notifications::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除通知失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notifications::entities::NotificationType;
    use crate::storage::sea_orm_storage::fixtures;

    fn announcement(user_id: i64, title: &str) -> NewNotification {
        NewNotification {
            user_id,
            notification_type: NotificationType::Announcement,
            title: title.to_string(),
            content: None,
            reference_type: None,
            reference_id: None,
        }
    }

    #[tokio::test]
    async fn test_read_state_is_per_recipient() {
        let storage = SeaOrmStorage::in_memory().await;
        let a = fixtures::teacher(&storage, "teacher01").await;
        let b = fixtures::teacher(&storage, "teacher02").await;

        let created = storage
            .create_notifications_impl(vec![
                announcement(a.user_id, "Sports day"),
                announcement(a.user_id, "Exam week"),
                announcement(b.user_id, "Sports day"),
            ])
            .await
            .unwrap();
        assert_eq!(created.len(), 3);
        assert_eq!(storage.count_unread_notifications_impl(a.user_id).await.unwrap(), 2);

        // 其他人的通知不可操作
        assert!(
            !storage
                .mark_notification_read_impl(b.user_id, created[0].id)
                .await
                .unwrap()
        );
        assert!(
            storage
                .mark_notification_read_impl(a.user_id, created[0].id)
                .await
                .unwrap()
        );

        let unread = storage
            .list_notifications_with_pagination_impl(
                a.user_id,
                NotificationListQuery {
                    page: 1,
                    size: 10,
                    unread_only: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(unread.items.len(), 1);
        assert_eq!(unread.items[0].title, "Exam week");

        assert_eq!(
            storage.mark_all_notifications_read_impl(a.user_id).await.unwrap(),
            1
        );
        assert_eq!(storage.count_unread_notifications_impl(a.user_id).await.unwrap(), 0);
        assert_eq!(storage.count_unread_notifications_impl(b.user_id).await.unwrap(), 1);

        assert!(!storage.delete_notification_impl(a.user_id, created[2].id).await.unwrap());
        assert!(storage.delete_notification_impl(b.user_id, created[2].id).await.unwrap());
    }
}

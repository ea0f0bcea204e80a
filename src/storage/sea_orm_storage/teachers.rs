//! 教师档案存储操作

use super::SeaOrmStorage;
use crate::entity::classrooms::{Column as ClassroomColumn, Entity as Classrooms};
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers, Model as TeacherModel};
use crate::entity::users::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as Users, Model as UserModel,
};
use crate::errors::{Result, SchoolSystemError};
use crate::models::{
    teachers::{
        entities::Teacher,
        requests::{CreateTeacherRequest, TeacherListQuery, UpdateTeacherRequest},
        responses::TeacherListResponse,
    },
    users::entities::{UserRole, UserStatus},
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    /// 创建教师：账号与档案在同一事务中写入
    pub async fn create_teacher_impl(&self, req: CreateTeacherRequest) -> Result<Teacher> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let user = UserActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(UserRole::Teacher.to_string()),
            status: Set(UserStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("创建教师账号失败: {e}")))?;

        let teacher = ActiveModel {
            user_id: Set(user.id),
            name: Set(req.name),
            phone: Set(req.phone),
            subject_id: Set(req.subject_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("创建教师档案失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(teacher.into_teacher(&user))
    }

    /// 通过 ID 获取教师
    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find_by_id(id)
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.and_then(|(teacher, user)| user.map(|u| teacher.into_teacher(&u))))
    }

    /// 通过账号 ID 获取教师
    pub async fn get_teacher_by_user_id_impl(&self, user_id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(Column::UserId.eq(user_id))
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?;

        Ok(result.and_then(|(teacher, user)| user.map(|u| teacher.into_teacher(&u))))
    }

    /// 分页列出教师
    pub async fn list_teachers_with_pagination_impl(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        let mut select = Teachers::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }

        select = select.order_by_asc(Column::Name).order_by_asc(Column::Id);

        let (teachers, pagination) = self.fetch_page(select, query.page, query.size).await?;
        let users = self.load_users_for(&teachers).await?;

        let items = teachers
            .into_iter()
            .filter_map(|t| users.get(&t.user_id).map(|u| t.into_teacher(u)))
            .collect();

        Ok(TeacherListResponse { items, pagination })
    }

    async fn load_users_for(&self, teachers: &[TeacherModel]) -> Result<HashMap<i64, UserModel>> {
        if teachers.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<i64> = teachers.iter().map(|t| t.user_id).collect();
        let users = Users::find()
            .filter(UserColumn::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师账号失败: {e}")))?;

        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    /// 更新教师档案
    pub async fn update_teacher_impl(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        if Teachers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(phone) = update.phone {
            model.phone = Set(phone);
        }
        if let Some(subject_id) = update.subject_id {
            model.subject_id = Set(subject_id);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("更新教师失败: {e}")))?;

        self.get_teacher_by_id_impl(id).await
    }

    /// 删除教师档案与账号
    pub async fn delete_teacher_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(teacher) = Teachers::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询教师失败: {e}")))?
        else {
            return Ok(false);
        };

        // 班主任引用置空
        Classrooms::update_many()
            .col_expr(
                ClassroomColumn::HomeroomTeacherId,
                Expr::value(Option::<i64>::None),
            )
            .filter(ClassroomColumn::HomeroomTeacherId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("解除班主任失败: {e}")))?;

        Teachers::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除教师失败: {e}")))?;

        Users::delete_by_id(teacher.user_id)
            .exec(&txn)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除教师账号失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classrooms::requests::CreateClassroomRequest;
    use crate::storage::sea_orm_storage::fixtures::new_teacher;

    #[tokio::test]
    async fn test_create_teacher_creates_account() {
        let storage = SeaOrmStorage::in_memory().await;
        let teacher = storage
            .create_teacher_impl(new_teacher("teacher01", "Kim Minji"))
            .await
            .unwrap();
        assert_eq!(teacher.username, "teacher01");

        let user = storage
            .get_user_by_id_impl(teacher.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role, UserRole::Teacher);

        let by_user = storage
            .get_teacher_by_user_id_impl(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_user.id, teacher.id);
    }

    #[tokio::test]
    async fn test_failed_teacher_creation_rolls_back_account() {
        let storage = SeaOrmStorage::in_memory().await;
        let mut req = new_teacher("teacher01", "Kim Minji");
        // 不存在的科目触发外键失败
        req.subject_id = Some(999);
        assert!(storage.create_teacher_impl(req).await.is_err());
        assert!(
            storage
                .get_user_by_username_impl("teacher01")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_teacher_clears_homeroom() {
        let storage = SeaOrmStorage::in_memory().await;
        let teacher = storage
            .create_teacher_impl(new_teacher("teacher01", "Kim Minji"))
            .await
            .unwrap();
        let classroom = storage
            .create_classroom_impl(CreateClassroomRequest {
                year: 2025,
                grade: 3,
                class_number: 2,
                homeroom_teacher_id: Some(teacher.id),
            })
            .await
            .unwrap();

        assert!(storage.delete_teacher_impl(teacher.id).await.unwrap());
        assert!(!storage.delete_teacher_impl(teacher.id).await.unwrap());

        let classroom = storage
            .get_classroom_by_id_impl(classroom.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(classroom.homeroom_teacher_id, None);
        assert!(
            storage
                .get_user_by_id_impl(teacher.user_id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_list_teachers_search() {
        let storage = SeaOrmStorage::in_memory().await;
        storage
            .create_teacher_impl(new_teacher("teacher01", "Kim Minji"))
            .await
            .unwrap();
        storage
            .create_teacher_impl(new_teacher("teacher02", "Lee Jiho"))
            .await
            .unwrap();

        let result = storage
            .list_teachers_with_pagination_impl(TeacherListQuery {
                page: 1,
                size: 10,
                search: Some("Lee".to_string()),
                subject_id: None,
            })
            .await
            .unwrap();
        assert_eq!(result.pagination.total, 1);
        assert_eq!(result.items[0].username, "teacher02");
    }
}

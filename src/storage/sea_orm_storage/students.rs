//! 学生存储操作

use super::SeaOrmStorage;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{Result, SchoolSystemError};
use crate::models::students::{
    entities::Student,
    requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    responses::StudentListResponse,
};
use crate::utils::escape_like_pattern;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 创建学生
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_number: Set(req.student_number),
            name: Set(req.name),
            gender: Set(req.gender.to_string()),
            birth_date: Set(req.birth_date),
            phone: Set(req.phone),
            guardian_name: Set(req.guardian_name),
            guardian_phone: Set(req.guardian_phone),
            address: Set(req.address),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("创建学生失败: {e}")))?;

        Ok(result.into_student())
    }

    /// 通过 ID 获取学生
    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生，按学号排序
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let mut select = Students::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(&escaped))
                    .add(Column::StudentNumber.contains(&escaped)),
            );
        }

        select = select.order_by_asc(Column::StudentNumber);

        let (students, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination,
        })
    }

    /// 更新学生
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(student_number) = update.student_number {
            model.student_number = Set(student_number);
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(gender) = update.gender {
            model.gender = Set(gender.to_string());
        }
        if let Some(birth_date) = update.birth_date {
            model.birth_date = Set(birth_date);
        }
        if let Some(phone) = update.phone {
            model.phone = Set(phone);
        }
        if let Some(guardian_name) = update.guardian_name {
            model.guardian_name = Set(guardian_name);
        }
        if let Some(guardian_phone) = update.guardian_phone {
            model.guardian_phone = Set(guardian_phone);
        }
        if let Some(address) = update.address {
            model.address = Set(address);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("更新学生失败: {e}")))?;

        self.get_student_by_id_impl(id).await
    }

    /// 删除学生（名单、成绩、出勤等记录级联删除）
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除学生失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::fixtures::new_student;

    #[tokio::test]
    async fn test_search_by_name_or_number() {
        let storage = SeaOrmStorage::in_memory().await;
        storage
            .create_student_impl(new_student("20250101", "Park Seoyeon"))
            .await
            .unwrap();
        storage
            .create_student_impl(new_student("20250102", "Choi Yuna"))
            .await
            .unwrap();

        let by_name = storage
            .list_students_with_pagination_impl(StudentListQuery {
                page: 1,
                size: 10,
                search: Some("Choi".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(by_name.items.len(), 1);

        let by_number = storage
            .list_students_with_pagination_impl(StudentListQuery {
                page: 1,
                size: 10,
                search: Some("202501".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(by_number.pagination.total, 2);
        assert_eq!(by_number.items[0].student_number, "20250101");
    }

    #[tokio::test]
    async fn test_duplicate_student_number() {
        let storage = SeaOrmStorage::in_memory().await;
        storage
            .create_student_impl(new_student("20250101", "Park Seoyeon"))
            .await
            .unwrap();
        let err = storage
            .create_student_impl(new_student("20250101", "Someone Else"))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_update_clears_nullable_fields() {
        let storage = SeaOrmStorage::in_memory().await;
        let mut req = new_student("20250101", "Park Seoyeon");
        req.phone = Some("010-1234-5678".to_string());
        let student = storage.create_student_impl(req).await.unwrap();

        let updated = storage
            .update_student_impl(
                student.id,
                UpdateStudentRequest {
                    phone: Some(None),
                    name: Some("Park Seo-yeon".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.phone, None);
        assert_eq!(updated.name, "Park Seo-yeon");
        assert!(storage.delete_student_impl(student.id).await.unwrap());
        assert!(storage.get_student_by_id_impl(student.id).await.unwrap().is_none());
    }
}

//! 班级名单存储操作

use super::SeaOrmStorage;
use crate::entity::classroom_students::{ActiveModel, Column, Entity as ClassroomStudents};
use crate::entity::classrooms::{Column as ClassroomColumn, Entity as Classrooms};
use crate::entity::students::Entity as Students;
use crate::errors::{Result, SchoolSystemError};
use crate::models::classroom_students::entities::ClassroomStudent;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};

impl SeaOrmStorage {
    /// 班级名单，按班内学号排序
    pub async fn list_classroom_students_impl(
        &self,
        classroom_id: i64,
    ) -> Result<Vec<ClassroomStudent>> {
        let rows = ClassroomStudents::find()
            .filter(Column::ClassroomId.eq(classroom_id))
            .find_also_related(Students)
            .order_by_asc(Column::Number)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询班级名单失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(entry, student)| student.map(|s| entry.into_classroom_student(s)))
            .collect())
    }

    /// 获取名单条目
    pub async fn get_classroom_student_impl(
        &self,
        classroom_id: i64,
        student_id: i64,
    ) -> Result<Option<ClassroomStudent>> {
        let row = ClassroomStudents::find()
            .filter(Column::ClassroomId.eq(classroom_id))
            .filter(Column::StudentId.eq(student_id))
            .find_also_related(Students)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询名单条目失败: {e}")))?;

        Ok(row.and_then(|(entry, student)| student.map(|s| entry.into_classroom_student(s))))
    }

    /// 加入班级
    ///
    /// 同一学年内学生只能属于一个班级；未指定学号时取当前最大号 + 1。
    pub async fn add_classroom_student_impl(
        &self,
        classroom_id: i64,
        student_id: i64,
        number: Option<i32>,
    ) -> Result<ClassroomStudent> {
        let classroom = Classrooms::find_by_id(classroom_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询班级失败: {e}")))?
            .ok_or_else(|| SchoolSystemError::not_found(format!("Classroom {classroom_id} not found")))?;

        let same_year = ClassroomStudents::find()
            .join(
                JoinType::InnerJoin,
                crate::entity::classroom_students::Relation::Classroom.def(),
            )
            .filter(Column::StudentId.eq(student_id))
            .filter(ClassroomColumn::Year.eq(classroom.year))
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生班级失败: {e}")))?;
        if let Some(existing) = same_year {
            return Err(SchoolSystemError::conflict(format!(
                "Student {student_id} already belongs to classroom {} in {}",
                existing.classroom_id, classroom.year
            )));
        }

        let number = match number {
            Some(n) => n,
            None => self.next_roll_number(classroom_id).await?,
        };

        let entry = ActiveModel {
            classroom_id: Set(classroom_id),
            student_id: Set(student_id),
            number: Set(number),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("加入班级失败: {e}")))?;

        self.get_classroom_student_impl(entry.classroom_id, entry.student_id)
            .await?
            .ok_or_else(|| SchoolSystemError::not_found(format!("Student {student_id} not found")))
    }

    async fn next_roll_number(&self, classroom_id: i64) -> Result<i32> {
        let numbers: Vec<i32> = ClassroomStudents::find()
            .select_only()
            .column(Column::Number)
            .filter(Column::ClassroomId.eq(classroom_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询班内学号失败: {e}")))?;

        Ok(numbers.into_iter().max().unwrap_or(0) + 1)
    }

    /// 修改班内学号
    pub async fn update_classroom_student_number_impl(
        &self,
        classroom_id: i64,
        student_id: i64,
        number: i32,
    ) -> Result<Option<ClassroomStudent>> {
        let result = ClassroomStudents::update_many()
            .col_expr(Column::Number, sea_orm::sea_query::Expr::value(number))
            .filter(Column::ClassroomId.eq(classroom_id))
            .filter(Column::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("修改班内学号失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_classroom_student_impl(classroom_id, student_id)
            .await
    }

    /// 移出班级
    pub async fn remove_classroom_student_impl(
        &self,
        classroom_id: i64,
        student_id: i64,
    ) -> Result<bool> {
        let result = ClassroomStudents::delete_many()
            .filter(Column::ClassroomId.eq(classroom_id))
            .filter(Column::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("移出班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::fixtures;

    #[tokio::test]
    async fn test_default_number_is_max_plus_one() {
        let storage = SeaOrmStorage::in_memory().await;
        let classroom = fixtures::classroom(&storage, 2025, 1, None).await;
        let a = fixtures::student(&storage, "20250101").await;
        let b = fixtures::student(&storage, "20250102").await;
        let c = fixtures::student(&storage, "20250103").await;

        let first = storage
            .add_classroom_student_impl(classroom.id, a.id, None)
            .await
            .unwrap();
        assert_eq!(first.number, 1);
        storage
            .add_classroom_student_impl(classroom.id, b.id, Some(7))
            .await
            .unwrap();
        let third = storage
            .add_classroom_student_impl(classroom.id, c.id, None)
            .await
            .unwrap();
        assert_eq!(third.number, 8);

        let roster = storage.list_classroom_students_impl(classroom.id).await.unwrap();
        let numbers: Vec<i32> = roster.iter().map(|e| e.number).collect();
        assert_eq!(numbers, vec![1, 7, 8]);
        assert_eq!(roster[1].student.student_number, "20250102");
    }

    #[tokio::test]
    async fn test_one_classroom_per_year() {
        let storage = SeaOrmStorage::in_memory().await;
        let first = fixtures::classroom(&storage, 2025, 1, None).await;
        let second = fixtures::classroom(&storage, 2025, 2, None).await;
        let next_year = fixtures::classroom(&storage, 2026, 1, None).await;
        let student = fixtures::student(&storage, "20250101").await;

        storage
            .add_classroom_student_impl(first.id, student.id, None)
            .await
            .unwrap();
        let err = storage
            .add_classroom_student_impl(second.id, student.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolSystemError::Conflict(_)));

        assert!(
            storage
                .add_classroom_student_impl(next_year.id, student.id, None)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_duplicate_number_conflicts() {
        let storage = SeaOrmStorage::in_memory().await;
        let classroom = fixtures::classroom(&storage, 2025, 1, None).await;
        let a = fixtures::student(&storage, "20250101").await;
        let b = fixtures::student(&storage, "20250102").await;

        storage
            .add_classroom_student_impl(classroom.id, a.id, Some(3))
            .await
            .unwrap();
        let err = storage
            .add_classroom_student_impl(classroom.id, b.id, Some(3))
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let storage = SeaOrmStorage::in_memory().await;
        let classroom = fixtures::classroom(&storage, 2025, 1, None).await;
        let a = fixtures::student(&storage, "20250101").await;
        storage
            .add_classroom_student_impl(classroom.id, a.id, None)
            .await
            .unwrap();

        let updated = storage
            .update_classroom_student_number_impl(classroom.id, a.id, 12)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.number, 12);
        assert!(
            storage
                .update_classroom_student_number_impl(classroom.id, 999, 1)
                .await
                .unwrap()
                .is_none()
        );

        assert!(storage.remove_classroom_student_impl(classroom.id, a.id).await.unwrap());
        assert!(!storage.remove_classroom_student_impl(classroom.id, a.id).await.unwrap());
    }
}

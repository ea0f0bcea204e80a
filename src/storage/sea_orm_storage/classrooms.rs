//! 班级存储操作

use super::SeaOrmStorage;
use crate::entity::classroom_students::{
    Column as ClassroomStudentColumn, Entity as ClassroomStudents,
};
use crate::entity::classrooms::{ActiveModel, Column, Entity as Classrooms};
use crate::errors::{Result, SchoolSystemError};
use crate::models::classrooms::{
    entities::Classroom,
    requests::{ClassroomListQuery, CreateClassroomRequest, UpdateClassroomRequest},
    responses::ClassroomListResponse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_classroom_impl(&self, req: CreateClassroomRequest) -> Result<Classroom> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            year: Set(req.year),
            grade: Set(req.grade),
            class_number: Set(req.class_number),
            homeroom_teacher_id: Set(req.homeroom_teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("创建班级失败: {e}")))?;

        Ok(result.into_classroom(0))
    }

    /// 通过 ID 获取班级
    pub async fn get_classroom_by_id_impl(&self, id: i64) -> Result<Option<Classroom>> {
        let result = Classrooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询班级失败: {e}")))?;

        match result {
            Some(model) => {
                let counts = self.count_students_in(&[model.id]).await?;
                let count = counts.get(&model.id).copied().unwrap_or(0);
                Ok(Some(model.into_classroom(count)))
            }
            None => Ok(None),
        }
    }

    /// 分页列出班级
    pub async fn list_classrooms_with_pagination_impl(
        &self,
        query: ClassroomListQuery,
    ) -> Result<ClassroomListResponse> {
        let mut select = Classrooms::find();

        if let Some(year) = query.year {
            select = select.filter(Column::Year.eq(year));
        }
        if let Some(grade) = query.grade {
            select = select.filter(Column::Grade.eq(grade));
        }
        if let Some(teacher_id) = query.homeroom_teacher_id {
            select = select.filter(Column::HomeroomTeacherId.eq(teacher_id));
        }

        select = select
            .order_by_desc(Column::Year)
            .order_by_asc(Column::Grade)
            .order_by_asc(Column::ClassNumber);

        let (classrooms, pagination) = self.fetch_page(select, query.page, query.size).await?;

        let ids: Vec<i64> = classrooms.iter().map(|c| c.id).collect();
        let counts = self.count_students_in(&ids).await?;

        let items = classrooms
            .into_iter()
            .map(|c| {
                let count = counts.get(&c.id).copied().unwrap_or(0);
                c.into_classroom(count)
            })
            .collect();

        Ok(ClassroomListResponse { pagination, items })
    }

    /// 更新班级
    pub async fn update_classroom_impl(
        &self,
        id: i64,
        update: UpdateClassroomRequest,
    ) -> Result<Option<Classroom>> {
        let existing = Classrooms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询班级失败: {e}")))?;
        if existing.is_none() {
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
        if let Some(grade) = update.grade {
            model.grade = Set(grade);
        }
        if let Some(class_number) = update.class_number {
            model.class_number = Set(class_number);
        }
        if let Some(teacher_id) = update.homeroom_teacher_id {
            model.homeroom_teacher_id = Set(teacher_id);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("更新班级失败: {e}")))?;

        self.get_classroom_by_id_impl(id).await
    }

    /// 删除班级（名单级联删除）
    pub async fn delete_classroom_impl(&self, id: i64) -> Result<bool> {
        let result = Classrooms::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除班级失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生所在班级，year 为 None 时取最近学年
    pub async fn get_classroom_of_student_impl(
        &self,
        student_id: i64,
        year: Option<i32>,
    ) -> Result<Option<Classroom>> {
        let mut select = Classrooms::find()
            .join(
                JoinType::InnerJoin,
                crate::entity::classrooms::Relation::ClassroomStudents.def(),
            )
            .filter(ClassroomStudentColumn::StudentId.eq(student_id));

        if let Some(year) = year {
            select = select.filter(Column::Year.eq(year));
        }

        let result = select
            .order_by_desc(Column::Year)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询学生班级失败: {e}")))?;

        match result {
            Some(model) => {
                let counts = self.count_students_in(&[model.id]).await?;
                let count = counts.get(&model.id).copied().unwrap_or(0);
                Ok(Some(model.into_classroom(count)))
            }
            None => Ok(None),
        }
    }

    /// 统计各班级人数
    pub(crate) async fn count_students_in(&self, classroom_ids: &[i64]) -> Result<HashMap<i64, i64>> {
        if classroom_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<i64> = ClassroomStudents::find()
            .select_only()
            .column(ClassroomStudentColumn::ClassroomId)
            .filter(ClassroomStudentColumn::ClassroomId.is_in(classroom_ids.to_vec()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("统计班级人数失败: {e}")))?;

        let mut counts = HashMap::new();
        for classroom_id in rows {
            *counts.entry(classroom_id).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// 班级内全部学生 ID
    pub(crate) async fn student_ids_in_classroom(&self, classroom_id: i64) -> Result<Vec<i64>> {
        ClassroomStudents::find()
            .select_only()
            .column(ClassroomStudentColumn::StudentId)
            .filter(ClassroomStudentColumn::ClassroomId.eq(classroom_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询班级学生失败: {e}")))
    }
}

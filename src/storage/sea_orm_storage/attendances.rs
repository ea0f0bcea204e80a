//! 出勤记录存储操作

use super::SeaOrmStorage;
use crate::entity::attendances::{ActiveModel, Column, Entity as Attendances};
use crate::errors::{Result, SchoolSystemError};
use crate::models::attendances::{
    entities::Attendance,
    requests::{AttendanceListQuery, CreateAttendanceRequest, UpdateAttendanceRequest},
    responses::AttendanceListResponse,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_attendance_impl(
        &self,
        req: CreateAttendanceRequest,
        recorded_by: i64,
    ) -> Result<Attendance> {
        let now = chrono::Utc::now().timestamp();

        let result = ActiveModel {
            student_id: Set(req.student_id),
            date: Set(req.date),
            attendance_type: Set(req.attendance_type.to_string()),
            reason: Set(req.reason.to_string()),
            note: Set(req.note),
            recorded_by: Set(Some(recorded_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolSystemError::database_operation(format!("创建出勤记录失败: {e}")))?;

        Ok(result.into_attendance())
    }

    pub async fn get_attendance_by_id_impl(&self, id: i64) -> Result<Option<Attendance>> {
        let result = Attendances::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询出勤记录失败: {e}")))?;

        Ok(result.map(|m| m.into_attendance()))
    }

    /// 分页列出出勤记录，日期倒序
    pub async fn list_attendances_with_pagination_impl(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        let mut select = Attendances::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(classroom_id) = query.classroom_id {
            let student_ids = self.student_ids_in_classroom(classroom_id).await?;
            select = select.filter(Column::StudentId.is_in(student_ids));
        }
        if let Some(from) = query.from {
            select = select.filter(Column::Date.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(Column::Date.lte(to));
        }

        select = select
            .order_by_desc(Column::Date)
            .order_by_asc(Column::StudentId);

        let (records, pagination) = self.fetch_page(select, query.page, query.size).await?;

        Ok(AttendanceListResponse {
            items: records.into_iter().map(|m| m.into_attendance()).collect(),
            pagination,
        })
    }

    /// 学生在日期区间内的全部出勤记录
    pub async fn list_student_attendances_impl(
        &self,
        student_id: i64,
        from: Option<chrono::NaiveDate>,
        to: Option<chrono::NaiveDate>,
    ) -> Result<Vec<Attendance>> {
        let mut select = Attendances::find().filter(Column::StudentId.eq(student_id));
        if let Some(from) = from {
            select = select.filter(Column::Date.gte(from));
        }
        if let Some(to) = to {
            select = select.filter(Column::Date.lte(to));
        }

        let records = select
            .order_by_asc(Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("查询出勤记录失败: {e}")))?;

        Ok(records.into_iter().map(|m| m.into_attendance()).collect())
    }

    pub async fn update_attendance_impl(
        &self,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<Attendance>> {
        if self.get_attendance_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(date) = update.date {
            model.date = Set(date);
        }
        if let Some(attendance_type) = update.attendance_type {
            model.attendance_type = Set(attendance_type.to_string());
        }
        if let Some(reason) = update.reason {
            model.reason = Set(reason.to_string());
        }
        if let Some(note) = update.note {
            model.note = Set(note);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("更新出勤记录失败: {e}")))?;

        self.get_attendance_by_id_impl(id).await
    }

    pub async fn delete_attendance_impl(&self, id: i64) -> Result<bool> {
        let result = Attendances::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolSystemError::database_operation(format!("删除出勤记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendances::entities::{AttendanceReason, AttendanceType};
    use crate::storage::sea_orm_storage::fixtures;
    use chrono::NaiveDate;

    fn record(student_id: i64, day: u32, attendance_type: AttendanceType) -> CreateAttendanceRequest {
        CreateAttendanceRequest {
            student_id,
            date: NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
            attendance_type,
            reason: AttendanceReason::Illness,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_one_record_per_student_per_day() {
        let storage = SeaOrmStorage::in_memory().await;
        let teacher = fixtures::teacher(&storage, "teacher01").await;
        let student = fixtures::student(&storage, "20250101").await;

        let created = storage
            .create_attendance_impl(record(student.id, 3, AttendanceType::Absence), teacher.user_id)
            .await
            .unwrap();
        assert_eq!(created.recorded_by, Some(teacher.user_id));

        let err = storage
            .create_attendance_impl(record(student.id, 3, AttendanceType::Tardy), teacher.user_id)
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_date_range_is_inclusive() {
        let storage = SeaOrmStorage::in_memory().await;
        let teacher = fixtures::teacher(&storage, "teacher01").await;
        let student = fixtures::student(&storage, "20250101").await;
        for day in [1, 10, 20, 30] {
            storage
                .create_attendance_impl(record(student.id, day, AttendanceType::Tardy), teacher.user_id)
                .await
                .unwrap();
        }

        let ranged = storage
            .list_student_attendances_impl(
                student.id,
                NaiveDate::from_ymd_opt(2025, 4, 10),
                NaiveDate::from_ymd_opt(2025, 4, 20),
            )
            .await
            .unwrap();
        assert_eq!(ranged.len(), 2);

        let listed = storage
            .list_attendances_with_pagination_impl(AttendanceListQuery {
                page: 1,
                size: 10,
                student_id: Some(student.id),
                from: NaiveDate::from_ymd_opt(2025, 4, 15),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 2);
        assert_eq!(listed.items[0].date, NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
    }
}

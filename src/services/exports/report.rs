//! 学生成绩单
//!
//! 汇总一个学期的成绩、出勤与行为记录，输出 xlsx 或单页 PDF。

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use super::{ExportService, max_rows, pdf, pdf_response, semester_range, xlsx_response};
use crate::errors::{Result, SchoolSystemError};
use crate::models::{
    attendances::entities::AttendanceSummary,
    behaviors::{entities::Behavior, requests::BehaviorListQuery},
    classrooms::entities::Classroom,
    evaluation_methods::entities::EvaluationMethod,
    exports::{ReportExportParams, ReportFormat},
    score_summaries::entities::ScoreSummary,
    scores::entities::Score,
    students::entities::Student,
};
use crate::services::students::student_not_found;
use crate::storage::Storage;
use crate::utils::validate::{validate_school_year, validate_semester};

/// 一名学生一个学期的成绩单数据
pub(crate) struct ReportCard {
    pub student: Student,
    pub classroom: Option<Classroom>,
    pub year: i32,
    pub semester: i32,
    // (科目名, 汇总)
    pub summaries: Vec<(String, ScoreSummary)>,
    // (科目名, 评价方式, 成绩)
    pub scores: Vec<(String, EvaluationMethod, Score)>,
    pub attendance: AttendanceSummary,
    pub behaviors: Vec<Behavior>,
}

impl ReportCard {
    pub(crate) fn heading(&self) -> String {
        format!(
            "{} ({}) - {} Semester {}",
            self.student.name, self.student.student_number, self.year, self.semester
        )
    }

    pub(crate) fn classroom_label(&self) -> String {
        match &self.classroom {
            Some(c) => format!("Grade {} Class {}", c.grade, c.class_number),
            None => "Not assigned".to_string(),
        }
    }
}

pub(crate) async fn load_report_card(
    storage: &Arc<dyn Storage>,
    student: Student,
    year: i32,
    semester: i32,
) -> Result<ReportCard> {
    let subject_names: HashMap<i64, String> = storage
        .list_all_subjects()
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();
    let subject_name = |id: i64| {
        subject_names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Subject {id}"))
    };

    let mut summaries: Vec<(String, ScoreSummary)> = storage
        .list_student_score_summaries(student.id, year, semester)
        .await?
        .into_iter()
        .map(|s| (subject_name(s.subject_id), s))
        .collect();
    summaries.sort_by(|a, b| a.0.cmp(&b.0));

    let scores = storage
        .list_student_scores(student.id, year, semester)
        .await?
        .into_iter()
        .map(|(method, score)| (subject_name(method.subject_id), method, score))
        .collect();

    let (from, to) = semester_range(year, semester)?;
    let records = storage
        .list_student_attendances(student.id, Some(from), Some(to))
        .await?;
    let attendance = AttendanceSummary::tally(student.id, Some(from), Some(to), &records);

    let behaviors = storage
        .list_behaviors_with_pagination(BehaviorListQuery {
            page: 1,
            size: max_rows().max(1),
            student_id: Some(student.id),
            year: Some(year),
            semester: Some(semester),
        })
        .await?
        .items;

    let classroom = storage.get_classroom_of_student(student.id, Some(year)).await?;

    Ok(ReportCard {
        student,
        classroom,
        year,
        semester,
        summaries,
        scores,
        attendance,
        behaviors,
    })
}

pub async fn export_report(
    service: &ExportService,
    request: &HttpRequest,
    student_id: i64,
    query: ReportExportParams,
) -> ActixResult<HttpResponse> {
    validate_school_year(query.year).map_err(SchoolSystemError::validation)?;
    validate_semester(query.semester).map_err(SchoolSystemError::validation)?;

    let storage = service.get_storage(request)?;

    let Some(student) = storage.get_student_by_id(student_id).await? else {
        return Ok(student_not_found());
    };
    let card = load_report_card(&storage, student, query.year, query.semester).await?;

    info!(
        "Exporting {:?} report for student {} ({}-{})",
        query.format, student_id, query.year, query.semester
    );
    let name = format!(
        "report_{}_{}-{}",
        card.student.student_number, query.year, query.semester
    );
    Ok(match query.format {
        ReportFormat::Xlsx => xlsx_response(&name, build_report_xlsx(&card)),
        ReportFormat::Pdf => pdf_response(&name, pdf::render_report_card(&card)),
    })
}

fn build_report_xlsx(card: &ReportCard) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let title_format = Format::new().set_bold().set_font_size(14);
    let header_format = Format::new().set_bold();
    let number_format = Format::new().set_num_format("0.00");
    let wrap_format = Format::new().set_text_wrap();

    // Sheet 1: 科目汇总与评价明细
    let sheet = workbook.add_worksheet().set_name("Scores")?;
    sheet.write_string_with_format(0, 0, card.heading(), &title_format)?;
    sheet.write_string(1, 0, card.classroom_label())?;

    let headers = ["Subject", "Total", "Rank", "Cohort", "Band", "Level", "Average", "Std Dev"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(3, col as u16, *header, &header_format)?;
    }
    let mut row = 4u32;
    for (subject, summary) in &card.summaries {
        sheet.write_string(row, 0, subject)?;
        sheet.write_number_with_format(row, 1, summary.total_score, &number_format)?;
        sheet.write_number(row, 2, summary.rank)?;
        sheet.write_number(row, 3, summary.student_count)?;
        sheet.write_number(row, 4, summary.grade_band)?;
        sheet.write_string(row, 5, summary.achievement_level.to_string())?;
        sheet.write_number_with_format(row, 6, summary.subject_average, &number_format)?;
        sheet.write_number_with_format(row, 7, summary.standard_deviation, &number_format)?;
        row += 1;
    }

    row += 1;
    let detail_headers = ["Subject", "Evaluation", "Type", "Raw", "Full", "Weight", "Weighted"];
    for (col, header) in detail_headers.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, *header, &header_format)?;
    }
    row += 1;
    for (subject, method, score) in &card.scores {
        sheet.write_string(row, 0, subject)?;
        sheet.write_string(row, 1, &method.title)?;
        sheet.write_string(row, 2, method.exam_type.to_string())?;
        sheet.write_number(row, 3, score.raw_score)?;
        sheet.write_number(row, 4, method.full_score)?;
        sheet.write_number(row, 5, method.weight)?;
        sheet.write_number_with_format(row, 6, score.weighted_score, &number_format)?;
        row += 1;
    }
    sheet.set_column_width(0, 18)?;
    sheet.set_column_width(1, 20)?;

    // Sheet 2: 出勤
    let sheet = workbook.add_worksheet().set_name("Attendance")?;
    sheet.write_string_with_format(0, 0, card.heading(), &title_format)?;
    let a = &card.attendance;
    let counts = [
        ("Absence", a.by_type.absence),
        ("Tardy", a.by_type.tardy),
        ("Early leave", a.by_type.early_leave),
        ("Skipped", a.by_type.skipped),
        ("Illness", a.by_reason.illness),
        ("Authorized", a.by_reason.authorized),
        ("Unauthorized", a.by_reason.unauthorized),
        ("Other", a.by_reason.other),
        ("Total", a.total),
    ];
    sheet.write_string_with_format(2, 0, "Category", &header_format)?;
    sheet.write_string_with_format(2, 1, "Count", &header_format)?;
    for (i, (label, count)) in counts.iter().enumerate() {
        let row = 3 + i as u32;
        sheet.write_string(row, 0, *label)?;
        sheet.write_number(row, 1, *count as f64)?;
    }
    sheet.set_column_width(0, 16)?;

    // Sheet 3: 行为特点
    let sheet = workbook.add_worksheet().set_name("Behavior")?;
    sheet.write_string_with_format(0, 0, card.heading(), &title_format)?;
    sheet.write_string_with_format(2, 0, "Date", &header_format)?;
    sheet.write_string_with_format(2, 1, "Note", &header_format)?;
    for (i, behavior) in card.behaviors.iter().enumerate() {
        let row = 3 + i as u32;
        sheet.write_string(row, 0, behavior.created_at.format("%Y-%m-%d").to_string())?;
        sheet.write_string_with_format(row, 1, &behavior.content, &wrap_format)?;
    }
    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(1, 80)?;

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendances::{
        entities::{AttendanceReason, AttendanceType},
        requests::CreateAttendanceRequest,
    };
    use crate::models::behaviors::requests::CreateBehaviorRequest;
    use crate::services::test_support::{admin, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_report_card_collects_semester_records() {
        let (raw, shared) = storage().await;
        let classroom = fixtures::classroom(&raw, 2025, 2, None).await;
        let subject = fixtures::subject(&raw, "History").await;
        let method = fixtures::method(&raw, subject.id, "Essay", 40.0, 50.0).await;
        let student = fixtures::student(&raw, "S001").await;
        let recorder = admin(&shared).await;
        shared
            .add_classroom_student(classroom.id, student.id, Some(7))
            .await
            .unwrap();
        fixtures::scores(&raw, &method, &[(student.id, 45.0)]).await;

        for (date, kind) in [
            (NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(), AttendanceType::Tardy),
            (NaiveDate::from_ymd_opt(2025, 10, 2).unwrap(), AttendanceType::Absence),
        ] {
            shared
                .create_attendance(
                    CreateAttendanceRequest {
                        student_id: student.id,
                        date,
                        attendance_type: kind,
                        reason: AttendanceReason::Illness,
                        note: None,
                    },
                    recorder.id,
                )
                .await
                .unwrap();
        }
        shared
            .create_behavior(
                CreateBehaviorRequest {
                    student_id: student.id,
                    year: 2025,
                    semester: 1,
                    content: "Helps classmates with reading.".to_string(),
                },
                recorder.id,
            )
            .await
            .unwrap();

        let card = load_report_card(&shared, student.clone(), 2025, 1).await.unwrap();
        assert_eq!(card.classroom_label(), "Grade 3 Class 2");
        assert_eq!(card.summaries.len(), 1);
        assert_eq!(card.summaries[0].0, "History");
        assert_eq!(card.summaries[0].1.total_score, 36.0);
        assert_eq!(card.scores.len(), 1);
        // 第 2 学期的缺席不计入第 1 学期
        assert_eq!(card.attendance.total, 1);
        assert_eq!(card.attendance.by_type.tardy, 1);
        assert_eq!(card.behaviors.len(), 1);

        let service = ExportService::with_storage(shared.clone());
        let request = request_as(recorder);
        for format in [ReportFormat::Xlsx, ReportFormat::Pdf] {
            let resp = export_report(
                &service,
                &request,
                student.id,
                ReportExportParams {
                    year: 2025,
                    semester: 1,
                    format,
                },
            )
            .await
            .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let resp = export_report(
            &service,
            &request,
            student.id + 100,
            ReportExportParams {
                year: 2025,
                semester: 1,
                format: ReportFormat::Pdf,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

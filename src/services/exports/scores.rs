use std::collections::{BTreeMap, HashMap};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rust_xlsxwriter::{Format, Workbook};

use super::{ExportService, check_row_limit, max_rows, xlsx_response};
use crate::errors::{Result, SchoolSystemError};
use crate::models::{
    classroom_students::entities::ClassroomStudent,
    classrooms::entities::Classroom,
    exports::ClassroomScoreExportParams,
    score_summaries::{entities::ScoreSummary, requests::ScoreSummaryListQuery},
};
use crate::services::classrooms::classroom_not_found;
use crate::services::score_summaries::calculate::mean_and_deviation;
use crate::utils::validate::{validate_school_year, validate_semester};

/// 科目层面的统计
///
/// 本班数据由导出的汇总行重新计算；年级数据是汇总行上记录的整个年级范围的统计，
/// 同一范围内每行都相同。
struct SubjectStats {
    name: String,
    class_count: usize,
    class_average: f64,
    class_deviation: f64,
    grade_count: i32,
    grade_average: f64,
    grade_deviation: f64,
}

pub async fn export_classroom_scores(
    service: &ExportService,
    request: &HttpRequest,
    classroom_id: i64,
    query: ClassroomScoreExportParams,
) -> ActixResult<HttpResponse> {
    validate_semester(query.semester).map_err(SchoolSystemError::validation)?;
    if let Some(year) = query.year {
        validate_school_year(year).map_err(SchoolSystemError::validation)?;
    }

    let storage = service.get_storage(request)?;

    let Some(classroom) = storage.get_classroom_by_id(classroom_id).await? else {
        return Ok(classroom_not_found());
    };
    let year = query.year.unwrap_or(classroom.year);

    let response = storage
        .list_score_summaries_with_pagination(ScoreSummaryListQuery {
            page: 1,
            size: max_rows().max(1),
            classroom_id: Some(classroom_id),
            year: Some(year),
            semester: Some(query.semester),
            ..Default::default()
        })
        .await?;
    check_row_limit(response.pagination.total as u64)?;

    let roster = storage.list_classroom_students(classroom_id).await?;
    let subject_names: HashMap<i64, String> = storage
        .list_all_subjects()
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    let name = format!(
        "scores_{}_{}-{}_{}-{}",
        classroom.year, classroom.grade, classroom.class_number, year, query.semester
    );
    Ok(xlsx_response(
        &name,
        build_scores_xlsx(
            &classroom,
            year,
            query.semester,
            &roster,
            &response.items,
            &subject_names,
        ),
    ))
}

fn subject_stats(
    summaries: &[ScoreSummary],
    subject_names: &HashMap<i64, String>,
) -> Vec<SubjectStats> {
    let mut by_subject: BTreeMap<i64, Vec<&ScoreSummary>> = BTreeMap::new();
    for summary in summaries {
        by_subject.entry(summary.subject_id).or_default().push(summary);
    }
    let mut stats: Vec<SubjectStats> = by_subject
        .into_iter()
        .filter_map(|(subject_id, rows)| {
            let first = *rows.first()?;
            let (class_average, class_deviation) =
                mean_and_deviation(rows.iter().map(|r| r.total_score));
            Some(SubjectStats {
                name: subject_names
                    .get(&subject_id)
                    .cloned()
                    .unwrap_or_else(|| format!("Subject {subject_id}")),
                class_count: rows.len(),
                class_average,
                class_deviation,
                grade_count: first.student_count,
                grade_average: first.subject_average,
                grade_deviation: first.standard_deviation,
            })
        })
        .collect();
    stats.sort_by(|a, b| a.name.cmp(&b.name));
    stats
}

fn build_scores_xlsx(
    classroom: &Classroom,
    year: i32,
    semester: i32,
    roster: &[ClassroomStudent],
    summaries: &[ScoreSummary],
    subject_names: &HashMap<i64, String>,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let title_format = Format::new().set_bold().set_font_size(14);
    let header_format = Format::new().set_bold();
    let number_format = Format::new().set_num_format("0.00");
    let title = format!(
        "{} Grade {} Class {} / {} Semester {}",
        classroom.year, classroom.grade, classroom.class_number, year, semester
    );

    // Sheet 1: 科目统计，本班与年级分列
    let sheet = workbook.add_worksheet().set_name("Subjects")?;
    sheet.write_string_with_format(0, 0, &title, &title_format)?;
    let headers = [
        "Subject",
        "Class Students",
        "Class Average",
        "Class Std Dev",
        "Grade Students",
        "Grade Average",
        "Grade Std Dev",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(2, col as u16, *header, &header_format)?;
    }
    for (i, stats) in subject_stats(summaries, subject_names).iter().enumerate() {
        let row = 3 + i as u32;
        sheet.write_string(row, 0, &stats.name)?;
        sheet.write_number(row, 1, stats.class_count as f64)?;
        sheet.write_number_with_format(row, 2, stats.class_average, &number_format)?;
        sheet.write_number_with_format(row, 3, stats.class_deviation, &number_format)?;
        sheet.write_number(row, 4, stats.grade_count)?;
        sheet.write_number_with_format(row, 5, stats.grade_average, &number_format)?;
        sheet.write_number_with_format(row, 6, stats.grade_deviation, &number_format)?;
    }
    sheet.set_column_width(0, 20)?;

    // Sheet 2: 学生明细，按班内学号与科目排序
    let numbers: HashMap<i64, (i32, &str)> = roster
        .iter()
        .map(|e| (e.student_id, (e.number, e.student.name.as_str())))
        .collect();
    let mut rows: Vec<(&ScoreSummary, i32, &str, &str)> = summaries
        .iter()
        .filter_map(|s| {
            let (number, name) = numbers.get(&s.student_id)?;
            let subject = subject_names
                .get(&s.subject_id)
                .map(String::as_str)
                .unwrap_or("");
            Some((s, *number, *name, subject))
        })
        .collect();
    rows.sort_by(|a, b| a.1.cmp(&b.1).then(a.3.cmp(b.3)));

    let sheet = workbook.add_worksheet().set_name("Students")?;
    sheet.write_string_with_format(0, 0, &title, &title_format)?;
    let headers = [
        "No.", "Name", "Subject", "Total", "Rank", "Cohort", "Band", "Level",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(2, col as u16, *header, &header_format)?;
    }
    for (i, (summary, number, name, subject)) in rows.iter().enumerate() {
        let row = 3 + i as u32;
        sheet.write_number(row, 0, *number)?;
        sheet.write_string(row, 1, *name)?;
        sheet.write_string(row, 2, *subject)?;
        sheet.write_number_with_format(row, 3, summary.total_score, &number_format)?;
        sheet.write_number(row, 4, summary.rank)?;
        sheet.write_number(row, 5, summary.student_count)?;
        sheet.write_number(row, 6, summary.grade_band)?;
        sheet.write_string(row, 7, summary.achievement_level.to_string())?;
    }
    sheet.set_column_width(1, 16)?;
    sheet.set_column_width(2, 20)?;

    Ok(workbook.save_to_buffer()?)
}

pub mod pdf;
pub mod report;
pub mod roster;
pub mod scores;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{NaiveDate, Utc};
use tracing::error;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolSystemError};
use crate::models::exports::{ClassroomScoreExportParams, ReportExportParams};
use crate::models::{ApiResponse, ErrorCode};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const PDF_CONTENT_TYPE: &str = "application/pdf";

crate::services::define_service!(
    /// 名单、成绩与成绩单的文件导出
    ExportService
);

impl ExportService {
    pub async fn export_roster(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
    ) -> ActixResult<HttpResponse> {
        roster::export_roster(self, request, classroom_id).await
    }

    pub async fn export_classroom_scores(
        &self,
        request: &HttpRequest,
        classroom_id: i64,
        query: ClassroomScoreExportParams,
    ) -> ActixResult<HttpResponse> {
        scores::export_classroom_scores(self, request, classroom_id, query).await
    }

    pub async fn export_report(
        &self,
        request: &HttpRequest,
        student_id: i64,
        query: ReportExportParams,
    ) -> ActixResult<HttpResponse> {
        report::export_report(self, request, student_id, query).await
    }
}

pub(crate) fn max_rows() -> u64 {
    AppConfig::get().export.max_rows
}

pub(crate) fn check_row_limit(rows: u64) -> Result<()> {
    let limit = max_rows();
    if rows > limit {
        return Err(SchoolSystemError::validation(format!(
            "Export has {rows} rows, the limit is {limit}"
        )));
    }
    Ok(())
}

/// 学期对应的日期区间：第 1 学期 3/1 至 8/31，第 2 学期 9/1 至次年 2 月底
pub(crate) fn semester_range(year: i32, semester: i32) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = || SchoolSystemError::validation("Invalid school year or semester");
    let (from, next_start) = match semester {
        1 => (
            NaiveDate::from_ymd_opt(year, 3, 1).ok_or_else(invalid)?,
            NaiveDate::from_ymd_opt(year, 9, 1).ok_or_else(invalid)?,
        ),
        2 => (
            NaiveDate::from_ymd_opt(year, 9, 1).ok_or_else(invalid)?,
            NaiveDate::from_ymd_opt(year + 1, 3, 1).ok_or_else(invalid)?,
        ),
        _ => return Err(invalid()),
    };
    let to = next_start.pred_opt().ok_or_else(invalid)?;
    Ok((from, to))
}

fn timestamp() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

fn download(content_type: &str, filename: String, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(bytes)
}

/// 文件生成结果转为下载响应，失败记录日志并返回 500
pub(crate) fn xlsx_response(name: &str, generated: Result<Vec<u8>>) -> HttpResponse {
    match generated {
        Ok(bytes) => download(
            XLSX_CONTENT_TYPE,
            format!("{name}_{}.xlsx", timestamp()),
            bytes,
        ),
        Err(e) => export_failed(name, e),
    }
}

pub(crate) fn pdf_response(name: &str, generated: Result<Vec<u8>>) -> HttpResponse {
    match generated {
        Ok(bytes) => download(PDF_CONTENT_TYPE, format!("{name}_{}.pdf", timestamp()), bytes),
        Err(e) => export_failed(name, e),
    }
}

fn export_failed(name: &str, e: SchoolSystemError) -> HttpResponse {
    error!("Failed to generate export {}: {}", name, e);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::ExportFailed,
        "Failed to generate export file",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semester_range() {
        let (from, to) = semester_range(2025, 1).unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 8, 31).unwrap());

        // 闰年二月
        let (from, to) = semester_range(2027, 2).unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2027, 9, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2028, 2, 29).unwrap());

        assert!(semester_range(2025, 3).is_err());
    }

    #[test]
    fn test_row_limit() {
        assert!(check_row_limit(max_rows()).is_ok());
        assert!(check_row_limit(max_rows() + 1).is_err());
    }

    #[test]
    fn test_failed_export_is_500() {
        let resp = xlsx_response("roster", Err(SchoolSystemError::export("broken")));
        assert_eq!(
            resp.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

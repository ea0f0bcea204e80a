use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use super::{ExportService, check_row_limit, xlsx_response};
use crate::errors::Result;
use crate::models::{classroom_students::entities::ClassroomStudent, classrooms::entities::Classroom};
use crate::services::classrooms::classroom_not_found;

const HEADERS: [&str; 8] = [
    "No.",
    "Student Number",
    "Name",
    "Gender",
    "Birth Date",
    "Phone",
    "Guardian",
    "Guardian Phone",
];

pub async fn export_roster(
    service: &ExportService,
    request: &HttpRequest,
    classroom_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(classroom) = storage.get_classroom_by_id(classroom_id).await? else {
        return Ok(classroom_not_found());
    };
    let entries = storage.list_classroom_students(classroom_id).await?;
    check_row_limit(entries.len() as u64)?;

    info!(
        "Exporting roster of classroom {} ({} students)",
        classroom_id,
        entries.len()
    );
    let name = format!(
        "roster_{}_{}-{}",
        classroom.year, classroom.grade, classroom.class_number
    );
    Ok(xlsx_response(&name, build_roster_xlsx(&classroom, &entries)))
}

pub(crate) fn build_roster_xlsx(classroom: &Classroom, entries: &[ClassroomStudent]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let title_format = Format::new().set_bold().set_font_size(14);
    let header_format = Format::new().set_bold();

    let sheet = workbook.add_worksheet().set_name("Roster")?;
    sheet.write_string_with_format(
        0,
        0,
        format!(
            "{} Grade {} Class {}",
            classroom.year, classroom.grade, classroom.class_number
        ),
        &title_format,
    )?;

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string_with_format(2, col as u16, *header, &header_format)?;
    }

    for (i, entry) in entries.iter().enumerate() {
        let row = 3 + i as u32;
        let student = &entry.student;
        sheet.write_number(row, 0, entry.number)?;
        sheet.write_string(row, 1, &student.student_number)?;
        sheet.write_string(row, 2, &student.name)?;
        sheet.write_string(row, 3, student.gender.to_string())?;
        sheet.write_string(
            row,
            4,
            student
                .birth_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
        )?;
        sheet.write_string(row, 5, student.phone.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 6, student.guardian_name.as_deref().unwrap_or(""))?;
        sheet.write_string(row, 7, student.guardian_phone.as_deref().unwrap_or(""))?;
    }

    sheet.set_column_width(1, 16)?;
    sheet.set_column_width(2, 16)?;
    sheet.set_column_width(5, 16)?;
    sheet.set_column_width(7, 16)?;

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{admin, request_as, storage};
    use crate::storage::sea_orm_storage::fixtures;
    use actix_web::http::StatusCode;

    #[tokio::test]
    async fn test_roster_download() {
        let (raw, shared) = storage().await;
        let classroom = fixtures::classroom(&raw, 2025, 1, None).await;
        let student = fixtures::student(&raw, "S001").await;
        shared
            .add_classroom_student(classroom.id, student.id, Some(1))
            .await
            .unwrap();
        let service = ExportService::with_storage(shared.clone());
        let request = request_as(admin(&shared).await);

        let resp = export_roster(&service, &request, classroom.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let disposition = resp
            .headers()
            .get("Content-Disposition")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"roster_2025_3-1_"));
        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        // xlsx 是 zip 包
        assert_eq!(&bytes[..2], b"PK");

        let resp = export_roster(&service, &request, classroom.id + 100)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

use crate::models::common::deserialize_optional_from_str;
use serde::Deserialize;
use ts_rs::TS;

// 班级成绩导出参数，year 缺省取班级所在学年
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/export.ts")]
pub struct ClassroomScoreExportParams {
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub year: Option<i32>,
    pub semester: i32,
}

// 成绩单格式
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/export.ts")]
pub enum ReportFormat {
    #[default]
    Xlsx,
    Pdf,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "bindings/export.ts")]
pub struct ReportExportParams {
    pub year: i32,
    pub semester: i32,
    #[serde(default)]
    pub format: ReportFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Query;

    #[test]
    fn test_report_format_defaults_to_xlsx() {
        let params = Query::<ReportExportParams>::from_query("year=2025&semester=1")
            .unwrap()
            .into_inner();
        assert_eq!(params.format, ReportFormat::Xlsx);

        let params = Query::<ReportExportParams>::from_query("year=2025&semester=2&format=pdf")
            .unwrap()
            .into_inner();
        assert_eq!(params.format, ReportFormat::Pdf);
        assert!(Query::<ReportExportParams>::from_query("year=2025&semester=1&format=csv").is_err());
    }

    #[test]
    fn test_score_export_year_optional() {
        let params = Query::<ClassroomScoreExportParams>::from_query("semester=1")
            .unwrap()
            .into_inner();
        assert_eq!(params.year, None);
        assert_eq!(params.semester, 1);
    }
}

pub mod requests;

pub use requests::{ClassroomScoreExportParams, ReportExportParams, ReportFormat};

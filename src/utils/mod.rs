pub mod error_response;
pub mod extractor;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod rounding;
pub mod sql;
pub mod validate;

pub use extractor::{SafeIDI64, SafeStudentIdI64};
pub use parameter_error_handler::{json_error_handler, path_error_handler, query_error_handler};
pub use rounding::round2;
pub use sql::escape_like_pattern;

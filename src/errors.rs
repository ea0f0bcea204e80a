//! 统一错误处理模块
//!
//! 存储层与业务层共用的错误类型，由宏生成错误代码、类型名称与便捷构造函数。
//! HTTP 层的错误码见 `models::ErrorCode`。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_school_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolSystemError {
            $($variant(String),)*
        }

        impl SchoolSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolSystemError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SchoolSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_school_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Resource Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Notification("E014", "Notification Dispatch Error"),
    Export("E015", "Export Error"),
}

impl SchoolSystemError {
    /// 是否为唯一约束冲突
    ///
    /// SQLite / PostgreSQL / MySQL 的报错文本各不相同，这里统一识别。
    pub fn is_unique_violation(&self) -> bool {
        match self {
            SchoolSystemError::Conflict(_) => true,
            SchoolSystemError::DatabaseOperation(msg) => {
                msg.contains("UNIQUE constraint failed")
                    || msg.contains("duplicate key value")
                    || msg.contains("Duplicate entry")
            }
            _ => false,
        }
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SchoolSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolSystemError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SchoolSystemError {
    fn from(err: sea_orm::DbErr) -> Self {
        SchoolSystemError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SchoolSystemError {
    fn from(err: std::io::Error) -> Self {
        SchoolSystemError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolSystemError {
    fn from(err: serde_json::Error) -> Self {
        SchoolSystemError::Serialization(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for SchoolSystemError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        SchoolSystemError::Export(err.to_string())
    }
}

impl From<printpdf::Error> for SchoolSystemError {
    fn from(err: printpdf::Error) -> Self {
        SchoolSystemError::Export(err.to_string())
    }
}

impl From<reqwest::Error> for SchoolSystemError {
    fn from(err: reqwest::Error) -> Self {
        SchoolSystemError::Notification(err.to_string())
    }
}

impl From<chrono::ParseError> for SchoolSystemError {
    fn from(err: chrono::ParseError) -> Self {
        SchoolSystemError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchoolSystemError::cache_connection("test").code(), "E001");
        assert_eq!(SchoolSystemError::database_config("test").code(), "E003");
        assert_eq!(SchoolSystemError::validation("test").code(), "E007");
        assert_eq!(SchoolSystemError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SchoolSystemError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            SchoolSystemError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = SchoolSystemError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_new_variants() {
        assert_eq!(SchoolSystemError::conflict("dup").code(), "E010");
        assert_eq!(SchoolSystemError::notification("fcm").code(), "E014");
        assert_eq!(SchoolSystemError::export("xlsx").error_type(), "Export Error");
    }

    #[test]
    fn test_unique_violation_detection() {
        assert!(
            SchoolSystemError::database_operation(
                "UNIQUE constraint failed: students.student_number"
            )
            .is_unique_violation()
        );
        assert!(
            SchoolSystemError::database_operation(
                "duplicate key value violates unique constraint"
            )
            .is_unique_violation()
        );
        assert!(SchoolSystemError::conflict("taken").is_unique_violation());
        assert!(!SchoolSystemError::validation("bad").is_unique_violation());
    }

    #[test]
    fn test_format_simple() {
        let err = SchoolSystemError::validation("Invalid grade");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid grade"));
    }
}

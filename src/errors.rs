//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

use sea_orm::{DbErr, SqlErr};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_edumanager_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum EduManagerError {
            $($variant(String),)*
        }

        impl EduManagerError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EduManagerError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EduManagerError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EduManagerError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EduManagerError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EduManagerError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_edumanager_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    Serialization("E006", "Serialization Error"),
    Authentication("E007", "Authentication Error"),
    Authorization("E008", "Authorization Error"),
    NotEnrolled("E009", "Student Not Enrolled"),
    OutOfRange("E010", "Grade Out Of Range"),
    DuplicateGrade("E011", "Duplicate Grade"),
    ConstraintViolation("E012", "Constraint Violation"),
}

impl EduManagerError {
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

    /// 带上下文转换数据库错误，唯一约束冲突单独归类
    pub fn from_db(context: &str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                EduManagerError::ConstraintViolation(format!("{context}: {detail}"))
            }
            _ => EduManagerError::DatabaseOperation(format!("{context}: {err}")),
        }
    }
}

impl fmt::Display for EduManagerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EduManagerError {}

// 为常见的错误类型实现 From trait
impl From<DbErr> for EduManagerError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                EduManagerError::ConstraintViolation(detail)
            }
            _ => EduManagerError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for EduManagerError {
    fn from(err: serde_json::Error) -> Self {
        EduManagerError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EduManagerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EduManagerError::database_config("test").code(), "E001");
        assert_eq!(EduManagerError::validation("test").code(), "E004");
        assert_eq!(EduManagerError::not_enrolled("test").code(), "E009");
        assert_eq!(EduManagerError::duplicate_grade("test").code(), "E011");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EduManagerError::out_of_range("test").error_type(),
            "Grade Out Of Range"
        );
        assert_eq!(
            EduManagerError::authorization("test").error_type(),
            "Authorization Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = EduManagerError::not_found("Activity 3 not found");
        assert_eq!(err.message(), "Activity 3 not found");
    }

    #[test]
    fn test_format_simple() {
        let err = EduManagerError::duplicate_grade("already graded");
        let formatted = err.format_simple();
        assert!(formatted.contains("Duplicate Grade"));
        assert!(formatted.contains("already graded"));
    }

    #[test]
    fn test_plain_db_error_is_database_operation() {
        let err = EduManagerError::from_db("查询成绩失败", DbErr::Custom("boom".into()));
        assert_eq!(err.code(), "E003");
        assert!(err.message().starts_with("查询成绩失败"));
    }
}

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{EduManagerError, Result};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

/// 科目、学生、活动名称的最大长度
pub const MAX_NAME_LENGTH: usize = 100;

// 常见弱密码
const WEAK_PASSWORDS: [&str; 7] = [
    "password",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "password1",
    "abcd1234",
];

pub fn validate_username(username: &str) -> Result<()> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err(EduManagerError::validation(
            "Username length must be between 5 and 16 characters",
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(EduManagerError::validation(
            "Username must contain only letters, numbers, underscores or hyphens",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(EduManagerError::validation("Email format is invalid"));
    }
    Ok(())
}

/// 校验密码策略：至少 8 位，同时包含大小写字母与数字，且不在弱密码表中
///
/// 所有不满足的规则合并为一条错误信息返回。
pub fn validate_password(password: &str) -> Result<()> {
    let mut errors = Vec::new();

    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if WEAK_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(EduManagerError::validation(errors.join("; ")))
    }
}

/// 校验并修剪名称，返回去掉首尾空白后的值
pub fn validate_name(field: &str, name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EduManagerError::validation(format!(
            "{field} must not be empty"
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(EduManagerError::validation(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<()>) -> String {
        result.unwrap_err().message().to_string()
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_ok());
        assert!(validate_password("SecurePass123").is_ok());
    }

    #[test]
    fn test_password_rules_are_combined() {
        let msg = message(validate_password("abc"));
        assert!(msg.contains("at least 8 characters"));
        assert!(msg.contains("uppercase"));
        assert!(msg.contains("digit"));
        assert!(!msg.contains("lowercase"));
    }

    #[test]
    fn test_common_password() {
        let msg = message(validate_password("Password1"));
        assert!(msg.contains("too common"));
    }

    #[test]
    fn test_username() {
        assert!(validate_username("teacher_1").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("a-very-long-username").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("t1@school.edu").is_ok());
        assert!(validate_email("no-at-sign.edu").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_name_is_trimmed_and_bounded() {
        assert_eq!(validate_name("Subject name", "  Math  ").unwrap(), "Math");
        assert!(validate_name("Subject name", "   ").is_err());
        assert!(validate_name("Subject name", &"x".repeat(101)).is_err());
        // 按字符计数
        assert!(validate_name("Subject name", &"数".repeat(100)).is_ok());
    }
}

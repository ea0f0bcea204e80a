use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// 允许国际区号前缀与连字符，例如 010-1234-5678、+82-10-1234-5678
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9-]{6,18}[0-9]$").expect("Invalid phone regex"));

static STUDENT_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]{1,20}$").expect("Invalid student number regex"));

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：5 <= x <= 16
    if username.len() < 5 || username.len() > 16 {
        return Err("Username length must be between 5 and 16 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone) {
        return Err("Phone number format is invalid");
    }
    Ok(())
}

pub fn validate_student_number(number: &str) -> Result<(), &'static str> {
    if !STUDENT_NUMBER_RE.is_match(number) {
        return Err("Student number must be 1-20 letters, digits or hyphens");
    }
    Ok(())
}

/// 必填文本：去除首尾空白后非空且不超过 max_chars 个字符
pub fn validate_text(field: &str, value: &str, max_chars: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if trimmed.chars().count() > max_chars {
        return Err(format!("{field} must be at most {max_chars} characters"));
    }
    Ok(())
}

pub fn validate_school_year(year: i32) -> Result<(), &'static str> {
    if !(2000..=2100).contains(&year) {
        return Err("Year must be between 2000 and 2100");
    }
    Ok(())
}

pub fn validate_semester(semester: i32) -> Result<(), &'static str> {
    if semester != 1 && semester != 2 {
        return Err("Semester must be 1 or 2");
    }
    Ok(())
}

pub fn validate_grade(grade: i32) -> Result<(), &'static str> {
    if !(1..=6).contains(&grade) {
        return Err("Grade must be between 1 and 6");
    }
    Ok(())
}

/// 日期区间：两端都给出时要求 from <= to
pub fn validate_date_range(
    from: Option<chrono::NaiveDate>,
    to: Option<chrono::NaiveDate>,
) -> Result<(), &'static str> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err("'from' must not be later than 'to'"),
        _ => Ok(()),
    }
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：大写字母 + 小写字母 + 数字
/// - 可选：特殊字符（增强安全性）
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    // 1. 长度检查：至少 8 个字符
    if password.len() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    // 2. 大写字母检查
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }

    // 3. 小写字母检查
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }

    // 4. 数字检查
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    // 5. 常见弱密码检查
    let weak_passwords = [
        "password",
        "12345678",
        "123456789",
        "qwerty123",
        "admin123",
        "password1",
        "Password1",
        "Qwerty123",
        "Abcd1234",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_and_email() {
        assert!(validate_username("park_01").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_email("teacher@school.kr").is_ok());
        assert!(validate_email("teacher@school").is_err());
    }

    #[test]
    fn test_phone_numbers() {
        assert!(validate_phone("010-1234-5678").is_ok());
        assert!(validate_phone("+82-10-1234-5678").is_ok());
        assert!(validate_phone("01012345678").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("010-abcd-5678").is_err());
    }

    #[test]
    fn test_term_fields() {
        assert!(validate_school_year(2025).is_ok());
        assert!(validate_school_year(1999).is_err());
        assert!(validate_semester(2).is_ok());
        assert!(validate_semester(3).is_err());
        assert!(validate_grade(6).is_ok());
        assert!(validate_grade(0).is_err());
    }

    #[test]
    fn test_date_range() {
        let d = |day| chrono::NaiveDate::from_ymd_opt(2025, 5, day);
        assert!(validate_date_range(d(1), d(31)).is_ok());
        assert!(validate_date_range(d(2), d(2)).is_ok());
        assert!(validate_date_range(d(10), d(1)).is_err());
        assert!(validate_date_range(None, d(1)).is_ok());
    }

    #[test]
    fn test_text_limits() {
        assert!(validate_text("name", "Kim", 50).is_ok());
        assert!(validate_text("name", "   ", 50).is_err());
        assert!(validate_text("name", &"가".repeat(51), 50).is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("MyP@ssw0rd").is_valid);
        assert!(validate_password("SecurePass123").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
    }

    #[test]
    fn test_no_uppercase() {
        let result = validate_password("abcd1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one uppercase letter")
        );
    }

    #[test]
    fn test_no_lowercase() {
        let result = validate_password("ABCD1234");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one lowercase letter")
        );
    }

    #[test]
    fn test_no_digit() {
        let result = validate_password("AbcdEfgh");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Password1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }
}

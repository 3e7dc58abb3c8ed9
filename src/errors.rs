use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SluglinkerError {
    Storage(String),
    Serialization(String),
    Validation(String),
    InvalidUrl(String),
    DuplicateSlug(String),
    NotFound(String),
    MalformedFragment(String),
    BaselineFetch(String),
    Config(String),
}

impl SluglinkerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SluglinkerError::Storage(_) => "E001",
            SluglinkerError::Serialization(_) => "E002",
            SluglinkerError::Validation(_) => "E003",
            SluglinkerError::InvalidUrl(_) => "E004",
            SluglinkerError::DuplicateSlug(_) => "E005",
            SluglinkerError::NotFound(_) => "E006",
            SluglinkerError::MalformedFragment(_) => "E007",
            SluglinkerError::BaselineFetch(_) => "E008",
            SluglinkerError::Config(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SluglinkerError::Storage(_) => "Storage Error",
            SluglinkerError::Serialization(_) => "Serialization Error",
            SluglinkerError::Validation(_) => "Validation Error",
            SluglinkerError::InvalidUrl(_) => "Invalid URL",
            SluglinkerError::DuplicateSlug(_) => "Duplicate Slug",
            SluglinkerError::NotFound(_) => "Resource Not Found",
            SluglinkerError::MalformedFragment(_) => "Malformed Fragment",
            SluglinkerError::BaselineFetch(_) => "Baseline Fetch Error",
            SluglinkerError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SluglinkerError::Storage(msg)
            | SluglinkerError::Serialization(msg)
            | SluglinkerError::Validation(msg)
            | SluglinkerError::InvalidUrl(msg)
            | SluglinkerError::DuplicateSlug(msg)
            | SluglinkerError::NotFound(msg)
            | SluglinkerError::MalformedFragment(msg)
            | SluglinkerError::BaselineFetch(msg)
            | SluglinkerError::Config(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于终端）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为调用方可修正的校验类错误
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SluglinkerError::Validation(_)
                | SluglinkerError::InvalidUrl(_)
                | SluglinkerError::DuplicateSlug(_)
        )
    }
}

impl fmt::Display for SluglinkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SluglinkerError {}

// 便捷的构造函数
impl SluglinkerError {
    pub fn storage<T: Into<String>>(msg: T) -> Self {
        SluglinkerError::Storage(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SluglinkerError::Serialization(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SluglinkerError::Validation(msg.into())
    }

    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        SluglinkerError::InvalidUrl(msg.into())
    }

    pub fn duplicate_slug<T: Into<String>>(msg: T) -> Self {
        SluglinkerError::DuplicateSlug(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SluglinkerError::NotFound(msg.into())
    }

    pub fn malformed_fragment<T: Into<String>>(msg: T) -> Self {
        SluglinkerError::MalformedFragment(msg.into())
    }

    pub fn baseline_fetch<T: Into<String>>(msg: T) -> Self {
        SluglinkerError::BaselineFetch(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        SluglinkerError::Config(msg.into())
    }
}

impl From<std::io::Error> for SluglinkerError {
    fn from(err: std::io::Error) -> Self {
        SluglinkerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for SluglinkerError {
    fn from(err: serde_json::Error) -> Self {
        SluglinkerError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for SluglinkerError {
    fn from(err: url::ParseError) -> Self {
        SluglinkerError::InvalidUrl(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SluglinkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            SluglinkerError::storage("a"),
            SluglinkerError::serialization("a"),
            SluglinkerError::validation("a"),
            SluglinkerError::invalid_url("a"),
            SluglinkerError::duplicate_slug("a"),
            SluglinkerError::not_found("a"),
            SluglinkerError::malformed_fragment("a"),
            SluglinkerError::baseline_fetch("a"),
            SluglinkerError::config("a"),
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_format_simple() {
        let err = SluglinkerError::duplicate_slug("slug 'abc' already exists");
        assert_eq!(
            err.format_simple(),
            "Duplicate Slug: slug 'abc' already exists"
        );
        assert_eq!(err.to_string(), err.format_simple());
    }

    #[test]
    fn test_is_validation() {
        assert!(SluglinkerError::duplicate_slug("x").is_validation());
        assert!(SluglinkerError::invalid_url("x").is_validation());
        assert!(!SluglinkerError::storage("x").is_validation());
    }

    #[test]
    fn test_from_serde_error() {
        let err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let converted: SluglinkerError = err.into();
        assert!(matches!(converted, SluglinkerError::Serialization(_)));
    }
}

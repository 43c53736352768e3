use regex::Regex;
use std::sync::LazyLock;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>'"&]"#).expect("valid regex"));
static EMAIL_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9@._\-+]").expect("valid regex"));
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Strips HTML tags and markup-significant characters, then trims.
pub fn sanitize_text(input: &str) -> String {
    let without_tags = HTML_TAG.replace_all(input, "");
    UNSAFE_CHARS
        .replace_all(&without_tags, "")
        .trim()
        .to_string()
}

/// Like `sanitize_text`, but maps an empty result to `None`.
pub fn sanitize_optional_text(input: Option<&str>) -> Option<String> {
    input.map(sanitize_text).filter(|text| !text.is_empty())
}

pub fn sanitize_email(email: &str) -> String {
    let lowered = email.trim().to_lowercase();
    EMAIL_DISALLOWED.replace_all(&lowered, "").to_string()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Returns the list of password policy violations, empty when the password is acceptable.
pub fn password_problems(password: &str) -> Vec<&'static str> {
    let mut problems = Vec::new();

    if password.chars().count() < 8 {
        problems.push("Password must be at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push("Password must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        problems.push("Password must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("Password must contain a digit");
    }

    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_text_strips_tags_and_quotes() {
        assert_eq!(
            sanitize_text("  <b>GOR</b> \"Senayan\" & co  "),
            "GOR Senayan  co"
        );
        assert_eq!(sanitize_text("<script>alert(1)</script>"), "alert(1)");
    }

    #[test]
    fn test_sanitize_optional_text_drops_empty() {
        assert_eq!(sanitize_optional_text(Some("   ")), None);
        assert_eq!(sanitize_optional_text(Some("<i></i>")), None);
        assert_eq!(
            sanitize_optional_text(Some(" bring shoes ")),
            Some("bring shoes".to_string())
        );
        assert_eq!(sanitize_optional_text(None), None);
    }

    #[test]
    fn test_sanitize_email() {
        assert_eq!(sanitize_email("  Budi.Santoso@Example.COM "), "budi.santoso@example.com");
        assert_eq!(sanitize_email("a b<c>@x.io"), "abc@x.io");
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("player@sportly.id"));
        assert!(!is_valid_email("player@sportly"));
        assert!(!is_valid_email("no-at-sign.com"));
    }

    #[test]
    fn test_password_problems() {
        assert!(password_problems("Secret123").is_empty());
        assert_eq!(password_problems("short1A").len(), 1);
        assert_eq!(password_problems("alllowercase").len(), 2);
    }
}

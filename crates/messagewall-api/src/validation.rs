use serde_json::Value;

use messagewall_types::api::CreateMessageRequest;
use messagewall_types::models::MessageKind;

use crate::error::ApiError;

/// Shown when a poster leaves the nickname empty ("small note").
pub const DEFAULT_NICKNAME: &str = "小纸条";

pub const MAX_NICKNAME_CHARS: usize = 16;

/// A create request that passed every check, ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMessage {
    /// Trimmed and HTML-escaped.
    pub content: String,
    pub kind: MessageKind,
    pub nickname: String,
}

/// Runs content, type and length checks in that order, then sanitises.
///
/// The rate limit is checked by the caller before this runs.
pub fn validate(req: &CreateMessageRequest) -> Result<ValidMessage, ApiError> {
    let content = require_content(req.content.as_ref())?;
    let kind = parse_kind(req.kind.as_ref())?;
    check_length(content, kind)?;

    Ok(ValidMessage {
        content: escape_html(content),
        kind,
        nickname: clamp_nickname(req.nickname.as_ref()),
    })
}

/// Length in Unicode code points, so a CJK character counts once.
pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

/// Strips Unicode whitespace and the byte-order mark from both ends.
pub fn trim_text(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Content must be a string that is not blank. Returns it trimmed.
pub fn require_content(value: Option<&Value>) -> Result<&str, ApiError> {
    match value {
        Some(Value::String(s)) if !trim_text(s).is_empty() => Ok(trim_text(s)),
        _ => Err(ApiError::BadContent),
    }
}

/// Missing type means `wall`. Anything else is compared case-insensitively.
pub fn parse_kind(value: Option<&Value>) -> Result<MessageKind, ApiError> {
    let raw = match value {
        None => return Ok(MessageKind::Wall),
        Some(Value::String(s)) => s.to_lowercase(),
        Some(other) => other.to_string().to_lowercase(),
    };
    raw.parse().map_err(|_| ApiError::BadType)
}

pub fn check_length(content: &str, kind: MessageKind) -> Result<(), ApiError> {
    if char_count(content) > kind.max_chars() {
        return Err(ApiError::TooLong(kind));
    }
    Ok(())
}

/// Escapes the five HTML-significant characters so stored content can be
/// rendered as text without further escaping.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Trimmed, cut to 16 code points, or the placeholder when nothing usable is left.
pub fn clamp_nickname(value: Option<&Value>) -> String {
    let nickname: String = match value {
        Some(Value::String(s)) => trim_text(s).chars().take(MAX_NICKNAME_CHARS).collect(),
        _ => String::new(),
    };

    if nickname.is_empty() {
        DEFAULT_NICKNAME.to_string()
    } else {
        nickname
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn unescape(s: &str) -> String {
        s.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&")
    }

    fn request(body: Value) -> CreateMessageRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn escapes_every_special_character() {
        let input = r#"<a href="x">Tom & 'Jerry'</a>"#;
        let escaped = escape_html(input);
        assert_eq!(
            escaped,
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert!(!escaped.contains(['<', '>', '"', '\'']));
        assert_eq!(unescape(&escaped), input);
    }

    #[test]
    fn ampersand_is_not_double_escaped() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
        assert_eq!(unescape(&escape_html("&lt;")), "&lt;");
    }

    #[test]
    fn content_must_be_a_non_blank_string() {
        assert!(matches!(require_content(None), Err(ApiError::BadContent)));
        assert!(matches!(require_content(Some(&json!("   \n"))), Err(ApiError::BadContent)));
        assert!(matches!(require_content(Some(&json!(42))), Err(ApiError::BadContent)));
        assert_eq!(require_content(Some(&json!("  hi  "))).unwrap(), "hi");
    }

    #[test]
    fn byte_order_mark_counts_as_blank() {
        assert!(matches!(
            require_content(Some(&json!("\u{FEFF}"))),
            Err(ApiError::BadContent)
        ));
        assert!(matches!(
            require_content(Some(&json!(" \u{FEFF}\t\u{3000}"))),
            Err(ApiError::BadContent)
        ));
        assert_eq!(require_content(Some(&json!("\u{FEFF}hi\u{FEFF}"))).unwrap(), "hi");
        assert_eq!(clamp_nickname(Some(&json!("\u{FEFF}"))), DEFAULT_NICKNAME);
    }

    #[test]
    fn kind_defaults_to_wall_and_ignores_case() {
        assert_eq!(parse_kind(None).unwrap(), MessageKind::Wall);
        assert_eq!(parse_kind(Some(&json!("NoTe"))).unwrap(), MessageKind::Note);
        assert!(matches!(parse_kind(Some(&json!("all"))), Err(ApiError::BadType)));
        assert!(matches!(parse_kind(Some(&Value::Null)), Err(ApiError::BadType)));
        assert!(matches!(parse_kind(Some(&json!(1))), Err(ApiError::BadType)));
    }

    #[test]
    fn note_length_boundary() {
        assert!(check_length("123456789012", MessageKind::Note).is_ok());
        assert!(matches!(
            check_length("13 chars long!", MessageKind::Note),
            Err(ApiError::TooLong(MessageKind::Note))
        ));
    }

    #[test]
    fn wall_length_boundary() {
        let exact = "x".repeat(500);
        let over = "x".repeat(501);
        assert!(check_length(&exact, MessageKind::Wall).is_ok());
        assert!(matches!(
            check_length(&over, MessageKind::Wall),
            Err(ApiError::TooLong(MessageKind::Wall))
        ));
    }

    #[test]
    fn multibyte_characters_count_once() {
        let twelve = "你好世界你好世界你好世界";
        assert_eq!(char_count(twelve), 12);
        assert!(twelve.len() > 12);
        assert!(check_length(twelve, MessageKind::Note).is_ok());
        assert!(check_length("你好世界你好世界你好世界你", MessageKind::Note).is_err());
    }

    #[test]
    fn length_is_measured_before_escaping() {
        // 12 raw characters, 60 once escaped
        let req = request(json!({ "content": "<<<<<<<<<<<<", "type": "note" }));
        let valid = validate(&req).unwrap();
        assert_eq!(valid.content, "&lt;".repeat(12));
    }

    #[test]
    fn nickname_is_trimmed_clamped_or_defaulted() {
        assert_eq!(clamp_nickname(None), DEFAULT_NICKNAME);
        assert_eq!(clamp_nickname(Some(&json!("   "))), DEFAULT_NICKNAME);
        assert_eq!(clamp_nickname(Some(&json!(7))), DEFAULT_NICKNAME);
        assert_eq!(clamp_nickname(Some(&json!("  bob  "))), "bob");
        assert_eq!(
            clamp_nickname(Some(&json!("abcdefghijklmnopqrstuvwxyz"))),
            "abcdefghijklmnop"
        );
        assert_eq!(char_count(&clamp_nickname(Some(&json!("一二三四五六七八九十一二三四五六七")))), 16);
    }

    #[test]
    fn checks_run_in_order() {
        // Missing content wins over a bad type
        let req = request(json!({ "type": "shout" }));
        assert!(matches!(validate(&req), Err(ApiError::BadContent)));

        // Bad type wins over excessive length
        let req = request(json!({ "content": "x".repeat(600), "type": "shout" }));
        assert!(matches!(validate(&req), Err(ApiError::BadType)));
    }

    #[test]
    fn validate_trims_before_storing() {
        let req = request(json!({ "content": "  hello  ", "nickname": " ann " }));
        let valid = validate(&req).unwrap();
        assert_eq!(
            valid,
            ValidMessage {
                content: "hello".into(),
                kind: MessageKind::Wall,
                nickname: "ann".into(),
            }
        );
    }
}

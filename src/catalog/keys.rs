use regex::Regex;

fn url_safe_key() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("invalid url-safe key regex")
    })
}

fn week_key() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^week([1-9][0-9]*)$").expect("invalid week key regex"))
}

/// Determine whether a unit id or activity slug can be embedded in a route unchanged.
///
/// Keys are lowercase ASCII words separated by single hyphens, which keeps routes stable
/// regardless of how the hosting router escapes path segments.
pub fn is_url_safe_key(value: &str) -> bool {
    url_safe_key().is_match(value)
}

/// Parse the week number out of a week route key such as `week3`.
pub fn parse_week_key(value: &str) -> Option<u32> {
    week_key()
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|number| number.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::{is_url_safe_key, parse_week_key};

    #[test]
    fn accepts_kebab_case_keys() {
        assert!(is_url_safe_key("games-unit"));
        assert!(is_url_safe_key("favourite-game-show-tell"));
        assert!(is_url_safe_key("unit2"));
    }

    #[test]
    fn rejects_unsafe_keys() {
        assert!(!is_url_safe_key(""));
        assert!(!is_url_safe_key("Games Unit"));
        assert!(!is_url_safe_key("-leading"));
        assert!(!is_url_safe_key("double--hyphen"));
        assert!(!is_url_safe_key("path/segment"));
    }

    #[test]
    fn parses_week_numbers() {
        assert_eq!(parse_week_key("week1"), Some(1));
        assert_eq!(parse_week_key("week12"), Some(12));
        assert_eq!(parse_week_key("week0"), None);
        assert_eq!(parse_week_key("week01"), None);
        assert_eq!(parse_week_key("week"), None);
        assert_eq!(parse_week_key("Week1"), None);
    }
}

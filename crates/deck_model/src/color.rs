//! Color resolution
//!
//! Shape color fields accept hex strings or a small fixed set of symbolic
//! tokens. Tokens resolve through a static lookup table; an unresolved
//! token stays unresolved (`None`) rather than being silently defaulted
//! here. Defaults are a renderer concern.

/// Symbolic color tokens understood by the deck theme.
const COLOR_TOKENS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#FFFFFF"),
    ("ink", "#0B1220"),
    ("ice", "#EDF1F4"),
];

/// True for `#RGB` or `#RRGGBB` (case-insensitive).
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Resolve a color string to hex: hex values pass through unchanged,
/// known tokens map through the table, anything else is `None`.
pub fn resolve_color(value: &str) -> Option<String> {
    if is_hex_color(value) {
        return Some(value.to_string());
    }
    COLOR_TOKENS
        .iter()
        .find(|(token, _)| *token == value)
        .map(|(_, hex)| (*hex).to_string())
}

/// Normalize a color to a bare uppercase hex value with no leading `#`,
/// falling back when the input is missing or empty after stripping.
pub fn normalize_hex(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) => {
            let bare = v.trim_start_matches('#');
            if bare.is_empty() {
                fallback.to_string()
            } else {
                bare.to_uppercase()
            }
        }
        None => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_passthrough() {
        assert_eq!(resolve_color("#0B1220").as_deref(), Some("#0B1220"));
        assert_eq!(resolve_color("#fff").as_deref(), Some("#fff"));
    }

    #[test]
    fn test_token_lookup() {
        assert_eq!(resolve_color("black").as_deref(), Some("#000000"));
        assert_eq!(resolve_color("ink").as_deref(), Some("#0B1220"));
        assert_eq!(resolve_color("ice").as_deref(), Some("#EDF1F4"));
    }

    #[test]
    fn test_unresolved_token_is_none() {
        assert_eq!(resolve_color("var(--wm-mystery)"), None);
        assert_eq!(resolve_color("#12"), None);
        assert_eq!(resolve_color("#GGGGGG"), None);
        assert_eq!(resolve_color(""), None);
    }

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex(Some("#ffcc00"), "111111"), "FFCC00");
        assert_eq!(normalize_hex(Some("0b1220"), "111111"), "0B1220");
        assert_eq!(normalize_hex(Some("#"), "111111"), "111111");
        assert_eq!(normalize_hex(None, "FFFFFF"), "FFFFFF");
    }
}

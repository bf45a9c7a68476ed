//! Built-in avatar colors and the picker for new profiles.

use crate::Profile;
use once_cell::sync::Lazy;

/// Cached built-in palette - built once and reused across all operations
static BUILTIN_PALETTE: Lazy<Vec<String>> = Lazy::new(|| {
    vec![
        "#4a90e2".into(), // blue (the client default)
        "#e24a90".into(), // pink
        "#9b59b6".into(), // purple
        "#1abc9c".into(), // teal
        "#e2a04a".into(), // amber
        "#90e24a".into(), // green
        "#e74c3c".into(), // red
        "#f1c40f".into(), // yellow
    ]
});

/// Get a reference to the cached built-in palette
pub fn builtin_palette() -> &'static [String] {
    &BUILTIN_PALETTE
}

/// Pick an avatar color for a new profile
///
/// Returns the first color in `available` no existing profile uses; when
/// every color is taken, falls back to the first one.
pub fn pick_color(available: &[String], profiles: &[Profile]) -> String {
    available
        .iter()
        .find(|color| !profiles.iter().any(|p| &p.avatar_color == *color))
        .or_else(|| available.first())
        .cloned()
        .unwrap_or_else(|| "#4a90e2".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_color_when_none_used() {
        assert_eq!(pick_color(builtin_palette(), &[]), "#4a90e2");
    }

    #[test]
    fn test_skips_colors_in_use() {
        let taken = vec![
            Profile::new("a", "#4a90e2"),
            Profile::new("b", "#e24a90"),
        ];
        assert_eq!(pick_color(builtin_palette(), &taken), "#9b59b6");
    }

    #[test]
    fn test_wraps_when_palette_exhausted() {
        let palette = vec!["#111111".to_string(), "#222222".to_string()];
        let taken = vec![
            Profile::new("a", "#111111"),
            Profile::new("b", "#222222"),
        ];
        assert_eq!(pick_color(&palette, &taken), "#111111");
    }

    #[test]
    fn test_empty_palette_falls_back_to_default() {
        assert_eq!(pick_color(&[], &[]), "#4a90e2");
    }
}

//! UTF-8-safe string helpers
//!
//! Truncation here counts characters, never bytes, so log previews and file
//! names cut through multi-byte text without panicking.

use super::constants::PROMPT_SLUG_CHARS;

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// Returns a slice of the input; never allocates and never panics on
/// multi-byte characters.
///
/// # Examples
/// ```
/// # use kodegen_tools_restyle::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("🎉🎊🎈", 2), "🎉🎊");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Turn an art-direction prompt into a short file-name slug.
///
/// Keeps alphanumerics, spaces, `_` and `-`, takes the first 30 of those
/// characters, trims, and replaces spaces with `_`. Prompts with nothing
/// usable become `untitled`.
///
/// # Examples
/// ```
/// # use kodegen_tools_restyle::utils::string_utils::slugify_prompt;
/// assert_eq!(slugify_prompt("Neon cyberpunk!"), "Neon_cyberpunk");
/// assert_eq!(slugify_prompt("???"), "untitled");
/// ```
#[must_use]
pub fn slugify_prompt(prompt: &str) -> String {
    let kept: String = prompt
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .take(PROMPT_SLUG_CHARS)
        .collect();

    let slug = kept.trim().replace(' ', "_");
    let slug = sanitize_filename::sanitize(slug);

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_caps_length_after_filtering() {
        let prompt = "a.b".repeat(40);
        let slug = slugify_prompt(&prompt);
        assert_eq!(slug.chars().count(), 30);
        assert!(slug.chars().all(|c| c == 'a' || c == 'b'));
    }

    #[test]
    fn test_slug_trims_before_replacing_spaces() {
        assert_eq!(slugify_prompt("   dark  mode   "), "dark__mode");
        assert_eq!(slugify_prompt("retro-90s_look"), "retro-90s_look");
    }

    #[test]
    fn test_slug_keeps_unicode_letters() {
        assert_eq!(slugify_prompt("café noir"), "café_noir");
    }

    #[test]
    fn test_slug_fallback() {
        assert_eq!(slugify_prompt(""), "untitled");
        assert_eq!(slugify_prompt("   "), "untitled");
        assert_eq!(slugify_prompt("/../"), "untitled");
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(safe_truncate_chars("héllo", 2), "hé");
    }
}

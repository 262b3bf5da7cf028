/*!
 * Boundary whitespace preservation.
 *
 * Backends usually trim the text they return. When a fragment originally
 * started with whitespace, losing it makes words visually merge across
 * markup boundaries (`<b>Привет</b>мир`), so the leading space is restored
 * before reinsertion. Trailing whitespace gets no such fix-up; the following
 * fragment's leading space covers the common case.
 */

/// Restores boundary formatting that translation stripped.
pub struct FormatPreserver;

impl FormatPreserver {
    /// Prepend a single space when the original fragment began with
    /// whitespace and the translation does not.
    pub fn restore_leading_space(original: &str, translated: &str) -> String {
        let original_leads = original.starts_with(|c: char| c.is_whitespace());
        let translated_leads = translated.starts_with(|c: char| c.is_whitespace());

        if original_leads && !translated_leads && !translated.is_empty() {
            format!(" {}", translated)
        } else {
            translated.to_string()
        }
    }
}

/// Collapse every run of whitespace (spaces, tabs, newlines) into a single
/// space and strip it from both ends.
///
/// ```
/// use ocr_to_voice::correction::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("  Hola \n\t Mundo  "), "Hola Mundo");
/// ```
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

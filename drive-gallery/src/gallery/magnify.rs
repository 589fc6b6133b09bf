//! Magnified-view document assembly.

/// Replaced by the object URL of the full image.
pub const IMAGE_URL_TOKEN: &str = "image_url";
/// Replaced by the escaped transcription text.
pub const TRANSCRIPTION_TOKEN: &str = "transcription_placeholder";

/// Substitute the first occurrence of each placeholder token.
///
/// The image URL is substituted first so transcription text can never be
/// mistaken for a token.
pub fn render(template: &str, image_url: &str, transcription: &str) -> String {
    template
        .replacen(IMAGE_URL_TOKEN, image_url, 1)
        .replacen(TRANSCRIPTION_TOKEN, &escape_html(transcription), 1)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

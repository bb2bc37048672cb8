/// Shortens SQL (or any text) used inside log and error messages.
#[macro_export]
macro_rules! truncate_long {
    ($text:expr) => {{
        let text: &str = &$text;
        match text.char_indices().nth(497) {
            Some((end, _)) => format!("{}...", text[..end].trim_end()),
            None => text.to_string(),
        }
    }};
}

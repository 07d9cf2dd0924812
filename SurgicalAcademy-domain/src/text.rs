//! Text helpers shared by the services

/// Words read per minute when estimating read time
pub const WORDS_PER_MINUTE: usize = 200;

/// Build a URL slug from a title.
///
/// Lowercases, drops everything except letters, digits, `_`, `-` and
/// whitespace, collapses runs of whitespace, `_` and `-` into one `-` and
/// trims dashes from both ends. Cyrillic letters are kept.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.trim().to_lowercase().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_dash = true;
        } else if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        }
    }

    slug
}

/// Estimated minutes to read `content`, rounded up, at least one minute
pub fn calculate_read_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Cut `text` to at most `max_chars` characters on a word boundary and append `...`
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };

    format!("{}...", trimmed.trim_end())
}

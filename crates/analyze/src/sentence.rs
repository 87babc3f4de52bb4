/// First sentence of a description or deprecation reason.
///
/// A sentence ends at the first `.` that closes the text or is followed by
/// whitespace; line breaks inside it collapse to single spaces. Text without
/// such a period yields its first line, trimmed.
pub fn first_sentence(text: &str) -> String {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '.' {
            continue;
        }
        let closes = match chars.peek() {
            None => true,
            Some((_, next)) => next.is_whitespace(),
        };
        if closes {
            return collapse_lines(&text[..=i]);
        }
    }
    text.lines().next().unwrap_or_default().trim().to_string()
}

fn collapse_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

//! Greedy Word Wrap
//!
//! Pure text layout over an injected measurer, so the same wrap runs
//! against the builtin bitmap font, a loaded TTF, or a test stub.

/// Wrap `text` into lines no wider than `max_width` under `measure`.
///
/// Words are split on ASCII spaces and packed greedily: a word joins the
/// current line when the joined candidate still fits, otherwise the line is
/// committed and the word starts the next one. A word wider than
/// `max_width` is emitted on its own line rather than split mid-word.
///
/// Always returns at least one line; empty input yields one empty line.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure(&candidate) <= max_width {
            line = candidate;
        } else {
            lines.push(line);
            line = word.to_string();
        }
    }
    lines.push(line);
    lines
}

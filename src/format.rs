use crate::model::Candidate;

/// Renders one candidate for display, given the query and the
/// `(columns, rows)` available.
pub type Formatter = fn(&Candidate, &str, (u16, u16)) -> String;

const ELLIPSIS: &str = "...";

/// Full path of the candidate, shortened in the middle to fit the columns.
pub fn path_formatter(candidate: &Candidate, _query: &str, (cols, _rows): (u16, u16)) -> String {
    truncate_middle(&candidate.path().to_string_lossy(), cols as usize)
}

/// Keeps the start and end of `text`, replacing the middle with `...` when
/// it has more than `width` characters.
pub fn truncate_middle(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.to_string();
    }
    if width <= ELLIPSIS.len() {
        return text.chars().take(width).collect();
    }
    let keep = width - ELLIPSIS.len();
    let head = keep / 2;
    let tail = keep - head;
    let mut out: String = text.chars().take(head).collect();
    out.push_str(ELLIPSIS);
    out.extend(text.chars().skip(len - tail));
    out
}

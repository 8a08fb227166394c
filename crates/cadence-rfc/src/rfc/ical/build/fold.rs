//! Content line folding (RFC 5545 §3.1).

/// Maximum line length in octets, not counting the line break.
const MAX_LINE_OCTETS: usize = 75;

/// Folds a content line at 75 octets.
///
/// Continuation lines start with a single space, which counts towards their
/// length. Breaks never split a UTF-8 sequence.
#[must_use]
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + (line.len() / MAX_LINE_OCTETS) * 2);
    let mut rest = line;
    let mut max_len = MAX_LINE_OCTETS;

    while rest.len() > max_len {
        let mut end = max_len;
        while end > 0 && !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = rest
                .char_indices()
                .nth(1)
                .map_or(rest.len(), |(i, _)| i);
        }

        let (head, tail) = rest.split_at(end);
        result.push_str(head);
        result.push_str("\n ");
        rest = tail;
        max_len = MAX_LINE_OCTETS - 1;
    }
    result.push_str(rest);

    result
}

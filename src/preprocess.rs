//! First pass over the raw input: line endings and tab stops.

/// Normalize `input` for the block parser.
///
/// - `\r\n` and lone `\r` become `\n`
/// - every line is tab-expanded on its own, aligned to `tab_size` columns
/// - the result ends with exactly one newline (empty input yields `"\n"`)
pub fn normalize(input: &str, tab_size: usize) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len() + 1);
    let mut begin = 0;

    while begin < bytes.len() {
        let mut end = begin;
        while end < bytes.len() && bytes[end] != b'\n' && bytes[end] != b'\r' {
            end += 1;
        }

        if end > begin {
            expand_tabs(&mut out, &input[begin..end], tab_size);
        }
        out.push('\n');

        if end < bytes.len() && bytes[end] == b'\r' {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'\n' {
            end += 1;
        }
        begin = end;
    }

    // Blank lines at the end carry no content
    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

/// Replace tabs in a single line with spaces, aligning to the next tab stop.
///
/// Columns are counted in code points so multi-byte characters take one column.
pub fn expand_tabs(out: &mut String, line: &str, tab_size: usize) {
    // Fast path: no tabs, or tabs only at the start of the line
    let prefix = line.bytes().take_while(|&b| b == b'\t').count();
    if !line[prefix..].contains('\t') {
        out.extend(std::iter::repeat_n(' ', prefix * tab_size));
        out.push_str(&line[prefix..]);
        return;
    }

    let mut column = 0;
    for ch in line.chars() {
        if ch == '\t' {
            loop {
                out.push(' ');
                column += 1;
                if column % tab_size == 0 {
                    break;
                }
            }
        } else {
            out.push(ch);
            column += 1;
        }
    }
}

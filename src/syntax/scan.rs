//! String-aware text scanning.
//!
//! The parser keeps statement bodies and expression text as verbatim slices
//! of the source. Everything that later needs to look inside that text
//! (argument splitting, brace matching, statement splitting) goes through
//! these helpers so that string literals, char literals and comments never
//! confuse the bracket bookkeeping.

/// Advance past the string or char literal starting at `i`.
///
/// Handles ordinary (`"..."`), verbatim (`@"..."`), interpolated (`$"..."`,
/// `$@"..."`, `@$"..."`) and char (`'...'`) literals. Returns the index one
/// past the closing quote, or `len` when the literal is unterminated.
pub fn skip_literal(bytes: &[u8], i: usize) -> usize {
    let len = bytes.len();
    let mut j = i;
    let mut verbatim = false;
    while j < len && (bytes[j] == b'@' || bytes[j] == b'$') {
        if bytes[j] == b'@' {
            verbatim = true;
        }
        j += 1;
    }
    if j >= len {
        return len;
    }
    let quote = bytes[j];
    debug_assert!(quote == b'"' || quote == b'\'');
    j += 1;
    while j < len {
        let b = bytes[j];
        if verbatim && b == b'"' {
            // doubled quote is an escape in verbatim strings
            if j + 1 < len && bytes[j + 1] == b'"' {
                j += 2;
                continue;
            }
            return j + 1;
        }
        if !verbatim && b == b'\\' {
            j += 2;
            continue;
        }
        if b == quote {
            return j + 1;
        }
        j += 1;
    }
    len
}

fn at_literal_start(bytes: &[u8], i: usize) -> bool {
    match bytes[i] {
        b'"' | b'\'' => true,
        b'@' | b'$' => {
            let mut j = i;
            while j < bytes.len() && (bytes[j] == b'@' || bytes[j] == b'$') {
                j += 1;
            }
            j < bytes.len() && bytes[j] == b'"'
        }
        _ => false,
    }
}

fn at_line_comment(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'/'
}

fn skip_line_comment(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i] != b'\n' {
        i += 1;
    }
    i
}

fn at_block_comment(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'*'
}

fn skip_block_comment(bytes: &[u8], mut i: usize) -> usize {
    i += 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

/// Split `s` on top-level occurrences of `sep`, respecting `()`, `[]`, `{}`
/// and literals. Angle brackets are NOT tracked (they are ambiguous with
/// comparison operators in expression position).
pub fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        if at_literal_start(bytes, i) {
            i = skip_literal(bytes, i);
            continue;
        }
        if at_line_comment(bytes, i) {
            i = skip_line_comment(bytes, i);
            continue;
        }
        if at_block_comment(bytes, i) {
            i = skip_block_comment(bytes, i);
            continue;
        }
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b if depth == 0 && b == sep as u8 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&s[start..]);
    parts
}

/// Split a type-argument list on top-level commas. Unlike
/// [`split_top_level`] this DOES track angle brackets, which is safe in
/// type position.
pub fn split_type_args(s: &str) -> Vec<String> {
    let bytes = s.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'<' | b'(' | b'[' => depth += 1,
            b'>' | b')' | b']' => depth -= 1,
            b',' if depth == 0 => {
                parts.push(s[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = s[start..].trim();
    if !last.is_empty() {
        parts.push(last.to_string());
    }
    parts
}

/// Index one past the bracket matching the opener at `open`, or `None` when
/// unbalanced. Literal-aware.
pub fn matching_bracket(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let (open_b, close_b) = match bytes[open] {
        b'(' => (b'(', b')'),
        b'[' => (b'[', b']'),
        b'{' => (b'{', b'}'),
        _ => return None,
    };
    let mut depth = 0i32;
    let mut i = open;
    while i < bytes.len() {
        if at_literal_start(bytes, i) {
            i = skip_literal(bytes, i);
            continue;
        }
        if at_line_comment(bytes, i) {
            i = skip_line_comment(bytes, i);
            continue;
        }
        if at_block_comment(bytes, i) {
            i = skip_block_comment(bytes, i);
            continue;
        }
        if bytes[i] == open_b {
            depth += 1;
        } else if bytes[i] == close_b {
            depth -= 1;
            if depth == 0 {
                return Some(i + 1);
            }
        }
        i += 1;
    }
    None
}

/// Find the first top-level occurrence of `needle` (a single byte) outside
/// brackets and literals. Skips `==`, `=>`, `<=`, `>=` and `!=` when
/// searching for `=`.
pub fn find_top_level(s: &str, needle: u8) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0i32;
    let mut i = 0usize;
    while i < bytes.len() {
        if at_literal_start(bytes, i) {
            i = skip_literal(bytes, i);
            continue;
        }
        if at_line_comment(bytes, i) {
            i = skip_line_comment(bytes, i);
            continue;
        }
        if at_block_comment(bytes, i) {
            i = skip_block_comment(bytes, i);
            continue;
        }
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b if depth == 0 && b == needle => {
                if needle == b'=' {
                    let prev = if i > 0 { bytes[i - 1] } else { 0 };
                    let next = if i + 1 < bytes.len() { bytes[i + 1] } else { 0 };
                    if prev == b'=' || prev == b'<' || prev == b'>' || prev == b'!'
                        || next == b'=' || next == b'>'
                    {
                        i += 1;
                        continue;
                    }
                }
                return Some(i);
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// End of the construct starting at `start`: one past the first top-level
/// `;`, or one past the `}` closing the first top-level brace block (plus a
/// trailing `;` when present). Falls back to `s.len()`.
pub fn construct_end(s: &str, start: usize) -> usize {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut depth = 0i32;
    let mut i = start;
    while i < len {
        if at_literal_start(bytes, i) {
            i = skip_literal(bytes, i);
            continue;
        }
        if at_line_comment(bytes, i) {
            i = skip_line_comment(bytes, i);
            continue;
        }
        if at_block_comment(bytes, i) {
            i = skip_block_comment(bytes, i);
            continue;
        }
        match bytes[i] {
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth -= 1,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    i += 1;
                    if i < len && bytes[i] == b';' {
                        i += 1;
                    }
                    return i;
                }
            }
            b';' if depth == 0 => return i + 1,
            _ => {}
        }
        i += 1;
    }
    len
}

/// One past the `>` matching the `<` at `open`, provided the bracketed text
/// looks like a type-argument list. Returns `None` for comparison operators.
pub fn match_angle(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    debug_assert_eq!(bytes[open], b'<');
    let mut depth = 0i32;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b',' | b' ' | b'[' | b']'
            | b'?' | b'@' | b'(' | b')' => {}
            _ => return None,
        }
        i += 1;
    }
    None
}

/// One statement-sized piece of a method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStmt {
    /// Leading whitespace of the first line.
    pub indent: String,
    /// Statement text without the leading indent. May span lines.
    pub text: String,
    /// Byte offset of `text` within the body slice.
    pub offset: usize,
}

/// Split a method body (text between the outer braces) into statements.
///
/// A statement ends at a top-level `;`, or at the `}` closing a top-level
/// block construct (`if`, `foreach`, lambda blocks and the like are kept
/// whole). Blank lines and comment-only lines become their own raw pieces
/// so surrounding statements stay cleanly parseable.
pub fn split_statements(body: &str) -> Vec<RawStmt> {
    let bytes = body.as_bytes();
    let mut out = Vec::new();
    let mut i = 0usize;
    let len = bytes.len();

    while i < len {
        // consume whitespace, emitting blank lines
        let line_start = i;
        while i < len && (bytes[i] == b' ' || bytes[i] == b'\t') {
            i += 1;
        }
        if i < len && (bytes[i] == b'\n' || bytes[i] == b'\r') {
            let had_content = out
                .last()
                .map(|s: &RawStmt| !s.text.is_empty())
                .unwrap_or(false);
            if bytes[i] == b'\r' && i + 1 < len && bytes[i + 1] == b'\n' {
                i += 1;
            }
            i += 1;
            // blank line between statements is kept
            if had_content && i < len {
                out.push(RawStmt {
                    indent: String::new(),
                    text: String::new(),
                    offset: line_start,
                });
            }
            continue;
        }
        if i >= len {
            break;
        }
        let indent = body[line_start..i].to_string();
        let start = i;

        // comment-only piece
        if at_line_comment(bytes, i) {
            i = skip_line_comment(bytes, i);
            out.push(RawStmt {
                indent,
                text: body[start..i].to_string(),
                offset: start,
            });
            continue;
        }

        // scan to end of statement
        let mut depth = 0i32;
        let mut end = i;
        while end < len {
            if at_literal_start(bytes, end) {
                end = skip_literal(bytes, end);
                continue;
            }
            if at_line_comment(bytes, end) {
                end = skip_line_comment(bytes, end);
                continue;
            }
            if at_block_comment(bytes, end) {
                end = skip_block_comment(bytes, end);
                continue;
            }
            match bytes[end] {
                b'(' | b'[' => depth += 1,
                b')' | b']' => depth -= 1,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        // block statement; swallow an immediately following `;`
                        end += 1;
                        if end < len && bytes[end] == b';' {
                            end += 1;
                        }
                        break;
                    }
                }
                b';' if depth == 0 => {
                    end += 1;
                    break;
                }
                _ => {}
            }
            end += 1;
        }
        out.push(RawStmt {
            indent,
            text: body[start..end].trim_end().to_string(),
            offset: start,
        });
        i = end;
    }

    // trailing blank piece is noise
    while out.last().map(|s| s.text.is_empty()).unwrap_or(false) {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_respects_strings() {
        let parts = split_top_level(r#"a, "x, y", b"#, ',');
        assert_eq!(parts, vec!["a", r#" "x, y""#, " b"]);
    }

    #[test]
    fn split_respects_nesting() {
        let parts = split_top_level("Foo(a, b), c", ',');
        assert_eq!(parts, vec!["Foo(a, b)", " c"]);
    }

    #[test]
    fn type_args_track_angles() {
        let parts = split_type_args("Dictionary<int, string>, bool");
        assert_eq!(parts, vec!["Dictionary<int, string>", "bool"]);
    }

    #[test]
    fn matching_bracket_skips_literals() {
        let s = r#"(a, ")", b)"#;
        assert_eq!(matching_bracket(s, 0), Some(s.len()));
    }

    #[test]
    fn find_equals_skips_comparisons() {
        let s = "x == y = z";
        assert_eq!(find_top_level(s, b'='), Some(7));
    }

    #[test]
    fn statements_split_on_semicolons() {
        let body = "    var x = 1;\n    Assert.Equal(1, x);\n";
        let stmts = split_statements(body);
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0].text, "var x = 1;");
        assert_eq!(stmts[1].text, "Assert.Equal(1, x);");
        assert_eq!(stmts[1].indent, "    ");
    }

    #[test]
    fn block_statements_stay_whole() {
        let body = "    if (a)\n    {\n        b();\n    }\n    c();\n";
        let stmts = split_statements(body);
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].text.starts_with("if (a)"));
        assert!(stmts[0].text.ends_with('}'));
        assert_eq!(stmts[1].text, "c();");
    }

    #[test]
    fn verbatim_strings_do_not_end_early() {
        let parts = split_top_level(r#"@"a "" b", c"#, ',');
        assert_eq!(parts.len(), 2);
    }
}

//! Splits a DDL script into individual `CREATE TABLE` statements

/// Finds `CREATE TABLE` boundaries in a DDL script and cuts the script into
/// one segment per boundary.
///
/// Only statement starts are detected. A segment runs from its boundary to
/// the start of the next boundary (or the end of the script), so trailing
/// semicolons, `DROP TABLE` statements and comments between two definitions
/// stay attached to the earlier definition. Text before the first boundary
/// is discarded.
#[derive(Debug, Clone, Copy)]
pub struct StatementScanner<'a> {
    source: &'a str,
}

impl<'a> StatementScanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Byte offsets of every `CREATE TABLE` boundary, in textual order.
    ///
    /// Quoted text (`'..'`, `".."`, `` `..` ``) and comments (`-- `, `#`,
    /// `/* */`) are skipped, so a column comment mentioning `create table`
    /// is not a boundary.
    pub fn boundaries(&self) -> Vec<usize> {
        let bytes = self.source.as_bytes();
        let mut found = Vec::new();
        let mut pos = 0;

        while pos < bytes.len() {
            match bytes[pos] {
                quote @ (b'\'' | b'"' | b'`') => {
                    pos = skip_quoted(bytes, pos + 1, quote);
                    continue;
                }
                b'#' => {
                    pos = skip_past(bytes, pos + 1, b"\n");
                    continue;
                }
                b'-' if is_line_comment(bytes, pos) => {
                    pos = skip_past(bytes, pos + 2, b"\n");
                    continue;
                }
                b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                    pos = skip_past(bytes, pos + 2, b"*/");
                    continue;
                }
                _ => {}
            }

            if is_keyword_at(bytes, pos, b"create") {
                let mut next = pos + b"create".len();
                let ws_start = next;
                while next < bytes.len() && bytes[next].is_ascii_whitespace() {
                    next += 1;
                }
                if next > ws_start && is_keyword_at(bytes, next, b"table") {
                    found.push(pos);
                    pos = next + b"table".len();
                    continue;
                }
            }
            pos += 1;
        }

        found
    }

    /// Statements in reverse textual order (last definition first).
    ///
    /// The buffer is cut from the last boundary backwards: each segment is
    /// everything from its boundary to the end of the remaining buffer, after
    /// which the buffer is truncated to just before that boundary.
    pub fn statements(&self) -> Vec<&'a str> {
        let mut remaining = self.source;
        let mut list = Vec::new();

        for start in self.boundaries().into_iter().rev() {
            list.push(&remaining[start..]);
            remaining = &remaining[..start];
        }

        list
    }
}

/// Split a DDL script into `CREATE TABLE` statements (reverse textual order)
pub fn split_statements(source: &str) -> Vec<&str> {
    StatementScanner::new(source).statements()
}

/// Best-effort table name of a statement
pub fn statement_table_name(statement: &str) -> Option<String> {
    let mut words = statement
        .split(|c: char| c.is_whitespace() || c == '(')
        .filter(|w| !w.is_empty());

    // CREATE TABLE [IF NOT EXISTS] name
    let mut name = words.nth(2);
    if name.is_some_and(|w| w.eq_ignore_ascii_case("if")) {
        name = words.nth(2);
    }

    name.map(|name| {
        name.rsplit('.')
            .next()
            .unwrap_or(name)
            .trim_matches(|c| c == '`' || c == '"' || c == ';')
            .to_string()
    })
}

/// Label of a statement in parse failures
pub fn statement_label(statement: &str) -> String {
    match statement_table_name(statement) {
        Some(name) => format!("statement `{}`", name),
        None => "statement <unnamed>".to_string(),
    }
}

fn is_keyword_at(bytes: &[u8], pos: usize, keyword: &[u8]) -> bool {
    let end = pos + keyword.len();
    if end > bytes.len() || !bytes[pos..end].eq_ignore_ascii_case(keyword) {
        return false;
    }
    let boundary_before = pos == 0 || !is_ident_byte(bytes[pos - 1]);
    let boundary_after = end == bytes.len() || !is_ident_byte(bytes[end]);
    boundary_before && boundary_after
}

/// Offset just past the quote closing a literal opened before `pos`.
/// Backslash escapes and doubled quotes stay inside the literal.
fn skip_quoted(bytes: &[u8], mut pos: usize, quote: u8) -> usize {
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' if quote != b'`' => pos += 2,
            b if b == quote && bytes.get(pos + 1) == Some(&quote) => pos += 2,
            b if b == quote => return pos + 1,
            _ => pos += 1,
        }
    }
    bytes.len()
}

/// Offset just past the next `terminator` at or after `pos`, or the end
fn skip_past(bytes: &[u8], pos: usize, terminator: &[u8]) -> usize {
    bytes[pos.min(bytes.len())..]
        .windows(terminator.len())
        .position(|w| w == terminator)
        .map_or(bytes.len(), |i| pos + i + terminator.len())
}

/// MySQL needs whitespace (or the end of input) after `--` to start a comment
fn is_line_comment(bytes: &[u8], pos: usize) -> bool {
    bytes.get(pos + 1) == Some(&b'-')
        && bytes.get(pos + 2).map_or(true, u8::is_ascii_whitespace)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_reverse_order() {
        let sql = "CREATE TABLE a (id INT); CREATE TABLE b (id INT);";
        let statements = split_statements(sql);
        assert_eq!(
            statements,
            vec!["CREATE TABLE b (id INT);", "CREATE TABLE a (id INT); "]
        );
    }

    #[test]
    fn test_no_boundaries() {
        assert!(split_statements("").is_empty());
        assert!(split_statements("DROP TABLE users;").is_empty());
    }

    #[test]
    fn test_prefix_is_discarded() {
        let sql = "-- users\nDROP TABLE IF EXISTS `users`;\ncreate   table `users` (id INT);";
        let statements = split_statements(sql);
        assert_eq!(statements, vec!["create   table `users` (id INT);"]);
    }

    #[test]
    fn test_keyword_boundaries() {
        // Identifiers containing the keywords are not boundaries
        let sql = "CREATE TABLE recreate_tables (created INT, tablet INT)";
        assert_eq!(StatementScanner::new(sql).boundaries(), vec![0]);

        let sql = "CREATE\n\tTABLE t (id INT)";
        assert_eq!(StatementScanner::new(sql).boundaries(), vec![0]);

        let sql = "CREATETABLE t (id INT)";
        assert!(StatementScanner::new(sql).boundaries().is_empty());
    }

    #[test]
    fn test_quoted_text_and_comments_are_not_boundaries() {
        let sql = "CREATE TABLE a (\n  id INT PRIMARY KEY COMMENT 'rows copied by create table b'\n);\n\
                   -- create table c\n\
                   /* CREATE TABLE d */ # create table e\n\
                   CREATE TABLE f (`create table g` VARCHAR(8) DEFAULT \"it\\\"s create table h\");\n\
                   CREATE TABLE j (note VARCHAR(8) DEFAULT 'don''t create table k');";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 3);
        let names: Vec<_> = statements
            .iter()
            .filter_map(|s| statement_table_name(s))
            .collect();
        assert_eq!(names, vec!["j", "f", "a"]);
        assert!(statements[2].contains("'rows copied by create table b'"));
    }

    #[test]
    fn test_unterminated_quote_hides_later_text() {
        let sql = "CREATE TABLE a (note VARCHAR(8) DEFAULT 'x); CREATE TABLE b (id INT);";
        assert_eq!(StatementScanner::new(sql).boundaries(), vec![0]);
    }

    #[test]
    fn test_double_dash_without_space_is_not_a_comment() {
        let sql = "CREATE TABLE a (n INT DEFAULT 1--1);\nCREATE TABLE b (id INT);";
        assert_eq!(split_statements(sql).len(), 2);
    }

    #[test]
    fn test_statement_label() {
        assert_eq!(statement_label("CREATE TABLE `users` (id INT)"), "statement `users`");
        assert_eq!(
            statement_label("CREATE TABLE IF NOT EXISTS db.orders(id INT)"),
            "statement `orders`"
        );
        assert_eq!(statement_label("CREATE TABLE"), "statement <unnamed>");
    }
}

//! Import Statement Extraction
//!
//! Pattern-based scanning for the two import statement shapes the tool
//! understands:
//!
//! - **named**: `import <bindings> from "<path>"`; bindings may span
//!   multiple lines and contain comments, which are stripped before the
//!   binding names are parsed
//! - **side-effect**: `import "<path>"` with no bindings
//!
//! There is intentionally no tokenizer or AST here; the scan is cheap and
//! good enough for well-formed import syntax. Everything downstream
//! (resolution, traversal) only sees [`ImportRecord`]s, so this module can
//! be swapped for a real parser without touching the rest of the tool.
//!
//! Matches whose start offset falls inside the comment mask are discarded.

use crate::comments::CommentMask;

/// The shape of an import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import <bindings> from "<path>"`
    Named,
    /// `import "<path>"`
    SideEffect,
}

/// One import statement found in a source file.
///
/// Statement text, specifier text, and their byte offsets are retained
/// verbatim so a fix can rewrite the exact specifier span in place.
#[derive(Debug, Clone)]
pub struct ImportRecord {
    /// The full statement text, `import` through the closing quote.
    pub statement: String,
    /// The literal module-path text between the quotes.
    pub specifier: String,
    pub kind: ImportKind,
    /// Byte offset of the statement within the file.
    pub stmt_offset: usize,
    /// Byte offset of the specifier text within the file.
    pub spec_offset: usize,
    /// Pre-alias imported symbol names (`b` for `b as c`). Empty for
    /// side-effect imports.
    pub symbols: Vec<String>,
}

/// Extract the ordered list of import statements from one file's text.
pub fn extract_imports(source: &str, mask: &CommentMask) -> Vec<ImportRecord> {
    let mut records = Vec::new();
    let mut search = 0usize;

    while let Some(found) = find_keyword(source, "import", search) {
        search = found + "import".len();
        if mask.contains(found) {
            continue;
        }
        if let Some(record) = parse_statement(source, mask, found) {
            search = record.stmt_offset + record.statement.len();
            records.push(record);
        }
    }

    records
}

/// Parse one candidate statement starting at the `import` keyword.
///
/// Returns `None` for anything that is not a static import statement
/// (dynamic `import(...)` expressions, malformed text).
fn parse_statement(source: &str, mask: &CommentMask, start: usize) -> Option<ImportRecord> {
    let bytes = source.as_bytes();
    let mut pos = skip_trivia(source, mask, start + "import".len());

    match *bytes.get(pos)? {
        b'"' | b'\'' => {
            // Side-effect form: import "<path>"
            let (specifier, spec_offset, stmt_end) = read_string(source, pos)?;
            Some(ImportRecord {
                statement: source[start..stmt_end].to_string(),
                specifier,
                kind: ImportKind::SideEffect,
                stmt_offset: start,
                spec_offset,
                symbols: Vec::new(),
            })
        }
        b'(' => None, // dynamic import expression
        _ => {
            // Named form: scan the binding list until a `from` keyword at
            // brace depth zero (`import { from } from "./x"` is legal).
            let bindings_start = pos;
            let mut depth = 0usize;
            loop {
                if let Some(end) = mask.skip_from(pos) {
                    pos = end;
                    continue;
                }
                let b = *bytes.get(pos)?;
                match b {
                    b'{' => depth += 1,
                    b'}' => depth = depth.saturating_sub(1),
                    b';' if depth == 0 => return None,
                    b'"' | b'\'' if depth == 0 => return None,
                    b'f' if depth == 0
                        && source[pos..].starts_with("from")
                        && !is_ident_byte(*bytes.get(pos + 4).unwrap_or(&b' '))
                        && (pos == 0 || !is_ident_byte(bytes[pos - 1])) =>
                    {
                        break;
                    }
                    _ => {}
                }
                pos += 1;
            }
            let bindings_end = pos;

            pos = skip_trivia(source, mask, pos + "from".len());
            match *bytes.get(pos)? {
                b'"' | b'\'' => {}
                _ => return None,
            }
            let (specifier, spec_offset, stmt_end) = read_string(source, pos)?;
            let symbols = parse_binding_symbols(source, mask, bindings_start, bindings_end);

            Some(ImportRecord {
                statement: source[start..stmt_end].to_string(),
                specifier,
                kind: ImportKind::Named,
                stmt_offset: start,
                spec_offset,
                symbols,
            })
        }
    }
}

/// Read a quoted module path starting at the opening quote.
///
/// Returns `(text, text_offset, end_after_closing_quote)`. Module paths do
/// not contain escapes; a newline before the closing quote means malformed
/// input and the candidate is dropped.
fn read_string(source: &str, quote_pos: usize) -> Option<(String, usize, usize)> {
    let bytes = source.as_bytes();
    let quote = bytes[quote_pos];
    let mut end = quote_pos + 1;

    while end < bytes.len() {
        let b = bytes[end];
        if b == quote {
            let text = source[quote_pos + 1..end].to_string();
            return Some((text, quote_pos + 1, end + 1));
        }
        if b == b'\n' {
            return None;
        }
        end += 1;
    }
    None
}

/// Extract the pre-alias imported names from a binding list.
///
/// Comments inside the binding span are stripped first. With a brace list,
/// the names are the pre-alias identifiers inside the braces; without one,
/// the sole default (or namespace alias) binding name is used.
fn parse_binding_symbols(
    source: &str,
    mask: &CommentMask,
    start: usize,
    end: usize,
) -> Vec<String> {
    let mut cleaned = String::new();
    let mut pos = start;
    while pos < end {
        if let Some(skip) = mask.skip_from(pos) {
            cleaned.push(' ');
            pos = skip.min(end);
            continue;
        }
        let next = mask.next_start_after(pos).unwrap_or(end).min(end);
        cleaned.push_str(&source[pos..next]);
        pos = next;
    }

    if let Some(open) = cleaned.find('{') {
        let close = cleaned[open + 1..]
            .find('}')
            .map(|i| open + 1 + i)
            .unwrap_or(cleaned.len());
        return cleaned[open + 1..close]
            .split(',')
            .filter_map(first_identifier)
            .collect();
    }

    let trimmed = cleaned.trim();
    if let Some(rest) = trimmed.strip_prefix('*') {
        let rest = rest.trim_start();
        let rest = rest.strip_prefix("as").unwrap_or(rest);
        return first_identifier(rest).into_iter().collect();
    }
    first_identifier(trimmed).into_iter().collect()
}

fn first_identifier(segment: &str) -> Option<String> {
    let bytes = segment.as_bytes();
    let start = bytes.iter().position(|b| is_ident_byte(*b))?;
    let mut end = start;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    Some(segment[start..end].to_string())
}

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Find the next occurrence of `word` at identifier boundaries, starting at
/// `from`.
pub(crate) fn find_keyword(source: &str, word: &str, mut from: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    while from + word.len() <= source.len() {
        let rel = source[from..].find(word)?;
        let at = from + rel;
        let after = at + word.len();
        let before_ok = at == 0 || !is_ident_byte(bytes[at - 1]);
        let after_ok = after >= bytes.len() || !is_ident_byte(bytes[after]);
        if before_ok && after_ok {
            return Some(at);
        }
        from = at + 1;
    }
    None
}

/// Advance past whitespace and comments.
pub(crate) fn skip_trivia(source: &str, mask: &CommentMask, mut pos: usize) -> usize {
    let bytes = source.as_bytes();
    loop {
        if let Some(end) = mask.skip_from(pos) {
            pos = end;
            continue;
        }
        match bytes.get(pos) {
            Some(b) if b.is_ascii_whitespace() => pos += 1,
            _ => return pos,
        }
    }
}

/// Read a contiguous identifier starting at `pos` (empty if none).
pub(crate) fn read_identifier(source: &str, pos: usize) -> &str {
    let bytes = source.as_bytes();
    let mut end = pos;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    &source[pos..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> Vec<ImportRecord> {
        let mask = CommentMask::scan(source);
        extract_imports(source, &mask)
    }

    #[test]
    fn named_import_with_braces() {
        let records = extract(r#"import { loadTable, saveTable } from "./db/table";"#);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.kind, ImportKind::Named);
        assert_eq!(r.specifier, "./db/table");
        assert_eq!(r.symbols, vec!["loadTable", "saveTable"]);
        assert_eq!(r.stmt_offset, 0);
    }

    #[test]
    fn side_effect_import() {
        let records = extract(r#"import "./polyfills.js";"#);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ImportKind::SideEffect);
        assert_eq!(records[0].specifier, "./polyfills.js");
        assert!(records[0].symbols.is_empty());
    }

    #[test]
    fn alias_resolves_to_pre_alias_name() {
        let records = extract(r#"import { render as paint } from "./view";"#);
        assert_eq!(records[0].symbols, vec!["render"]);
    }

    #[test]
    fn multiline_bindings_with_nested_comments() {
        let source = "import {\n  first, // picked\n  second as two, /* alias */\n  third,\n} from './many';\n";
        let records = extract(source);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symbols, vec!["first", "second", "third"]);
        assert_eq!(records[0].specifier, "./many");
    }

    #[test]
    fn commented_out_import_is_ignored() {
        let records = extract("// import { foo } from \"./bar\"\nlet x = 1;\n");
        assert!(records.is_empty());
    }

    #[test]
    fn block_commented_import_is_ignored() {
        let records = extract("/*\nimport { foo } from \"./bar\";\n*/\n");
        assert!(records.is_empty());
    }

    #[test]
    fn default_binding_name_is_the_symbol() {
        let records = extract(r#"import app from "./app";"#);
        assert_eq!(records[0].symbols, vec!["app"]);
    }

    #[test]
    fn default_plus_braces_uses_brace_names_only() {
        let records = extract(r#"import app, { mount } from "./app";"#);
        assert_eq!(records[0].symbols, vec!["mount"]);
    }

    #[test]
    fn namespace_import_uses_alias_name() {
        let records = extract(r#"import * as helpers from "./helpers";"#);
        assert_eq!(records[0].symbols, vec!["helpers"]);
    }

    #[test]
    fn from_as_binding_name_parses() {
        let records = extract(r#"import { from } from "./from";"#);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symbols, vec!["from"]);
        assert_eq!(records[0].specifier, "./from");
    }

    #[test]
    fn dynamic_import_is_not_a_record() {
        let records = extract(r#"const mod = import("./lazy.js");"#);
        assert!(records.is_empty());
    }

    #[test]
    fn statement_and_specifier_offsets_are_exact() {
        let source = "let a = 1;\nimport { b } from './b';\n";
        let records = extract(source);
        let r = &records[0];
        assert_eq!(&source[r.stmt_offset..r.stmt_offset + r.statement.len()], r.statement);
        assert_eq!(&source[r.spec_offset..r.spec_offset + r.specifier.len()], "./b");
    }

    #[test]
    fn two_imports_in_order() {
        let source = "import './a.js';\nimport { x } from './b.js';\n";
        let records = extract(source);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].specifier, "./a.js");
        assert_eq!(records[1].specifier, "./b.js");
    }
}

//! Scanner for property assignment lines
//!
//! ```text
//! 5[NodeLabel="root", FillColor=0x00ff00ff]   node scope
//! [FontSize=14; EdgeXIncrement=8]             global scope
//! ```
//!
//! A line is scanned and validated completely before anything is committed,
//! so a rejected line leaves the store and the style context untouched.

use log::{debug, warn};

use super::schema::{self, PropertyRecord, PropertyValue, Scope, ValueKind, NODE_ID_MAX};
use super::store::{NodeInfoArray, StoreError};
use super::style::StyleContext;
use crate::error::{Diagnostic, ParseError, Span};

/// Longest name, value or node id a property line accepts
pub const MAX_TOKEN_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineScope {
    Node(u32),
    Global,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub record: &'static PropertyRecord,
    pub value: PropertyValue,
    /// Span of the `name=value` pair
    pub span: Span,
}

/// A scanned and validated line, not yet committed
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedLine {
    pub scope: LineScope,
    pub assignments: Vec<Assignment>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Scan one line and commit its assignments
///
/// Returns the non-fatal diagnostics the line produced. Spans are relative
/// to `line`.
pub fn apply_line(
    line: &str,
    store: &mut NodeInfoArray,
    styles: &mut StyleContext,
) -> Result<Vec<Diagnostic>, ParseError> {
    let scanned = scan_line(line)?;
    match scanned.scope {
        LineScope::Node(node_id) => {
            if scanned.assignments.is_empty() {
                return Ok(scanned.diagnostics);
            }
            let span = 0..line.len();
            let pairs = scanned
                .assignments
                .into_iter()
                .map(|a| (a.record.index, a.value))
                .collect::<Vec<_>>();
            let count = pairs.len();
            store
                .merge(node_id, pairs)
                .map_err(|err| store_error(err, span))?;
            debug!(node_id, assignments = count; "Stored node properties");
        }
        LineScope::Global => {
            for assignment in &scanned.assignments {
                styles.apply_global(assignment.record, &assignment.value);
                debug!(
                    property = assignment.record.name,
                    value:% = assignment.value;
                    "Applied global property"
                );
            }
        }
    }
    Ok(scanned.diagnostics)
}

fn store_error(err: StoreError, span: Span) -> ParseError {
    match err {
        StoreError::PropertySetOverflow { node_id, max } => {
            ParseError::PropertySetOverflow { span, node_id, max }
        }
        StoreError::NodeTableOverflow { max } => ParseError::NodeTableOverflow { span, max },
    }
}

/// Scan and validate a line without side effects
pub fn scan_line(line: &str) -> Result<ScannedLine, ParseError> {
    let mut cursor = Cursor::new(line);
    cursor.skip_space();

    let scope = match cursor.peek() {
        Some(b) if b.is_ascii_digit() => {
            let span = cursor.take_while(|b| b.is_ascii_digit())?;
            let text = &line[span.clone()];
            let node_id = text
                .parse::<u64>()
                .ok()
                .filter(|&id| id <= u64::from(NODE_ID_MAX))
                .ok_or_else(|| ParseError::InvalidNodeId {
                    span,
                    text: text.to_string(),
                })?;
            LineScope::Node(node_id as u32)
        }
        Some(b'[') => LineScope::Global,
        _ => {
            return Err(cursor.unexpected(
                "expected a node id or '['",
                &["a node id", "'['"],
            ))
        }
    };

    let mut scanned = ScannedLine {
        scope,
        assignments: Vec::new(),
        diagnostics: Vec::new(),
    };

    cursor.skip_space();
    if matches!(scope, LineScope::Node(_)) && cursor.at_end() {
        return Ok(scanned);
    }
    if !cursor.eat(b'[') {
        return Err(cursor.unexpected("expected '['", &["'['"]));
    }

    loop {
        cursor.skip_space();
        let start = cursor.pos;
        let name_span = cursor.take_while(|b| b.is_ascii_alphanumeric())?;
        if name_span.is_empty() {
            return Err(cursor.unexpected("expected a property name", &["a property name"]));
        }
        let name = &line[name_span.clone()];
        let record = schema::lookup(name).ok_or_else(|| ParseError::UnknownProperty {
            span: name_span.clone(),
            name: name.to_string(),
        })?;

        cursor.skip_space();
        if !cursor.eat(b'=') {
            return Err(cursor.unexpected("expected '='", &["'='"]));
        }
        cursor.skip_space();

        let value_span = match record.kind {
            ValueKind::UnsignedInt => cursor.number()?,
            ValueKind::Text => cursor.text()?,
        };
        let raw = &line[value_span.clone()];
        let value = record
            .validate(raw)
            .map_err(|err| ParseError::InvalidPropertyValue {
                span: value_span.clone(),
                name: record.name.to_string(),
                value: raw.to_string(),
                reason: err.to_string(),
            })?;
        let span = start..cursor.pos;

        match scope {
            LineScope::Node(node_id) if record.scope == Scope::Extend => {
                warn!(node_id, property = record.name; "Extend property ignored in node scope");
                scanned
                    .diagnostics
                    .push(Diagnostic::scope_mismatch(span, node_id, record.name));
            }
            _ => scanned.assignments.push(Assignment {
                record,
                value,
                span,
            }),
        }

        cursor.skip_space();
        if matches!(cursor.peek(), Some(b',' | b';')) {
            cursor.pos += 1;
            cursor.skip_space();
        }
        if cursor.eat(b']') {
            break;
        }
        if cursor.at_end() {
            return Err(cursor.unexpected("missing ']'", &["']'", "a property name"]));
        }
    }

    cursor.skip_space();
    if matches!(cursor.peek(), Some(b',' | b';')) {
        cursor.pos += 1;
        cursor.skip_space();
    }
    match cursor.peek() {
        None | Some(b'/' | b'#') => Ok(scanned),
        Some(_) => Err(cursor.unexpected("unexpected content after ']'", &["end of line"])),
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_space(&mut self) {
        while matches!(self.peek(), Some(b) if b <= b' ') {
            self.pos += 1;
        }
    }

    /// Consume a run of bytes matching `pred`, bounded by [`MAX_TOKEN_LEN`]
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> Result<Span, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if pred(b)) {
            self.pos += 1;
        }
        let len = self.pos - start;
        if len > MAX_TOKEN_LEN {
            return Err(ParseError::TokenTooLong {
                span: start..self.pos,
                len,
                max: MAX_TOKEN_LEN,
            });
        }
        Ok(start..self.pos)
    }

    /// Decimal digits or `0x` followed by hex digits
    fn number(&mut self) -> Result<Span, ParseError> {
        let start = self.pos;
        let bytes = self.text.as_bytes();
        let hex = bytes.get(start) == Some(&b'0')
            && matches!(bytes.get(start + 1), Some(b'x' | b'X'));
        let digits = if hex {
            self.pos += 2;
            self.take_while(|b| b.is_ascii_hexdigit())?
        } else {
            self.take_while(|b| b.is_ascii_digit())?
        };
        if digits.is_empty() {
            return Err(self.unexpected("expected a number", &["a decimal or 0x hex number"]));
        }
        if self.pos - start > MAX_TOKEN_LEN {
            return Err(ParseError::TokenTooLong {
                span: start..self.pos,
                len: self.pos - start,
                max: MAX_TOKEN_LEN,
            });
        }
        Ok(start..self.pos)
    }

    /// A double-quoted printable run or a bare run up to a delimiter
    ///
    /// The returned span excludes the quotes.
    fn text(&mut self) -> Result<Span, ParseError> {
        if self.eat(b'"') {
            let quote = self.pos - 1;
            let span = self.take_while(|b| b != b'"' && (b' '..=b'~').contains(&b))?;
            if !self.eat(b'"') {
                return Err(ParseError::syntax(
                    quote..self.pos,
                    "unterminated quoted value",
                    vec!["'\"'".to_string()],
                ));
            }
            return Ok(span);
        }
        let span = self.take_while(|b| b > b' ' && !matches!(b, b',' | b']' | b'"'))?;
        if span.is_empty() {
            return Err(self.unexpected("expected a value", &["a value"]));
        }
        Ok(span)
    }

    fn unexpected(&self, message: &str, expected: &[&str]) -> ParseError {
        let found = self.text[self.pos.min(self.text.len())..].chars().next();
        let (span, message) = match found {
            Some(c) => (
                self.pos..self.pos + c.len_utf8(),
                format!("{}, found '{}'", message, c),
            ),
            None => (self.pos..self.pos, format!("{}, found end of line", message)),
        };
        ParseError::syntax(span, message, expected.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use pretty_assertions::assert_eq;

    fn names(scanned: &ScannedLine) -> Vec<&'static str> {
        scanned.assignments.iter().map(|a| a.record.name).collect()
    }

    #[test]
    fn test_node_scope_line() {
        let scanned = scan_line(r#"5[NodeLabel="hi", FillColor=0x00ff00ff]"#).unwrap();
        assert_eq!(scanned.scope, LineScope::Node(5));
        assert_eq!(names(&scanned), vec!["NodeLabel", "FillColor"]);
        assert_eq!(scanned.assignments[0].value, PropertyValue::Text("hi".into()));
        assert_eq!(
            scanned.assignments[1].value,
            PropertyValue::UnsignedInt(0x00ff_00ff)
        );
    }

    #[test]
    fn test_global_scope_line() {
        let scanned = scan_line("  [FontSize=14; EdgeXIncrement = 8 BorderWidth=2]").unwrap();
        assert_eq!(scanned.scope, LineScope::Global);
        assert_eq!(names(&scanned), vec!["FontSize", "EdgeXIncrement", "BorderWidth"]);
    }

    #[test]
    fn test_unquoted_text() {
        let scanned = scan_line("7[BorderDash=4|2 NodeLabel=leaf]").unwrap();
        assert_eq!(scanned.assignments[0].value, PropertyValue::Text("4|2".into()));
        assert_eq!(scanned.assignments[1].value, PropertyValue::Text("leaf".into()));
    }

    #[test]
    fn test_quoted_text_with_spaces() {
        let scanned = scan_line(r#"[FontFamily="DejaVu Sans"]"#).unwrap();
        assert_eq!(
            scanned.assignments[0].value,
            PropertyValue::Text("DejaVu Sans".into())
        );
    }

    #[test]
    fn test_trailing_comment_and_separator() {
        assert!(scan_line("1[NodeRadius=4]; // big").is_ok());
        assert!(scan_line("1[NodeRadius=4] # big").is_ok());
        let err = scan_line("1[NodeRadius=4] extra").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::Syntax);
    }

    #[test]
    fn test_node_id_only_line() {
        let scanned = scan_line("12").unwrap();
        assert_eq!(scanned.scope, LineScope::Node(12));
        assert!(scanned.assignments.is_empty());
    }

    #[test]
    fn test_node_id_bounds() {
        assert!(scan_line("4294967280[NodeRadius=1]").is_ok());
        let err = scan_line("4294967281[NodeRadius=1]").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidNodeId);
        assert_eq!(err.span(), &(0..10));
    }

    #[test]
    fn test_out_of_range_value() {
        let err = scan_line("5[NodeRadius=300]").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidPropertyValue);
        assert_eq!(err.span(), &(13..16));
    }

    #[test]
    fn test_unknown_property() {
        let err = scan_line("5[Radius=3]").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnknownProperty);
        assert_eq!(err.span(), &(2..8));
    }

    #[test]
    fn test_malformed_lines() {
        for line in [
            "A[NodeRadius=1]",
            "5[]",
            "5[NodeRadius 1]",
            "5[NodeRadius=]",
            "5[NodeRadius=0x]",
            "5[NodeRadius=1",
            "5 NodeRadius=1",
            r#"5[NodeLabel="open]"#,
            "5[NodeLabel=]",
        ] {
            let err = scan_line(line).unwrap_err();
            assert!(
                matches!(
                    err.kind(),
                    ParseErrorKind::Syntax | ParseErrorKind::InvalidPropertyValue
                ),
                "{}: {:?}",
                line,
                err
            );
        }
    }

    #[test]
    fn test_token_too_long() {
        let line = format!("[FontFamily={}]", "x".repeat(MAX_TOKEN_LEN + 1));
        let err = scan_line(&line).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::TokenTooLong);
    }

    #[test]
    fn test_scope_mismatch_is_not_fatal() {
        let scanned = scan_line("3[FontSize=20, NodeRadius=6]").unwrap();
        assert_eq!(names(&scanned), vec!["NodeRadius"]);
        assert_eq!(scanned.diagnostics.len(), 1);
        assert_eq!(scanned.diagnostics[0].kind, ParseErrorKind::ScopeMismatch);
    }

    #[test]
    fn test_scope_mismatch_still_validates() {
        let err = scan_line("3[FontSize=200]").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::InvalidPropertyValue);
    }

    #[test]
    fn test_apply_line_is_atomic() {
        let mut store = NodeInfoArray::new();
        let mut styles = StyleContext::new();
        assert!(apply_line("5[NodeRadius=4, BorderWidth=99]", &mut store, &mut styles).is_err());
        assert!(store.get(5).is_none());

        apply_line("5[NodeRadius=4]", &mut store, &mut styles).unwrap();
        assert_eq!(
            store.get(5).and_then(|info| info.get(1)),
            Some(&PropertyValue::UnsignedInt(4))
        );
    }

    #[test]
    fn test_apply_global_line() {
        let mut store = NodeInfoArray::new();
        let mut styles = StyleContext::new();
        apply_line("[FontSize=14, FillColor=0xff]", &mut store, &mut styles).unwrap();
        assert!(store.is_empty());
        assert_eq!(styles.overrides().extend.font_size, 14);
        assert_eq!(styles.overrides().base.fill_color, 0xff);
    }

    #[test]
    fn test_apply_line_table_overflow() {
        let mut store = NodeInfoArray::with_capacity(1);
        let mut styles = StyleContext::new();
        apply_line("1[NodeRadius=4]", &mut store, &mut styles).unwrap();
        let err = apply_line("2[NodeRadius=4]", &mut store, &mut styles).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::NodeTableOverflow);
    }
}

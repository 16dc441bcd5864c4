//! Error types for parsing and validation

use std::fmt;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Classification of everything that can go wrong while reading an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    Lexical,
    Syntax,
    TokenTooLong,
    InvalidNodeId,
    UnknownProperty,
    InvalidPropertyValue,
    PropertySetOverflow,
    NodeTableOverflow,
    /// Non-fatal: reported through [`Diagnostic`], never through [`ParseError`]
    ScopeMismatch,
    StartTokenMissing,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseErrorKind::Lexical => "lexical error",
            ParseErrorKind::Syntax => "syntax error",
            ParseErrorKind::TokenTooLong => "token too long",
            ParseErrorKind::InvalidNodeId => "invalid node id",
            ParseErrorKind::UnknownProperty => "unknown property",
            ParseErrorKind::InvalidPropertyValue => "invalid property value",
            ParseErrorKind::PropertySetOverflow => "property set overflow",
            ParseErrorKind::NodeTableOverflow => "node table overflow",
            ParseErrorKind::ScopeMismatch => "scope mismatch",
            ParseErrorKind::StartTokenMissing => "start token missing",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unrecognized character '{found}'")]
    Lexical { span: Span, found: char },

    #[error("{message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    #[error("token of {len} characters exceeds the limit of {max}")]
    TokenTooLong { span: Span, len: usize, max: usize },

    #[error("invalid node id '{text}'")]
    InvalidNodeId { span: Span, text: String },

    #[error("unknown property '{name}'")]
    UnknownProperty { span: Span, name: String },

    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidPropertyValue {
        span: Span,
        name: String,
        value: String,
        reason: String,
    },

    #[error("node {node_id} cannot hold more than {max} properties")]
    PropertySetOverflow { span: Span, node_id: u32, max: usize },

    #[error("node table is full ({max} nodes)")]
    NodeTableOverflow { span: Span, max: usize },

    #[error("input must begin with '{marker} ='")]
    StartTokenMissing { span: Span, marker: &'static str },
}

impl ParseError {
    /// Create a syntax error with a list of acceptable alternatives
    pub fn syntax(span: Span, message: impl Into<String>, expected: Vec<String>) -> Self {
        Self::Syntax {
            span,
            message: message.into(),
            expected,
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        match self {
            Self::Lexical { .. } => ParseErrorKind::Lexical,
            Self::Syntax { .. } => ParseErrorKind::Syntax,
            Self::TokenTooLong { .. } => ParseErrorKind::TokenTooLong,
            Self::InvalidNodeId { .. } => ParseErrorKind::InvalidNodeId,
            Self::UnknownProperty { .. } => ParseErrorKind::UnknownProperty,
            Self::InvalidPropertyValue { .. } => ParseErrorKind::InvalidPropertyValue,
            Self::PropertySetOverflow { .. } => ParseErrorKind::PropertySetOverflow,
            Self::NodeTableOverflow { .. } => ParseErrorKind::NodeTableOverflow,
            Self::StartTokenMissing { .. } => ParseErrorKind::StartTokenMissing,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Self::Lexical { span, .. }
            | Self::Syntax { span, .. }
            | Self::TokenTooLong { span, .. }
            | Self::InvalidNodeId { span, .. }
            | Self::UnknownProperty { span, .. }
            | Self::InvalidPropertyValue { span, .. }
            | Self::PropertySetOverflow { span, .. }
            | Self::NodeTableOverflow { span, .. }
            | Self::StartTokenMissing { span, .. } => span,
        }
    }

    fn span_mut(&mut self) -> &mut Span {
        match self {
            Self::Lexical { span, .. }
            | Self::Syntax { span, .. }
            | Self::TokenTooLong { span, .. }
            | Self::InvalidNodeId { span, .. }
            | Self::UnknownProperty { span, .. }
            | Self::InvalidPropertyValue { span, .. }
            | Self::PropertySetOverflow { span, .. }
            | Self::NodeTableOverflow { span, .. }
            | Self::StartTokenMissing { span, .. } => span,
        }
    }

    /// Shift the span by `base` bytes, turning a line-relative error into a
    /// source-relative one
    pub fn offset(mut self, base: usize) -> Self {
        let span = self.span_mut();
        *span = span.start + base..span.end + base;
        self
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = clamp(self.span(), source.len());
        let expected = match self {
            Self::Syntax { expected, .. } if !expected.is_empty() => {
                format!("\nExpected: {}", expected.join(", "))
            }
            _ => String::new(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(format!("{}: {}", self.kind(), self))
            .with_label(
                Label::new((filename, span))
                    .with_message(format!("{}{}", self, expected))
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}: {}", self.kind(), self),
        }
    }
}

/// A non-fatal problem found while reading an input
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    /// An extend-only property assigned inside a node-scoped line
    pub fn scope_mismatch(span: Span, node_id: u32, property: &str) -> Self {
        Self {
            kind: ParseErrorKind::ScopeMismatch,
            span,
            message: format!(
                "extend property '{}' cannot be used as a property of node {}, it is ignored",
                property, node_id
            ),
        }
    }

    pub fn offset(mut self, base: usize) -> Self {
        self.span = self.span.start + base..self.span.end + base;
        self
    }

    /// Format the warning with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = clamp(&self.span, source.len());
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Warning, filename, span.start)
            .with_message(self.kind.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(&self.message)
                    .with_color(Color::Yellow),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

fn clamp(span: &Span, len: usize) -> Span {
    let start = span.start.min(len);
    start..span.end.clamp(start, len)
}

//! Lexer for the bracketed tree notation using logos

use logos::Logos;

use crate::error::{ParseError, Span};

/// Longest label the tree notation accepts
pub const MAX_LABEL_LEN: usize = 256;

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[\x00-\x20]+")]
pub enum Token {
    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token(",")]
    Comma,
    #[regex(r"[A-Za-z0-9_]+", |lex| lex.slice().to_string())]
    Label(String),
}

/// Tokenize a tree description
///
/// Fails on the first character outside the notation's alphabet or on a
/// label longer than [`MAX_LABEL_LEN`].
pub fn lex(input: &str) -> Result<Vec<(Token, Span)>, ParseError> {
    let mut tokens = Vec::new();
    for (tok, span) in Token::lexer(input).spanned() {
        match tok {
            Ok(Token::Label(label)) if label.len() > MAX_LABEL_LEN => {
                return Err(ParseError::TokenTooLong {
                    span,
                    len: label.len(),
                    max: MAX_LABEL_LEN,
                });
            }
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let found = input[span.start..].chars().next().unwrap_or('\u{fffd}');
                return Err(ParseError::Lexical { span, found });
            }
        }
    }
    Ok(tokens)
}

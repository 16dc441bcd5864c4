//! Table-driven LL(2) parser for the bracketed tree notation
//!
//! ```text
//! Tree := Label '(' Tree ',' Tree ')'
//!       | Label
//! ```
//!
//! The parser keeps two stacks in lockstep: grammar symbols still to be
//! matched, and the slots new nodes should be attached to. A lone label is
//! accepted by a fallback after the table-driven pass rejects it.

use super::lexer::{self, Token};
use super::tree::{BiTree, NodeIndex, Side};
use crate::error::{ParseError, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symbol {
    Tree,
    Label,
    ParenOpen,
    ParenClose,
    Comma,
    End,
}

impl Symbol {
    fn describe(self) -> &'static str {
        match self {
            Symbol::Tree | Symbol::Label => "a label",
            Symbol::ParenOpen => "'('",
            Symbol::ParenClose => "')'",
            Symbol::Comma => "','",
            Symbol::End => "end of input",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Tree -> Label '(' Tree ',' Tree ')'
    ExpandInternal,
    /// Tree -> Label
    ExpandLeaf,
    /// Drop the Tree symbol without consuming input
    Pop,
    /// Terminal on the stack equals the lookahead
    Match,
    Error,
}

fn action(top: Symbol, la1: Symbol, la2: Option<Symbol>) -> Action {
    match (top, la1, la2) {
        (Symbol::Tree, Symbol::Label, Some(Symbol::ParenOpen)) => Action::ExpandInternal,
        (Symbol::Tree, Symbol::Label, Some(Symbol::Comma | Symbol::ParenClose)) => {
            Action::ExpandLeaf
        }
        (Symbol::Tree, Symbol::Label, Some(Symbol::End)) => Action::Pop,
        (Symbol::Tree, _, _) => Action::Error,
        (top, la1, _) if top == la1 => Action::Match,
        _ => Action::Error,
    }
}

/// Where the next node built by an expansion goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Root,
    Child(NodeIndex, Side),
    /// Consumed when the node's own label is matched
    Own(NodeIndex),
}

struct Terminal<'a> {
    symbol: Symbol,
    label: Option<&'a str>,
    span: Span,
}

/// Result of parsing a tree description
#[derive(Debug, Clone)]
pub struct ParsedTree {
    pub tree: BiTree,
    /// Length of the longest label, used to size node circles
    pub max_label_len: usize,
}

/// Parse a tree description such as `R(A(C,D),B)`
pub fn parse(input: &str) -> Result<ParsedTree, ParseError> {
    let tokens = lexer::lex(input)?;
    let mut terminals: Vec<Terminal<'_>> = tokens
        .iter()
        .map(|(token, span)| match token {
            Token::ParenOpen => terminal(Symbol::ParenOpen, None, span),
            Token::ParenClose => terminal(Symbol::ParenClose, None, span),
            Token::Comma => terminal(Symbol::Comma, None, span),
            Token::Label(label) => terminal(Symbol::Label, Some(label), span),
        })
        .collect();
    terminals.push(Terminal {
        symbol: Symbol::End,
        label: None,
        span: input.len()..input.len(),
    });

    match run(&terminals) {
        Ok(parsed) => Ok(parsed),
        Err(err) => match terminals.as_slice() {
            [Terminal {
                symbol: Symbol::Label,
                label: Some(label),
                ..
            }, _] => Ok(ParsedTree {
                tree: BiTree::single(*label),
                max_label_len: label.len(),
            }),
            _ => Err(err),
        },
    }
}

fn terminal<'a>(symbol: Symbol, label: Option<&'a String>, span: &Span) -> Terminal<'a> {
    Terminal {
        symbol,
        label: label.map(String::as_str),
        span: span.clone(),
    }
}

fn run(terminals: &[Terminal<'_>]) -> Result<ParsedTree, ParseError> {
    let mut symbols = vec![Symbol::End, Symbol::Tree];
    let mut slots = vec![Slot::Root];
    let mut tree = BiTree::new();
    let mut max_label_len = 0;
    let mut cursor = 0;

    while let Some(current) = terminals.get(cursor) {
        let Some(&top) = symbols.last() else {
            return Err(unexpected(current, Symbol::End));
        };
        let la2 = terminals.get(cursor + 1).map(|t| t.symbol);

        let step = action(top, current.symbol, la2);
        match step {
            Action::ExpandInternal | Action::ExpandLeaf => {
                symbols.pop();
                let label = current.label.unwrap_or_default();
                let node = tree.add_node(label);
                max_label_len = max_label_len.max(label.len());
                place(&mut tree, pop_slot(&mut slots, current)?, node, current)?;

                if step == Action::ExpandInternal {
                    symbols.extend([
                        Symbol::ParenClose,
                        Symbol::Tree,
                        Symbol::Comma,
                        Symbol::Tree,
                        Symbol::ParenOpen,
                        Symbol::Label,
                    ]);
                    slots.extend([
                        Slot::Child(node, Side::Right),
                        Slot::Child(node, Side::Left),
                        Slot::Own(node),
                    ]);
                } else {
                    symbols.push(Symbol::Label);
                    slots.push(Slot::Own(node));
                }
            }
            Action::Pop => {
                symbols.pop();
                pop_slot(&mut slots, current)?;
            }
            Action::Match => {
                if top == Symbol::Label {
                    pop_slot(&mut slots, current)?;
                }
                symbols.pop();
                cursor += 1;
            }
            Action::Error => return Err(unexpected(current, top)),
        }
    }

    if !symbols.is_empty() || tree.root().is_none() {
        let span = terminals.last().map(|t| t.span.clone()).unwrap_or(0..0);
        return Err(ParseError::syntax(span, "incomplete tree description", vec![]));
    }

    Ok(ParsedTree {
        tree,
        max_label_len,
    })
}

fn pop_slot(slots: &mut Vec<Slot>, at: &Terminal<'_>) -> Result<Slot, ParseError> {
    slots
        .pop()
        .ok_or_else(|| ParseError::syntax(at.span.clone(), "unbalanced tree description", vec![]))
}

fn place(tree: &mut BiTree, slot: Slot, node: NodeIndex, at: &Terminal<'_>) -> Result<(), ParseError> {
    match slot {
        Slot::Root => tree.set_root(node),
        Slot::Child(parent, side) => tree.attach(parent, side, node),
        Slot::Own(_) => {
            return Err(ParseError::syntax(
                at.span.clone(),
                "label found where a subtree was expected",
                vec![],
            ))
        }
    }
    Ok(())
}

fn unexpected(found: &Terminal<'_>, expected: Symbol) -> ParseError {
    let found_text = match (found.symbol, found.label) {
        (Symbol::Label, Some(label)) => format!("label '{}'", label),
        (symbol, _) => symbol.describe().to_string(),
    };
    let mut alternatives = vec![expected.describe().to_string()];
    if expected == Symbol::Tree {
        alternatives.push("a label followed by '('".to_string());
    }
    ParseError::syntax(
        found.span.clone(),
        format!("unexpected {}, expected {}", found_text, expected.describe()),
        alternatives,
    )
}

//! Recursive-descent query parser.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! Or   := And ('OR' And)*
//! And  := Term ('AND' Term)*
//! Term := '(' Or ')' | WORD_OR_PHRASE
//! ```
//!
//! Two operands with no operator between them are joined by an implicit
//! `AND`, so `deep compression AND fpga` needs all three terms.

use crate::error::{Result, SearchError};

use super::expression::{OpNode, Operator, QueryNode, TermNode};
use super::token::{tokenize, Token, TokenKind};

pub struct QueryParser {
    tokens: Vec<Token>,
    index: usize,
}

impl QueryParser {
    /// Tokenizes and parses a raw expression.
    pub fn parse(input: &str) -> Result<QueryNode> {
        Self::parse_tokens(tokenize(input)?)
    }

    /// Parses an already tokenized expression.
    pub fn parse_tokens(tokens: Vec<Token>) -> Result<QueryNode> {
        if tokens.is_empty() {
            return Err(SearchError::syntax_at_end("query must contain at least one term"));
        }

        let mut parser = Self { tokens, index: 0 };
        let node = parser.parse_or_expression()?;
        if let Some(token) = parser.peek() {
            return Err(SearchError::syntax(
                format!("unexpected {}", describe(token.kind())),
                token.position(),
            ));
        }
        Ok(node)
    }

    fn parse_or_expression(&mut self) -> Result<QueryNode> {
        let mut parts = vec![self.parse_and_expression()?];
        while self.consume(&TokenKind::Or) {
            parts.push(self.parse_and_expression()?);
        }
        Ok(collapse(Operator::Or, parts))
    }

    fn parse_and_expression(&mut self) -> Result<QueryNode> {
        let mut parts = vec![self.parse_term()?];
        while self.consume(&TokenKind::And) || self.next_starts_operand() {
            parts.push(self.parse_term()?);
        }
        Ok(collapse(Operator::And, parts))
    }

    fn parse_term(&mut self) -> Result<QueryNode> {
        let Some(token) = self.next() else {
            return Err(SearchError::syntax_at_end(
                "expected term or '(' but reached end of query",
            ));
        };

        match token.kind() {
            TokenKind::LParen => {
                let node = self.parse_or_expression()?;
                if self.consume(&TokenKind::RParen) {
                    return Ok(node);
                }
                Err(SearchError::syntax("missing closing ')'", token.position()))
            }
            TokenKind::Term(raw) => {
                let phrase = raw.trim_matches('"');
                if phrase.is_empty() {
                    return Err(SearchError::syntax("empty phrase", token.position()));
                }
                Ok(QueryNode::Term(TermNode::new(phrase)))
            }
            other => Err(SearchError::syntax(
                format!("expected term but found {}", describe(other)),
                token.position(),
            )),
        }
    }

    fn next_starts_operand(&self) -> bool {
        matches!(
            self.peek().map(Token::kind),
            Some(TokenKind::Term(_) | TokenKind::LParen)
        )
    }

    fn consume(&mut self, expected: &TokenKind) -> bool {
        matches!(self.peek(), Some(token) if token.kind() == expected) && {
            self.index += 1;
            true
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index)?.clone();
        self.index += 1;
        Some(token)
    }
}

/// Builds the node for one precedence level.
///
/// A single part is returned as is. Parts that are themselves nodes of the
/// same operator (parenthesised groups) are spliced into the parent.
fn collapse(operator: Operator, parts: Vec<QueryNode>) -> QueryNode {
    let mut flattened = Vec::with_capacity(parts.len());
    for part in parts {
        match part {
            QueryNode::Op(op) if op.operator() == operator => {
                flattened.extend(op.into_children());
            }
            other => flattened.push(other),
        }
    }

    if flattened.len() == 1 {
        return flattened.remove(0);
    }
    match OpNode::new(operator, flattened) {
        Some(op) => QueryNode::Op(op),
        None => unreachable!("every precedence level parses at least one term"),
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::And => "'AND'".to_string(),
        TokenKind::Or => "'OR'".to_string(),
        TokenKind::LParen => "'('".to_string(),
        TokenKind::RParen => "')'".to_string(),
        TokenKind::Term(raw) => format!("term '{raw}'"),
    }
}

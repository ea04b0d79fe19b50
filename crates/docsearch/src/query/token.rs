//! Query tokenizer.
//!
//! Purely lexical: splits a raw expression into operators, parentheses and
//! terms without applying any precedence.

use crate::error::{Result, SearchError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    And,
    Or,
    LParen,
    RParen,
    /// A bare word, or a quoted phrase with its quotes still attached.
    Term(String),
}

impl Token {
    pub fn new(kind: TokenKind, position: usize) -> Self {
        Self { kind, position }
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Byte offset of the token in the source expression.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// Splits `input` into tokens.
///
/// Fails only when a quoted phrase has no closing quote.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut cursor = 0usize;

    while let Some(ch) = input[cursor..].chars().next() {
        if ch.is_whitespace() {
            cursor += ch.len_utf8();
            continue;
        }

        let position = cursor;
        match ch {
            '(' => {
                tokens.push(Token::new(TokenKind::LParen, position));
                cursor += 1;
            }
            ')' => {
                tokens.push(Token::new(TokenKind::RParen, position));
                cursor += 1;
            }
            _ if keyword_at(input, cursor, "and") => {
                tokens.push(Token::new(TokenKind::And, position));
                cursor += 3;
            }
            _ if keyword_at(input, cursor, "or") => {
                tokens.push(Token::new(TokenKind::Or, position));
                cursor += 2;
            }
            '"' => {
                let Some(offset) = input[cursor + 1..].find('"') else {
                    return Err(SearchError::syntax("missing closing quote", position));
                };
                let end = cursor + 1 + offset + 1;
                tokens.push(Token::new(
                    TokenKind::Term(input[cursor..end].to_string()),
                    position,
                ));
                cursor = end;
            }
            _ => {
                let end = input[cursor..]
                    .char_indices()
                    .find(|&(_, next)| next.is_whitespace() || matches!(next, '(' | ')'))
                    .map_or(input.len(), |(offset, _)| cursor + offset);
                tokens.push(Token::new(
                    TokenKind::Term(input[cursor..end].to_string()),
                    position,
                ));
                cursor = end;
            }
        }
    }

    Ok(tokens)
}

/// Matches `keyword` case-insensitively at `cursor` when it is not followed
/// by another letter, so `ANDROID` or `order` stay plain words.
fn keyword_at(input: &str, cursor: usize, keyword: &str) -> bool {
    let end = cursor + keyword.len();
    let Some(candidate) = input.get(cursor..end) else {
        return false;
    };
    if !candidate.eq_ignore_ascii_case(keyword) {
        return false;
    }
    !input[end..]
        .chars()
        .next()
        .is_some_and(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .expect("tokenize")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    fn term(value: &str) -> TokenKind {
        TokenKind::Term(value.to_string())
    }

    #[test]
    fn splits_operators_parentheses_and_words() {
        assert_eq!(
            kinds("(deep OR shallow) AND learning"),
            vec![
                TokenKind::LParen,
                term("deep"),
                TokenKind::Or,
                term("shallow"),
                TokenKind::RParen,
                TokenKind::And,
                term("learning"),
            ]
        );
    }

    #[test]
    fn operators_are_case_insensitive() {
        assert_eq!(
            kinds("cats and dogs Or birds"),
            vec![
                term("cats"),
                TokenKind::And,
                term("dogs"),
                TokenKind::Or,
                term("birds"),
            ]
        );
    }

    #[test]
    fn keyword_prefix_of_a_longer_word_is_not_split() {
        assert_eq!(kinds("ANDROID"), vec![term("ANDROID")]);
        assert_eq!(kinds("order"), vec![term("order")]);
        assert_eq!(
            kinds("oracle AND android"),
            vec![term("oracle"), TokenKind::And, term("android")]
        );
    }

    #[test]
    fn keyword_followed_by_non_letter_is_an_operator() {
        assert_eq!(
            kinds("AND(x)"),
            vec![
                TokenKind::And,
                TokenKind::LParen,
                term("x"),
                TokenKind::RParen,
            ]
        );
        assert_eq!(kinds("OR-gate"), vec![TokenKind::Or, term("-gate")]);
    }

    #[test]
    fn quoted_phrase_is_one_token_with_quotes() {
        assert_eq!(
            kinds("\"neural codec\" AND fpga"),
            vec![term("\"neural codec\""), TokenKind::And, term("fpga")]
        );
    }

    #[test]
    fn unterminated_quote_is_a_syntax_error() {
        let error = tokenize("deep AND \"neural codec").expect_err("should fail");
        match error {
            SearchError::Syntax { message, position } => {
                assert!(message.contains("closing quote"), "unexpected: {message}");
                assert_eq!(position, Some(9));
            }
            other => panic!("expected syntax error, got: {other:?}"),
        }
    }

    #[test]
    fn records_byte_positions() {
        let tokens = tokenize("  (a)").expect("tokenize");
        let positions = tokens.iter().map(Token::position).collect::<Vec<_>>();
        assert_eq!(positions, vec![2, 3, 4]);
    }

    #[test]
    fn handles_multibyte_words() {
        assert_eq!(
            kinds("größe AND 世界"),
            vec![term("größe"), TokenKind::And, term("世界")]
        );
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(kinds("   ").is_empty());
    }
}

//! Token stream consumed by the grammar procedures
//!
//! The stream owns the token list and a cursor that only ever moves forward.
//! The cursor advances on a successful [`TokenStream::consume`] (or
//! [`TokenStream::consume_if`]) and never past the final end-of-input marker.

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::ParseError;

pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    /// Wrap a token list, appending an end-of-input marker if it lacks one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let location = tokens
                .last()
                .map(|t| t.location)
                .unwrap_or_else(|| SourceLocation::new(1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", location));
        }

        Self {
            tokens,
            position: 0,
        }
    }

    /// The current token.
    pub fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// True only at the final end marker; an `Eof` earlier in the list is an
    /// ordinary token the grammar rejects.
    pub fn at_end(&self) -> bool {
        self.position + 1 == self.tokens.len()
    }

    /// Index of the current token.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of tokens, end marker included.
    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Return the current token and advance past it if it has the expected
    /// kind; otherwise fail with a syntax error naming the token found.
    pub fn consume(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(self.peek(), kind.to_string()))
        }
    }

    /// Consume the current token only when it has the given kind.
    pub fn consume_if(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        if !self.at_end() {
            self.position += 1;
        }
        token
    }
}

//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, helper methods and the parse entry points.
//!
//! # Parser Architecture
//!
//! The Parser is a predictive recursive descent parser: every production
//! chooses its alternative from the kind of the current token alone and never
//! backtracks.
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: types, formal arguments and declaration suffixes
//! - `statements`: the statement dispatcher and statement lists
//! - `expressions`: the four expression tiers and constant folding
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::config::ParserConfig;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use crate::parser::stream::TokenStream;
use log::{debug, info};
use thiserror::Error;

/// Parser error type
///
/// The first error aborts the parse; there is no recovery and no partial tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The current token cannot start or continue the production being parsed
    #[error("Syntax error at {location}: expected {expected}, found {found}")]
    Syntax {
        found: String,
        expected: String,
        location: SourceLocation,
    },

    /// A declaration initializer did not reduce to a constant
    #[error("Invalid initializer at {location}: only constants are allowed in initializers")]
    InvalidInitializer { location: SourceLocation },

    #[error("Nesting exceeds {limit} levels at {location}")]
    RecursionLimitExceeded {
        limit: usize,
        location: SourceLocation,
    },

    /// A declared array size exceeds `ParserConfig::max_array_size`
    #[error("Array size {size} at {location} exceeds the limit of {limit}")]
    ArrayTooLarge {
        size: usize,
        limit: usize,
        location: SourceLocation,
    },

    #[error(transparent)]
    Lex(#[from] LexError),
}

impl ParseError {
    pub(crate) fn unexpected(token: &Token, expected: impl Into<String>) -> Self {
        let err = ParseError::Syntax {
            found: token.describe(),
            expected: expected.into(),
            location: token.location,
        };
        debug!("{}", err);
        err
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::Syntax { location, .. }
            | ParseError::InvalidInitializer { location }
            | ParseError::RecursionLimitExceeded { location, .. }
            | ParseError::ArrayTooLarge { location, .. } => *location,
            ParseError::Lex(err) => err.location,
        }
    }
}

/// Recursive descent parser for Cuppa
pub struct Parser {
    pub(crate) stream: TokenStream,
    pub(crate) config: ParserConfig,
    depth: usize,
}

impl Parser {
    /// Tokenize `source` and prepare to parse it.
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self::from_tokens(tokens))
    }

    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            config: ParserConfig::default(),
            depth: 0,
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn stream(&self) -> &TokenStream {
        &self.stream
    }

    /// Parse the entire program: a statement list followed by end of input
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        info!("Beginning parse of {} tokens", self.stream.len());

        let statements = self.parse_statement_list()?;

        if !self.stream.at_end() {
            return Err(ParseError::unexpected(self.stream.peek(), "end of input"));
        }

        info!("Parsed {} top-level statements", statements.len());
        Ok(Program::new(statements))
    }

    // ===== Helper methods =====

    /// Run `production` one nesting level deeper, failing once the configured
    /// depth is exceeded.
    pub(crate) fn nested<T>(
        &mut self,
        production: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if let Some(limit) = self.config.max_depth {
            if self.depth >= limit {
                let err = ParseError::RecursionLimitExceeded {
                    limit,
                    location: self.current_location(),
                };
                debug!("{}", err);
                return Err(err);
            }
        }

        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.stream.check(kind)
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.stream.peek_kind()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.stream.peek().location
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        self.stream.consume(kind)
    }

    /// Consume an optional trailing `;`
    pub(crate) fn skip_semicolon(&mut self) {
        self.stream.consume_if(TokenKind::Semicolon);
    }

    pub(crate) fn error_here(&self, expected: &str) -> ParseError {
        ParseError::unexpected(self.stream.peek(), expected)
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<(String, SourceLocation), ParseError> {
        let token = self.stream.consume(TokenKind::Identifier)?;
        Ok((token.lexeme, token.location))
    }
}

/// Parse a complete token list into a [`Program`].
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    parse_with_config(tokens, ParserConfig::default())
}

pub fn parse_with_config(tokens: Vec<Token>, config: ParserConfig) -> Result<Program, ParseError> {
    Parser::from_tokens(tokens)
        .with_config(config)
        .parse_program()
}

/// Tokenize and parse `source` with the default configuration.
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    Parser::new(source)?.parse_program()
}

//! Cuppa source code parser
//!
//! This module transforms Cuppa source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`stream`]: Token cursor with one token of lookahead
//! - [`parse`]: Parser state, errors and entry points (tokens → AST)
//! - [`expressions`], [`declarations`], [`statements`]: the grammar layers
//! - [`ast`]: AST node definitions
//! - [`printer`]: rendering an AST back to source text
//! - [`config`]: parser options
//!
//! # Language
//!
//! - Types: `integer`, `float`, `string`, sized arrays `T[N]`, `void` functions
//! - Statements: declarations, assignments, calls, `get`, `put`, `return`,
//!   `while`, `if`/`else`, blocks
//! - Expressions: `==`, `<=`, `+`, `-`, `*`, `/`, unary `-` and `not`, calls
//!   and array indexing
//!
//! # Parser Implementation
//!
//! Hand-written predictive recursive descent parser, one token of lookahead,
//! no backtracking. No external parser generator dependencies.

pub mod ast;
pub mod config;
pub mod declarations;
pub mod expressions;
pub mod lexer;
pub mod parse;
pub mod printer;
pub mod statements;
pub mod stream;

pub use config::{DefaultValues, ParserConfig};
pub use lexer::{tokenize, LexError, Token, TokenKind};
pub use parse::{parse, parse_source, parse_with_config, ParseError, Parser};

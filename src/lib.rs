//! # Introduction
//!
//! Cuppa is a front end for a small typed imperative language. It tokenizes
//! source text and parses it with a predictive recursive descent parser into
//! an owned AST, folding unary minus and `not` on constants as it goes.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → TokenStream → Parser → Program
//! ```
//!
//! 1. [`parser::lexer`] turns text into tokens and appends an end marker.
//! 2. [`parser::parse`] drives the grammar layers over a
//!    [`parser::stream::TokenStream`] and stops at the first error.
//! 3. [`parser::printer`] renders a [`Program`] back into source text.
//!
//! ```
//! use cuppa::{parse_source, Expr, Stmt};
//!
//! let program = parse_source("integer x = 5; put x + 1;").unwrap();
//! assert_eq!(program.statements.len(), 2);
//! assert!(matches!(program.statements[1], Stmt::Put { expr: Expr::Binary { .. }, .. }));
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger.

pub mod parser;

pub use parser::ast::*;
pub use parser::{
    parse, parse_source, parse_with_config, DefaultValues, ParseError, Parser, ParserConfig,
};

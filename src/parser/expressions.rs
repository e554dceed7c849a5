//! Expression parsing implementation
//!
//! Four precedence tiers, loosest first:
//!
//! ```text
//! exp      ::= exp_low
//! exp_low  ::= exp_med  (("==" | "<=") exp_med)*
//! exp_med  ::= exp_high (("+" | "-") exp_high)*
//! exp_high ::= primary  (("*" | "/") primary)*
//! primary  ::= INTEGER | FLOAT | STRING
//!            | ID ( "(" actual_args? ")" ("[" exp "]")? | "[" exp "]" )?
//!            | "(" exp ")"
//!            | "-" primary
//!            | "not" primary
//! ```
//!
//! Each tier folds its operands to the left, so `10 - 3 - 2` is
//! `(10 - 3) - 2`. Unary `-` on a numeric constant and `not` on an integer
//! constant are folded into a new constant while parsing; binary operators are
//! never folded.
//!
//! All parsing methods are implemented as methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use log::trace;

impl TokenKind {
    /// Lookahead set of `exp` and of every tier below it.
    pub fn starts_expression(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::StringLiteral
                | TokenKind::Identifier
                | TokenKind::LParen
                | TokenKind::Minus
                | TokenKind::Not
        )
    }
}

const EXPRESSION: &str = "expression";

impl Parser {
    /// Parse expression (top-level entry point)
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::expression)
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_expression: next token = {}", self.stream.peek());

        if !self.peek_kind().starts_expression() {
            return Err(self.error_here(EXPRESSION));
        }
        self.parse_exp_low()
    }

    /// Parse relational (== <=)
    fn parse_exp_low(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_exp_med()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::Le => BinOp::Le,
                _ => break,
            };
            self.expect(self.peek_kind())?;

            let right = self.parse_exp_med()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse additive (+ -)
    fn parse_exp_med(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_exp_high()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.expect(self.peek_kind())?;

            let right = self.parse_exp_high()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse multiplicative (* /)
    fn parse_exp_high(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_primary()?;

        loop {
            let loc = self.current_location();
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.expect(self.peek_kind())?;

            let right = self.parse_primary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location: loc,
            };
        }

        Ok(left)
    }

    /// Parse primary (literals, identifiers, parentheses, unary operators)
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::primary)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        trace!("parse_primary: next token = {}", self.stream.peek());
        let loc = self.current_location();

        match self.peek_kind() {
            TokenKind::IntegerLiteral => {
                let token = self.expect(TokenKind::IntegerLiteral)?;
                let value = token
                    .lexeme
                    .parse::<i64>()
                    .map_err(|_| ParseError::unexpected(&token, "integer literal"))?;
                Ok(Expr::Const {
                    value: Literal::Integer(value),
                    location: loc,
                })
            }
            TokenKind::FloatLiteral => {
                let token = self.expect(TokenKind::FloatLiteral)?;
                let value = token
                    .lexeme
                    .parse::<f64>()
                    .map_err(|_| ParseError::unexpected(&token, "float literal"))?;
                Ok(Expr::Const {
                    value: Literal::Float(value),
                    location: loc,
                })
            }
            TokenKind::StringLiteral => {
                let token = self.expect(TokenKind::StringLiteral)?;
                Ok(Expr::Const {
                    value: Literal::String(token.lexeme),
                    location: loc,
                })
            }
            TokenKind::Identifier => {
                let (name, _) = self.expect_identifier()?;
                self.parse_id_suffix(name, loc)
            }
            TokenKind::LParen => {
                self.expect(TokenKind::LParen)?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Minus => {
                self.expect(TokenKind::Minus)?;
                let operand = self.parse_primary()?;
                Ok(fold_negation(operand, loc))
            }
            TokenKind::Not => {
                self.expect(TokenKind::Not)?;
                let operand = self.parse_primary()?;
                Ok(fold_not(operand, loc))
            }
            _ => Err(self.error_here(EXPRESSION)),
        }
    }

    /// Parse the optional call and/or index suffix after an identifier
    fn parse_id_suffix(&mut self, name: String, loc: SourceLocation) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            TokenKind::LParen => {
                let args = self.parse_call_arguments()?;

                if self.check(TokenKind::LBracket) {
                    let index = self.parse_index()?;
                    return Ok(Expr::CallIndex {
                        name,
                        args,
                        index: Box::new(index),
                        location: loc,
                    });
                }

                Ok(Expr::Call {
                    name,
                    args,
                    location: loc,
                })
            }
            TokenKind::LBracket => {
                let index = self.parse_index()?;
                Ok(Expr::ArrayAccess {
                    array: name,
                    index: Box::new(index),
                    location: loc,
                })
            }
            _ => Ok(Expr::Id {
                name,
                location: loc,
            }),
        }
    }

    /// Parse `( actual_args? )`
    pub(crate) fn parse_call_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.expect(TokenKind::LParen)?;

        let args = if self.peek_kind().starts_expression() {
            self.parse_actual_args()?
        } else {
            Vec::new()
        };

        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    /// Parse argument list: exp ("," exp)*
    pub fn parse_actual_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = vec![self.parse_expression()?];

        while self.stream.consume_if(TokenKind::Comma).is_some() {
            args.push(self.parse_expression()?);
        }

        Ok(args)
    }

    /// Parse `[ exp ]`
    pub(crate) fn parse_index(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LBracket)?;
        let index = self.parse_expression()?;
        self.expect(TokenKind::RBracket)?;
        Ok(index)
    }
}

/// Unary minus: negate numeric constants in place, wrap anything else.
fn fold_negation(operand: Expr, location: SourceLocation) -> Expr {
    match operand {
        Expr::Const {
            value: Literal::Integer(n),
            ..
        } => Expr::Const {
            value: Literal::Integer(n.wrapping_neg()),
            location,
        },
        Expr::Const {
            value: Literal::Float(f),
            ..
        } => Expr::Const {
            value: Literal::Float(-f),
            location,
        },
        operand => Expr::Unary {
            op: UnOp::Neg,
            operand: Box::new(operand),
            location,
        },
    }
}

/// Boolean not: integer constants fold to 0 or 1, anything else is wrapped.
fn fold_not(operand: Expr, location: SourceLocation) -> Expr {
    match operand {
        Expr::Const {
            value: Literal::Integer(n),
            ..
        } => Expr::Const {
            value: Literal::Integer(if n != 0 { 0 } else { 1 }),
            location,
        },
        operand => Expr::Unary {
            op: UnOp::Not,
            operand: Box::new(operand),
            location,
        },
    }
}

//! Statement parsing implementation
//!
//! The statement dispatcher picks a production from the current token alone:
//!
//! | lookahead        | production                                   |
//! |------------------|----------------------------------------------|
//! | `void`           | `void ID ( formal_args? ) stmt`              |
//! | type keyword     | `data_type declarator decl_suffix`           |
//! | identifier       | `ID id_suffix` (call or assignment)          |
//! | `get`            | `get ID ;?`                                  |
//! | `put`            | `put exp ;?`                                 |
//! | `return`         | `return exp? ;?`                             |
//! | `while`          | `while ( exp ) stmt`                         |
//! | `if`             | `if ( exp ) stmt (else stmt)?`               |
//! | `{`              | `{ stmt_list }`                              |
//!
//! Any other token is a syntax error. Trailing semicolons are optional.
//!
//! All parsing methods are implemented as methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use log::{debug, trace};

impl TokenKind {
    /// Lookahead set of `stmt`; `stmt_list` repeats while it holds.
    pub fn starts_statement(self) -> bool {
        self.is_primitive_type()
            || matches!(
                self,
                TokenKind::Void
                    | TokenKind::Identifier
                    | TokenKind::Get
                    | TokenKind::Put
                    | TokenKind::Return
                    | TokenKind::While
                    | TokenKind::If
                    | TokenKind::LBrace
            )
    }
}

impl Parser {
    /// Parse statements while the current token can start one
    pub fn parse_statement_list(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        while self.peek_kind().starts_statement() {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        self.nested(Self::statement)
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        let kind = self.peek_kind();
        debug!("Statement at {} starts with {}", self.current_location(), kind);

        match kind {
            TokenKind::Void => self.parse_void_function(),
            kind if kind.is_primitive_type() => self.parse_typed_declaration(),
            TokenKind::Identifier => self.parse_call_or_assignment(),
            TokenKind::Get => self.parse_get_statement(),
            TokenKind::Put => self.parse_put_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::LBrace => self.parse_block(),
            _ => Err(self.error_here("statement")),
        }
    }

    /// Parse `void ID ( formal_args? ) stmt`
    fn parse_void_function(&mut self) -> Result<Stmt, ParseError> {
        trace!("parse_void_function: next token = {}", self.stream.peek());
        let loc = self.expect(TokenKind::Void)?.location;

        let (name, _) = self.expect_identifier()?;
        let params = self.parse_parameter_list()?;
        let body = self.parse_statement()?;

        Ok(Stmt::FunctionDecl {
            name,
            signature: FunctionType::new(Type::Void, &params),
            params,
            body: Box::new(body),
            location: loc,
        })
    }

    /// Parse a statement starting with an identifier:
    ///
    /// ```text
    /// id_suffix ::= "(" actual_args? ")" ("[" exp "]" "=" exp)? ";"?
    ///             | "[" exp "]" "=" exp ";"?
    ///             | "=" exp ";"?
    /// ```
    fn parse_call_or_assignment(&mut self) -> Result<Stmt, ParseError> {
        trace!("parse_call_or_assignment: next token = {}", self.stream.peek());
        let (name, loc) = self.expect_identifier()?;

        let stmt = match self.peek_kind() {
            TokenKind::LParen => {
                let args = self.parse_call_arguments()?;

                if self.check(TokenKind::LBracket) {
                    let index = self.parse_index()?;
                    let value = self.parse_assigned_value()?;
                    Stmt::Assign {
                        target: AssignTarget::CallElement { name, args, index },
                        value,
                        location: loc,
                    }
                } else {
                    Stmt::CallStmt {
                        name,
                        args,
                        location: loc,
                    }
                }
            }
            TokenKind::LBracket => {
                let index = self.parse_index()?;
                let value = self.parse_assigned_value()?;
                Stmt::Assign {
                    target: AssignTarget::Element { array: name, index },
                    value,
                    location: loc,
                }
            }
            TokenKind::Assign => {
                let value = self.parse_assigned_value()?;
                Stmt::Assign {
                    target: AssignTarget::Var(name),
                    value,
                    location: loc,
                }
            }
            _ => return Err(self.error_here("'(', '[' or '='")),
        };

        self.skip_semicolon();
        Ok(stmt)
    }

    /// Parse `= exp`
    fn parse_assigned_value(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::Assign)?;
        self.parse_expression()
    }

    /// Parse `get ID ;?`
    fn parse_get_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::Get)?.location;
        let (target, _) = self.expect_identifier()?;
        self.skip_semicolon();

        Ok(Stmt::Get {
            target,
            location: loc,
        })
    }

    /// Parse `put exp ;?`
    fn parse_put_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::Put)?.location;
        let expr = self.parse_expression()?;
        self.skip_semicolon();

        Ok(Stmt::Put {
            expr,
            location: loc,
        })
    }

    /// Parse return statement; the value is present only when the next token
    /// can start an expression
    fn parse_return_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::Return)?.location;

        let expr = if self.peek_kind().starts_expression() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.skip_semicolon();

        Ok(Stmt::Return {
            expr,
            location: loc,
        })
    }

    /// Parse `( exp )` after `while` or `if`
    fn parse_condition(&mut self) -> Result<Expr, ParseError> {
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(condition)
    }

    /// Parse while statement
    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::While)?.location;
        let condition = self.parse_condition()?;
        let body = self.parse_statement()?;

        Ok(Stmt::While {
            condition,
            body: Box::new(body),
            location: loc,
        })
    }

    /// Parse if statement; a following `else` always binds to the nearest `if`
    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::If)?.location;
        let condition = self.parse_condition()?;
        let then_branch = self.parse_statement()?;

        let else_branch = if self.stream.consume_if(TokenKind::Else).is_some() {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch: Box::new(then_branch),
            else_branch,
            location: loc,
        })
    }

    /// Parse `{ stmt_list }`
    fn parse_block(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.expect(TokenKind::LBrace)?.location;
        let statements = self.parse_statement_list()?;
        self.expect(TokenKind::RBrace)?;

        Ok(Stmt::Block {
            statements,
            location: loc,
        })
    }
}

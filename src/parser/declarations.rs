//! Declaration parsing implementation
//!
//! This module handles the type and declaration grammar:
//!
//! - Types: `integer`, `float`, `string`, optionally sized as `T[N]`
//! - Formal argument lists: `integer a, float b[3]`
//! - Declaration suffixes, which decide whether `T name ...` declares a
//!   function, an initialized variable or array, or a bare variable or array
//!
//! # Grammar
//!
//! ```text
//! typed_decl     ::= data_type declarator decl_suffix
//! data_type      ::= primitive_type array_size?
//! declarator     ::= ID array_size?
//! array_size     ::= "[" INTEGER "]"
//! primitive_type ::= "integer" | "float" | "string"
//! formal_args    ::= data_type declarator ("," data_type declarator)*
//! decl_suffix    ::= "(" formal_args? ")" stmt
//!                  | "=" exp ";"?
//!                  | "=" "{" exp ("," exp)* "}" ";"?
//!                  | ";"?
//! ```
//!
//! The size may sit on either side of the name: `integer[3] A` and
//! `integer A[3]` declare the same array. Sizes are capped by
//! [`ParserConfig::max_array_size`](crate::parser::config::ParserConfig).
//!
//! Initializer expressions must reduce to a constant once unary minus and
//! `not` have been folded; `integer x = 2 + 3;` is rejected because binary
//! operators are never folded.
//!
//! All parsing methods are implemented as methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use log::{debug, trace};

impl TokenKind {
    /// Lookahead set of `data_type` and `formal_args`.
    pub fn is_primitive_type(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerType | TokenKind::FloatType | TokenKind::StringType
        )
    }
}

/// What follows the identifier of a typed declaration
#[derive(Debug, Clone, PartialEq)]
pub enum DeclSuffix {
    /// `(params) body`: the identifier names a function
    Function { params: Vec<FormalArg>, body: Stmt },
    /// `= constant`
    Scalar(Literal),
    /// `= { constant, ... }`
    Array(Vec<Literal>),
    /// No initializer
    Bare,
}

impl Parser {
    /// Parse `data_type ID decl_suffix` into a function, variable or array
    /// declaration.
    pub(crate) fn parse_typed_declaration(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();
        let base_type = self.parse_data_type()?;
        let (name, decl_type) = self.parse_declarator(base_type)?;

        let stmt = match self.parse_decl_suffix()? {
            DeclSuffix::Function { params, body } => Stmt::FunctionDecl {
                name,
                signature: FunctionType::new(decl_type, &params),
                params,
                body: Box::new(body),
                location: loc,
            },
            DeclSuffix::Scalar(init) => Stmt::VarDecl {
                name,
                var_type: decl_type,
                init,
                location: loc,
            },
            DeclSuffix::Array(init) => Stmt::ArrayDecl {
                name,
                array_type: decl_type,
                init,
                location: loc,
            },
            DeclSuffix::Bare => self.default_declaration(name, decl_type, loc),
        };

        Ok(stmt)
    }

    /// Declaration without initializer: fill in zero values per the
    /// configured policy.
    fn default_declaration(&self, name: String, decl_type: Type, loc: SourceLocation) -> Stmt {
        let defaults = self.config.default_values;

        match decl_type {
            Type::Array { element, size } => Stmt::ArrayDecl {
                name,
                init: defaults.array(element, size),
                array_type: decl_type,
                location: loc,
            },
            _ => Stmt::VarDecl {
                name,
                init: defaults.scalar(&decl_type),
                var_type: decl_type,
                location: loc,
            },
        }
    }

    /// Parse type: primitive_type [ "[" INTEGER "]" ]
    pub fn parse_data_type(&mut self) -> Result<Type, ParseError> {
        trace!("parse_data_type: next token = {}", self.stream.peek());

        let prim = self.parse_primitive_type()?;

        if !self.check(TokenKind::LBracket) {
            return Ok(Type::primitive(prim));
        }

        let size = self.parse_array_size()?;
        Ok(Type::Array {
            element: prim,
            size,
        })
    }

    /// Parse `[ INTEGER ]`, enforcing the configured size limit
    fn parse_array_size(&mut self) -> Result<usize, ParseError> {
        self.expect(TokenKind::LBracket)?;

        let size_tok = self.expect(TokenKind::IntegerLiteral)?;
        let size = size_tok
            .lexeme
            .parse::<usize>()
            .map_err(|_| ParseError::unexpected(&size_tok, "array size"))?;

        let limit = self.config.max_array_size;
        if size > limit {
            let err = ParseError::ArrayTooLarge {
                size,
                limit,
                location: size_tok.location,
            };
            debug!("{}", err);
            return Err(err);
        }

        self.expect(TokenKind::RBracket)?;
        Ok(size)
    }

    /// Parse the declared name and an optional size after it, which turns a
    /// primitive `base_type` into an array type.
    fn parse_declarator(&mut self, base_type: Type) -> Result<(String, Type), ParseError> {
        let (name, _) = self.expect_identifier()?;

        if !self.check(TokenKind::LBracket) {
            return Ok((name, base_type));
        }

        let bracket = self.stream.peek().clone();
        let size = self.parse_array_size()?;
        let decl_type = base_type
            .with_array(size)
            .ok_or_else(|| ParseError::unexpected(&bracket, "'(', '=' or ';'"))?;

        Ok((name, decl_type))
    }

    fn parse_primitive_type(&mut self) -> Result<PrimType, ParseError> {
        let prim = match self.peek_kind() {
            TokenKind::IntegerType => PrimType::Integer,
            TokenKind::FloatType => PrimType::Float,
            TokenKind::StringType => PrimType::String,
            _ => return Err(self.error_here("type")),
        };
        self.expect(self.peek_kind())?;
        Ok(prim)
    }

    /// Parse formal argument list: one or more `data_type ID`, comma separated
    pub fn parse_formal_args(&mut self) -> Result<Vec<FormalArg>, ParseError> {
        trace!("parse_formal_args: next token = {}", self.stream.peek());

        let mut params = Vec::new();

        loop {
            let location = self.current_location();
            let base_type = self.parse_data_type()?;
            let (name, arg_type) = self.parse_declarator(base_type)?;
            params.push(FormalArg {
                name,
                arg_type,
                location,
            });

            if self.stream.consume_if(TokenKind::Comma).is_none() {
                break;
            }
        }

        Ok(params)
    }

    /// Parse `( formal_args? )`; no primitive type after `(` means no parameters
    pub(crate) fn parse_parameter_list(&mut self) -> Result<Vec<FormalArg>, ParseError> {
        self.expect(TokenKind::LParen)?;

        let params = if self.peek_kind().is_primitive_type() {
            self.parse_formal_args()?
        } else {
            Vec::new()
        };

        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    /// Parse whatever follows the declared identifier
    pub fn parse_decl_suffix(&mut self) -> Result<DeclSuffix, ParseError> {
        trace!("parse_decl_suffix: next token = {}", self.stream.peek());

        match self.peek_kind() {
            TokenKind::LParen => {
                let params = self.parse_parameter_list()?;
                let body = self.parse_statement()?;
                Ok(DeclSuffix::Function { params, body })
            }
            TokenKind::Assign => {
                self.expect(TokenKind::Assign)?;

                let suffix = if self.check(TokenKind::LBrace) {
                    DeclSuffix::Array(self.parse_array_initializer()?)
                } else if self.peek_kind().starts_expression() {
                    DeclSuffix::Scalar(self.parse_constant_initializer()?)
                } else {
                    return Err(self.error_here("initializer"));
                };

                self.skip_semicolon();
                Ok(suffix)
            }
            _ => {
                self.skip_semicolon();
                Ok(DeclSuffix::Bare)
            }
        }
    }

    /// Parse `{ exp ("," exp)* }` where every entry is a constant
    fn parse_array_initializer(&mut self) -> Result<Vec<Literal>, ParseError> {
        self.expect(TokenKind::LBrace)?;

        let mut values = vec![self.parse_constant_initializer()?];
        while self.stream.consume_if(TokenKind::Comma).is_some() {
            values.push(self.parse_constant_initializer()?);
        }

        self.expect(TokenKind::RBrace)?;
        Ok(values)
    }

    fn parse_constant_initializer(&mut self) -> Result<Literal, ParseError> {
        let location = self.current_location();

        match self.parse_expression()? {
            Expr::Const { value, .. } => Ok(value),
            _ => Err(ParseError::InvalidInitializer { location }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::config::{DefaultValues, ParserConfig};

    fn parser(source: &str) -> Parser {
        Parser::new(source).unwrap()
    }

    fn declaration(source: &str) -> Stmt {
        parser(source).parse_typed_declaration().unwrap()
    }

    #[test]
    fn test_parse_data_types() {
        assert_eq!(parser("integer").parse_data_type().unwrap(), Type::Integer);
        assert_eq!(parser("string").parse_data_type().unwrap(), Type::String);
        assert_eq!(
            parser("float[8]").parse_data_type().unwrap(),
            Type::Array {
                element: PrimType::Float,
                size: 8
            }
        );
    }

    #[test]
    fn test_array_size_must_be_integer_literal() {
        for source in ["integer[n]", "integer[2.5]", "integer[1 + 1]", "integer[3"] {
            let err = parser(source).parse_data_type().unwrap_err();
            assert!(matches!(err, ParseError::Syntax { .. }), "{}", source);
        }
    }

    #[test]
    fn test_data_type_rejects_non_type() {
        let err = parser("void").parse_data_type().unwrap_err();
        match err {
            ParseError::Syntax { found, expected, .. } => {
                assert_eq!(found, "void");
                assert_eq!(expected, "type");
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_formal_args() {
        let params = parser("integer a, string s[2], float f")
            .parse_formal_args()
            .unwrap();
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "s", "f"]);
        assert_eq!(
            params[1].arg_type,
            Type::Array {
                element: PrimType::String,
                size: 2
            }
        );
    }

    #[test]
    fn test_formal_args_require_one_argument() {
        assert!(parser(")").parse_formal_args().is_err());
        assert!(parser("integer a,").parse_formal_args().is_err());
        assert!(parser("integer").parse_formal_args().is_err());
    }

    #[test]
    fn test_decl_suffix_variants() {
        assert_eq!(parser(";").parse_decl_suffix().unwrap(), DeclSuffix::Bare);
        assert_eq!(parser("").parse_decl_suffix().unwrap(), DeclSuffix::Bare);
        assert_eq!(
            parser("= -4;").parse_decl_suffix().unwrap(),
            DeclSuffix::Scalar(Literal::Integer(-4))
        );
        assert_eq!(
            parser("= {1, not 0, -2}").parse_decl_suffix().unwrap(),
            DeclSuffix::Array(vec![
                Literal::Integer(1),
                Literal::Integer(1),
                Literal::Integer(-2)
            ])
        );

        match parser("(integer n) return n;").parse_decl_suffix().unwrap() {
            DeclSuffix::Function { params, body } => {
                assert_eq!(params.len(), 1);
                assert!(matches!(body, Stmt::Return { expr: Some(_), .. }));
            }
            other => panic!("Expected function suffix, got {:?}", other),
        }
    }

    #[test]
    fn test_scalar_declaration() {
        match declaration("float pi = 3.14;") {
            Stmt::VarDecl {
                name,
                var_type,
                init,
                ..
            } => {
                assert_eq!(name, "pi");
                assert_eq!(var_type, Type::Float);
                assert_eq!(init, Literal::Float(3.14));
            }
            other => panic!("Expected variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_array_defaults_to_zeros() {
        match declaration("integer A[3];") {
            Stmt::ArrayDecl {
                name,
                array_type,
                init,
                ..
            } => {
                assert_eq!(name, "A");
                assert_eq!(
                    array_type,
                    Type::Array {
                        element: PrimType::Integer,
                        size: 3
                    }
                );
                assert_eq!(init, vec![Literal::Integer(0); 3]);
            }
            other => panic!("Expected array declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_size_on_either_side_of_name() {
        let after_name = declaration("float v[2] = {1.0, 2.0};");
        let after_type = declaration("float[2] v = {1.0, 2.0};");
        match (after_name, after_type) {
            (
                Stmt::ArrayDecl {
                    array_type: left, ..
                },
                Stmt::ArrayDecl {
                    array_type: right, ..
                },
            ) => {
                assert_eq!(left, right);
                assert_eq!(
                    left,
                    Type::Array {
                        element: PrimType::Float,
                        size: 2
                    }
                );
            }
            other => panic!("Expected two array declarations, got {:?}", other),
        }
    }

    #[test]
    fn test_size_on_both_sides_is_rejected() {
        let err = parser("integer[2] A[3];")
            .parse_typed_declaration()
            .unwrap_err();
        match err {
            ParseError::Syntax {
                found, location, ..
            } => {
                assert_eq!(found, "[");
                assert_eq!(location, SourceLocation::new(1, 13));
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_arrays_are_rejected() {
        for source in [
            "integer[9223372036854775807] A;",
            "integer A[10000000000];",
            "string s[65537];",
        ] {
            let err = parser(source).parse_typed_declaration().unwrap_err();
            assert!(
                matches!(err, ParseError::ArrayTooLarge { limit: 65536, .. }),
                "{} gave {:?}",
                source,
                err
            );
        }

        let err = parser("integer A[10000000000];")
            .parse_typed_declaration()
            .unwrap_err();
        assert_eq!(err.location(), SourceLocation::new(1, 11));

        assert!(matches!(
            parser("void f(integer big[100000]) {}").parse_statement(),
            Err(ParseError::ArrayTooLarge { size: 100000, .. })
        ));
    }

    #[test]
    fn test_array_size_limit_is_configurable() {
        let config = ParserConfig::new().with_max_array_size(4);
        let mut small = parser("integer A[4]; integer B[5];").with_config(config);

        assert!(small.parse_typed_declaration().is_ok());
        assert!(matches!(
            small.parse_typed_declaration(),
            Err(ParseError::ArrayTooLarge {
                size: 5,
                limit: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_bare_declarations_use_typed_zero_values() {
        assert!(matches!(
            declaration("string s;"),
            Stmt::VarDecl { init: Literal::String(ref s), .. } if s.is_empty()
        ));
        assert!(matches!(
            declaration("float f"),
            Stmt::VarDecl {
                init: Literal::Float(f),
                ..
            } if f == 0.0
        ));
        match declaration("string names[2]") {
            Stmt::ArrayDecl { init, .. } => {
                assert_eq!(init, vec![Literal::String(String::new()); 2]);
            }
            other => panic!("Expected array declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_zero_policy() {
        let config = ParserConfig::new().with_default_values(DefaultValues::IntegerZero);
        let mut parser = parser("string s; float F[2];").with_config(config);

        let first = parser.parse_typed_declaration().unwrap();
        assert!(matches!(
            first,
            Stmt::VarDecl {
                init: Literal::Integer(0),
                ..
            }
        ));

        match parser.parse_typed_declaration().unwrap() {
            Stmt::ArrayDecl { init, .. } => assert_eq!(init, vec![Literal::Integer(0); 2]),
            other => panic!("Expected array declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_initializer_shape_selects_node() {
        assert!(matches!(
            declaration("integer x = {1, 2};"),
            Stmt::ArrayDecl { ref init, .. } if init.len() == 2
        ));
        assert!(matches!(
            declaration("integer A[2] = 7;"),
            Stmt::VarDecl {
                init: Literal::Integer(7),
                ..
            }
        ));
    }

    #[test]
    fn test_array_initializer_length_is_not_checked() {
        match declaration("integer A[4] = {1, 2}") {
            Stmt::ArrayDecl { init, .. } => assert_eq!(init.len(), 2),
            other => panic!("Expected array declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_non_constant_initializers_are_rejected() {
        for source in [
            "integer x = y + 1;",
            "integer x = 2 + 3;",
            "integer x = y;",
            "integer x = f();",
            "integer A[2] = {1, y};",
            "integer x = -y;",
        ] {
            let err = parser(source).parse_typed_declaration().unwrap_err();
            assert!(
                matches!(err, ParseError::InvalidInitializer { .. }),
                "{} gave {:?}",
                source,
                err
            );
        }
    }

    #[test]
    fn test_invalid_initializer_points_at_expression() {
        let err = parser("integer x = y + 1;")
            .parse_typed_declaration()
            .unwrap_err();
        assert_eq!(err.location(), SourceLocation::new(1, 13));
    }

    #[test]
    fn test_missing_initializer_is_syntax_error() {
        let err = parser("integer x = ;").parse_typed_declaration().unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_typed_function_declaration() {
        match declaration("float avg(integer A[4], integer n) { return 0.0; }") {
            Stmt::FunctionDecl {
                name,
                signature,
                params,
                body,
                ..
            } => {
                assert_eq!(name, "avg");
                assert_eq!(signature.returns, Type::Float);
                assert_eq!(
                    signature.params,
                    vec![
                        Type::Array {
                            element: PrimType::Integer,
                            size: 4
                        },
                        Type::Integer
                    ]
                );
                assert_eq!(params.len(), 2);
                assert!(matches!(*body, Stmt::Block { .. }));
            }
            other => panic!("Expected function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_primitive_type_lookahead() {
        for kind in TokenKind::ALL {
            let expected = matches!(
                kind,
                TokenKind::IntegerType | TokenKind::FloatType | TokenKind::StringType
            );
            assert_eq!(kind.is_primitive_type(), expected, "{:?}", kind);
        }
    }
}

//! Lexer (tokenizer) for Cuppa source code
//!
//! Converts raw source text into a flat [`Token`] list consumed by the parser
//! through a [`TokenStream`](super::stream::TokenStream). The list always ends
//! with a single [`TokenKind::Eof`] marker.

use super::ast::SourceLocation;
use rustc_hash::FxHashMap;
use std::fmt;
use thiserror::Error;

/// Every token category the grammar distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,

    // Identifiers
    Identifier,

    // Type keywords
    Void,
    IntegerType,
    FloatType,
    StringType,

    // Statement keywords
    Get,
    Put,
    Return,
    While,
    If,
    Else,
    Not,

    // Operators
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    EqEq,   // ==
    Le,     // <=
    Assign, // =

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,

    // End of input
    Eof,
}

impl TokenKind {
    pub const ALL: [TokenKind; 31] = [
        TokenKind::IntegerLiteral,
        TokenKind::FloatLiteral,
        TokenKind::StringLiteral,
        TokenKind::Identifier,
        TokenKind::Void,
        TokenKind::IntegerType,
        TokenKind::FloatType,
        TokenKind::StringType,
        TokenKind::Get,
        TokenKind::Put,
        TokenKind::Return,
        TokenKind::While,
        TokenKind::If,
        TokenKind::Else,
        TokenKind::Not,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::EqEq,
        TokenKind::Le,
        TokenKind::Assign,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LBrace,
        TokenKind::RBrace,
        TokenKind::LBracket,
        TokenKind::RBracket,
        TokenKind::Semicolon,
        TokenKind::Comma,
        TokenKind::Eof,
    ];
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::IntegerLiteral => write!(f, "integer literal"),
            TokenKind::FloatLiteral => write!(f, "float literal"),
            TokenKind::StringLiteral => write!(f, "string literal"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Void => write!(f, "'void'"),
            TokenKind::IntegerType => write!(f, "'integer'"),
            TokenKind::FloatType => write!(f, "'float'"),
            TokenKind::StringType => write!(f, "'string'"),
            TokenKind::Get => write!(f, "'get'"),
            TokenKind::Put => write!(f, "'put'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::Not => write!(f, "'not'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Assign => write!(f, "'='"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

/// A lexical unit: its kind, its text and where it starts.
///
/// For string literals the lexeme holds the unescaped contents without the
/// surrounding quotes. The end-of-input marker has an empty lexeme.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    /// Text used when this token is reported in an error.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::StringLiteral => format!("\"{}\"", self.lexeme),
            _ => self.lexeme.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::IntegerLiteral
            | TokenKind::FloatLiteral
            | TokenKind::Identifier => write!(f, "{} '{}'", self.kind, self.lexeme),
            TokenKind::StringLiteral => write!(f, "string literal \"{}\"", self.lexeme),
            _ => write!(f, "{}", self.kind),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Lexer error at {location}: {message}")]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

fn keyword_table() -> FxHashMap<&'static str, TokenKind> {
    let mut keywords = FxHashMap::default();
    keywords.insert("void", TokenKind::Void);
    keywords.insert("integer", TokenKind::IntegerType);
    keywords.insert("float", TokenKind::FloatType);
    keywords.insert("string", TokenKind::StringType);
    keywords.insert("get", TokenKind::Get);
    keywords.insert("put", TokenKind::Put);
    keywords.insert("return", TokenKind::Return);
    keywords.insert("while", TokenKind::While);
    keywords.insert("if", TokenKind::If);
    keywords.insert("else", TokenKind::Else);
    keywords.insert("not", TokenKind::Not);
    keywords
}

/// Lexer for Cuppa source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    keywords: FxHashMap<&'static str, TokenKind>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            keywords: keyword_table(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, "", self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        let kind = match ch {
            '"' => return self.string_literal(loc),
            '0'..='9' => return self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => return Ok(self.identifier_or_keyword(ch, loc)),

            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    return Ok(Token::new(TokenKind::EqEq, "==", loc));
                }
                TokenKind::Assign
            }
            '<' => {
                if self.peek() == Some('=') {
                    self.advance();
                    return Ok(Token::new(TokenKind::Le, "<=", loc));
                }
                return Err(LexError {
                    message: "Expected '=' after '<'".to_string(),
                    location: loc,
                });
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,

            _ => {
                return Err(LexError {
                    message: format!("Unexpected character: '{}'", ch),
                    location: loc,
                })
            }
        };

        Ok(Token::new(kind, ch.to_string(), loc))
    }

    /// Parse string literal
    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            if ch == '"' {
                self.advance(); // consume closing quote
                return Ok(Token::new(TokenKind::StringLiteral, string, loc));
            }

            if ch == '\\' {
                self.advance();
                let escaped = self.advance().ok_or_else(|| LexError {
                    message: "Unexpected end of file in string literal".to_string(),
                    location: self.current_location(),
                })?;

                let unescaped = match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '"' => '"',
                    _ => {
                        return Err(LexError {
                            message: format!("Unknown escape sequence: \\{}", escaped),
                            location: self.current_location(),
                        });
                    }
                };
                string.push(unescaped);
            } else {
                string.push(ch);
                self.advance();
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Parse numeric literal: digits, optionally followed by `.` digits
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut num_str = String::new();
        num_str.push(first_digit);
        self.take_digits(&mut num_str);

        let is_float = self.peek() == Some('.')
            && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit());

        if is_float {
            num_str.push('.');
            self.advance();
            self.take_digits(&mut num_str);
            return Ok(Token::new(TokenKind::FloatLiteral, num_str, loc));
        }

        if num_str.parse::<i64>().is_err() {
            return Err(LexError {
                message: format!("Invalid integer literal: {}", num_str),
                location: loc,
            });
        }

        Ok(Token::new(TokenKind::IntegerLiteral, num_str, loc))
    }

    fn take_digits(&mut self, buf: &mut String) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                buf.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = self
            .keywords
            .get(ident.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);

        Token::new(kind, ident, loc)
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = tokenize("integer x = 5; put x;").unwrap();

        assert_eq!(tokens[0].kind, TokenKind::IntegerType);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[2].kind, TokenKind::Assign);
        assert_eq!(tokens[3].kind, TokenKind::IntegerLiteral);
        assert_eq!(tokens[3].lexeme, "5");
        assert_eq!(tokens[4].kind, TokenKind::Semicolon);
        assert_eq!(tokens[5].kind, TokenKind::Put);
        assert_eq!(tokens[6].kind, TokenKind::Identifier);
        assert_eq!(tokens[7].kind, TokenKind::Semicolon);
        assert_eq!(tokens[8].kind, TokenKind::Eof);
        assert_eq!(tokens.len(), 9);
    }

    #[rstest]
    #[case("==", TokenKind::EqEq)]
    #[case("<=", TokenKind::Le)]
    #[case("=", TokenKind::Assign)]
    #[case("not", TokenKind::Not)]
    #[case("void", TokenKind::Void)]
    #[case("string", TokenKind::StringType)]
    #[case("notx", TokenKind::Identifier)]
    #[case("_tmp1", TokenKind::Identifier)]
    #[case("3.25", TokenKind::FloatLiteral)]
    #[case("42", TokenKind::IntegerLiteral)]
    fn test_single_token(#[case] source: &str, #[case] expected: TokenKind) {
        assert_eq!(kinds(source), vec![expected, TokenKind::Eof]);
    }

    #[test]
    fn test_integer_followed_by_dot_is_not_float() {
        let result = tokenize("3.");
        assert!(result.is_err());
    }

    #[test]
    fn test_comments() {
        let source = "integer x; // comment\nfloat y; /* block\ncomment */ string z;";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::IntegerType,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::FloatType,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::StringType,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_literal() {
        let tokens = tokenize(r#""hello\n\"world\"""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].lexeme, "hello\n\"world\"");
    }

    #[test]
    fn test_token_display() {
        let tokens = tokenize("count 42 \"hi\" <= )").unwrap();
        let shown: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            shown,
            vec![
                "identifier 'count'",
                "integer literal '42'",
                "string literal \"hi\"",
                "'<='",
                "')'",
                "end of input",
            ]
        );
    }

    #[test]
    fn test_locations() {
        let tokens = tokenize("put 1;\n  get y").unwrap();
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(1, 5));
        assert_eq!(tokens[3].location, SourceLocation::new(2, 3));
        assert_eq!(tokens[4].location, SourceLocation::new(2, 7));
    }

    #[rstest]
    #[case("x < y")]
    #[case("\"open")]
    #[case("/* never closed")]
    #[case("a # b")]
    #[case("\"bad \\q escape\"")]
    #[case("99999999999999999999")]
    fn test_lex_errors(#[case] source: &str) {
        assert!(tokenize(source).is_err());
    }
}

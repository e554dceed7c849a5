//! Source rendering for AST nodes
//!
//! The `Display` impls here turn a tree back into Cuppa text that the lexer
//! and parser accept. Parsing the rendering of a parsed program gives back the
//! same structure, so `print -> parse -> print` is stable.
//!
//! Binary operands that are binary themselves are always parenthesized, as is
//! any non-atomic operand of a unary operator. Every statement ends in `;` or
//! a block, and declarations spell out their initializer.

use crate::parser::ast::*;
use std::fmt::{self, Display, Formatter, Write};

const INDENT: &str = "    ";

impl Display for PrimType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrimType::Integer => "integer",
            PrimType::Float => "float",
            PrimType::String => "string",
        })
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Integer => f.write_str("integer"),
            Type::Float => f.write_str("float"),
            Type::String => f.write_str("string"),
            Type::Array { element, size } => write!(f, "{}[{}]", element, size),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(v) => write_float(f, *v),
            Literal::String(s) => {
                f.write_char('"')?;
                for c in s.chars() {
                    match c {
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        '\\' => f.write_str("\\\\")?,
                        '"' => f.write_str("\\\"")?,
                        c => f.write_char(c)?,
                    }
                }
                f.write_char('"')
            }
        }
    }
}

/// Float literals must keep a fractional part to lex as floats again.
fn write_float(f: &mut Formatter<'_>, value: f64) -> fmt::Result {
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        f.write_str(&text)
    } else {
        write!(f, "{}.0", text)
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinOp::Eq => "==",
            BinOp::Le => "<=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        })
    }
}

impl Display for UnOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnOp::Neg => "-",
            UnOp::Not => "not",
        })
    }
}

impl Expr {
    /// Whether a unary operator can be written directly in front of this node.
    fn is_atomic(&self) -> bool {
        match self {
            Expr::Id { .. }
            | Expr::Call { .. }
            | Expr::ArrayAccess { .. }
            | Expr::CallIndex { .. } => true,
            Expr::Const { value, .. } => match value {
                Literal::Integer(n) => *n >= 0,
                Literal::Float(v) => v.is_sign_positive(),
                Literal::String(_) => true,
            },
            Expr::Binary { .. } | Expr::Unary { .. } => false,
        }
    }
}

fn write_args(f: &mut Formatter<'_>, args: &[Expr]) -> fmt::Result {
    f.write_char('(')?;
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", arg)?;
    }
    f.write_char(')')
}

fn write_operand(f: &mut Formatter<'_>, operand: &Expr) -> fmt::Result {
    match operand {
        Expr::Binary { .. } => write!(f, "({})", operand),
        _ => write!(f, "{}", operand),
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const { value, .. } => write!(f, "{}", value),
            Expr::Id { name, .. } => f.write_str(name),
            Expr::Call { name, args, .. } => {
                f.write_str(name)?;
                write_args(f, args)
            }
            Expr::ArrayAccess { array, index, .. } => write!(f, "{}[{}]", array, index),
            Expr::CallIndex {
                name, args, index, ..
            } => {
                f.write_str(name)?;
                write_args(f, args)?;
                write!(f, "[{}]", index)
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                write_operand(f, left)?;
                write!(f, " {} ", op)?;
                write_operand(f, right)
            }
            Expr::Unary { op, operand, .. } => {
                let sep = if *op == UnOp::Not { " " } else { "" };
                if operand.is_atomic() {
                    write!(f, "{}{}{}", op, sep, operand)
                } else {
                    write!(f, "{}{}({})", op, sep, operand)
                }
            }
        }
    }
}

impl Display for AssignTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AssignTarget::Var(name) => f.write_str(name),
            AssignTarget::Element { array, index } => write!(f, "{}[{}]", array, index),
            AssignTarget::CallElement { name, args, index } => {
                f.write_str(name)?;
                write_args(f, args)?;
                write!(f, "[{}]", index)
            }
        }
    }
}

impl Display for FormalArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.arg_type, self.name)
    }
}

fn write_indent(f: &mut Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str(INDENT)?;
    }
    Ok(())
}

/// True when `stmt` ends in an `if` without `else`, which would capture an
/// `else` written after it.
fn leaves_if_open(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::If {
            else_branch: None, ..
        } => true,
        Stmt::If {
            else_branch: Some(else_branch),
            ..
        } => leaves_if_open(else_branch),
        Stmt::While { body, .. } | Stmt::FunctionDecl { body, .. } => leaves_if_open(body),
        _ => false,
    }
}

/// Write `stmt` from the current column; nested lines are indented one level
/// past `depth`.
fn write_stmt(f: &mut Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    match stmt {
        Stmt::FunctionDecl {
            name,
            signature,
            params,
            body,
            ..
        } => {
            write!(f, "{} {}(", signature.returns, name)?;
            for (i, param) in params.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", param)?;
            }
            f.write_str(") ")?;
            write_stmt(f, body, depth)
        }
        Stmt::VarDecl {
            name,
            var_type,
            init,
            ..
        } => write!(f, "{} {} = {};", var_type, name, init),
        Stmt::ArrayDecl {
            name,
            array_type,
            init,
            ..
        } => {
            if init.is_empty() {
                return write!(f, "{} {};", array_type, name);
            }
            write!(f, "{} {} = {{", array_type, name)?;
            for (i, value) in init.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", value)?;
            }
            f.write_str("};")
        }
        Stmt::CallStmt { name, args, .. } => {
            f.write_str(name)?;
            write_args(f, args)?;
            f.write_char(';')
        }
        Stmt::Assign { target, value, .. } => write!(f, "{} = {};", target, value),
        Stmt::Get { target, .. } => write!(f, "get {};", target),
        Stmt::Put { expr, .. } => write!(f, "put {};", expr),
        Stmt::Return { expr: None, .. } => f.write_str("return;"),
        Stmt::Return { expr: Some(expr), .. } => write!(f, "return {};", expr),
        Stmt::While {
            condition, body, ..
        } => {
            write!(f, "while ({}) ", condition)?;
            write_stmt(f, body, depth)
        }
        Stmt::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            write!(f, "if ({}) ", condition)?;
            match else_branch {
                Some(else_branch) => {
                    if leaves_if_open(then_branch) {
                        f.write_str("{\n")?;
                        write_indent(f, depth + 1)?;
                        write_stmt(f, then_branch, depth + 1)?;
                        f.write_char('\n')?;
                        write_indent(f, depth)?;
                        f.write_char('}')?;
                    } else {
                        write_stmt(f, then_branch, depth)?;
                    }
                    f.write_str(" else ")?;
                    write_stmt(f, else_branch, depth)
                }
                None => write_stmt(f, then_branch, depth),
            }
        }
        Stmt::Block { statements, .. } => {
            if statements.is_empty() {
                return f.write_str("{}");
            }
            f.write_str("{\n")?;
            for stmt in statements {
                write_indent(f, depth + 1)?;
                write_stmt(f, stmt, depth + 1)?;
                f.write_char('\n')?;
            }
            write_indent(f, depth)?;
            f.write_char('}')
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write_stmt(f, stmt, 0)?;
            f.write_char('\n')?;
        }
        Ok(())
    }
}

//! AST (Abstract Syntax Tree) definitions for Cuppa programs
//!
//! Every node is built once, by the production that recognizes it, from
//! children that are already complete. Nodes own their children outright.

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Primitive types, the element types of arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimType {
    Integer,
    Float,
    String,
}

impl PrimType {
    /// The value a declaration of this type holds when it has no initializer.
    pub fn zero_value(self) -> Literal {
        match self {
            PrimType::Integer => Literal::Integer(0),
            PrimType::Float => Literal::Float(0.0),
            PrimType::String => Literal::String(String::new()),
        }
    }
}

/// Declared type of a variable, array, parameter or function result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// Only ever a function return type
    Void,
    Integer,
    Float,
    String,
    Array { element: PrimType, size: usize },
}

impl Type {
    pub fn primitive(prim: PrimType) -> Self {
        match prim {
            PrimType::Integer => Type::Integer,
            PrimType::Float => Type::Float,
            PrimType::String => Type::String,
        }
    }

    pub fn with_array(self, size: usize) -> Option<Self> {
        self.as_primitive()
            .map(|element| Type::Array { element, size })
    }

    /// The primitive this type is, if it is one.
    pub fn as_primitive(&self) -> Option<PrimType> {
        match self {
            Type::Integer => Some(PrimType::Integer),
            Type::Float => Some(PrimType::Float),
            Type::String => Some(PrimType::String),
            Type::Void | Type::Array { .. } => None,
        }
    }
}

/// Signature of a declared function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub returns: Type,
    pub params: Vec<Type>,
}

impl FunctionType {
    pub fn new(returns: Type, params: &[FormalArg]) -> Self {
        Self {
            returns,
            params: params.iter().map(|p| p.arg_type.clone()).collect(),
        }
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct FormalArg {
    pub name: String,
    pub arg_type: Type,
    pub location: SourceLocation,
}

/// Value of a constant node
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Relational
    Eq,
    Le,
    // Additive
    Add,
    Sub,
    // Multiplicative
    Mul,
    Div,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg, // -x
    Not, // not x
}

/// Expression nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const {
        value: Literal,
        location: SourceLocation,
    },
    Id {
        name: String,
        location: SourceLocation,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    ArrayAccess {
        array: String,
        index: Box<Expr>,
        location: SourceLocation,
    },
    /// `f(args)[index]`: the call's result is indexed as an array
    CallIndex {
        name: String,
        args: Vec<Expr>,
        index: Box<Expr>,
        location: SourceLocation,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            Expr::Const { location, .. } => location,
            Expr::Id { location, .. } => location,
            Expr::Call { location, .. } => location,
            Expr::ArrayAccess { location, .. } => location,
            Expr::CallIndex { location, .. } => location,
            Expr::Binary { location, .. } => location,
            Expr::Unary { location, .. } => location,
        }
    }

    /// The literal value if this node is a constant.
    pub fn as_const(&self) -> Option<&Literal> {
        match self {
            Expr::Const { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Left-hand side of an assignment statement
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    Var(String),
    Element {
        array: String,
        index: Expr,
    },
    CallElement {
        name: String,
        args: Vec<Expr>,
        index: Expr,
    },
}

/// Statement nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    FunctionDecl {
        name: String,
        signature: FunctionType,
        params: Vec<FormalArg>,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    VarDecl {
        name: String,
        var_type: Type,
        init: Literal,
        location: SourceLocation,
    },
    ArrayDecl {
        name: String,
        array_type: Type,
        init: Vec<Literal>,
        location: SourceLocation,
    },
    CallStmt {
        name: String,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    Assign {
        target: AssignTarget,
        value: Expr,
        location: SourceLocation,
    },
    Get {
        target: String,
        location: SourceLocation,
    },
    Put {
        expr: Expr,
        location: SourceLocation,
    },
    Return {
        expr: Option<Expr>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
        location: SourceLocation,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
        location: SourceLocation,
    },
    Block {
        statements: Vec<Stmt>,
        location: SourceLocation,
    },
}

impl Stmt {
    /// Get the source location of this node
    pub fn location(&self) -> &SourceLocation {
        match self {
            Stmt::FunctionDecl { location, .. } => location,
            Stmt::VarDecl { location, .. } => location,
            Stmt::ArrayDecl { location, .. } => location,
            Stmt::CallStmt { location, .. } => location,
            Stmt::Assign { location, .. } => location,
            Stmt::Get { location, .. } => location,
            Stmt::Put { location, .. } => location,
            Stmt::Return { location, .. } => location,
            Stmt::While { location, .. } => location,
            Stmt::If { location, .. } => location,
            Stmt::Block { location, .. } => location,
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Program { statements }
    }
}

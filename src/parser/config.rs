//! Parser configuration
//!
//! A [`ParserConfig`] is a plain value handed to
//! [`Parser::with_config`](crate::parser::parse::Parser::with_config). Nothing
//! is read from files or the environment.

use crate::parser::ast::{Literal, PrimType, Type};

/// Nesting depth allowed when no limit is configured explicitly. Statements,
/// expressions and primaries each count one level; at this depth the parser
/// still fits in a 2 MiB thread stack.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Largest array size a declaration may name.
pub const DEFAULT_MAX_ARRAY_SIZE: usize = 1 << 16;

/// How declarations without an initializer are filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultValues {
    /// Zero value of the declared type: `0`, `0.0` or `""`
    #[default]
    Typed,
    /// Integer `0` whatever the declared type
    IntegerZero,
}

impl DefaultValues {
    pub fn zero_for(self, prim: PrimType) -> Literal {
        match self {
            DefaultValues::Typed => prim.zero_value(),
            DefaultValues::IntegerZero => Literal::Integer(0),
        }
    }

    /// Initializer of a bare scalar declaration.
    pub fn scalar(self, ty: &Type) -> Literal {
        match ty.as_primitive() {
            Some(prim) => self.zero_for(prim),
            None => Literal::Integer(0),
        }
    }

    /// Initializer list of a bare array declaration, one entry per slot.
    pub fn array(self, element: PrimType, size: usize) -> Vec<Literal> {
        vec![self.zero_for(element); size]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest statement/expression nesting accepted; `None` disables the check
    pub max_depth: Option<usize>,
    /// Largest size accepted in `T[N]`; bare arrays allocate one slot per element
    pub max_array_size: usize,
    pub default_values: DefaultValues,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            max_array_size: DEFAULT_MAX_ARRAY_SIZE,
            default_values: DefaultValues::Typed,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn without_depth_limit(mut self) -> Self {
        self.max_depth = None;
        self
    }

    pub fn with_max_array_size(mut self, max_array_size: usize) -> Self {
        self.max_array_size = max_array_size;
        self
    }

    pub fn with_default_values(mut self, default_values: DefaultValues) -> Self {
        self.default_values = default_values;
        self
    }
}

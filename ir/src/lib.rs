//! Expression-level Intermediate Representation for the Tessel compiler.
//!
//! This crate defines the scalar/vector expression trees that compute
//! bodies are written in, the tensor operations that own them, and the
//! algebraic simplifier used during lowering.
//!
//! # Module Organization
//!
//! - [`types`] - Fundamental type definitions (ConstValue, operation kinds)
//! - [`var`] - Variables with interned identity
//! - [`expr`] - Expression nodes and structure-preserving rewrites
//! - [`constructors`] - Checked expression constructors by semantic category
//! - [`eval`] - Constant evaluation used for folding
//! - [`simplify`] - Bottom-up algebraic simplification
//! - [`tensor`] - Tensor operations (placeholders, compute definitions)
//! - [`tree`] - ASCII tree rendering for debugging
//! - [`error`] - Error types and result handling

// Module declarations
pub mod constructors;
pub mod error;
pub mod eval;
pub mod expr;
pub mod prelude;
pub mod simplify;
pub mod tensor;
pub mod tree;
pub mod types;
pub mod var;


// Re-exports for convenience
// All types remain accessible at the crate root
pub use error::{Error, Result};
pub use expr::{Combiner, Expr, ExprKind, ExprRef};
pub use simplify::{Simplifier, simplify};
pub use tensor::{ComputeOp, Operation, PlaceholderOp, Tensor};
pub use tree::{render_tree_compact, render_tree_full};
pub use types::{BinaryOp, CallType, ConstValue};
pub use var::{Var, VarId};

// Re-export external types for convenience
pub use tessel_dtype::DType;
pub use tessel_dtype::ScalarType;

//! Common imports for working with expression trees.
//!
//! This module provides a convenient way to import the most commonly used
//! types when working with the IR:
//!
//! ```rust,ignore
//! use tessel_ir::prelude::*;
//! ```

// Core types
pub use crate::expr::{Combiner, Expr, ExprKind, ExprRef};
pub use crate::var::{Var, VarId};

// Operation types
pub use crate::types::{BinaryOp, CallType, ConstValue};

// Tensor layer
pub use crate::tensor::{ComputeOp, Operation, PlaceholderOp, Tensor};

// Simplification
pub use crate::simplify::{Simplifier, simplify};

// Re-exports from dependencies
pub use tessel_dtype::DType;
pub use tessel_dtype::ScalarType;

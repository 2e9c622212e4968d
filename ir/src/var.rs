//! Variables with interned identity.
//!
//! A [`Var`] is a unique symbol: equality and hashing go through its
//! [`VarId`], never its display name. Two variables created with the same
//! name are different variables, and one variable cloned into many
//! expression nodes stays the same variable. This is what lets extraction
//! and matching treat "same variable" as an `O(1)` comparison.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use tessel_dtype::DType;

use crate::expr::{Expr, ExprKind, ExprRef};

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(0);

/// Interned variable identity. Allocated once per [`Var::new`] from a
/// process-wide counter; copies of one `Var` share the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u64);

impl VarId {
    fn fresh() -> Self {
        Self(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An index, buffer, or let-bound variable.
#[derive(Debug, Clone)]
pub struct Var {
    id: VarId,
    name: String,
    dtype: DType,
}

impl Var {
    pub fn new(name: impl Into<String>, dtype: DType) -> Self {
        Self { id: VarId::fresh(), name: name.into(), dtype }
    }

    pub const fn id(&self) -> VarId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn dtype(&self) -> DType {
        self.dtype
    }

    /// Wrap this variable as an expression leaf. Every reference produced
    /// this way still denotes the same variable.
    pub fn expr(&self) -> ExprRef {
        Expr::new(ExprKind::Var(self.clone()), self.dtype)
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Var {}

impl Hash for Var {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.id)
    }
}

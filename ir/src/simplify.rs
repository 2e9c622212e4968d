//! Algebraic simplification.
//!
//! [`Simplifier`] walks an expression bottom-up, rewriting children first
//! and then folding each node until no local rule fires. Every rule
//! replaces a node with one of its operands or with a literal, so each
//! step strictly shrinks the tree and the whole pass is idempotent:
//! simplifying an already-simplified expression returns it unchanged.
//!
//! Results are memoized by node id, which keeps shared sub-trees shared
//! and makes repeated simplification of a DAG linear in distinct nodes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::eval::{eval_binary_op, eval_not};
use crate::expr::{Expr, ExprKind, ExprRef};
use crate::types::BinaryOp;

/// Simplify an expression with a fresh memo table.
pub fn simplify(expr: &ExprRef) -> ExprRef {
    Simplifier::new().simplify(expr)
}

/// Bottom-up simplifier, reusable across expressions that share sub-trees.
#[derive(Default)]
pub struct Simplifier {
    memo: HashMap<u64, ExprRef>,
}

impl Simplifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simplify `expr`. Sub-trees the local rules never touch come back as
    /// the same allocations they went in as.
    pub fn simplify(&mut self, expr: &ExprRef) -> ExprRef {
        if let Some(done) = self.memo.get(&expr.id()) {
            return done.clone();
        }
        let rebuilt = expr.map_children(&mut |child| self.simplify(child));
        let folded = Self::fold(rebuilt);
        if folded.id() != expr.id() {
            tracing::trace!(from = expr.id(), to = folded.id(), kind = expr.kind().name(), "folded node");
        }
        self.memo.insert(expr.id(), folded.clone());
        folded
    }

    /// Run local rules at one node to fixpoint. Children are already
    /// simplified when this is called.
    fn fold(mut expr: ExprRef) -> ExprRef {
        while let Some(next) = Self::fold_once(&expr) {
            expr = next;
        }
        expr
    }

    fn fold_once(expr: &ExprRef) -> Option<ExprRef> {
        match expr.kind() {
            ExprKind::Binary(op, a, b) => Self::fold_binary(expr, *op, a, b),
            ExprKind::Not { value } => {
                let folded = eval_not(value.const_value()?)?;
                Some(Expr::from_const(folded, expr.dtype()))
            }
            ExprKind::Cast { value } => {
                if value.dtype() == expr.dtype() {
                    return Some(value.clone());
                }
                let folded = value.const_value()?.cast(expr.dtype())?;
                Some(Expr::from_const(folded, expr.dtype()))
            }
            ExprKind::Select { cond, on_true, on_false } => {
                let cond = cond.const_value()?;
                Some(if cond.is_zero() { on_false.clone() } else { on_true.clone() })
            }
            _ => None,
        }
    }

    /// Identity rules run before constant evaluation so an operand that
    /// already answers the question is reused instead of re-allocated.
    fn fold_binary(expr: &ExprRef, op: BinaryOp, a: &ExprRef, b: &ExprRef) -> Option<ExprRef> {
        if let Some(kept) = Self::fold_binary_identity(op, a, b) {
            return Some(kept);
        }
        if let (Some(x), Some(y)) = (a.const_value(), b.const_value())
            && let Some(folded) = eval_binary_op(op, x, y)
        {
            // Literal operands are always scalar, and the node dtype already
            // accounts for comparisons producing bool.
            return Some(Expr::from_const(folded, expr.dtype()));
        }
        None
    }

    fn fold_binary_identity(op: BinaryOp, a: &ExprRef, b: &ExprRef) -> Option<ExprRef> {
        match op {
            BinaryOp::Add => {
                if b.is_const_zero() {
                    return Some(a.clone());
                }
                if a.is_const_zero() {
                    return Some(b.clone());
                }
                None
            }
            BinaryOp::Sub if b.is_const_zero() => Some(a.clone()),
            BinaryOp::Mul => {
                if a.is_const_one() || b.is_const_zero() {
                    return Some(b.clone());
                }
                if b.is_const_one() || a.is_const_zero() {
                    return Some(a.clone());
                }
                None
            }
            BinaryOp::Div | BinaryOp::FloorDiv if b.is_const_one() => Some(a.clone()),
            BinaryOp::Min | BinaryOp::Max if Arc::ptr_eq(a, b) => Some(a.clone()),
            BinaryOp::And => {
                // `false` absorbs, `true` passes through.
                if a.is_const_zero() || b.is_const_one() {
                    return Some(a.clone());
                }
                if b.is_const_zero() || a.is_const_one() {
                    return Some(b.clone());
                }
                None
            }
            BinaryOp::Or => {
                if a.is_const_one() || b.is_const_zero() {
                    return Some(a.clone());
                }
                if b.is_const_one() || a.is_const_zero() {
                    return Some(b.clone());
                }
                None
            }
            _ => None,
        }
    }
}

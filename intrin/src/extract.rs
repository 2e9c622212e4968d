//! Index-variable elimination for compute bodies.
//!
//! A compute body addresses its inputs through the operation's own index
//! variables, so two bodies that perform the same arithmetic still differ
//! wherever their index expressions differ. Before structural comparison the
//! caller names the variables that stay meaningful; every other variable
//! leaf is replaced with a zero of its own dtype and the result is pushed
//! through the simplifier. `a[idx + k * 0]` and `a[idx]` collapse to the
//! same tree.

use std::collections::{HashMap, HashSet};

use tessel_ir::{Expr, ExprKind, ExprRef, Var, VarId, simplify};

/// Replaces every variable outside `reserved` with a zero literal, then
/// simplifies the rewritten tree.
pub fn sub_index_expr(expr: &ExprRef, reserved: &[Var]) -> ExprRef {
    let mut extractor = SubIndexExtractor::new(reserved);
    let zeroed = extractor.rewrite(expr);
    simplify(&zeroed)
}

/// Rewriter that zeroes out non-reserved variable leaves.
///
/// Rewrites are memoized by node id, so a shared sub-tree is visited once
/// and stays shared in the output.
pub struct SubIndexExtractor {
    reserved: HashSet<VarId>,
    memo: HashMap<u64, ExprRef>,
}

impl SubIndexExtractor {
    pub fn new(reserved: &[Var]) -> Self {
        Self {
            reserved: reserved.iter().map(Var::id).collect(),
            memo: HashMap::new(),
        }
    }

    /// Rewrites one tree. Only variable leaves are touched; buffer slots on
    /// loads and bound-variable slots on lets are declarations, not uses,
    /// and keep their variables.
    pub fn rewrite(&mut self, expr: &ExprRef) -> ExprRef {
        if let Some(done) = self.memo.get(&expr.id()) {
            return done.clone();
        }

        let rewritten = match expr.kind() {
            ExprKind::Var(var) if !self.reserved.contains(&var.id()) => {
                tracing::trace!(var = %var, "zeroing non-reserved index variable");
                Expr::zero(expr.dtype())
            }
            _ => expr.map_children(&mut |child| self.rewrite(child)),
        };

        self.memo.insert(expr.id(), rewritten.clone());
        rewritten
    }
}

//! Property tests for simplification and constant evaluation.

use std::sync::Arc;

use proptest::prelude::*;

use tessel_dtype::DType;

use crate::eval::eval_binary_op;
use crate::expr::{Expr, ExprKind, ExprRef};
use crate::simplify::simplify;
use crate::types::ConstValue;
use crate::var::Var;

use super::generators::*;

/// Direct recursive evaluation of a constant-only tree, as an oracle for
/// the simplifier's folding.
fn eval_tree(expr: &ExprRef) -> Option<ConstValue> {
    match expr.kind() {
        ExprKind::IntImm(v) => Some(ConstValue::Int(*v)),
        ExprKind::Binary(op, a, b) => eval_binary_op(*op, eval_tree(a)?, eval_tree(b)?),
        _ => None,
    }
}

fn index_vars() -> Vec<Var> {
    vec![Var::new("i", DType::INT32), Var::new("j", DType::INT32), Var::new("k", DType::INT32)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Simplification reaches a fixpoint: running it twice returns the
    /// exact allocation the first run produced.
    #[test]
    fn simplify_is_idempotent(expr in arb_index_expr(index_vars())) {
        let once = simplify(&expr);
        let twice = simplify(&once);
        prop_assert!(Arc::ptr_eq(&once, &twice), "second pass changed:\n{}", once.tree());
    }

    /// Simplification never changes the dtype of the root.
    #[test]
    fn simplify_preserves_dtype(expr in arb_index_expr(index_vars())) {
        prop_assert_eq!(simplify(&expr).dtype(), expr.dtype());
    }

    /// A tree with no variables folds all the way down to one literal, and
    /// that literal agrees with direct evaluation.
    #[test]
    fn const_trees_fold_to_literals(expr in arb_const_expr()) {
        let simplified = simplify(&expr);
        let folded = simplified.const_value();
        prop_assert!(folded.is_some(), "left unfolded:\n{}", simplified.tree());
        prop_assert_eq!(folded, eval_tree(&expr));
    }

    /// Adding literal zero is erased without disturbing the rest.
    #[test]
    fn add_zero_is_identity(expr in arb_index_expr(index_vars())) {
        let simplified = simplify(&expr);
        let padded = simplified.add(&Expr::zero(DType::INT32)).unwrap();
        prop_assert!(Arc::ptr_eq(&simplify(&padded), &simplified));
    }

    /// Multiplying by literal one is erased without disturbing the rest.
    #[test]
    fn mul_one_is_identity(expr in arb_index_expr(index_vars())) {
        let simplified = simplify(&expr);
        let padded = Expr::one(DType::INT32).mul(&simplified).unwrap();
        prop_assert!(Arc::ptr_eq(&simplify(&padded), &simplified));
    }
}

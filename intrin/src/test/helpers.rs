//! Shared builders for canonicalization and matching tests.

use std::sync::Arc;

use tessel_dtype::DType;
use tessel_ir::{Combiner, Expr, ExprRef, Operation, Tensor, Var};

/// Scalar i32 index variable.
pub fn ivar(name: &str) -> Var {
    Var::new(name, DType::INT32)
}

/// 1-D float32 input tensor.
pub fn input(name: &str, len: i64) -> Tensor {
    Operation::placeholder(name, vec![len], DType::FLOAT32).tensor()
}

/// Single-output compute tensor over `axis` and `reduce_axis`.
pub fn compute(name: &str, axis: Vec<Var>, reduce_axis: Vec<Var>, body: ExprRef) -> Tensor {
    Operation::compute(name, axis, reduce_axis, vec![body]).unwrap().tensor()
}

/// `sum(source)` over `axis`, the reduction shape used throughout.
pub fn sum_over(source: ExprRef, axis: Vec<Var>, dtype: DType) -> ExprRef {
    let combiner = Arc::new(Combiner::sum(dtype).unwrap());
    Expr::reduce(combiner, vec![source], axis, &Expr::const_true(), 0).unwrap()
}

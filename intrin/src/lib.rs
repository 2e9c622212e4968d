//! Intrinsic recognition for tensor compute kernels.
//!
//! A hardware intrinsic is declared as a small compute operation. A kernel
//! offloads onto it when its own body describes the same arithmetic over
//! the same data-flow shape, regardless of how either side spells its
//! variables or indexes its inputs. This crate makes that decision in two
//! steps:
//!
//! - [`extract`] rewrites a compute body into index-free canonical form:
//!   non-reserved variables become zeros and the tree is simplified.
//! - [`matcher`] compares a declared intrinsic pattern against that form
//!   structurally, binding pattern variables to candidate variables as it
//!   walks.
//!
//! [`intrinsic_match`] ties the two together for whole tensors.

pub mod extract;
pub mod matcher;


pub use extract::{SubIndexExtractor, sub_index_expr};
pub use matcher::IntrinsicMatcher;

use tessel_ir::{ExprRef, Tensor, Var};

/// Canonical form of a tensor's compute body: every index variable outside
/// `spatial` and `reduce` is zeroed out and the result simplified.
///
/// # Panics
///
/// Panics when `tensor` is not produced by a compute operation; only
/// computed bodies have a sub-expression to canonicalize.
pub fn canonical_subexpr(tensor: &Tensor, spatial: &[Var], reduce: &[Var]) -> ExprRef {
    let body = compute_body(tensor);
    let reserved: Vec<Var> = spatial.iter().chain(reduce).cloned().collect();
    let canonical = sub_index_expr(&body, &reserved);
    tracing::trace!(tensor = tensor.name(), "canonicalized compute body");
    canonical
}

/// Reports whether `target`'s compute body matches the `intrinsic`
/// declaration, keeping `spatial` and `reduce` as the variables that stay
/// meaningful on the target side.
///
/// The intrinsic body is taken as the pattern verbatim; the target body is
/// canonicalized with [`canonical_subexpr`] first.
///
/// # Panics
///
/// Panics when either tensor is not produced by a compute operation.
pub fn intrinsic_match(target: &Tensor, intrinsic: &Tensor, spatial: &[Var], reduce: &[Var]) -> bool {
    let pattern = compute_body(intrinsic);
    let candidate = canonical_subexpr(target, spatial, reduce);
    let matched = IntrinsicMatcher::new().matches(&pattern, &candidate);
    tracing::debug!(tensor = target.name(), intrinsic = intrinsic.name(), matched, "intrinsic match");
    matched
}

/// Body expression behind a tensor's output slot.
fn compute_body(tensor: &Tensor) -> ExprRef {
    let Some(compute) = tensor.op().as_compute() else {
        panic!(
            "compute_body: tensor `{}` is not produced by a compute operation",
            tensor.name()
        );
    };
    compute.body()[tensor.value_index()].clone()
}

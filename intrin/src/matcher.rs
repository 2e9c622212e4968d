//! Structural tree matching between an intrinsic pattern and a candidate
//! compute body.
//!
//! Matching is a parallel walk over the two trees. Variables match by
//! consistent renaming: the first occurrence of a pattern variable binds it
//! to whatever candidate variable sits opposite, and every later occurrence
//! must resolve to that same variable. Buffer variables on loads and
//! combiner operands on reductions go through the same binding map, so the
//! pattern's data flow is enforced rather than its spelling.

use std::collections::HashMap;

use tessel_ir::{ExprKind, ExprRef, Var, VarId};

/// One matching attempt; owns the pattern-to-candidate variable bindings.
///
/// Bindings accumulate for the lifetime of the value, so a fresh matcher is
/// needed for each (pattern, candidate) pair.
#[derive(Debug, Default)]
pub struct IntrinsicMatcher {
    bindings: HashMap<VarId, VarId>,
}

impl IntrinsicMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether `candidate` has the same shape as `pattern` under a
    /// consistent renaming of the pattern's variables.
    ///
    /// Node kinds and dtypes must agree at every position. Callee
    /// identities on calls and axis lists on reductions are ignored.
    pub fn matches(&mut self, pattern: &ExprRef, candidate: &ExprRef) -> bool {
        if pattern.dtype() != candidate.dtype() {
            return false;
        }

        match (pattern.kind(), candidate.kind()) {
            (ExprKind::Var(p), ExprKind::Var(c)) => self.unify(p, c),

            (ExprKind::IntImm(p), ExprKind::IntImm(c)) => p == c,
            (ExprKind::UIntImm(p), ExprKind::UIntImm(c)) => p == c,
            // Exact comparison: a pattern literal either is the candidate
            // literal or it is not. No tolerance.
            (ExprKind::FloatImm(p), ExprKind::FloatImm(c)) => p == c,
            // String payloads are annotations; any string accepts any other.
            (ExprKind::StringImm(_), ExprKind::StringImm(_)) => true,

            (ExprKind::Cast { value: p }, ExprKind::Cast { value: c })
            | (ExprKind::Not { value: p }, ExprKind::Not { value: c }) => self.matches(p, c),
            (ExprKind::Binary(p_op, p_a, p_b), ExprKind::Binary(c_op, c_a, c_b)) => {
                p_op == c_op && self.matches(p_a, c_a) && self.matches(p_b, c_b)
            }
            (
                ExprKind::Select { cond: p_cond, on_true: p_t, on_false: p_f },
                ExprKind::Select { cond: c_cond, on_true: c_t, on_false: c_f },
            ) => self.matches(p_cond, c_cond) && self.matches(p_t, c_t) && self.matches(p_f, c_f),

            (
                ExprKind::Load { buffer: p_buf, index: p_index, predicate: p_pred },
                ExprKind::Load { buffer: c_buf, index: c_index, predicate: c_pred },
            ) => {
                self.matches(p_index, c_index)
                    && self.matches(p_pred, c_pred)
                    && self.unify(p_buf, c_buf)
            }

            (
                ExprKind::Ramp { base: p_base, stride: p_stride, lanes: p_lanes },
                ExprKind::Ramp { base: c_base, stride: c_stride, lanes: c_lanes },
            ) => {
                p_lanes == c_lanes
                    && self.matches(p_base, c_base)
                    && self.matches(p_stride, c_stride)
            }
            (
                ExprKind::Broadcast { value: p_value, lanes: p_lanes },
                ExprKind::Broadcast { value: c_value, lanes: c_lanes },
            ) => p_lanes == c_lanes && self.matches(p_value, c_value),
            (
                ExprKind::Shuffle { vectors: p_vecs, indices: p_idx },
                ExprKind::Shuffle { vectors: c_vecs, indices: c_idx },
            ) => {
                p_vecs.len() == c_vecs.len()
                    && p_idx.len() == c_idx.len()
                    && self.all_match(p_vecs, c_vecs)
                    && self.all_match(p_idx, c_idx)
            }

            (
                ExprKind::Call { args: p_args, call_type: p_ct, value_index: p_vi, .. },
                ExprKind::Call { args: c_args, call_type: c_ct, value_index: c_vi, .. },
            ) => {
                // The callee is deliberately not compared: the point is to
                // equate a call into the target's input tensors with a call
                // into the intrinsic's. Declared intrinsics may also carry
                // one leading zero placeholder argument; it is skipped.
                let p_args = elide_leading_zero(p_args);
                p_ct == c_ct
                    && p_vi == c_vi
                    && p_args.len() == c_args.len()
                    && self.all_match(p_args, c_args)
            }

            (
                ExprKind::Let { var: p_var, value: p_value, body: p_body },
                ExprKind::Let { var: c_var, value: c_value, body: c_body },
            ) => {
                // The bound variable unifies first, so occurrences inside
                // the body resolve against an established binding.
                self.unify(p_var, c_var)
                    && self.matches(p_value, c_value)
                    && self.matches(p_body, c_body)
            }

            (
                ExprKind::Reduce {
                    combiner: p_comb,
                    source: p_src,
                    condition: p_cond,
                    value_index: p_vi,
                    ..
                },
                ExprKind::Reduce {
                    combiner: c_comb,
                    source: c_src,
                    condition: c_cond,
                    value_index: c_vi,
                    ..
                },
            ) => {
                // Arity gates come first; nothing recurses (or binds) on
                // reductions of different shapes.
                if p_comb.lhs().len() != c_comb.lhs().len()
                    || p_comb.rhs().len() != c_comb.rhs().len()
                    || p_comb.result().len() != c_comb.result().len()
                    || p_src.len() != c_src.len()
                {
                    return false;
                }

                // Axis lists are ignored: the target reduces over its own
                // loop nest, the intrinsic over its own.
                self.unify_all(p_comb.lhs(), c_comb.lhs())
                    && self.unify_all(p_comb.rhs(), c_comb.rhs())
                    && self.all_match(p_comb.result(), c_comb.result())
                    && self.all_match(p_src, c_src)
                    && self.matches(p_cond, c_cond)
                    && p_vi == c_vi
            }

            (_, _) => false,
        }
    }

    /// Variable rule: dtypes must agree, the first occurrence binds, and
    /// later occurrences must resolve to the already-bound candidate.
    fn unify(&mut self, pattern: &Var, candidate: &Var) -> bool {
        if pattern.dtype() != candidate.dtype() {
            return false;
        }
        match self.bindings.get(&pattern.id()) {
            Some(bound) => *bound == candidate.id(),
            None => {
                tracing::trace!(pattern = %pattern, candidate = %candidate, "binding variable");
                self.bindings.insert(pattern.id(), candidate.id());
                true
            }
        }
    }

    fn unify_all(&mut self, patterns: &[Var], candidates: &[Var]) -> bool {
        patterns.iter().zip(candidates).all(|(p, c)| self.unify(p, c))
    }

    fn all_match(&mut self, patterns: &[ExprRef], candidates: &[ExprRef]) -> bool {
        patterns.iter().zip(candidates).all(|(p, c)| self.matches(p, c))
    }
}

/// Drops a single leading integer-zero placeholder from a pattern argument
/// list. Declared intrinsics may carry one; computed bodies never do.
fn elide_leading_zero(args: &[ExprRef]) -> &[ExprRef] {
    match args.first().map(|arg| arg.kind()) {
        Some(ExprKind::IntImm(0) | ExprKind::UIntImm(0)) => &args[1..],
        _ => args,
    }
}

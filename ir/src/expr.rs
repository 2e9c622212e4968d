//! Expression nodes.
//!
//! Expressions are immutable trees behind [`Arc`]: a node owns its children
//! and children may be shared between parents, so traversals must key any
//! memoization by [`Expr::id`] rather than assuming each sub-tree appears
//! once. Nodes are allocated through [`Expr::new`] (no validation) or the
//! checked constructors in [`crate::constructors`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::{SmallVec, smallvec};
use tessel_dtype::DType;

use crate::error::{CombinerArityMismatchSnafu, Result};
use crate::tensor::Operation;
use crate::types::{BinaryOp, CallType, ConstValue};
use crate::var::Var;

pub type ExprRef = Arc<Expr>;

static NEXT_EXPR_ID: AtomicU64 = AtomicU64::new(0);

fn next_expr_id() -> u64 {
    NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed)
}

/// A single expression node: stable id, element type, kind with operands.
///
/// Ids are unique per node allocation and only used as map keys; structural
/// questions (equality up to renaming) go through the matcher, not ids.
#[derive(Debug)]
pub struct Expr {
    id: u64,
    dtype: DType,
    kind: ExprKind,
}

/// Expression node kinds. This enumeration is closed: extraction,
/// simplification, and matching each dispatch over it exhaustively.
#[derive(Debug, Clone)]
pub enum ExprKind {
    // ========================================================================
    // Leaves
    // ========================================================================
    /// Reference to an index, buffer, or let-bound variable.
    Var(Var),
    /// Signed integer literal.
    IntImm(i64),
    /// Unsigned integer literal; also carries bool literals (dtype `bool`).
    UIntImm(u64),
    /// Float literal.
    FloatImm(f64),
    /// String literal (annotations, extern symbols).
    StringImm(String),

    // ========================================================================
    // Scalar compute
    // ========================================================================
    /// Value conversion; the target dtype lives on the node itself.
    Cast { value: ExprRef },
    /// Logical negation of a bool.
    Not { value: ExprRef },
    /// Two-operand arithmetic, comparison, or logical operation.
    Binary(BinaryOp, ExprRef, ExprRef),
    /// Lane-wise conditional.
    Select { cond: ExprRef, on_true: ExprRef, on_false: ExprRef },

    // ========================================================================
    // Memory
    // ========================================================================
    /// Predicated load through a buffer variable.
    Load { buffer: Var, index: ExprRef, predicate: ExprRef },

    // ========================================================================
    // Vector construction
    // ========================================================================
    /// `[base, base+stride, base+2*stride, ..]` over `lanes` lanes.
    Ramp { base: ExprRef, stride: ExprRef, lanes: u16 },
    /// Scalar value replicated across `lanes` lanes.
    Broadcast { value: ExprRef, lanes: u16 },
    /// Lane permutation/concatenation of input vectors.
    Shuffle { vectors: Vec<ExprRef>, indices: Vec<ExprRef> },

    // ========================================================================
    // Structured
    // ========================================================================
    /// Call to an intrinsic, extern function, or producing operation.
    Call {
        name: String,
        args: SmallVec<[ExprRef; 4]>,
        call_type: CallType,
        /// Producing operation for `Halide`-classified calls. Never part of
        /// structural comparison.
        func: Option<Arc<Operation>>,
        value_index: usize,
    },
    /// Scoped binding: `let var = value in body`.
    Let { var: Var, value: ExprRef, body: ExprRef },
    /// Commutative reduction over an axis list.
    Reduce {
        combiner: Arc<Combiner>,
        source: Vec<ExprRef>,
        axis: Vec<Var>,
        condition: ExprRef,
        value_index: usize,
    },
}

impl Expr {
    /// Allocate a node with a fresh id. Performs no validation; the checked
    /// constructors are the public construction path, this is the allocator
    /// they and structure-preserving rewrites share.
    pub fn new(kind: ExprKind, dtype: DType) -> ExprRef {
        Arc::new(Self { id: next_expr_id(), dtype, kind })
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    pub const fn dtype(&self) -> DType {
        self.dtype
    }

    pub const fn kind(&self) -> &ExprKind {
        &self.kind
    }

    /// The literal value of this node, if it is a literal leaf.
    pub fn const_value(&self) -> Option<ConstValue> {
        match self.kind {
            ExprKind::IntImm(v) => Some(ConstValue::Int(v)),
            ExprKind::UIntImm(v) => Some(ConstValue::UInt(v)),
            ExprKind::FloatImm(v) => Some(ConstValue::Float(v)),
            _ => None,
        }
    }

    /// True for integer/unsigned/float literal zero.
    pub fn is_const_zero(&self) -> bool {
        self.const_value().is_some_and(ConstValue::is_zero)
    }

    /// True for integer/unsigned/float literal one.
    pub fn is_const_one(&self) -> bool {
        self.const_value().is_some_and(ConstValue::is_one)
    }

    /// Expression-valued operands in evaluation order. Binding-position
    /// variables (`Let::var`, `Load::buffer`, reduction axes, combiner
    /// operands) are not children; rewrites leave them in place.
    pub fn children(&self) -> SmallVec<[&ExprRef; 4]> {
        match &self.kind {
            ExprKind::Var(_)
            | ExprKind::IntImm(_)
            | ExprKind::UIntImm(_)
            | ExprKind::FloatImm(_)
            | ExprKind::StringImm(_) => smallvec![],
            ExprKind::Cast { value } | ExprKind::Not { value } | ExprKind::Broadcast { value, .. } => {
                smallvec![value]
            }
            ExprKind::Binary(_, a, b) => smallvec![a, b],
            ExprKind::Select { cond, on_true, on_false } => smallvec![cond, on_true, on_false],
            ExprKind::Load { index, predicate, .. } => smallvec![index, predicate],
            ExprKind::Ramp { base, stride, .. } => smallvec![base, stride],
            ExprKind::Shuffle { vectors, indices } => vectors.iter().chain(indices).collect(),
            ExprKind::Call { args, .. } => args.iter().collect(),
            ExprKind::Let { value, body, .. } => smallvec![value, body],
            ExprKind::Reduce { source, condition, .. } => {
                source.iter().chain(std::iter::once(condition)).collect()
            }
        }
    }

    /// Rebuild this node with every expression child replaced by `f(child)`.
    /// Binding positions stay as they are. When every child maps back to the
    /// same allocation, the original node is returned instead of a copy, so
    /// untouched sub-trees keep their ids.
    pub fn map_children(self: &ExprRef, f: &mut impl FnMut(&ExprRef) -> ExprRef) -> ExprRef {
        fn same(old: &ExprRef, new: &ExprRef) -> bool {
            Arc::ptr_eq(old, new)
        }

        match &self.kind {
            ExprKind::Var(_)
            | ExprKind::IntImm(_)
            | ExprKind::UIntImm(_)
            | ExprKind::FloatImm(_)
            | ExprKind::StringImm(_) => self.clone(),

            ExprKind::Cast { value } => {
                let mapped = f(value);
                if same(value, &mapped) {
                    self.clone()
                } else {
                    Self::new(ExprKind::Cast { value: mapped }, self.dtype)
                }
            }
            ExprKind::Not { value } => {
                let mapped = f(value);
                if same(value, &mapped) {
                    self.clone()
                } else {
                    Self::new(ExprKind::Not { value: mapped }, self.dtype)
                }
            }
            ExprKind::Binary(op, a, b) => {
                let new_a = f(a);
                let new_b = f(b);
                if same(a, &new_a) && same(b, &new_b) {
                    self.clone()
                } else {
                    Self::new(ExprKind::Binary(*op, new_a, new_b), self.dtype)
                }
            }
            ExprKind::Select { cond, on_true, on_false } => {
                let new_cond = f(cond);
                let new_true = f(on_true);
                let new_false = f(on_false);
                if same(cond, &new_cond) && same(on_true, &new_true) && same(on_false, &new_false) {
                    self.clone()
                } else {
                    Self::new(
                        ExprKind::Select { cond: new_cond, on_true: new_true, on_false: new_false },
                        self.dtype,
                    )
                }
            }
            ExprKind::Load { buffer, index, predicate } => {
                let new_index = f(index);
                let new_predicate = f(predicate);
                if same(index, &new_index) && same(predicate, &new_predicate) {
                    self.clone()
                } else {
                    Self::new(
                        ExprKind::Load {
                            buffer: buffer.clone(),
                            index: new_index,
                            predicate: new_predicate,
                        },
                        self.dtype,
                    )
                }
            }
            ExprKind::Ramp { base, stride, lanes } => {
                let new_base = f(base);
                let new_stride = f(stride);
                if same(base, &new_base) && same(stride, &new_stride) {
                    self.clone()
                } else {
                    Self::new(
                        ExprKind::Ramp { base: new_base, stride: new_stride, lanes: *lanes },
                        self.dtype,
                    )
                }
            }
            ExprKind::Broadcast { value, lanes } => {
                let mapped = f(value);
                if same(value, &mapped) {
                    self.clone()
                } else {
                    Self::new(ExprKind::Broadcast { value: mapped, lanes: *lanes }, self.dtype)
                }
            }
            ExprKind::Shuffle { vectors, indices } => {
                let new_vectors: Vec<ExprRef> = vectors.iter().map(|c| f(c)).collect();
                let new_indices: Vec<ExprRef> = indices.iter().map(|c| f(c)).collect();
                let unchanged = vectors.iter().zip(&new_vectors).all(|(o, n)| same(o, n))
                    && indices.iter().zip(&new_indices).all(|(o, n)| same(o, n));
                if unchanged {
                    self.clone()
                } else {
                    Self::new(
                        ExprKind::Shuffle { vectors: new_vectors, indices: new_indices },
                        self.dtype,
                    )
                }
            }
            ExprKind::Call { name, args, call_type, func, value_index } => {
                let new_args: SmallVec<[ExprRef; 4]> = args.iter().map(|c| f(c)).collect();
                if args.iter().zip(&new_args).all(|(o, n)| same(o, n)) {
                    self.clone()
                } else {
                    Self::new(
                        ExprKind::Call {
                            name: name.clone(),
                            args: new_args,
                            call_type: *call_type,
                            func: func.clone(),
                            value_index: *value_index,
                        },
                        self.dtype,
                    )
                }
            }
            ExprKind::Let { var, value, body } => {
                let new_value = f(value);
                let new_body = f(body);
                if same(value, &new_value) && same(body, &new_body) {
                    self.clone()
                } else {
                    Self::new(
                        ExprKind::Let { var: var.clone(), value: new_value, body: new_body },
                        self.dtype,
                    )
                }
            }
            ExprKind::Reduce { combiner, source, axis, condition, value_index } => {
                let new_source: Vec<ExprRef> = source.iter().map(|c| f(c)).collect();
                let new_condition = f(condition);
                let unchanged = source.iter().zip(&new_source).all(|(o, n)| same(o, n))
                    && same(condition, &new_condition);
                if unchanged {
                    self.clone()
                } else {
                    Self::new(
                        ExprKind::Reduce {
                            combiner: combiner.clone(),
                            source: new_source,
                            axis: axis.clone(),
                            condition: new_condition,
                            value_index: *value_index,
                        },
                        self.dtype,
                    )
                }
            }
        }
    }
}

impl ExprKind {
    /// Kind name for diagnostics and tree rendering.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Var(_) => "var",
            Self::IntImm(_) => "int",
            Self::UIntImm(_) => "uint",
            Self::FloatImm(_) => "float",
            Self::StringImm(_) => "str",
            Self::Cast { .. } => "cast",
            Self::Not { .. } => "not",
            Self::Binary(..) => "binary",
            Self::Select { .. } => "select",
            Self::Load { .. } => "load",
            Self::Ramp { .. } => "ramp",
            Self::Broadcast { .. } => "broadcast",
            Self::Shuffle { .. } => "shuffle",
            Self::Call { .. } => "call",
            Self::Let { .. } => "let",
            Self::Reduce { .. } => "reduce",
        }
    }
}

/// Accumulation rule of a reduction: `result[i]` combines the running value
/// `lhs[i]` with the incoming value `rhs[i]`, starting from `identity[i]`.
/// All four sequences have the same length.
#[derive(Debug, Clone)]
pub struct Combiner {
    lhs: Vec<Var>,
    rhs: Vec<Var>,
    result: Vec<ExprRef>,
    identity: Vec<ExprRef>,
}

impl Combiner {
    pub fn new(
        lhs: Vec<Var>,
        rhs: Vec<Var>,
        result: Vec<ExprRef>,
        identity: Vec<ExprRef>,
    ) -> Result<Self> {
        snafu::ensure!(
            lhs.len() == rhs.len() && lhs.len() == result.len() && lhs.len() == identity.len(),
            CombinerArityMismatchSnafu {
                lhs: lhs.len(),
                rhs: rhs.len(),
                result: result.len(),
                identity: identity.len(),
            }
        );
        Ok(Self { lhs, rhs, result, identity })
    }

    pub fn lhs(&self) -> &[Var] {
        &self.lhs
    }

    pub fn rhs(&self) -> &[Var] {
        &self.rhs
    }

    pub fn result(&self) -> &[ExprRef] {
        &self.result
    }

    pub fn identity(&self) -> &[ExprRef] {
        &self.identity
    }

    /// Number of value slots this combiner accumulates.
    pub fn arity(&self) -> usize {
        self.result.len()
    }
}

//! Checked expression constructors.
//!
//! [`Expr::new`] allocates without validation; everything here layers the
//! dtype rules on top and is the construction path the rest of the
//! workspace uses:
//! - literals: [`Expr::int`], [`Expr::uint`], [`Expr::float`],
//!   [`Expr::string`], [`Expr::zero`], [`Expr::one`]
//! - arithmetic: `add`, `sub`, `mul`, `div`, `rem`, `floor_div`,
//!   `floor_mod`, `min`, `max`
//! - comparison: `eq`, `ne`, `lt`, `le`, `gt`, `ge`
//! - logical: `and`, `or`, `not`
//! - structure: `cast`, `select`, `load`, `ramp`, `broadcast`, `shuffle`,
//!   `call`, `let_in`, `reduce`

use std::sync::Arc;

use smallvec::SmallVec;
use snafu::ensure;
use tessel_dtype::DType;

use crate::error::{
    BroadcastNotScalarSnafu, DTypeMismatchSnafu, DivisionByZeroSnafu, InvalidCastSnafu,
    InvalidLaneCountSnafu, LetValueMismatchSnafu, LiteralDTypeMismatchSnafu,
    LoadBufferNotHandleSnafu, LoadIndexMismatchSnafu, LoadPredicateMismatchSnafu,
    NonArithmeticOperandSnafu, NonBooleanOperandSnafu, NotRequiresBoolSnafu,
    RampOperandMismatchSnafu, ReduceConditionNotBoolSnafu, ReduceSourceArityMismatchSnafu,
    Result, SelectBranchMismatchSnafu, SelectConditionMismatchSnafu, ShuffleElementMismatchSnafu,
    ShuffleEmptySnafu, ShuffleIndexMismatchSnafu, ValueIndexOutOfRangeSnafu,
};
use crate::expr::{Combiner, Expr, ExprKind, ExprRef};
use crate::tensor::Operation;
use crate::types::{BinaryOp, CallType, ConstValue};
use crate::var::Var;

// ============================================================================
// Macro Definitions
// ============================================================================

/// Binary arithmetic over matching arithmetic dtypes.
macro_rules! binary_arith_ops {
    ($($method:ident => $op:ident),+ $(,)?) => {
        $(
            #[track_caller]
            pub fn $method(self: &Arc<Self>, rhs: &Arc<Self>) -> Result<Arc<Self>> {
                let dtype = Self::binary_operand_dtype(self, rhs, BinaryOp::$op)?;
                ensure!(
                    !dtype.is_bool() && !dtype.is_handle(),
                    NonArithmeticOperandSnafu { op: BinaryOp::$op, dtype }
                );
                Ok(Self::new(ExprKind::Binary(BinaryOp::$op, self.clone(), rhs.clone()), dtype))
            }
        )+
    };
}

/// Division-like operations, additionally rejecting a literal-zero divisor.
macro_rules! division_ops {
    ($($method:ident => $op:ident),+ $(,)?) => {
        $(
            #[track_caller]
            pub fn $method(self: &Arc<Self>, rhs: &Arc<Self>) -> Result<Arc<Self>> {
                ensure!(!rhs.is_const_zero(), DivisionByZeroSnafu { op: BinaryOp::$op });
                let dtype = Self::binary_operand_dtype(self, rhs, BinaryOp::$op)?;
                ensure!(
                    !dtype.is_bool() && !dtype.is_handle(),
                    NonArithmeticOperandSnafu { op: BinaryOp::$op, dtype }
                );
                Ok(Self::new(ExprKind::Binary(BinaryOp::$op, self.clone(), rhs.clone()), dtype))
            }
        )+
    };
}

/// Comparisons: operands share a dtype, result is bool with the operand
/// lane count.
macro_rules! cmp_ops {
    ($($method:ident => $op:ident),+ $(,)?) => {
        $(
            #[track_caller]
            pub fn $method(self: &Arc<Self>, rhs: &Arc<Self>) -> Result<Arc<Self>> {
                let dtype = Self::binary_operand_dtype(self, rhs, BinaryOp::$op)?;
                ensure!(!dtype.is_handle(), NonArithmeticOperandSnafu { op: BinaryOp::$op, dtype });
                let result = DType::BOOL.with_lanes(dtype.lanes());
                Ok(Self::new(ExprKind::Binary(BinaryOp::$op, self.clone(), rhs.clone()), result))
            }
        )+
    };
}

/// Logical connectives over bools.
macro_rules! logical_ops {
    ($($method:ident => $op:ident),+ $(,)?) => {
        $(
            #[track_caller]
            pub fn $method(self: &Arc<Self>, rhs: &Arc<Self>) -> Result<Arc<Self>> {
                let dtype = Self::binary_operand_dtype(self, rhs, BinaryOp::$op)?;
                ensure!(dtype.is_bool(), NonBooleanOperandSnafu { op: BinaryOp::$op, dtype });
                Ok(Self::new(ExprKind::Binary(BinaryOp::$op, self.clone(), rhs.clone()), dtype))
            }
        )+
    };
}

impl Expr {
    fn binary_operand_dtype(lhs: &Arc<Self>, rhs: &Arc<Self>, op: BinaryOp) -> Result<DType> {
        let dtype = lhs.dtype();
        ensure!(dtype == rhs.dtype(), DTypeMismatchSnafu { op, lhs: dtype, rhs: rhs.dtype() });
        Ok(dtype)
    }

    // ========================================================================
    // Literals
    // ========================================================================

    pub fn int(value: i64, dtype: DType) -> Result<ExprRef> {
        ensure!(dtype.is_scalar() && dtype.is_int(), LiteralDTypeMismatchSnafu { kind: "int", dtype });
        Ok(Self::new(ExprKind::IntImm(value), dtype))
    }

    /// Unsigned literal; `bool` constants are unsigned literals of dtype
    /// `bool` with value 0 or 1.
    pub fn uint(value: u64, dtype: DType) -> Result<ExprRef> {
        ensure!(
            dtype.is_scalar() && (dtype.is_uint() || dtype.is_bool()),
            LiteralDTypeMismatchSnafu { kind: "uint", dtype }
        );
        Ok(Self::new(ExprKind::UIntImm(value), dtype))
    }

    pub fn float(value: f64, dtype: DType) -> Result<ExprRef> {
        ensure!(dtype.is_scalar() && dtype.is_float(), LiteralDTypeMismatchSnafu { kind: "float", dtype });
        Ok(Self::new(ExprKind::FloatImm(value), dtype))
    }

    /// String literals carry the opaque handle dtype.
    pub fn string(value: impl Into<String>) -> ExprRef {
        Self::new(ExprKind::StringImm(value.into()), DType::HANDLE)
    }

    pub fn const_true() -> ExprRef {
        Self::new(ExprKind::UIntImm(1), DType::BOOL)
    }

    pub fn const_false() -> ExprRef {
        Self::new(ExprKind::UIntImm(0), DType::BOOL)
    }

    /// Literal from an already-folded constant. The value variant is
    /// expected to agree with the dtype's element kind; vector dtypes
    /// produce a broadcast of the scalar literal, preserving lane count.
    pub(crate) fn from_const(value: ConstValue, dtype: DType) -> ExprRef {
        if dtype.is_vector() {
            let scalar = Self::from_const(value, dtype.with_lanes(1));
            return Self::new(ExprKind::Broadcast { value: scalar, lanes: dtype.lanes() }, dtype);
        }
        match value {
            ConstValue::Int(v) => Self::new(ExprKind::IntImm(v), dtype),
            ConstValue::UInt(v) => Self::new(ExprKind::UIntImm(v), dtype),
            ConstValue::Float(v) => Self::new(ExprKind::FloatImm(v), dtype),
        }
    }

    /// Zero of any dtype, lane-preserving.
    pub fn zero(dtype: DType) -> ExprRef {
        Self::from_const(ConstValue::zero(dtype), dtype)
    }

    /// One of any dtype, lane-preserving like [`Expr::zero`].
    pub fn one(dtype: DType) -> ExprRef {
        Self::from_const(ConstValue::one(dtype), dtype)
    }

    // ========================================================================
    // Binary operations
    // ========================================================================

    binary_arith_ops! {
        add => Add,
        sub => Sub,
        mul => Mul,
        min => Min,
        max => Max,
    }

    division_ops! {
        div => Div,
        rem => Mod,
        floor_div => FloorDiv,
        floor_mod => FloorMod,
    }

    cmp_ops! {
        eq => Eq,
        ne => Ne,
        lt => Lt,
        le => Le,
        gt => Gt,
        ge => Ge,
    }

    logical_ops! {
        and => And,
        or => Or,
    }

    // ========================================================================
    // Unary and structural operations
    // ========================================================================

    #[track_caller]
    pub fn not(self: &Arc<Self>) -> Result<Arc<Self>> {
        let dtype = self.dtype();
        ensure!(dtype.is_bool(), NotRequiresBoolSnafu { dtype });
        Ok(Self::new(ExprKind::Not { value: self.clone() }, dtype))
    }

    /// Convert to `dtype`. Lane counts must agree; handles are opaque and
    /// cannot be cast either way.
    #[track_caller]
    pub fn cast(self: &Arc<Self>, dtype: DType) -> Result<Arc<Self>> {
        let from = self.dtype();
        ensure!(
            from.lanes() == dtype.lanes() && !from.is_handle() && !dtype.is_handle(),
            InvalidCastSnafu { from, to: dtype }
        );
        Ok(Self::new(ExprKind::Cast { value: self.clone() }, dtype))
    }

    /// `self ? on_true : on_false`, lane-wise. The receiver is the
    /// condition and must be bool with the branch lane count.
    #[track_caller]
    pub fn select(self: &Arc<Self>, on_true: &Arc<Self>, on_false: &Arc<Self>) -> Result<Arc<Self>> {
        let dtype = on_true.dtype();
        ensure!(
            dtype == on_false.dtype(),
            SelectBranchMismatchSnafu { on_true: dtype, on_false: on_false.dtype() }
        );
        let expected = DType::BOOL.with_lanes(dtype.lanes());
        ensure!(
            self.dtype() == expected,
            SelectConditionMismatchSnafu { expected, actual: self.dtype() }
        );
        Ok(Self::new(
            ExprKind::Select { cond: self.clone(), on_true: on_true.clone(), on_false: on_false.clone() },
            dtype,
        ))
    }

    /// Predicated load of `dtype` through `buffer` (which must be a handle
    /// variable). Index lanes and predicate lanes follow the result dtype.
    pub fn load(buffer: &Var, index: &ExprRef, predicate: &ExprRef, dtype: DType) -> Result<ExprRef> {
        ensure!(
            buffer.dtype().is_handle(),
            LoadBufferNotHandleSnafu { name: buffer.name().to_owned(), dtype: buffer.dtype() }
        );
        let index_dtype = index.dtype();
        ensure!(
            (index_dtype.is_int() || index_dtype.is_uint()) && index_dtype.lanes() == dtype.lanes(),
            LoadIndexMismatchSnafu { index: index_dtype, expected: dtype.lanes() }
        );
        let expected = DType::BOOL.with_lanes(dtype.lanes());
        ensure!(
            predicate.dtype() == expected,
            LoadPredicateMismatchSnafu { expected, actual: predicate.dtype() }
        );
        Ok(Self::new(
            ExprKind::Load { buffer: buffer.clone(), index: index.clone(), predicate: predicate.clone() },
            dtype,
        ))
    }

    /// `[base, base+stride, ..]` over `lanes` lanes.
    pub fn ramp(base: &ExprRef, stride: &ExprRef, lanes: u16) -> Result<ExprRef> {
        let dtype = base.dtype();
        ensure!(
            dtype == stride.dtype() && dtype.is_scalar() && (dtype.is_int() || dtype.is_uint()),
            RampOperandMismatchSnafu { base: dtype, stride: stride.dtype() }
        );
        ensure!(lanes >= 2, InvalidLaneCountSnafu { lanes });
        Ok(Self::new(
            ExprKind::Ramp { base: base.clone(), stride: stride.clone(), lanes },
            dtype.with_lanes(lanes),
        ))
    }

    /// Scalar value replicated across `lanes` lanes.
    pub fn broadcast(value: &ExprRef, lanes: u16) -> Result<ExprRef> {
        let dtype = value.dtype();
        ensure!(dtype.is_scalar(), BroadcastNotScalarSnafu { dtype });
        ensure!(lanes >= 2, InvalidLaneCountSnafu { lanes });
        Ok(Self::new(ExprKind::Broadcast { value: value.clone(), lanes }, dtype.with_lanes(lanes)))
    }

    /// Lane shuffle: result lane `i` selects the lane `indices[i]` from the
    /// concatenation of `vectors`.
    pub fn shuffle(vectors: Vec<ExprRef>, indices: Vec<ExprRef>) -> Result<ExprRef> {
        ensure!(!vectors.is_empty(), ShuffleEmptySnafu);
        let element = vectors[0].dtype().scalar();
        for vector in &vectors[1..] {
            ensure!(
                vector.dtype().scalar() == element,
                ShuffleElementMismatchSnafu { expected: element, found: vector.dtype().scalar() }
            );
        }
        for index in &indices {
            let dtype = index.dtype();
            ensure!(
                dtype.is_scalar() && (dtype.is_int() || dtype.is_uint()),
                ShuffleIndexMismatchSnafu { dtype }
            );
        }
        let dtype = DType::Scalar(element).with_lanes(indices.len() as u16);
        Ok(Self::new(ExprKind::Shuffle { vectors, indices }, dtype))
    }

    /// Fully general call node. `value_index` selects the producing
    /// operation's result slot when `func` is present.
    pub fn call(
        name: impl Into<String>,
        args: impl IntoIterator<Item = ExprRef>,
        call_type: CallType,
        dtype: DType,
        func: Option<Arc<Operation>>,
        value_index: usize,
    ) -> Result<ExprRef> {
        if let Some(op) = &func {
            ensure!(
                value_index < op.num_outputs(),
                ValueIndexOutOfRangeSnafu { value_index, outputs: op.num_outputs() }
            );
        }
        let args: SmallVec<[ExprRef; 4]> = args.into_iter().collect();
        Ok(Self::new(ExprKind::Call { name: name.into(), args, call_type, func, value_index }, dtype))
    }

    /// Pure-intrinsic call with no producing operation.
    pub fn intrinsic(
        name: impl Into<String>,
        args: impl IntoIterator<Item = ExprRef>,
        dtype: DType,
    ) -> ExprRef {
        let args: SmallVec<[ExprRef; 4]> = args.into_iter().collect();
        Self::new(
            ExprKind::Call { name: name.into(), args, call_type: CallType::PureIntrinsic, func: None, value_index: 0 },
            dtype,
        )
    }

    /// `let var = value in body`.
    pub fn let_in(var: &Var, value: &ExprRef, body: &ExprRef) -> Result<ExprRef> {
        ensure!(
            var.dtype() == value.dtype(),
            LetValueMismatchSnafu { name: var.name().to_owned(), var: var.dtype(), value: value.dtype() }
        );
        Ok(Self::new(
            ExprKind::Let { var: var.clone(), value: value.clone(), body: body.clone() },
            body.dtype(),
        ))
    }

    /// Reduction of `source` with `combiner` over `axis`, guarded by
    /// `condition`, selecting result slot `value_index`.
    pub fn reduce(
        combiner: Arc<Combiner>,
        source: Vec<ExprRef>,
        axis: Vec<Var>,
        condition: &ExprRef,
        value_index: usize,
    ) -> Result<ExprRef> {
        ensure!(
            source.len() == combiner.arity(),
            ReduceSourceArityMismatchSnafu { source: source.len(), expected: combiner.arity() }
        );
        ensure!(
            value_index < combiner.arity(),
            ValueIndexOutOfRangeSnafu { value_index, outputs: combiner.arity() }
        );
        ensure!(
            condition.dtype() == DType::BOOL,
            ReduceConditionNotBoolSnafu { dtype: condition.dtype() }
        );
        let dtype = combiner.result()[value_index].dtype();
        Ok(Self::new(
            ExprKind::Reduce { combiner, source, axis, condition: condition.clone(), value_index },
            dtype,
        ))
    }
}

// ============================================================================
// Stock combiners
// ============================================================================

impl Combiner {
    /// `acc + value`, starting from zero.
    pub fn sum(dtype: DType) -> Result<Self> {
        let acc = Var::new("acc", dtype);
        let value = Var::new("v", dtype);
        let result = acc.expr().add(&value.expr())?;
        Self::new(vec![acc], vec![value], vec![result], vec![Expr::zero(dtype)])
    }

    /// `max(acc, value)`, starting from the dtype's minimum.
    pub fn max(dtype: DType) -> Result<Self> {
        let acc = Var::new("acc", dtype);
        let value = Var::new("v", dtype);
        let result = acc.expr().max(&value.expr())?;
        let identity = Expr::from_const(ConstValue::min_of(dtype), dtype);
        Self::new(vec![acc], vec![value], vec![result], vec![identity])
    }

    /// `min(acc, value)`, starting from the dtype's maximum.
    pub fn min(dtype: DType) -> Result<Self> {
        let acc = Var::new("acc", dtype);
        let value = Var::new("v", dtype);
        let result = acc.expr().min(&value.expr())?;
        let identity = Expr::from_const(ConstValue::max_of(dtype), dtype);
        Self::new(vec![acc], vec![value], vec![result], vec![identity])
    }
}

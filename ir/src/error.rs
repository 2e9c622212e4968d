use snafu::Snafu;
use tessel_dtype::{DType, ScalarType};

use crate::types::BinaryOp;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Operand dtypes of a binary operation disagree.
    #[snafu(display("dtype mismatch for {op}: {lhs} vs {rhs}"))]
    DTypeMismatch { op: BinaryOp, lhs: DType, rhs: DType },

    /// Arithmetic on a non-arithmetic element type (bool, handle).
    #[snafu(display("{op} requires an arithmetic dtype, got {dtype}"))]
    NonArithmeticOperand { op: BinaryOp, dtype: DType },

    /// Logical operation on a non-boolean dtype.
    #[snafu(display("{op} requires bool operands, got {dtype}"))]
    NonBooleanOperand { op: BinaryOp, dtype: DType },

    /// Logical not on a non-boolean dtype.
    #[snafu(display("logical not requires a bool operand, got {dtype}"))]
    NotRequiresBool { dtype: DType },

    /// Literal constructed with a dtype outside its kind.
    #[snafu(display("{kind} literal cannot carry dtype {dtype}"))]
    LiteralDTypeMismatch { kind: &'static str, dtype: DType },

    /// Division or remainder with a literal zero divisor.
    #[snafu(display("{op} by a zero constant"))]
    DivisionByZero { op: BinaryOp },

    /// Cast with mismatched lane counts or a handle endpoint.
    #[snafu(display("invalid cast from {from} to {to}"))]
    InvalidCast { from: DType, to: DType },

    /// Select branches with different dtypes.
    #[snafu(display("select branches disagree: {on_true} vs {on_false}"))]
    SelectBranchMismatch { on_true: DType, on_false: DType },

    /// Select condition that is not a matching-width bool.
    #[snafu(display("select condition must be {expected}, got {actual}"))]
    SelectConditionMismatch { expected: DType, actual: DType },

    /// Load through a buffer variable that is not a handle.
    #[snafu(display("load buffer `{name}` must be a handle, got {dtype}"))]
    LoadBufferNotHandle { name: String, dtype: DType },

    /// Load index with the wrong kind or lane count.
    #[snafu(display("load index must be an integer with {expected} lanes, got {index}"))]
    LoadIndexMismatch { index: DType, expected: u16 },

    /// Load predicate that is not a matching-width bool.
    #[snafu(display("load predicate must be {expected}, got {actual}"))]
    LoadPredicateMismatch { expected: DType, actual: DType },

    /// Ramp base/stride that are not matching scalar integers.
    #[snafu(display("ramp requires matching scalar integer base and stride, got {base} and {stride}"))]
    RampOperandMismatch { base: DType, stride: DType },

    /// Vector constructor with a lane count below two.
    #[snafu(display("vector lane count must be at least 2, got {lanes}"))]
    InvalidLaneCount { lanes: u16 },

    /// Broadcast of something that is already a vector.
    #[snafu(display("broadcast value must be scalar, got {dtype}"))]
    BroadcastNotScalar { dtype: DType },

    /// Shuffle with no input vectors.
    #[snafu(display("shuffle requires at least one input vector"))]
    ShuffleEmpty,

    /// Shuffle over vectors with differing element kinds.
    #[snafu(display("shuffle element kinds disagree: {expected} vs {found}"))]
    ShuffleElementMismatch { expected: ScalarType, found: ScalarType },

    /// Shuffle index that is not a scalar integer.
    #[snafu(display("shuffle index must be a scalar integer, got {dtype}"))]
    ShuffleIndexMismatch { dtype: DType },

    /// Let-binding whose variable and value dtypes disagree.
    #[snafu(display("let value dtype {value} does not match variable `{name}`: {var}"))]
    LetValueMismatch { name: String, var: DType, value: DType },

    /// Combiner whose operand/result/identity sequences have uneven lengths.
    #[snafu(display(
        "combiner arity mismatch: lhs {lhs}, rhs {rhs}, result {result}, identity {identity}"
    ))]
    CombinerArityMismatch { lhs: usize, rhs: usize, result: usize, identity: usize },

    /// Reduction source count that disagrees with its combiner arity.
    #[snafu(display("reduction has {source} sources, combiner expects {expected}"))]
    ReduceSourceArityMismatch {
        #[snafu(source(false))]
        source: usize,
        expected: usize,
    },

    /// Reduction condition that is not a scalar bool.
    #[snafu(display("reduction condition must be bool, got {dtype}"))]
    ReduceConditionNotBool { dtype: DType },

    /// Value index outside the available result slots.
    #[snafu(display("value index {value_index} out of range: {outputs} output slot(s)"))]
    ValueIndexOutOfRange { value_index: usize, outputs: usize },

    /// Compute operation declared without any body expression.
    #[snafu(display("compute op `{name}` needs at least one body expression"))]
    EmptyComputeBody { name: String },
}

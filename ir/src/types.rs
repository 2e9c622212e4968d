//! Operator enumerations and constant values.

use std::fmt;

use tessel_dtype::{DType, ScalarType};

/// Binary operators carried by [`ExprKind::Binary`](crate::ExprKind::Binary).
///
/// Comparisons produce `bool` (lane count preserved); `And`/`Or` operate on
/// `bool`; everything else is closed over its operand dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::AsRefStr, strum::EnumIter)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    FloorDiv,
    FloorMod,
    Min,
    Max,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub const fn is_comparison(self) -> bool {
        matches!(self, Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }

    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    pub const fn is_arithmetic(self) -> bool {
        !self.is_comparison() && !self.is_logical()
    }
}

/// Call classification. Two calls only match when their classifications are
/// equal, even though the callee itself is never compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::AsRefStr)]
pub enum CallType {
    Extern,
    PureExtern,
    Halide,
    Intrinsic,
    PureIntrinsic,
}

/// A folded constant. The variant mirrors the literal node kind: `Int` for
/// signed literals, `UInt` for unsigned and bool literals, `Float` for float
/// literals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstValue {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl ConstValue {
    /// Additive identity for the dtype's element kind.
    pub const fn zero(dtype: DType) -> Self {
        match dtype.scalar() {
            s if s.is_float() => Self::Float(0.0),
            s if s.is_int() => Self::Int(0),
            _ => Self::UInt(0),
        }
    }

    /// Multiplicative identity for the dtype's element kind.
    pub const fn one(dtype: DType) -> Self {
        match dtype.scalar() {
            s if s.is_float() => Self::Float(1.0),
            s if s.is_int() => Self::Int(1),
            _ => Self::UInt(1),
        }
    }

    /// Smallest representable value of the dtype, used as the identity of a
    /// `max` reduction.
    pub fn min_of(dtype: DType) -> Self {
        use ScalarType as S;
        match dtype.scalar() {
            S::Int8 => Self::Int(i8::MIN as i64),
            S::Int16 => Self::Int(i16::MIN as i64),
            S::Int32 => Self::Int(i32::MIN as i64),
            S::Int64 => Self::Int(i64::MIN),
            S::Float16 | S::Float32 | S::Float64 => Self::Float(f64::NEG_INFINITY),
            _ => Self::UInt(0),
        }
    }

    /// Largest representable value of the dtype, used as the identity of a
    /// `min` reduction.
    pub fn max_of(dtype: DType) -> Self {
        use ScalarType as S;
        match dtype.scalar() {
            S::Int8 => Self::Int(i8::MAX as i64),
            S::Int16 => Self::Int(i16::MAX as i64),
            S::Int32 => Self::Int(i32::MAX as i64),
            S::Int64 => Self::Int(i64::MAX),
            S::UInt8 => Self::UInt(u8::MAX as u64),
            S::UInt16 => Self::UInt(u16::MAX as u64),
            S::UInt32 => Self::UInt(u32::MAX as u64),
            S::UInt64 => Self::UInt(u64::MAX),
            S::Float16 | S::Float32 | S::Float64 => Self::Float(f64::INFINITY),
            S::Bool => Self::UInt(1),
            S::Handle => Self::UInt(u64::MAX),
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Self::Int(v) => v == 0,
            Self::UInt(v) => v == 0,
            Self::Float(v) => v == 0.0,
        }
    }

    pub fn is_one(self) -> bool {
        match self {
            Self::Int(v) => v == 1,
            Self::UInt(v) => v == 1,
            Self::Float(v) => v == 1.0,
        }
    }

    /// Convert to a scalar dtype with C conversion semantics (modular for
    /// narrowing integer casts, truncation for float-to-int). Vector and
    /// half-precision targets are not folded and yield `None`.
    pub fn cast(self, dtype: DType) -> Option<Self> {
        use ScalarType as S;
        if !dtype.is_scalar() {
            return None;
        }
        Some(match dtype.scalar() {
            S::Bool => Self::UInt(u64::from(!self.is_zero())),
            S::Int8 => Self::Int(self.wide_int() as i8 as i64),
            S::Int16 => Self::Int(self.wide_int() as i16 as i64),
            S::Int32 => Self::Int(self.wide_int() as i32 as i64),
            S::Int64 => Self::Int(self.wide_int()),
            S::UInt8 => Self::UInt(self.wide_int() as u8 as u64),
            S::UInt16 => Self::UInt(self.wide_int() as u16 as u64),
            S::UInt32 => Self::UInt(self.wide_int() as u32 as u64),
            S::UInt64 => Self::UInt(self.wide_int() as u64),
            S::Float32 => Self::Float(self.wide_float() as f32 as f64),
            S::Float64 => Self::Float(self.wide_float()),
            S::Float16 | S::Handle => return None,
        })
    }

    fn wide_int(self) -> i64 {
        match self {
            Self::Int(v) => v,
            Self::UInt(v) => v as i64,
            Self::Float(v) => v as i64,
        }
    }

    fn wide_float(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::UInt(v) => v as f64,
            Self::Float(v) => v,
        }
    }
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}u"),
            Self::Float(v) => write!(f, "{v}f"),
        }
    }
}

//! Element types for tensor expressions.
//!
//! Every expression node carries a [`DType`]: a scalar element kind plus an
//! optional vector lane count. Structural comparison of expressions starts
//! with exact dtype equality (same scalar kind, same lane count), so `DType`
//! derives `Eq`/`Hash` and nothing here is ever compared approximately.

use std::fmt;

#[cfg(any(test, feature = "proptest"))]
pub mod proptest_gen;


/// Scalar element kinds.
///
/// `Handle` is the opaque pointer type carried by buffer variables; it never
/// participates in arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(strum::Display, strum::AsRefStr, strum::EnumCount, strum::EnumIter)]
pub enum ScalarType {
    #[strum(serialize = "bool")]
    Bool,
    #[strum(serialize = "i8")]
    Int8,
    #[strum(serialize = "i16")]
    Int16,
    #[strum(serialize = "i32")]
    Int32,
    #[strum(serialize = "i64")]
    Int64,
    #[strum(serialize = "u8")]
    UInt8,
    #[strum(serialize = "u16")]
    UInt16,
    #[strum(serialize = "u32")]
    UInt32,
    #[strum(serialize = "u64")]
    UInt64,
    #[strum(serialize = "f16")]
    Float16,
    #[strum(serialize = "f32")]
    Float32,
    #[strum(serialize = "f64")]
    Float64,
    #[strum(serialize = "handle")]
    Handle,
}

impl ScalarType {
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    pub const fn is_int(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
    }

    pub const fn is_uint(self) -> bool {
        matches!(self, Self::UInt8 | Self::UInt16 | Self::UInt32 | Self::UInt64)
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float16 | Self::Float32 | Self::Float64)
    }

    pub const fn is_handle(self) -> bool {
        matches!(self, Self::Handle)
    }

    /// Storage width in bits.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => 8,
            Self::Int16 | Self::UInt16 | Self::Float16 => 16,
            Self::Int32 | Self::UInt32 | Self::Float32 => 32,
            Self::Int64 | Self::UInt64 | Self::Float64 | Self::Handle => 64,
        }
    }
}

/// Element type of an expression: a scalar kind, possibly vectorized.
///
/// Vector lanes are part of the type: `i32` and `i32x8` are distinct and
/// never compare equal. `Vector` always has `lanes >= 2`; single-lane types
/// are represented as `Scalar` so that equality stays canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Scalar(ScalarType),
    Vector { scalar: ScalarType, lanes: u16 },
}

impl DType {
    pub const BOOL: Self = Self::Scalar(ScalarType::Bool);
    pub const INT8: Self = Self::Scalar(ScalarType::Int8);
    pub const INT16: Self = Self::Scalar(ScalarType::Int16);
    pub const INT32: Self = Self::Scalar(ScalarType::Int32);
    pub const INT64: Self = Self::Scalar(ScalarType::Int64);
    pub const UINT8: Self = Self::Scalar(ScalarType::UInt8);
    pub const UINT16: Self = Self::Scalar(ScalarType::UInt16);
    pub const UINT32: Self = Self::Scalar(ScalarType::UInt32);
    pub const UINT64: Self = Self::Scalar(ScalarType::UInt64);
    pub const FLOAT16: Self = Self::Scalar(ScalarType::Float16);
    pub const FLOAT32: Self = Self::Scalar(ScalarType::Float32);
    pub const FLOAT64: Self = Self::Scalar(ScalarType::Float64);
    pub const HANDLE: Self = Self::Scalar(ScalarType::Handle);

    /// The scalar element kind, ignoring lanes.
    pub const fn scalar(self) -> ScalarType {
        match self {
            Self::Scalar(scalar) | Self::Vector { scalar, .. } => scalar,
        }
    }

    /// Lane count; `1` for scalars.
    pub const fn lanes(self) -> u16 {
        match self {
            Self::Scalar(_) => 1,
            Self::Vector { lanes, .. } => lanes,
        }
    }

    /// Same scalar kind with a new lane count. A count of one collapses back
    /// to a scalar type.
    pub const fn with_lanes(self, lanes: u16) -> Self {
        let scalar = self.scalar();
        if lanes <= 1 { Self::Scalar(scalar) } else { Self::Vector { scalar, lanes } }
    }

    pub const fn is_scalar(self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    pub const fn is_vector(self) -> bool {
        matches!(self, Self::Vector { .. })
    }

    pub const fn is_bool(self) -> bool {
        self.scalar().is_bool()
    }

    pub const fn is_int(self) -> bool {
        self.scalar().is_int()
    }

    pub const fn is_uint(self) -> bool {
        self.scalar().is_uint()
    }

    pub const fn is_float(self) -> bool {
        self.scalar().is_float()
    }

    pub const fn is_handle(self) -> bool {
        self.scalar().is_handle()
    }

    /// Total storage width in bits across all lanes.
    pub const fn bits(self) -> u32 {
        self.scalar().bits() * self.lanes() as u32
    }
}

impl From<ScalarType> for DType {
    fn from(scalar: ScalarType) -> Self {
        Self::Scalar(scalar)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => write!(f, "{scalar}"),
            Self::Vector { scalar, lanes } => write!(f, "{scalar}x{lanes}"),
        }
    }
}

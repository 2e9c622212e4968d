use proptest::prelude::*;

use crate::*;

#[rustfmt::skip]
impl DType {
    /// Scalar dtypes that participate in arithmetic (no `bool`, no `handle`).
    pub fn arithmetic_generator() -> impl Strategy<Value = Self> {
        prop_oneof![
            Just(DType::INT8), Just(DType::INT16), Just(DType::INT32), Just(DType::INT64),
            Just(DType::UINT8), Just(DType::UINT16), Just(DType::UINT32), Just(DType::UINT64),
            Just(DType::FLOAT32), Just(DType::FLOAT64),
        ]
    }

    pub fn int_generator() -> impl Strategy<Value = Self> {
        prop_oneof![
            Just(DType::INT8), Just(DType::INT16), Just(DType::INT32), Just(DType::INT64),
            Just(DType::UINT8), Just(DType::UINT16), Just(DType::UINT32), Just(DType::UINT64),
        ]
    }

    pub fn float_generator() -> impl Strategy<Value = Self> {
        prop_oneof![Just(DType::FLOAT16), Just(DType::FLOAT32), Just(DType::FLOAT64)]
    }

    /// Any arithmetic dtype, scalar or vectorized with a small lane count.
    pub fn lanes_generator() -> impl Strategy<Value = Self> {
        (Self::arithmetic_generator(), prop_oneof![Just(1u16), Just(2), Just(4), Just(8)])
            .prop_map(|(dtype, lanes)| dtype.with_lanes(lanes))
    }
}

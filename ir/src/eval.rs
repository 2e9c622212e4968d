//! Constant evaluation for folding.
//!
//! Operands of one operation always share a dtype, so mixed-variant pairs
//! return `None` rather than guessing a promotion. Integer arithmetic wraps;
//! floor division/modulo round toward negative infinity; division by a zero
//! constant is left unfolded.

use crate::types::{BinaryOp, ConstValue};

/// Evaluate a binary operation over two constants. Comparisons and logical
/// connectives yield `UInt(0)`/`UInt(1)` (the bool literal encoding).
pub fn eval_binary_op(op: BinaryOp, a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    match op {
        BinaryOp::Add => eval_add(a, b),
        BinaryOp::Sub => eval_sub(a, b),
        BinaryOp::Mul => eval_mul(a, b),
        BinaryOp::Div => eval_div(a, b),
        BinaryOp::Mod => eval_mod(a, b),
        BinaryOp::FloorDiv => eval_floor_div(a, b),
        BinaryOp::FloorMod => eval_floor_mod(a, b),
        BinaryOp::Min => eval_min(a, b),
        BinaryOp::Max => eval_max(a, b),
        BinaryOp::Eq => eval_cmp(a, b, |ord| ord == std::cmp::Ordering::Equal),
        BinaryOp::Ne => eval_cmp(a, b, |ord| ord != std::cmp::Ordering::Equal),
        BinaryOp::Lt => eval_cmp(a, b, |ord| ord == std::cmp::Ordering::Less),
        BinaryOp::Le => eval_cmp(a, b, |ord| ord != std::cmp::Ordering::Greater),
        BinaryOp::Gt => eval_cmp(a, b, |ord| ord == std::cmp::Ordering::Greater),
        BinaryOp::Ge => eval_cmp(a, b, |ord| ord != std::cmp::Ordering::Less),
        BinaryOp::And => eval_logical(a, b, |x, y| x && y),
        BinaryOp::Or => eval_logical(a, b, |x, y| x || y),
    }
}

/// Logical negation of a bool constant.
pub fn eval_not(a: ConstValue) -> Option<ConstValue> {
    match a {
        ConstValue::UInt(v) => Some(ConstValue::UInt(u64::from(v == 0))),
        _ => None,
    }
}

#[inline]
fn eval_add(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    Some(match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) => ConstValue::Int(x.wrapping_add(y)),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => ConstValue::UInt(x.wrapping_add(y)),
        (ConstValue::Float(x), ConstValue::Float(y)) => ConstValue::Float(x + y),
        _ => return None,
    })
}

#[inline]
fn eval_sub(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    Some(match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) => ConstValue::Int(x.wrapping_sub(y)),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => ConstValue::UInt(x.wrapping_sub(y)),
        (ConstValue::Float(x), ConstValue::Float(y)) => ConstValue::Float(x - y),
        _ => return None,
    })
}

#[inline]
fn eval_mul(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    Some(match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) => ConstValue::Int(x.wrapping_mul(y)),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => ConstValue::UInt(x.wrapping_mul(y)),
        (ConstValue::Float(x), ConstValue::Float(y)) => ConstValue::Float(x * y),
        _ => return None,
    })
}

#[inline]
fn eval_div(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    Some(match (a, b) {
        (ConstValue::Int(_), ConstValue::Int(0)) => return None,
        (ConstValue::Int(x), ConstValue::Int(y)) => ConstValue::Int(x.wrapping_div(y)),
        (ConstValue::UInt(_), ConstValue::UInt(0)) => return None,
        (ConstValue::UInt(x), ConstValue::UInt(y)) => ConstValue::UInt(x / y),
        (ConstValue::Float(x), ConstValue::Float(y)) => ConstValue::Float(x / y),
        _ => return None,
    })
}

#[inline]
fn eval_mod(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    Some(match (a, b) {
        (ConstValue::Int(_), ConstValue::Int(0)) => return None,
        (ConstValue::Int(x), ConstValue::Int(y)) => ConstValue::Int(x.wrapping_rem(y)),
        (ConstValue::UInt(_), ConstValue::UInt(0)) => return None,
        (ConstValue::UInt(x), ConstValue::UInt(y)) => ConstValue::UInt(x % y),
        (ConstValue::Float(x), ConstValue::Float(y)) => ConstValue::Float(x % y),
        _ => return None,
    })
}

#[inline]
fn eval_floor_div(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    Some(match (a, b) {
        (ConstValue::Int(_), ConstValue::Int(0)) => return None,
        (ConstValue::Int(x), ConstValue::Int(y)) => ConstValue::Int(floor_div_i64(x, y)),
        (ConstValue::UInt(_), ConstValue::UInt(0)) => return None,
        (ConstValue::UInt(x), ConstValue::UInt(y)) => ConstValue::UInt(x / y),
        (ConstValue::Float(x), ConstValue::Float(y)) => ConstValue::Float((x / y).floor()),
        _ => return None,
    })
}

#[inline]
fn eval_floor_mod(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    Some(match (a, b) {
        (ConstValue::Int(_), ConstValue::Int(0)) => return None,
        (ConstValue::Int(x), ConstValue::Int(y)) => ConstValue::Int(floor_mod_i64(x, y)),
        (ConstValue::UInt(_), ConstValue::UInt(0)) => return None,
        (ConstValue::UInt(x), ConstValue::UInt(y)) => ConstValue::UInt(x % y),
        (ConstValue::Float(x), ConstValue::Float(y)) => ConstValue::Float(x - (x / y).floor() * y),
        _ => return None,
    })
}

#[inline]
fn eval_min(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    Some(match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) => ConstValue::Int(x.min(y)),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => ConstValue::UInt(x.min(y)),
        (ConstValue::Float(x), ConstValue::Float(y)) => ConstValue::Float(x.min(y)),
        _ => return None,
    })
}

#[inline]
fn eval_max(a: ConstValue, b: ConstValue) -> Option<ConstValue> {
    Some(match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) => ConstValue::Int(x.max(y)),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => ConstValue::UInt(x.max(y)),
        (ConstValue::Float(x), ConstValue::Float(y)) => ConstValue::Float(x.max(y)),
        _ => return None,
    })
}

#[inline]
fn eval_cmp(a: ConstValue, b: ConstValue, accept: impl Fn(std::cmp::Ordering) -> bool) -> Option<ConstValue> {
    let ord = match (a, b) {
        (ConstValue::Int(x), ConstValue::Int(y)) => x.cmp(&y),
        (ConstValue::UInt(x), ConstValue::UInt(y)) => x.cmp(&y),
        // Incomparable floats (NaN) are left unfolded.
        (ConstValue::Float(x), ConstValue::Float(y)) => x.partial_cmp(&y)?,
        _ => return None,
    };
    Some(ConstValue::UInt(u64::from(accept(ord))))
}

#[inline]
fn eval_logical(a: ConstValue, b: ConstValue, combine: impl Fn(bool, bool) -> bool) -> Option<ConstValue> {
    match (a, b) {
        (ConstValue::UInt(x), ConstValue::UInt(y)) => {
            Some(ConstValue::UInt(u64::from(combine(x != 0, y != 0))))
        }
        _ => None,
    }
}

/// Division rounding toward negative infinity.
#[inline]
fn floor_div_i64(x: i64, y: i64) -> i64 {
    let q = x.wrapping_div(y);
    let r = x.wrapping_rem(y);
    if r != 0 && (r < 0) != (y < 0) { q.wrapping_sub(1) } else { q }
}

/// Remainder with the sign of the divisor.
#[inline]
fn floor_mod_i64(x: i64, y: i64) -> i64 {
    let r = x.wrapping_rem(y);
    if r != 0 && (r < 0) != (y < 0) { r.wrapping_add(y) } else { r }
}

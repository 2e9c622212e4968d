//! Constant-evaluation tests.

use test_case::test_case;

use crate::eval::{eval_binary_op, eval_not};
use crate::types::{BinaryOp, ConstValue};

// =============================================================================
// Arithmetic
// =============================================================================

#[test_case(BinaryOp::Add, 5, 3, 8; "add")]
#[test_case(BinaryOp::Sub, 5, 8, -3; "sub_negative")]
#[test_case(BinaryOp::Mul, -4, 6, -24; "mul_signed")]
#[test_case(BinaryOp::Div, 7, 2, 3; "div_truncates_toward_zero")]
#[test_case(BinaryOp::Div, -7, 2, -3; "div_negative_truncates_toward_zero")]
#[test_case(BinaryOp::Mod, 7, 3, 1; "mod_positive")]
#[test_case(BinaryOp::Mod, -7, 3, -1; "mod_keeps_dividend_sign")]
#[test_case(BinaryOp::FloorDiv, 7, 2, 3; "floor_div_positive")]
#[test_case(BinaryOp::FloorDiv, -7, 2, -4; "floor_div_rounds_down")]
#[test_case(BinaryOp::FloorDiv, 7, -2, -4; "floor_div_negative_divisor")]
#[test_case(BinaryOp::FloorMod, 7, 3, 1; "floor_mod_positive")]
#[test_case(BinaryOp::FloorMod, -7, 3, 2; "floor_mod_takes_divisor_sign")]
#[test_case(BinaryOp::FloorMod, 7, -3, -2; "floor_mod_negative_divisor")]
#[test_case(BinaryOp::Min, 5, -2, -2; "min")]
#[test_case(BinaryOp::Max, 5, -2, 5; "max")]
fn test_int_arithmetic(op: BinaryOp, a: i64, b: i64, expected: i64) {
    assert_eq!(eval_binary_op(op, ConstValue::Int(a), ConstValue::Int(b)), Some(ConstValue::Int(expected)));
}

#[test]
fn test_int_arithmetic_wraps() {
    let folded = eval_binary_op(BinaryOp::Add, ConstValue::Int(i64::MAX), ConstValue::Int(1));
    assert_eq!(folded, Some(ConstValue::Int(i64::MIN)));
}

#[test_case(BinaryOp::Div; "div")]
#[test_case(BinaryOp::Mod; "mod_op")]
#[test_case(BinaryOp::FloorDiv; "floor_div")]
#[test_case(BinaryOp::FloorMod; "floor_mod")]
fn test_zero_divisor_stays_unfolded(op: BinaryOp) {
    assert_eq!(eval_binary_op(op, ConstValue::Int(10), ConstValue::Int(0)), None);
    assert_eq!(eval_binary_op(op, ConstValue::UInt(10), ConstValue::UInt(0)), None);
}

#[test]
fn test_int_min_div_minus_one_wraps() {
    let folded = eval_binary_op(BinaryOp::Div, ConstValue::Int(i64::MIN), ConstValue::Int(-1));
    assert_eq!(folded, Some(ConstValue::Int(i64::MIN)));
}

#[test_case(BinaryOp::Add, 1.5, 2.25, 3.75; "add")]
#[test_case(BinaryOp::Mul, -1.5, 2.0, -3.0; "mul")]
#[test_case(BinaryOp::FloorDiv, 7.0, 2.0, 3.0; "floor_div")]
#[test_case(BinaryOp::FloorDiv, -7.0, 2.0, -4.0; "floor_div_rounds_down")]
#[test_case(BinaryOp::FloorMod, -7.0, 2.0, 1.0; "floor_mod_takes_divisor_sign")]
#[test_case(BinaryOp::Min, 1.5, -0.5, -0.5; "min")]
fn test_float_arithmetic(op: BinaryOp, a: f64, b: f64, expected: f64) {
    assert_eq!(eval_binary_op(op, ConstValue::Float(a), ConstValue::Float(b)), Some(ConstValue::Float(expected)));
}

// =============================================================================
// Comparisons and Logic
// =============================================================================

#[test_case(BinaryOp::Eq, 3, 3, 1; "eq_true")]
#[test_case(BinaryOp::Ne, 3, 3, 0; "ne_false")]
#[test_case(BinaryOp::Lt, -1, 0, 1; "lt_true")]
#[test_case(BinaryOp::Le, 0, 0, 1; "le_equal")]
#[test_case(BinaryOp::Gt, 0, 1, 0; "gt_false")]
#[test_case(BinaryOp::Ge, 1, 0, 1; "ge_true")]
fn test_int_comparisons_yield_bool_literals(op: BinaryOp, a: i64, b: i64, expected: u64) {
    assert_eq!(eval_binary_op(op, ConstValue::Int(a), ConstValue::Int(b)), Some(ConstValue::UInt(expected)));
}

#[test]
fn test_nan_comparison_stays_unfolded() {
    let nan = ConstValue::Float(f64::NAN);
    assert_eq!(eval_binary_op(BinaryOp::Lt, nan, ConstValue::Float(1.0)), None);
    assert_eq!(eval_binary_op(BinaryOp::Eq, nan, nan), None);
}

#[test_case(BinaryOp::And, 1, 1, 1; "and_true")]
#[test_case(BinaryOp::And, 1, 0, 0; "and_false")]
#[test_case(BinaryOp::Or, 0, 0, 0; "or_false")]
#[test_case(BinaryOp::Or, 0, 1, 1; "or_true")]
fn test_logical_connectives(op: BinaryOp, a: u64, b: u64, expected: u64) {
    assert_eq!(eval_binary_op(op, ConstValue::UInt(a), ConstValue::UInt(b)), Some(ConstValue::UInt(expected)));
}

#[test]
fn test_logical_on_ints_stays_unfolded() {
    assert_eq!(eval_binary_op(BinaryOp::And, ConstValue::Int(1), ConstValue::Int(1)), None);
}

#[test]
fn test_mixed_variants_stay_unfolded() {
    assert_eq!(eval_binary_op(BinaryOp::Add, ConstValue::Int(1), ConstValue::Float(1.0)), None);
    assert_eq!(eval_binary_op(BinaryOp::Add, ConstValue::UInt(1), ConstValue::Int(1)), None);
}

#[test]
fn test_not() {
    assert_eq!(eval_not(ConstValue::UInt(0)), Some(ConstValue::UInt(1)));
    assert_eq!(eval_not(ConstValue::UInt(1)), Some(ConstValue::UInt(0)));
    assert_eq!(eval_not(ConstValue::UInt(7)), Some(ConstValue::UInt(0)));
    assert_eq!(eval_not(ConstValue::Int(0)), None);
}

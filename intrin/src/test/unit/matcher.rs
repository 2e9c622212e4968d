//! Structural matching rules, kind by kind.

use std::sync::Arc;

use tessel_dtype::DType;
use tessel_ir::{CallType, Combiner, Expr, ExprRef, Operation, Var};
use test_case::test_case;

use crate::IntrinsicMatcher;
use crate::test::helpers::{input, ivar, sum_over};

fn matched(pattern: &ExprRef, candidate: &ExprRef) -> bool {
    IntrinsicMatcher::new().matches(pattern, candidate)
}

// =============================================================================
// Leaves
// =============================================================================

#[test]
fn test_literal_values_compared() {
    let five = Expr::int(5, DType::INT32).unwrap();

    assert!(matched(&five, &Expr::int(5, DType::INT32).unwrap()));
    assert!(!matched(&five, &Expr::int(6, DType::INT32).unwrap()));
}

#[test_case(DType::INT32, DType::INT64; "integer width")]
#[test_case(DType::INT32, DType::UINT32; "signedness")]
#[test_case(DType::FLOAT32, DType::FLOAT64; "float width")]
fn test_dtype_must_agree(pattern: DType, candidate: DType) {
    assert!(!matched(&Expr::zero(pattern), &Expr::zero(candidate)));
}

#[test]
fn test_kind_mismatch_rejected() {
    let var = ivar("x").expr();
    let lit = Expr::int(0, DType::INT32).unwrap();

    assert!(!matched(&var, &lit));
    assert!(!matched(&lit, &var));
}

#[test]
fn test_float_literals_compared_exactly() {
    let pattern = Expr::float(1.5, DType::FLOAT32).unwrap();

    assert!(matched(&pattern, &Expr::float(1.5, DType::FLOAT32).unwrap()));
    assert!(!matched(&pattern, &Expr::float(1.5000001, DType::FLOAT32).unwrap()));
}

#[test]
fn test_string_literals_always_match() {
    assert!(matched(&Expr::string("relu"), &Expr::string("gelu")));
}

// =============================================================================
// Variable binding
// =============================================================================

#[test]
fn test_variables_match_by_renaming() {
    assert!(matched(&ivar("x").expr(), &ivar("y").expr()));
}

#[test]
fn test_variable_binding_is_consistent() {
    let x = ivar("x").expr();
    let y = ivar("y").expr();
    let z = ivar("z").expr();
    let pattern = x.add(&x).unwrap();

    assert!(matched(&pattern, &y.add(&y).unwrap()));
    assert!(!matched(&pattern, &y.add(&z).unwrap()));
}

#[test]
fn test_distinct_pattern_vars_may_share_a_candidate() {
    // The binding map is keyed by pattern variable only, so two pattern
    // variables are free to land on the same candidate variable.
    let pattern = ivar("x").expr().add(&ivar("y").expr()).unwrap();
    let w = ivar("w").expr();

    assert!(matched(&pattern, &w.add(&w).unwrap()));
}

// =============================================================================
// Scalar compute
// =============================================================================

#[test]
fn test_binary_requires_same_op() {
    let pattern = ivar("x").expr().add(&ivar("y").expr()).unwrap();
    let candidate = ivar("p").expr().sub(&ivar("q").expr()).unwrap();

    assert!(!matched(&pattern, &candidate));
}

#[test]
fn test_operands_compared_in_order() {
    // No commutativity: x + 1 is not 1 + x.
    let one = || Expr::int(1, DType::INT32).unwrap();
    let pattern = ivar("x").expr().add(&one()).unwrap();
    let candidate = one().add(&ivar("y").expr()).unwrap();

    assert!(!matched(&pattern, &candidate));
}

#[test]
fn test_cast_gated_by_target_dtype() {
    let widen_p = ivar("x").expr().cast(DType::INT64).unwrap();
    let widen_c = ivar("y").expr().cast(DType::INT64).unwrap();
    let narrow = ivar("z").expr().cast(DType::INT16).unwrap();

    assert!(matched(&widen_p, &widen_c));
    assert!(!matched(&widen_p, &narrow));
}

#[test]
fn test_not_recurses_into_operand() {
    let a = Var::new("a", DType::BOOL);
    let b = Var::new("b", DType::BOOL);
    let negated_p = a.expr().not().unwrap();
    let negated_c = b.expr().not().unwrap();

    assert!(matched(&negated_p, &negated_c));
    assert!(!matched(&negated_p, &b.expr()));
}

#[test]
fn test_select_matches_componentwise() {
    let branch = |cond: &Var, flip: bool| {
        let lo = Expr::int(0, DType::INT32).unwrap();
        let hi = Expr::int(1, DType::INT32).unwrap();
        if flip { cond.expr().select(&hi, &lo).unwrap() } else { cond.expr().select(&lo, &hi).unwrap() }
    };
    let c = Var::new("c", DType::BOOL);
    let d = Var::new("d", DType::BOOL);

    assert!(matched(&branch(&c, false), &branch(&d, false)));
    assert!(!matched(&branch(&c, false), &branch(&d, true)));
}

// =============================================================================
// Memory
// =============================================================================

#[test]
fn test_load_buffers_go_through_binding_map() {
    let load = |buf: &Var, idx: &Var| {
        Expr::load(buf, &idx.expr(), &Expr::const_true(), DType::FLOAT32).unwrap()
    };
    let a = Var::new("a", DType::HANDLE);
    let b = Var::new("b", DType::HANDLE);
    let c = Var::new("c", DType::HANDLE);
    let x = ivar("x");
    let y = ivar("y");

    // Two loads from one pattern buffer must see one candidate buffer.
    let pattern = load(&a, &x).add(&load(&a, &x)).unwrap();
    assert!(matched(&pattern, &load(&b, &y).add(&load(&b, &y)).unwrap()));
    assert!(!matched(&pattern, &load(&b, &y).add(&load(&c, &y)).unwrap()));
}

#[test]
fn test_load_predicate_compared() {
    let a = Var::new("a", DType::HANDLE);
    let b = Var::new("b", DType::HANDLE);
    let p = Var::new("p", DType::BOOL);

    let guarded = Expr::load(&a, &ivar("x").expr(), &p.expr(), DType::FLOAT32).unwrap();
    let unguarded = Expr::load(&b, &ivar("y").expr(), &Expr::const_true(), DType::FLOAT32).unwrap();

    assert!(!matched(&guarded, &unguarded));
}

// =============================================================================
// Vectors
// =============================================================================

#[test]
fn test_ramp_compares_base_and_stride() {
    let unit = || Expr::one(DType::INT32);
    let pattern = Expr::ramp(&ivar("x").expr(), &unit(), 4).unwrap();
    let same_shape = Expr::ramp(&ivar("y").expr(), &unit(), 4).unwrap();
    let strided = Expr::ramp(&ivar("z").expr(), &Expr::int(2, DType::INT32).unwrap(), 4).unwrap();

    assert!(matched(&pattern, &same_shape));
    assert!(!matched(&pattern, &strided));
}

#[test]
fn test_broadcast_compares_value() {
    let splat = |v: f64| Expr::broadcast(&Expr::float(v, DType::FLOAT32).unwrap(), 8).unwrap();

    assert!(matched(&splat(1.0), &splat(1.0)));
    assert!(!matched(&splat(1.0), &splat(2.0)));
}

#[test]
fn test_shuffle_compares_indices_pairwise() {
    let v = Var::new("v", DType::FLOAT32.with_lanes(4));
    let w = Var::new("w", DType::FLOAT32.with_lanes(4));
    let idx = |n: i64| Expr::int(n, DType::INT32).unwrap();

    let pattern = Expr::shuffle(vec![v.expr()], vec![idx(0), idx(1)]).unwrap();
    let same = Expr::shuffle(vec![w.expr()], vec![idx(0), idx(1)]).unwrap();
    let reversed = Expr::shuffle(vec![w.expr()], vec![idx(1), idx(0)]).unwrap();

    assert!(matched(&pattern, &same));
    assert!(!matched(&pattern, &reversed));
}

// =============================================================================
// Calls
// =============================================================================

#[test]
fn test_call_callee_ignored() {
    // Different names, different producing operations. The callee is never
    // part of the comparison; only shape and arguments are.
    let pattern = input("a", 64).call([ivar("x").expr()]).unwrap();
    let candidate = input("b", 128).call([ivar("y").expr()]).unwrap();

    assert!(matched(&pattern, &candidate));
}

#[test]
fn test_call_classification_compared() {
    let pure = Expr::intrinsic("exp", [ivar("x").expr()], DType::FLOAT32);
    let produced = input("a", 16).call([ivar("y").expr()]).unwrap();

    assert!(!matched(&pure, &produced));
}

#[test]
fn test_call_arity_compared() {
    let grid = input("m", 256);
    let pattern = grid.call([ivar("x").expr()]).unwrap();
    let candidate = grid.call([ivar("y").expr(), ivar("z").expr()]).unwrap();

    assert!(!matched(&pattern, &candidate));
}

#[test]
fn test_call_value_index_compared() {
    let halves = Operation::compute(
        "halves",
        vec![],
        vec![],
        vec![Expr::float(0.0, DType::FLOAT32).unwrap(), Expr::float(1.0, DType::FLOAT32).unwrap()],
    )
    .unwrap();
    let slot = |value_index: usize, idx: &Var| {
        Expr::call("halves", [idx.expr()], CallType::Halide, DType::FLOAT32, Some(halves.clone()), value_index)
            .unwrap()
    };
    let x = ivar("x");
    let y = ivar("y");

    assert!(matched(&slot(0, &x), &slot(0, &y)));
    assert!(!matched(&slot(0, &x), &slot(1, &y)));
}

#[test]
fn test_call_leading_zero_placeholder_elided() {
    let placeholder_call = |zero: ExprRef, idx: &Var| {
        Expr::call("unit", [zero, idx.expr()], CallType::Halide, DType::FLOAT32, None, 0).unwrap()
    };
    let candidate = input("b", 64).call([ivar("y").expr()]).unwrap();

    let int_zero = placeholder_call(Expr::int(0, DType::INT32).unwrap(), &ivar("x"));
    assert!(matched(&int_zero, &candidate));

    let uint_zero = placeholder_call(Expr::uint(0, DType::UINT32).unwrap(), &ivar("x"));
    assert!(matched(&uint_zero, &candidate));
}

#[test]
fn test_call_zero_elision_is_leading_integer_only() {
    let pattern = |first: ExprRef| {
        Expr::call("unit", [first, ivar("x").expr()], CallType::Halide, DType::FLOAT32, None, 0).unwrap()
    };
    let candidate = input("b", 64).call([ivar("y").expr()]).unwrap();

    // A non-zero or float leading constant is a real argument.
    assert!(!matched(&pattern(Expr::int(1, DType::INT32).unwrap()), &candidate));
    assert!(!matched(&pattern(Expr::float(0.0, DType::FLOAT32).unwrap()), &candidate));

    // A trailing zero is a real argument too.
    let trailing = Expr::call(
        "unit",
        [ivar("x").expr(), Expr::int(0, DType::INT32).unwrap()],
        CallType::Halide,
        DType::FLOAT32,
        None,
        0,
    )
    .unwrap();
    assert!(!matched(&trailing, &candidate));
}

#[test]
fn test_call_zero_elision_is_pattern_side_only() {
    let pattern = input("a", 64).call([ivar("x").expr()]).unwrap();
    let candidate = Expr::call(
        "unit",
        [Expr::int(0, DType::INT32).unwrap(), ivar("y").expr()],
        CallType::Halide,
        DType::FLOAT32,
        None,
        0,
    )
    .unwrap();

    assert!(!matched(&pattern, &candidate));
}

// =============================================================================
// Let
// =============================================================================

#[test]
fn test_let_binds_variable_before_body() {
    let doubled = |var: &Var, init: i64| {
        let value = Expr::int(init, DType::INT32).unwrap();
        let body = var.expr().add(&var.expr()).unwrap();
        Expr::let_in(var, &value, &body).unwrap()
    };
    let v = ivar("t");
    let w = ivar("u");

    assert!(matched(&doubled(&v, 3), &doubled(&w, 3)));
    assert!(!matched(&doubled(&v, 3), &doubled(&w, 4)));
}

#[test]
fn test_let_body_must_use_the_bound_variable_consistently() {
    let v = ivar("t");
    let w = ivar("u");
    let stray = ivar("s");

    let pattern = {
        let body = v.expr().add(&v.expr()).unwrap();
        Expr::let_in(&v, &Expr::int(3, DType::INT32).unwrap(), &body).unwrap()
    };
    // Candidate binds `u` but its body adds a different variable.
    let candidate = {
        let body = stray.expr().add(&stray.expr()).unwrap();
        Expr::let_in(&w, &Expr::int(3, DType::INT32).unwrap(), &body).unwrap()
    };

    assert!(!matched(&pattern, &candidate));
}

// =============================================================================
// Reductions
// =============================================================================

#[test]
fn test_reduce_axis_ignored() {
    // The target reduces over its own loop nest, the intrinsic over its
    // own; axis lists never participate in the match.
    let k = ivar("k");
    let r = ivar("r");
    let extra = ivar("r_outer");

    let pattern = sum_over(input("a", 64).call([k.expr()]).unwrap(), vec![k], DType::FLOAT32);
    let candidate = sum_over(
        input("b", 64).call([r.expr()]).unwrap(),
        vec![r, extra],
        DType::FLOAT32,
    );

    assert!(matched(&pattern, &candidate));
}

#[test]
fn test_reduce_combiner_arity_gates_the_match() {
    let k = ivar("k");
    let r = ivar("r");
    let pattern = sum_over(input("a", 64).call([k.expr()]).unwrap(), vec![k], DType::FLOAT32);

    // Two-slot combiner opposite a one-slot pattern.
    let lhs = vec![Var::new("al", DType::FLOAT32), Var::new("ai", DType::INT32)];
    let rhs = vec![Var::new("bl", DType::FLOAT32), Var::new("bi", DType::INT32)];
    let result = vec![
        lhs[0].expr().max(&rhs[0].expr()).unwrap(),
        lhs[1].expr().min(&rhs[1].expr()).unwrap(),
    ];
    let identity =
        vec![Expr::float(0.0, DType::FLOAT32).unwrap(), Expr::int(0, DType::INT32).unwrap()];
    let wide = Arc::new(Combiner::new(lhs, rhs, result, identity).unwrap());
    let candidate = Expr::reduce(
        wide,
        vec![input("b", 64).call([r.expr()]).unwrap(), r.expr()],
        vec![r.clone()],
        &Expr::const_true(),
        0,
    )
    .unwrap();

    assert!(!matched(&pattern, &candidate));
}

#[test]
fn test_reduce_condition_compared() {
    let k = ivar("k");
    let r = ivar("r");
    let pattern = sum_over(input("a", 64).call([k.expr()]).unwrap(), vec![k], DType::FLOAT32);

    let combiner = Arc::new(Combiner::sum(DType::FLOAT32).unwrap());
    let bound = r.expr().lt(&Expr::int(8, DType::INT32).unwrap()).unwrap();
    let guarded = Expr::reduce(
        combiner,
        vec![input("b", 64).call([r.expr()]).unwrap()],
        vec![r.clone()],
        &bound,
        0,
    )
    .unwrap();

    assert!(!matched(&pattern, &guarded));
}

#[test]
fn test_reduce_combiner_data_flow_enforced() {
    let k = ivar("k");
    let r = ivar("r");
    let pattern = sum_over(input("a", 64).call([k.expr()]).unwrap(), vec![k], DType::FLOAT32);

    // `acc + value` with the operands swapped in the result expression.
    let acc = Var::new("acc", DType::FLOAT32);
    let value = Var::new("value", DType::FLOAT32);
    let swapped = Arc::new(
        Combiner::new(
            vec![acc.clone()],
            vec![value.clone()],
            vec![value.expr().add(&acc.expr()).unwrap()],
            vec![Expr::float(0.0, DType::FLOAT32).unwrap()],
        )
        .unwrap(),
    );
    let candidate = Expr::reduce(
        swapped,
        vec![input("b", 64).call([r.expr()]).unwrap()],
        vec![r.clone()],
        &Expr::const_true(),
        0,
    )
    .unwrap();

    assert!(!matched(&pattern, &candidate));
}

#[test]
fn test_reduce_combiner_identity_ignored() {
    let k = ivar("k");
    let r = ivar("r");
    let pattern = sum_over(input("a", 64).call([k.expr()]).unwrap(), vec![k], DType::FLOAT32);

    // Same fold, different start value.
    let acc = Var::new("acc", DType::FLOAT32);
    let value = Var::new("value", DType::FLOAT32);
    let offset_start = Arc::new(
        Combiner::new(
            vec![acc.clone()],
            vec![value.clone()],
            vec![acc.expr().add(&value.expr()).unwrap()],
            vec![Expr::float(7.0, DType::FLOAT32).unwrap()],
        )
        .unwrap(),
    );
    let candidate = Expr::reduce(
        offset_start,
        vec![input("b", 64).call([r.expr()]).unwrap()],
        vec![r.clone()],
        &Expr::const_true(),
        0,
    )
    .unwrap();

    assert!(matched(&pattern, &candidate));
}

#[test]
fn test_reduce_value_index_compared() {
    let minmax = || {
        let a1 = Var::new("a1", DType::FLOAT32);
        let a2 = Var::new("a2", DType::FLOAT32);
        let b1 = Var::new("b1", DType::FLOAT32);
        let b2 = Var::new("b2", DType::FLOAT32);
        let result = vec![a1.expr().max(&b1.expr()).unwrap(), a2.expr().min(&b2.expr()).unwrap()];
        let identity = vec![
            Expr::float(f64::from(f32::MIN), DType::FLOAT32).unwrap(),
            Expr::float(f64::from(f32::MAX), DType::FLOAT32).unwrap(),
        ];
        Arc::new(Combiner::new(vec![a1, a2], vec![b1, b2], result, identity).unwrap())
    };
    let spread = |value_index: usize, axis: &Var| {
        let feed = input("a", 64).call([axis.expr()]).unwrap();
        Expr::reduce(
            minmax(),
            vec![feed.clone(), feed],
            vec![axis.clone()],
            &Expr::const_true(),
            value_index,
        )
        .unwrap()
    };
    let k = ivar("k");
    let r = ivar("r");

    assert!(matched(&spread(0, &k), &spread(0, &r)));
    assert!(!matched(&spread(0, &k), &spread(1, &r)));
}

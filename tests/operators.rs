use std::cmp::Ordering;

use stackgolf::{
    blocks::compare_keys,
    diagnostics::{DiagnosticKind, Result},
    numeric::{
        Promoted, decrement, divide, equal, greater_than, if_then_else, increment, less_than,
        logical_and, logical_or, max, min, modulo, promote,
    },
    sequences::{
        append, concat, index, range_or_length, remove_first, remove_last, repeat_array,
        repeat_string, search, split, split_whitespace, take_first, take_last,
    },
    stack::Stack,
    value::Value,
};

fn run(op: fn(&mut Stack) -> Result<()>, values: Vec<Value>) -> Result<Vec<Value>> {
    let mut stack = Stack::from(values);
    op(&mut stack)?;
    Ok(stack.into_vec())
}

fn longs(values: &[i64]) -> Value {
    Value::array(values.iter().copied().map(Value::Long).collect())
}

#[test]
fn promotion_prefers_double_then_long() {
    let a = Value::Long(1);
    let b = Value::Double(2.0);
    assert_eq!(promote("+", &a, &b).unwrap(), Promoted::Double(1.0, 2.0));
    let c = Value::Char('a');
    assert_eq!(promote("+", &c, &a).unwrap(), Promoted::Long(97, 1));
    assert_eq!(promote("+", &c, &c).unwrap(), Promoted::Long(97, 97));
    let err = promote("+", &a, &Value::string("1")).unwrap_err();
    assert_eq!(err.kind(), Some(DiagnosticKind::UnsupportedOperandTypes));
}

#[test]
fn integer_division_by_zero_is_reported() {
    let err = run(divide, vec![Value::Long(1), Value::Long(0)]).unwrap_err();
    assert_eq!(err.kind(), Some(DiagnosticKind::DivisionByZero));
    let err = run(modulo, vec![Value::Long(1), Value::Long(0)]).unwrap_err();
    assert_eq!(err.kind(), Some(DiagnosticKind::DivisionByZero));
    let result = run(divide, vec![Value::Double(1.0), Value::Long(0)]).unwrap();
    assert_eq!(result, vec![Value::Double(f64::INFINITY)]);
}

#[test]
fn increments_keep_the_operand_type() {
    assert_eq!(run(increment, vec![Value::Char('a')]).unwrap(), vec![Value::Char('b')]);
    assert_eq!(run(decrement, vec![Value::Double(1.5)]).unwrap(), vec![Value::Double(0.5)]);
    assert!(run(increment, vec![Value::string("a")]).is_err());
}

#[test]
fn comparisons_push_long_flags() {
    assert_eq!(
        run(less_than, vec![Value::Long(1), Value::Double(1.5)]).unwrap(),
        vec![Value::Long(1)]
    );
    assert_eq!(
        run(greater_than, vec![Value::string("abc"), Value::string("abd")]).unwrap(),
        vec![Value::Long(0)]
    );
    assert_eq!(
        run(equal, vec![Value::Char('A'), Value::Long(65)]).unwrap(),
        vec![Value::Long(1)]
    );
}

#[test]
fn logical_operators_return_operands() {
    assert_eq!(
        run(logical_and, vec![Value::Long(3), Value::Long(4)]).unwrap(),
        vec![Value::Long(4)]
    );
    assert_eq!(
        run(logical_and, vec![Value::Long(0), Value::Long(4)]).unwrap(),
        vec![Value::Long(0)]
    );
    assert_eq!(
        run(logical_or, vec![Value::Long(0), Value::Long(4)]).unwrap(),
        vec![Value::Long(4)]
    );
}

#[test]
fn max_and_min_keep_the_winner() {
    assert_eq!(
        run(max, vec![Value::Long(2), Value::Double(3.5)]).unwrap(),
        vec![Value::Double(3.5)]
    );
    assert_eq!(
        run(min, vec![Value::string("pear"), Value::string("apple")]).unwrap(),
        vec![Value::string("apple")]
    );
}

#[test]
fn conditional_selects_by_truthiness() {
    let picked = run(
        if_then_else,
        vec![Value::string(""), Value::Long(1), Value::Long(2)],
    )
    .unwrap();
    assert_eq!(picked, vec![Value::Long(2)]);
}

#[test]
fn append_wraps_scalars() {
    let result = run(append, vec![Value::Long(1), longs(&[2, 3])]).unwrap();
    assert_eq!(result, vec![longs(&[1, 2, 3])]);
    let result = run(append, vec![longs(&[1]), Value::Long(2)]).unwrap();
    assert_eq!(result, vec![longs(&[1, 2])]);
}

#[test]
fn concat_renders_both_sides() {
    let result = run(concat, vec![Value::string("n="), Value::Double(2.5)]).unwrap();
    assert_eq!(result, vec![Value::string("n=2.5")]);
    let result = run(concat, vec![Value::block("1+"), Value::string("!")]).unwrap();
    assert_eq!(result, vec![Value::string("1+!")]);
}

#[test]
fn repeat_handles_zero_and_negative_counts() {
    let result = run(repeat_string, vec![Value::string("ab"), Value::Long(3)]).unwrap();
    assert_eq!(result, vec![Value::string("ababab")]);
    let result = run(repeat_string, vec![Value::string("ab"), Value::Long(-1)]).unwrap();
    assert_eq!(result, vec![Value::string("")]);
    let result = run(repeat_array, vec![longs(&[1, 2]), Value::Long(2)]).unwrap();
    assert_eq!(result, vec![longs(&[1, 2, 1, 2])]);
    let result = run(repeat_array, vec![longs(&[1, 2]), Value::Long(0)]).unwrap();
    assert_eq!(result, vec![longs(&[])]);
}

#[test]
fn take_clamps_counts() {
    let result = run(take_first, vec![longs(&[1, 2, 3]), Value::Long(5)]).unwrap();
    assert_eq!(result, vec![longs(&[1, 2, 3])]);
    let result = run(take_last, vec![longs(&[1, 2, 3]), Value::Long(2)]).unwrap();
    assert_eq!(result, vec![longs(&[2, 3])]);
    let result = run(take_last, vec![Value::string("hello"), Value::Long(9)]).unwrap();
    assert_eq!(result, vec![Value::string("hello")]);
    let result = run(take_first, vec![Value::string("hello"), Value::Long(-2)]).unwrap();
    assert_eq!(result, vec![Value::string("")]);
}

#[test]
fn index_is_bounds_checked() {
    let result = run(index, vec![Value::string("héllo"), Value::Long(1)]).unwrap();
    assert_eq!(result, vec![Value::Char('é')]);
    let err = run(index, vec![longs(&[1, 2]), Value::Long(2)]).unwrap_err();
    assert_eq!(err.kind(), Some(DiagnosticKind::IndexOutOfRange));
    let err = run(index, vec![longs(&[1, 2]), Value::Long(-1)]).unwrap_err();
    assert_eq!(err.kind(), Some(DiagnosticKind::IndexOutOfRange));
}

#[test]
fn remove_pushes_rest_then_element() {
    let result = run(remove_first, vec![longs(&[1, 2, 3])]).unwrap();
    assert_eq!(result, vec![longs(&[2, 3]), Value::Long(1)]);
    let result = run(remove_last, vec![Value::string("abc")]).unwrap();
    assert_eq!(result, vec![Value::string("ab"), Value::Char('c')]);
    let err = run(remove_first, vec![Value::string("")]).unwrap_err();
    assert_eq!(err.kind(), Some(DiagnosticKind::IndexOutOfRange));
}

#[test]
fn split_drops_only_the_trailing_empty_piece() {
    let result = run(split, vec![Value::string(",a,,b,"), Value::string(",")]).unwrap();
    assert_eq!(
        result,
        vec![Value::array(vec![
            Value::string(""),
            Value::string("a"),
            Value::string(""),
            Value::string("b"),
        ])]
    );
    let result = run(split, vec![Value::string("ab"), Value::string("")]).unwrap();
    assert_eq!(
        result,
        vec![Value::array(vec![Value::string("a"), Value::string("b")])]
    );
}

#[test]
fn whitespace_split_ignores_runs() {
    let result = run(split_whitespace, vec![Value::string("  a \t b\n")]).unwrap();
    assert_eq!(
        result,
        vec![Value::array(vec![Value::string("a"), Value::string("b")])]
    );
}

#[test]
fn search_reports_character_positions() {
    let result = run(search, vec![Value::string("größer"), Value::string("ße")]).unwrap();
    assert_eq!(result, vec![Value::Long(3)]);
    let result = run(search, vec![Value::string("abc"), Value::Char('z')]).unwrap();
    assert_eq!(result, vec![Value::Long(-1)]);
}

#[test]
fn range_or_length_depends_on_type() {
    let result = run(range_or_length, vec![Value::Long(3)]).unwrap();
    assert_eq!(result, vec![longs(&[0, 1, 2])]);
    let result = run(range_or_length, vec![Value::string("abcde")]).unwrap();
    assert_eq!(result, vec![Value::Long(5)]);
    assert!(run(range_or_length, vec![Value::Char('a')]).is_err());
}

#[test]
fn string_keys_compare_lexicographically() {
    let ordering = compare_keys(&Value::string("b"), &Value::string("a")).unwrap();
    assert_eq!(ordering, Ordering::Greater);
}

#[test]
fn mixed_numeric_keys_promote() {
    assert_eq!(
        compare_keys(&Value::Long(2), &Value::Double(2.5)).unwrap(),
        Ordering::Less
    );
    assert_eq!(
        compare_keys(&Value::Char('a'), &Value::Long(97)).unwrap(),
        Ordering::Equal
    );
}

#[test]
fn non_numeric_keys_are_rejected() {
    let err = compare_keys(&Value::string("a"), &Value::Long(1)).unwrap_err();
    assert_eq!(err.kind(), Some(DiagnosticKind::UnsupportedOperandTypes));
}

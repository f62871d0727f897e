//! Arithmetic, bitwise and logical operators with numeric promotion.

use std::cmp::Ordering;

use crate::{
    diagnostics::{DiagnosticKind, Result, StackGolfError},
    stack::Stack,
    value::{Value, ValueType, code_point},
};

/// Operand pair after promotion: Double if either side is a Double,
/// otherwise integer (Long and Char both compute as Long).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Promoted {
    Double(f64, f64),
    Long(i64, i64),
}

pub fn promote(symbol: &str, left: &Value, right: &Value) -> Result<Promoted> {
    let (lhs, rhs) = (left.value_type(), right.value_type());
    if !lhs.is_numeric() || !rhs.is_numeric() {
        return Err(unsupported(symbol, left, right));
    }
    if lhs == ValueType::Double || rhs == ValueType::Double {
        Ok(Promoted::Double(left.as_double()?, right.as_double()?))
    } else {
        Ok(Promoted::Long(left.as_long()?, right.as_long()?))
    }
}

pub(crate) fn unsupported(symbol: &str, left: &Value, right: &Value) -> StackGolfError {
    StackGolfError::new(
        DiagnosticKind::UnsupportedOperandTypes,
        format!(
            "`{symbol}` does not support {} and {}",
            left.type_name(),
            right.type_name()
        ),
    )
}

pub(crate) fn unsupported_unary(symbol: &str, value: &Value) -> StackGolfError {
    StackGolfError::new(
        DiagnosticKind::UnsupportedOperandTypes,
        format!("`{symbol}` does not support {}", value.type_name()),
    )
}

fn division_by_zero(symbol: &str) -> StackGolfError {
    StackGolfError::new(
        DiagnosticKind::DivisionByZero,
        format!("`{symbol}` with an integer divisor of zero"),
    )
}

/// Pops `left right`, promotes them and pushes the computed result.
fn binary<F>(stack: &mut Stack, symbol: &str, compute: F) -> Result<()>
where
    F: FnOnce(Promoted) -> Result<Value>,
{
    let right = stack.pop()?;
    let left = stack.pop()?;
    let operands = promote(symbol, &left, &right)?;
    stack.push(compute(operands)?);
    Ok(())
}

pub fn add_numbers(stack: &mut Stack) -> Result<()> {
    binary(stack, "+", |operands| {
        Ok(match operands {
            Promoted::Double(a, b) => Value::Double(a + b),
            Promoted::Long(a, b) => Value::Long(a.wrapping_add(b)),
        })
    })
}

pub fn subtract(stack: &mut Stack) -> Result<()> {
    binary(stack, "-", |operands| {
        Ok(match operands {
            Promoted::Double(a, b) => Value::Double(a - b),
            Promoted::Long(a, b) => Value::Long(a.wrapping_sub(b)),
        })
    })
}

pub fn multiply(stack: &mut Stack) -> Result<()> {
    binary(stack, "*", |operands| {
        Ok(match operands {
            Promoted::Double(a, b) => Value::Double(a * b),
            Promoted::Long(a, b) => Value::Long(a.wrapping_mul(b)),
        })
    })
}

pub fn divide(stack: &mut Stack) -> Result<()> {
    binary(stack, "/", |operands| match operands {
        Promoted::Double(a, b) => Ok(Value::Double(a / b)),
        Promoted::Long(_, 0) => Err(division_by_zero("/")),
        Promoted::Long(a, b) => Ok(Value::Long(a.wrapping_div(b))),
    })
}

/// Integer remainder; Doubles are truncated first.
pub fn modulo(stack: &mut Stack) -> Result<()> {
    binary(stack, "%", |operands| {
        let (a, b) = match operands {
            Promoted::Double(a, b) => (a as i64, b as i64),
            Promoted::Long(a, b) => (a, b),
        };
        if b == 0 {
            return Err(division_by_zero("%"));
        }
        Ok(Value::Long(a.wrapping_rem(b)))
    })
}

pub fn power(stack: &mut Stack) -> Result<()> {
    binary(stack, "#", |operands| {
        Ok(match operands {
            Promoted::Double(a, b) => Value::Double(a.powf(b)),
            Promoted::Long(a, b) => Value::Long((a as f64).powf(b as f64) as i64),
        })
    })
}

fn bitwise<F>(stack: &mut Stack, compute: F) -> Result<()>
where
    F: FnOnce(i64, i64) -> i64,
{
    let right = stack.pop()?.as_long()?;
    let left = stack.pop()?.as_long()?;
    stack.push(Value::Long(compute(left, right)));
    Ok(())
}

pub fn bit_and(stack: &mut Stack) -> Result<()> {
    bitwise(stack, |a, b| a & b)
}

pub fn bit_or(stack: &mut Stack) -> Result<()> {
    bitwise(stack, |a, b| a | b)
}

pub fn bit_xor(stack: &mut Stack) -> Result<()> {
    bitwise(stack, |a, b| a ^ b)
}

pub fn bit_not(stack: &mut Stack) -> Result<()> {
    let value = stack.pop()?.as_long()?;
    stack.push(Value::Long(!value));
    Ok(())
}

fn step(stack: &mut Stack, symbol: &str, delta: i64) -> Result<()> {
    let value = stack.pop()?;
    let stepped = match value {
        Value::Double(n) => Value::Double(n + delta as f64),
        Value::Long(n) => Value::Long(n.wrapping_add(delta)),
        Value::Char(c) => Value::Char(code_point(i64::from(u32::from(c)) + delta)?),
        other => return Err(unsupported_unary(symbol, &other)),
    };
    stack.push(stepped);
    Ok(())
}

pub fn decrement(stack: &mut Stack) -> Result<()> {
    step(stack, "(", -1)
}

pub fn increment(stack: &mut Stack) -> Result<()> {
    step(stack, ")", 1)
}

/// Numeric ordering shared by the comparison operators.
fn compare_numbers(operands: Promoted) -> Option<Ordering> {
    match operands {
        Promoted::Double(a, b) => a.partial_cmp(&b),
        Promoted::Long(a, b) => Some(a.cmp(&b)),
    }
}

/// Pops `left right` and pushes 1 or 0. Two strings compare
/// lexicographically; anything else goes through numeric promotion.
fn comparison(stack: &mut Stack, symbol: &str, accept: fn(Ordering) -> bool) -> Result<()> {
    let right = stack.pop()?;
    let left = stack.pop()?;
    let ordering = match (&left, &right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => compare_numbers(promote(symbol, &left, &right)?),
    };
    stack.push(Value::bool(ordering.is_some_and(accept)));
    Ok(())
}

pub fn less_than(stack: &mut Stack) -> Result<()> {
    comparison(stack, "<", Ordering::is_lt)
}

pub fn greater_than(stack: &mut Stack) -> Result<()> {
    comparison(stack, ">", Ordering::is_gt)
}

pub fn equal(stack: &mut Stack) -> Result<()> {
    comparison(stack, "=", Ordering::is_eq)
}

/// `a b e&`: `b` when both are non-zero, else zero.
pub fn logical_and(stack: &mut Stack) -> Result<()> {
    binary(stack, "e&", |operands| {
        Ok(match operands {
            Promoted::Double(a, b) => Value::Double(if a != 0.0 && b != 0.0 { b } else { 0.0 }),
            Promoted::Long(a, b) => Value::Long(if a != 0 && b != 0 { b } else { 0 }),
        })
    })
}

/// `a b e|`: `a` when non-zero, else `b`.
pub fn logical_or(stack: &mut Stack) -> Result<()> {
    binary(stack, "e|", |operands| {
        Ok(match operands {
            Promoted::Double(a, b) => Value::Double(if a != 0.0 { a } else { b }),
            Promoted::Long(a, b) => Value::Long(if a != 0 { a } else { b }),
        })
    })
}

fn select(stack: &mut Stack, symbol: &str, keep_right: fn(Ordering) -> bool) -> Result<()> {
    let right = stack.pop()?;
    let left = stack.pop()?;
    if let (Value::String(a), Value::String(b)) = (&left, &right) {
        let winner = if keep_right(a.cmp(b)) { right } else { left };
        stack.push(winner);
        return Ok(());
    }
    let operands = promote(symbol, &left, &right)?;
    let pick_right = compare_numbers(operands).is_some_and(keep_right);
    stack.push(match operands {
        Promoted::Double(a, b) => Value::Double(if pick_right { b } else { a }),
        Promoted::Long(a, b) => Value::Long(if pick_right { b } else { a }),
    });
    Ok(())
}

pub fn max(stack: &mut Stack) -> Result<()> {
    select(stack, "e>", Ordering::is_lt)
}

pub fn min(stack: &mut Stack) -> Result<()> {
    select(stack, "e<", Ordering::is_gt)
}

pub fn not(stack: &mut Stack) -> Result<()> {
    let value = stack.pop()?;
    stack.push(Value::bool(!value.is_truthy()));
    Ok(())
}

/// `cond then else ?`: keeps `then` when `cond` is truthy, else `else`.
pub fn if_then_else(stack: &mut Stack) -> Result<()> {
    let otherwise = stack.pop()?;
    let then = stack.pop()?;
    let condition = stack.pop()?;
    stack.push(if condition.is_truthy() { then } else { otherwise });
    Ok(())
}

//! Block-driven control flow: execute, map, filter, fold, sort and while.
//!
//! Map, filter and sort run the block on a private stack per element via
//! [`ExecutionContext::execute_block`]. Fold and while keep running on one
//! stack, so each step sees what the previous one left behind.

use std::cmp::Ordering;

use tracing::debug;

use crate::{
    diagnostics::{DiagnosticKind, Result, StackGolfError},
    numeric::{unsupported, unsupported_unary},
    runtime::ExecutionContext,
    stack::Stack,
    value::{Value, ValueType, code_point},
};

fn expect_block(symbol: &str, value: Value) -> Result<String> {
    match value {
        Value::Block(source) => Ok(source),
        other => Err(unsupported_unary(symbol, &other)),
    }
}

/// `x {block} ~`: runs the block on a private stack seeded with `x` and
/// pushes everything it produced.
pub fn execute(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    let block = expect_block("~", stack.pop()?)?;
    let target = stack.pop()?;
    let result = context.execute_block(&target, &block)?;
    stack.append(result);
    Ok(())
}

fn map_values(context: &mut ExecutionContext, values: &[Value], block: &str) -> Result<Stack> {
    let mut mapped = Stack::with_capacity(values.len());
    for value in values {
        mapped.append(context.execute_block(value, block)?);
    }
    Ok(mapped)
}

pub fn map_array(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    let block = expect_block("%", stack.pop()?)?;
    let array = match stack.pop()? {
        Value::Array(array) => array,
        other => return Err(unsupported_unary("%", &other)),
    };
    let mapped = map_values(context, array.as_slice(), &block)?;
    stack.push(Value::Array(mapped));
    Ok(())
}

/// Maps over the characters of a string. Results are folded back into
/// text: Chars and Strings are appended as-is, Longs are read as code points.
pub fn map_string(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    let block = expect_block("%", stack.pop()?)?;
    let text = match stack.pop()? {
        Value::String(text) => text,
        other => return Err(unsupported_unary("%", &other)),
    };
    let chars: Vec<Value> = text.chars().map(Value::Char).collect();
    let mapped = map_values(context, &chars, &block)?;

    let mut result = String::with_capacity(text.len());
    for value in mapped {
        match value {
            Value::Char(c) => result.push(c),
            Value::String(piece) => result.push_str(&piece),
            Value::Long(n) => result.push(code_point(n)?),
            other => {
                return Err(StackGolfError::new(
                    DiagnosticKind::UnsupportedOperandTypes,
                    format!(
                        "mapping a string produced a {}, which cannot become text",
                        other.type_name()
                    ),
                ));
            }
        }
    }
    stack.push(Value::String(result));
    Ok(())
}

/// Whether the block accepts `value`: the top of its private result stack
/// must be truthy. A block that leaves nothing rejects the element.
fn keeps(context: &mut ExecutionContext, value: &Value, block: &str) -> Result<bool> {
    let result = context.execute_block(value, block)?;
    Ok(result.peek().is_ok_and(Value::is_truthy))
}

pub fn filter_array(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    let block = expect_block(",", stack.pop()?)?;
    let array = match stack.pop()? {
        Value::Array(array) => array,
        other => return Err(unsupported_unary(",", &other)),
    };
    let mut kept = Stack::with_capacity(array.len());
    for value in array {
        if keeps(context, &value, &block)? {
            kept.push(value);
        }
    }
    stack.push(Value::Array(kept));
    Ok(())
}

pub fn filter_string(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    let block = expect_block(",", stack.pop()?)?;
    let text = match stack.pop()? {
        Value::String(text) => text,
        other => return Err(unsupported_unary(",", &other)),
    };
    let mut kept = String::with_capacity(text.len());
    for c in text.chars() {
        if keeps(context, &Value::Char(c), &block)? {
            kept.push(c);
        }
    }
    stack.push(Value::String(kept));
    Ok(())
}

/// `[a b c] {block} *`: starts from `a`, then pushes each following element
/// and runs the block on the same accumulating stack. The whole stack is
/// pushed back as an array.
pub fn fold(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    let block = expect_block("*", stack.pop()?)?;
    let array = match stack.pop()? {
        Value::Array(array) => array,
        other => return Err(unsupported_unary("*", &other)),
    };
    let mut accumulator = Stack::with_capacity(array.len());
    let mut elements = array.into_iter();
    if let Some(first) = elements.next() {
        accumulator.push(first);
        for element in elements {
            accumulator.push(element);
            context.run(&mut accumulator, &block)?;
        }
    }
    stack.push(Value::Array(accumulator));
    Ok(())
}

/// Orders two sort keys: strings lexicographically, otherwise numerically
/// at the widest precision involved.
pub fn compare_keys(left: &Value, right: &Value) -> Result<Ordering> {
    let (lhs, rhs) = (left.value_type(), right.value_type());
    if lhs == ValueType::String && rhs == ValueType::String {
        if let (Value::String(a), Value::String(b)) = (left, right) {
            return Ok(a.cmp(b));
        }
    }
    if !lhs.is_numeric() || !rhs.is_numeric() {
        return Err(unsupported("$", left, right));
    }
    if lhs == ValueType::Double || rhs == ValueType::Double {
        let (a, b) = (left.as_double()?, right.as_double()?);
        Ok(a.partial_cmp(&b).unwrap_or(Ordering::Equal))
    } else {
        Ok(left.as_long()?.cmp(&right.as_long()?))
    }
}

/// The key of `value` is the top of the block's private result stack.
fn sort_key(context: &mut ExecutionContext, value: &Value, block: &str) -> Result<Value> {
    context.execute_block(value, block)?.pop()
}

/// `[...] {block} $`: stable insertion sort. Every comparison runs the block
/// once for each of the two candidates.
pub fn sort(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    let block = expect_block("$", stack.pop()?)?;
    let mut array = match stack.pop()? {
        Value::Array(array) => array,
        other => return Err(unsupported_unary("$", &other)),
    };
    let values = array.as_mut_slice();
    for i in 1..values.len() {
        let mut j = i;
        while j > 0 {
            let before = sort_key(context, &values[j - 1], &block)?;
            let current = sort_key(context, &values[j], &block)?;
            if compare_keys(&before, &current)? != Ordering::Greater {
                break;
            }
            values.swap(j - 1, j);
            j -= 1;
        }
    }
    stack.push(Value::Array(array));
    Ok(())
}

/// `{body} w`: runs the body on the current stack, then pops the top and
/// repeats while it is truthy. The body always runs at least once.
pub fn while_truthy(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    let block = expect_block("w", stack.pop()?)?;
    let mut iterations = 0usize;
    loop {
        context.run(stack, &block)?;
        iterations += 1;
        if !stack.pop()?.is_truthy() {
            break;
        }
    }
    debug!(iterations, "while loop finished");
    Ok(())
}

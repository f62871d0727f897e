//! Array and string operators: concatenation, repetition, slicing,
//! indexing, splitting and searching. Strings are handled as sequences of
//! characters, never bytes.

use crate::{
    diagnostics::{DiagnosticKind, Result, StackGolfError},
    numeric::unsupported_unary,
    stack::Stack,
    value::Value,
};

fn index_error(index: i64, len: usize) -> StackGolfError {
    StackGolfError::new(
        DiagnosticKind::IndexOutOfRange,
        format!("index {index} is outside a sequence of length {len}"),
    )
}

fn expect_string(symbol: &str, value: Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text),
        other => Err(unsupported_unary(symbol, &other)),
    }
}

fn expect_array(symbol: &str, value: Value) -> Result<Stack> {
    match value {
        Value::Array(values) => Ok(values),
        other => Err(unsupported_unary(symbol, &other)),
    }
}

/// Text of a String or Char operand, as used for delimiters and needles.
fn string_or_char(symbol: &str, value: Value) -> Result<String> {
    match value {
        Value::String(text) => Ok(text),
        Value::Char(c) => Ok(c.to_string()),
        other => Err(unsupported_unary(symbol, &other)),
    }
}

fn clamp_count(count: i64, len: usize) -> usize {
    usize::try_from(count).map_or(0, |count| count.min(len))
}

/// `+` with an Array on either side: non-array operands are wrapped in a
/// one-element array, then the right elements are appended to the left.
pub fn append(stack: &mut Stack) -> Result<()> {
    let right = stack.pop()?;
    let left = stack.pop()?;
    let mut result = match left {
        Value::Array(values) => values,
        other => Stack::from(vec![other]),
    };
    match right {
        Value::Array(values) => result.append(values),
        other => result.push(other),
    }
    stack.push(Value::Array(result));
    Ok(())
}

/// `+` with a String on either side: both operands are rendered as text.
pub fn concat(stack: &mut Stack) -> Result<()> {
    let right = stack.pop()?;
    let left = stack.pop()?;
    let mut text = left.to_text();
    text.push_str(&right.to_text());
    stack.push(Value::String(text));
    Ok(())
}

/// Number of copies to make of a sequence holding `len` units of `unit`
/// bytes. Empty sequences need no copies; results whose size cannot be
/// represented are refused.
fn repeat_count(symbol: &str, times: i64, len: usize, unit: usize) -> Result<usize> {
    let times = clamp_count(times, usize::MAX);
    if len == 0 {
        return Ok(0);
    }
    len.checked_mul(times)
        .and_then(|total| total.checked_mul(unit))
        .filter(|bytes| *bytes <= isize::MAX as usize)
        .map(|_| times)
        .ok_or_else(|| {
            StackGolfError::new(
                DiagnosticKind::IndexOutOfRange,
                format!("`{symbol}` cannot repeat a sequence of length {len} {times} times"),
            )
        })
}

pub fn repeat_string(stack: &mut Stack) -> Result<()> {
    let times = stack.pop()?.as_long()?;
    let text = expect_string("*", stack.pop()?)?;
    let times = repeat_count("*", times, text.len(), 1)?;
    stack.push(Value::String(text.repeat(times)));
    Ok(())
}

pub fn repeat_array(stack: &mut Stack) -> Result<()> {
    let times = stack.pop()?.as_long()?;
    let array = expect_array("*", stack.pop()?)?;
    let times = repeat_count("*", times, array.len(), std::mem::size_of::<Value>())?;
    let mut result = Stack::new();
    for _ in 0..times {
        result.push_all(&array);
    }
    stack.push(Value::Array(result));
    Ok(())
}

/// `~` on an Array: every element goes onto the stack, bottom first.
pub fn spread(stack: &mut Stack) -> Result<()> {
    let array = expect_array("~", stack.pop()?)?;
    stack.append(array);
    Ok(())
}

pub fn take_first(stack: &mut Stack) -> Result<()> {
    let count = stack.pop()?.as_long()?;
    match stack.pop()? {
        Value::Array(values) => {
            let count = clamp_count(count, values.len());
            stack.push(Value::Array(values.into_iter().take(count).collect()));
        }
        Value::String(text) => {
            stack.push(Value::String(text.chars().take(count.max(0) as usize).collect()));
        }
        other => return Err(unsupported_unary("<", &other)),
    }
    Ok(())
}

pub fn take_last(stack: &mut Stack) -> Result<()> {
    let count = stack.pop()?.as_long()?;
    match stack.pop()? {
        Value::Array(values) => {
            let skip = values.len() - clamp_count(count, values.len());
            stack.push(Value::Array(values.into_iter().skip(skip).collect()));
        }
        Value::String(text) => {
            let len = text.chars().count();
            let skip = len - clamp_count(count, len);
            stack.push(Value::String(text.chars().skip(skip).collect()));
        }
        other => return Err(unsupported_unary(">", &other)),
    }
    Ok(())
}

/// `=` with a sequence and a Long: element (or character) at that index.
pub fn index(stack: &mut Stack) -> Result<()> {
    let position = stack.pop()?.as_long()?;
    let element = match stack.pop()? {
        Value::Array(values) => {
            let len = values.len();
            usize::try_from(position)
                .ok()
                .and_then(|idx| values.into_iter().nth(idx))
                .ok_or_else(|| index_error(position, len))?
        }
        Value::String(text) => usize::try_from(position)
            .ok()
            .and_then(|idx| text.chars().nth(idx))
            .map(Value::Char)
            .ok_or_else(|| index_error(position, text.chars().count()))?,
        other => return Err(unsupported_unary("=", &other)),
    };
    stack.push(element);
    Ok(())
}

/// `(` on a sequence: pushes the rest, then the removed first element.
pub fn remove_first(stack: &mut Stack) -> Result<()> {
    match stack.pop()? {
        Value::Array(values) => {
            let mut rest = values.into_iter();
            let first = rest.next().ok_or_else(|| index_error(0, 0))?;
            stack.push(Value::Array(rest.collect()));
            stack.push(first);
        }
        Value::String(text) => {
            let mut rest = text.chars();
            let first = rest.next().ok_or_else(|| index_error(0, 0))?;
            stack.push(Value::string(rest.as_str()));
            stack.push(Value::Char(first));
        }
        other => return Err(unsupported_unary("(", &other)),
    }
    Ok(())
}

/// `)` on a sequence: pushes the rest, then the removed last element.
pub fn remove_last(stack: &mut Stack) -> Result<()> {
    match stack.pop()? {
        Value::Array(mut values) => {
            let last = values.pop().map_err(|_| index_error(-1, 0))?;
            stack.push(Value::Array(values));
            stack.push(last);
        }
        Value::String(mut text) => {
            let last = text.pop().ok_or_else(|| index_error(-1, 0))?;
            stack.push(Value::String(text));
            stack.push(Value::Char(last));
        }
        other => return Err(unsupported_unary(")", &other)),
    }
    Ok(())
}

fn strings(pieces: impl IntoIterator<Item = impl Into<String>>) -> Value {
    Value::Array(pieces.into_iter().map(Value::string).collect())
}

/// Splits on every occurrence of `delimiter`, keeping interior empty pieces
/// and dropping a trailing empty one. An empty delimiter yields characters.
fn split_by(text: &str, delimiter: &str) -> Value {
    if delimiter.is_empty() {
        return strings(text.chars().map(String::from));
    }
    let mut pieces: Vec<&str> = text.split(delimiter).collect();
    if pieces.last().is_some_and(|piece| piece.is_empty()) {
        pieces.pop();
    }
    strings(pieces)
}

/// `/` with a String on the left.
pub fn split(stack: &mut Stack) -> Result<()> {
    let delimiter = string_or_char("/", stack.pop()?)?;
    let text = expect_string("/", stack.pop()?)?;
    stack.push(split_by(&text, &delimiter));
    Ok(())
}

/// `S/`: splits on runs of whitespace, dropping empty pieces.
pub fn split_whitespace(stack: &mut Stack) -> Result<()> {
    let text = expect_string("S/", stack.pop()?)?;
    stack.push(strings(text.split_whitespace()));
    Ok(())
}

/// `N/`: splits on newlines.
pub fn split_lines(stack: &mut Stack) -> Result<()> {
    let text = expect_string("N/", stack.pop()?)?;
    stack.push(split_by(&text, "\n"));
    Ok(())
}

/// `#` with a String haystack: character index of the first match or -1.
pub fn search(stack: &mut Stack) -> Result<()> {
    let needle = string_or_char("#", stack.pop()?)?;
    let haystack = expect_string("#", stack.pop()?)?;
    let position = haystack
        .find(&needle)
        .map_or(-1, |byte| haystack[..byte].chars().count() as i64);
    stack.push(Value::Long(position));
    Ok(())
}

/// `,` without a block: a Long `n` becomes `[0 .. n-1]`, a sequence becomes
/// its length.
pub fn range_or_length(stack: &mut Stack) -> Result<()> {
    let value = stack.pop()?;
    let result = match &value {
        Value::Long(n) => Value::Array((0..*n).map(Value::Long).collect()),
        Value::Array(values) => Value::Long(values.len() as i64),
        Value::String(text) => Value::Long(text.chars().count() as i64),
        _ => return Err(unsupported_unary(",", &value)),
    };
    stack.push(result);
    Ok(())
}

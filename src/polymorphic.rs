//! Resolution of overloaded symbols.
//!
//! Each function peeks at the runtime types beneath the top of the stack,
//! without popping, and hands over to one concrete implementation.

use crate::{
    blocks,
    diagnostics::Result,
    numeric::{self, unsupported},
    operators::copy_nth,
    runtime::ExecutionContext,
    sequences,
    stack::Stack,
    value::ValueType,
};

/// Types of the second and first entries: `(left, top)`.
fn operand_types(stack: &Stack) -> Result<(ValueType, ValueType)> {
    Ok((stack.get(1)?.value_type(), stack.peek()?.value_type()))
}

fn is_sequence(value_type: ValueType) -> bool {
    matches!(value_type, ValueType::Array | ValueType::String)
}

/// `+`: Array beats String beats the numeric types.
pub fn plus(stack: &mut Stack) -> Result<()> {
    let (left, top) = operand_types(stack)?;
    let either = |wanted| left == wanted || top == wanted;
    if either(ValueType::Array) {
        sequences::append(stack)
    } else if either(ValueType::String) {
        sequences::concat(stack)
    } else if left.is_numeric() && top.is_numeric() {
        numeric::add_numbers(stack)
    } else {
        Err(unsupported("+", stack.get(1)?, stack.peek()?))
    }
}

pub fn asterisk(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    let (left, top) = operand_types(stack)?;
    match (left, top) {
        (_, ValueType::Block) => blocks::fold(context, stack),
        (ValueType::Array, _) => sequences::repeat_array(stack),
        (ValueType::String, _) => sequences::repeat_string(stack),
        _ => numeric::multiply(stack),
    }
}

pub fn tilde(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    match stack.peek()?.value_type() {
        ValueType::Array => sequences::spread(stack),
        ValueType::Block => blocks::execute(context, stack),
        _ => numeric::bit_not(stack),
    }
}

pub fn less(stack: &mut Stack) -> Result<()> {
    match operand_types(stack)? {
        (left, ValueType::Long) if is_sequence(left) => sequences::take_first(stack),
        _ => numeric::less_than(stack),
    }
}

pub fn greater(stack: &mut Stack) -> Result<()> {
    match operand_types(stack)? {
        (left, ValueType::Long) if is_sequence(left) => sequences::take_last(stack),
        _ => numeric::greater_than(stack),
    }
}

pub fn open_paren(stack: &mut Stack) -> Result<()> {
    if is_sequence(stack.peek()?.value_type()) {
        sequences::remove_first(stack)
    } else {
        numeric::decrement(stack)
    }
}

pub fn close_paren(stack: &mut Stack) -> Result<()> {
    if is_sequence(stack.peek()?.value_type()) {
        sequences::remove_last(stack)
    } else {
        numeric::increment(stack)
    }
}

pub fn equals(stack: &mut Stack) -> Result<()> {
    match operand_types(stack)? {
        (left, ValueType::Long) if is_sequence(left) => sequences::index(stack),
        _ => numeric::equal(stack),
    }
}

pub fn slash(stack: &mut Stack) -> Result<()> {
    match operand_types(stack)? {
        (ValueType::String, _) => sequences::split(stack),
        _ => numeric::divide(stack),
    }
}

pub fn hash(stack: &mut Stack) -> Result<()> {
    match operand_types(stack)? {
        (ValueType::String, ValueType::String | ValueType::Char) => sequences::search(stack),
        _ => numeric::power(stack),
    }
}

pub fn percent(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    match operand_types(stack)? {
        (ValueType::Array, ValueType::Block) => blocks::map_array(context, stack),
        (ValueType::String, ValueType::Block) => blocks::map_string(context, stack),
        _ => numeric::modulo(stack),
    }
}

/// `,` is unary unless a block sits on top, so only look below the top
/// when there is a block to apply.
pub fn comma(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    if stack.peek()?.value_type() == ValueType::Block {
        match stack.get(1)?.value_type() {
            ValueType::Array => return blocks::filter_array(context, stack),
            ValueType::String => return blocks::filter_string(context, stack),
            _ => {}
        }
    }
    sequences::range_or_length(stack)
}

pub fn dollar(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    if stack.peek()?.value_type() == ValueType::Block {
        blocks::sort(context, stack)
    } else {
        copy_nth(stack)
    }
}

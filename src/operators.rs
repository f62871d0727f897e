use indexmap::IndexMap;

use crate::{
    blocks,
    console::trim_line_ending,
    diagnostics::{DiagnosticKind, Result, StackGolfError},
    numeric, polymorphic,
    runtime::ExecutionContext,
    sequences,
    stack::Stack,
    value::Value,
};

pub type StackFn = fn(&mut Stack) -> Result<()>;
pub type ContextFn = fn(&mut ExecutionContext, &mut Stack) -> Result<()>;

/// Calling convention of an operator.
#[derive(Clone, Copy)]
pub enum Handler {
    /// Works on the value stack alone.
    Stack(StackFn),
    /// Also needs the variables, the console or the ability to run blocks.
    Context(ContextFn),
}

#[derive(Clone, Copy)]
pub struct Operator {
    pub symbol: &'static str,
    pub handler: Handler,
}

impl Operator {
    pub fn invoke(&self, context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
        match self.handler {
            Handler::Stack(callback) => callback(stack),
            Handler::Context(callback) => callback(context, stack),
        }
    }
}

/// Fixed mapping from operator symbol to handler. Lookup is by exact match.
pub struct OperatorTable {
    entries: IndexMap<&'static str, Operator>,
}

impl OperatorTable {
    pub fn standard() -> Self {
        let mut table = Self {
            entries: IndexMap::new(),
        };
        table.install();
        table
    }

    pub fn get(&self, symbol: &str) -> Option<&Operator> {
        self.entries.get(symbol)
    }

    /// Symbols in installation order.
    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn install(&mut self) {
        self.stack_op("+", polymorphic::plus);
        self.stack_op("-", numeric::subtract);
        self.context_op("*", polymorphic::asterisk);
        self.stack_op("/", polymorphic::slash);
        self.context_op("%", polymorphic::percent);
        self.stack_op("(", polymorphic::open_paren);
        self.stack_op(")", polymorphic::close_paren);
        self.stack_op("#", polymorphic::hash);
        self.stack_op("&", numeric::bit_and);
        self.stack_op("|", numeric::bit_or);
        self.stack_op("^", numeric::bit_xor);
        self.context_op("~", polymorphic::tilde);
        self.stack_op("_", duplicate);
        self.stack_op(".", duplicate);
        self.stack_op(";", discard);
        self.stack_op("\\", swap);
        self.stack_op("@", rotate);
        self.context_op("$", polymorphic::dollar);
        self.stack_op("c", to_char);
        self.stack_op("i", to_long);
        self.stack_op("f", to_double);
        self.context_op("l", read_line);
        self.context_op("t", read_all);
        self.stack_op("s", to_string);
        self.stack_op(">", polymorphic::greater);
        self.stack_op("<", polymorphic::less);
        self.stack_op("=", polymorphic::equals);
        self.stack_op("e&", numeric::logical_and);
        self.stack_op("e|", numeric::logical_or);
        self.stack_op("e>", numeric::max);
        self.stack_op("e<", numeric::min);
        self.stack_op("?", numeric::if_then_else);
        self.stack_op("!", numeric::not);
        self.context_op(",", polymorphic::comma);
        self.stack_op("S/", sequences::split_whitespace);
        self.stack_op("N/", sequences::split_lines);
        self.context_op("w", blocks::while_truthy);
        self.context_op("p", print_top);
    }

    fn stack_op(&mut self, symbol: &'static str, callback: StackFn) {
        self.entries.insert(
            symbol,
            Operator {
                symbol,
                handler: Handler::Stack(callback),
            },
        );
    }

    fn context_op(&mut self, symbol: &'static str, callback: ContextFn) {
        self.entries.insert(
            symbol,
            Operator {
                symbol,
                handler: Handler::Context(callback),
            },
        );
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn duplicate(stack: &mut Stack) -> Result<()> {
    let copy = stack.peek()?.duplicate();
    stack.push(copy);
    Ok(())
}

fn discard(stack: &mut Stack) -> Result<()> {
    stack.pop()?;
    Ok(())
}

fn swap(stack: &mut Stack) -> Result<()> {
    let top = stack.pop()?;
    let below = stack.pop()?;
    stack.push(top);
    stack.push(below);
    Ok(())
}

/// `a b c` becomes `b c a`.
fn rotate(stack: &mut Stack) -> Result<()> {
    let c = stack.pop()?;
    let b = stack.pop()?;
    let a = stack.pop()?;
    stack.push(b);
    stack.push(c);
    stack.push(a);
    Ok(())
}

/// Pushes a copy of the element `n` below the top, `n` counted after the
/// index itself is popped.
pub(crate) fn copy_nth(stack: &mut Stack) -> Result<()> {
    let depth = stack.pop()?.as_long()?;
    let copy = usize::try_from(depth)
        .ok()
        .filter(|depth| *depth < stack.len())
        .and_then(|depth| stack.get(depth).ok())
        .map(Value::duplicate)
        .ok_or_else(|| {
            StackGolfError::new(
                DiagnosticKind::IndexOutOfRange,
                format!("cannot copy element {depth} of a stack holding {}", stack.len()),
            )
        })?;
    stack.push(copy);
    Ok(())
}

fn to_char(stack: &mut Stack) -> Result<()> {
    let value = stack.pop()?;
    stack.push(Value::Char(value.as_char()?));
    Ok(())
}

fn to_long(stack: &mut Stack) -> Result<()> {
    let value = stack.pop()?;
    stack.push(Value::Long(value.as_long()?));
    Ok(())
}

fn to_double(stack: &mut Stack) -> Result<()> {
    let value = stack.pop()?;
    stack.push(Value::Double(value.as_double()?));
    Ok(())
}

fn to_string(stack: &mut Stack) -> Result<()> {
    let value = stack.pop()?;
    stack.push(Value::String(value.to_text()));
    Ok(())
}

fn read_line(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    let line = context.console.read_line()?.ok_or_else(|| {
        StackGolfError::new(
            DiagnosticKind::EndOfInput,
            "`l` reached the end of the input stream",
        )
    })?;
    stack.push(Value::String(trim_line_ending(line)));
    Ok(())
}

/// Concatenates lines, terminators included, up to a blank line or the end
/// of the stream.
fn read_all(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    let mut text = String::new();
    while let Some(line) = context.console.read_line()? {
        if line.trim_end_matches(['\n', '\r']).is_empty() {
            break;
        }
        text.push_str(&line);
    }
    stack.push(Value::String(text));
    Ok(())
}

fn print_top(context: &mut ExecutionContext, stack: &mut Stack) -> Result<()> {
    let rendered = stack.peek()?.to_string();
    context.console.write_line(&rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lookup_is_exact() {
        let table = OperatorTable::standard();
        assert!(table.get("e&").is_some());
        assert!(table.get("e").is_none());
        assert!(table.get("++").is_none());
        assert_eq!(table.get("S/").map(|op| op.symbol), Some("S/"));
    }

    #[test]
    fn block_consumers_take_the_context() {
        let table = OperatorTable::standard();
        for symbol in ["*", "%", "~", "$", ",", "w"] {
            let handler = table.get(symbol).unwrap().handler;
            assert!(matches!(handler, Handler::Context(_)), "{symbol}");
        }
        let handler = table.get("+").unwrap().handler;
        assert!(matches!(handler, Handler::Stack(_)));
    }

    #[test]
    fn symbols_keep_installation_order() {
        let table = OperatorTable::standard();
        let symbols: Vec<_> = table.symbols().take(3).collect();
        assert_eq!(symbols, vec!["+", "-", "*"]);
        assert_eq!(table.len(), 38);
    }

    #[test]
    fn rotate_brings_third_to_top() {
        let mut stack = Stack::from(vec![Value::Long(1), Value::Long(2), Value::Long(3)]);
        rotate(&mut stack).unwrap();
        assert_eq!(
            stack.into_vec(),
            vec![Value::Long(2), Value::Long(3), Value::Long(1)]
        );
    }

    #[test]
    fn copy_nth_duplicates_and_checks_bounds() {
        let mut stack = Stack::from(vec![Value::string("a"), Value::Long(7), Value::Long(1)]);
        copy_nth(&mut stack).unwrap();
        assert_eq!(stack.peek().unwrap(), &Value::string("a"));
        stack.push(Value::Long(5));
        let err = copy_nth(&mut stack).unwrap_err();
        assert_eq!(err.kind(), Some(DiagnosticKind::IndexOutOfRange));
    }
}

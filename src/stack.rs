use crate::{
    diagnostics::{DiagnosticKind, Result, StackGolfError},
    value::Value,
};

/// Initial capacity of the program stack and of block private stacks.
pub const INITIAL_STACK_CAPACITY: usize = 10;

/// Growable, exclusively owning sequence of values. The top of the stack is
/// the end of the underlying vector; depth 0 is the top.
#[derive(Clone, Default, PartialEq)]
pub struct Stack {
    values: Vec<Value>,
}

impl Stack {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_STACK_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn pop(&mut self) -> Result<Value> {
        self.values.pop().ok_or_else(empty_stack)
    }

    pub fn peek(&self) -> Result<&Value> {
        self.get(0)
    }

    /// Looks `depth` entries below the top without removing anything.
    pub fn get(&self, depth: usize) -> Result<&Value> {
        self.values
            .len()
            .checked_sub(depth + 1)
            .map(|idx| &self.values[idx])
            .ok_or_else(empty_stack)
    }

    /// Appends a duplicate of every element of `other`, bottom first.
    pub fn push_all(&mut self, other: &Stack) {
        self.values.extend(other.values.iter().map(Value::duplicate));
    }

    /// Moves every element of `other` onto this stack, bottom first.
    pub fn append(&mut self, other: Stack) {
        self.values.extend(other.values);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [Value] {
        &mut self.values
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.values
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

fn empty_stack() -> StackGolfError {
    StackGolfError::new(
        DiagnosticKind::EmptyStackAccess,
        "attempted to read past the bottom of the stack",
    )
}

impl From<Vec<Value>> for Stack {
    fn from(values: Vec<Value>) -> Self {
        Self { values }
    }
}

impl FromIterator<Value> for Stack {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Stack {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Stack {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl std::fmt::Debug for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.values.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_on_empty_stack_fails() {
        let mut stack = Stack::new();
        let err = stack.pop().unwrap_err();
        assert_eq!(err.kind(), Some(DiagnosticKind::EmptyStackAccess));
    }

    #[test]
    fn get_counts_from_the_top() {
        let stack = Stack::from(vec![Value::Long(1), Value::Long(2), Value::Long(3)]);
        assert_eq!(stack.get(0).unwrap(), &Value::Long(3));
        assert_eq!(stack.get(2).unwrap(), &Value::Long(1));
        assert!(stack.get(3).is_err());
        assert_eq!(stack.peek().unwrap(), &Value::Long(3));
    }

    #[test]
    fn push_all_copies_instead_of_moving() {
        let source = Stack::from(vec![Value::string("a"), Value::array(vec![Value::Long(1)])]);
        let mut target = Stack::with_capacity(1);
        target.push_all(&source);
        target.push_all(&source);
        assert_eq!(target.len(), 4);
        if let Value::String(text) = &mut target.as_mut_slice()[0] {
            text.push('z');
        }
        assert_eq!(source.as_slice()[0], Value::string("a"));
    }

    #[test]
    fn grows_past_initial_capacity() {
        let mut stack = Stack::with_capacity(2);
        for n in 0..100 {
            stack.push(Value::Long(n));
        }
        assert_eq!(stack.len(), 100);
        assert_eq!(stack.pop().unwrap(), Value::Long(99));
    }
}

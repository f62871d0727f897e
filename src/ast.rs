use crate::variables::Slot;

/// A classified word, borrowing its payload from the source fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Long(i64),
    Double(f64),
    /// Bare uppercase letter: push a copy of the variable.
    ReadVariable(Slot),
    /// `:` followed by an uppercase letter: pop into the variable.
    WriteVariable(Slot),
    /// Contents of a `"..."` literal, quotes removed.
    Str(&'a str),
    /// Interior of a `[...]` literal, still to be executed into a fresh stack.
    Array(&'a str),
    /// Interior of a `{...}` literal, kept as raw text.
    Block(&'a str),
    Operator(&'a str),
}

impl Token<'_> {
    pub fn is_literal(&self) -> bool {
        !matches!(
            self,
            Token::Operator(_) | Token::ReadVariable(_) | Token::WriteVariable(_)
        )
    }
}

//! Interpreter for a terse, stack-based golfing language.
//!
//! A program is a single line of words. Each word pushes a literal, reads or
//! writes one of the 26 letter variables, or runs an operator whose
//! behaviour depends on the types currently on the stack. Blocks (`{...}`)
//! hold unevaluated source that operators such as map, filter, fold, sort
//! and while run on demand.

pub mod ast;
pub mod blocks;
pub mod console;
pub mod diagnostics;
pub mod lexer;
pub mod numeric;
pub mod operators;
pub mod parser;
pub mod polymorphic;
pub mod repl;
pub mod runtime;
pub mod sequences;
pub mod stack;
pub mod value;
pub mod variables;

pub use console::Console;
pub use diagnostics::{Diagnostic, DiagnosticKind, StackGolfError};
pub use repl::Repl;
pub use runtime::{ExecutionContext, Interpreter};
pub use stack::Stack;
pub use value::{Value, ValueType};
pub use variables::{Slot, VariableStore};

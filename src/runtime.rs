use tracing::{debug, instrument};

use crate::{
    ast::Token,
    console::Console,
    diagnostics::{DiagnosticKind, Result, StackGolfError},
    lexer::Tokenizer,
    operators::OperatorTable,
    parser,
    stack::Stack,
    value::Value,
    variables::VariableStore,
};

/// Initial capacity of stacks built from `[...]` literals.
const INITIAL_ARRAY_CAPACITY: usize = 5;

/// Everything a word may touch besides the stack it runs on: the shared
/// variables, the console and the operator table.
pub struct ExecutionContext {
    pub variables: VariableStore,
    pub console: Console,
    pub operators: OperatorTable,
}

impl ExecutionContext {
    pub fn new(console: Console) -> Self {
        Self {
            variables: VariableStore::new(),
            console,
            operators: OperatorTable::standard(),
        }
    }

    /// Tokenizes `source` and executes each word against `stack` as soon as
    /// it is scanned.
    pub fn run(&mut self, stack: &mut Stack, source: &str) -> Result<()> {
        for word in Tokenizer::new(source) {
            let word = word?;
            self.execute_word(stack, word.text)
                .map_err(|err| err.with_note(format!("while executing `{}`", word.text)))?;
        }
        Ok(())
    }

    /// Runs `block` on a private stack seeded with a copy of `target` and
    /// returns whatever the block left there.
    #[instrument(level = "debug", skip(self, target))]
    pub fn execute_block(&mut self, target: &Value, block: &str) -> Result<Stack> {
        let mut private = Stack::new();
        private.push(target.duplicate());
        self.run(&mut private, block)?;
        Ok(private)
    }

    fn execute_word(&mut self, stack: &mut Stack, word: &str) -> Result<()> {
        let token = parser::classify(word);
        if token.is_literal() {
            debug!(?token, "pushing literal");
        }
        match token {
            Token::Long(n) => stack.push(Value::Long(n)),
            Token::Double(n) => stack.push(Value::Double(n)),
            Token::Str(text) => stack.push(Value::string(text)),
            Token::Block(source) => stack.push(Value::block(source)),
            Token::Array(interior) => {
                let mut array = Stack::with_capacity(INITIAL_ARRAY_CAPACITY);
                self.run(&mut array, interior)?;
                stack.push(Value::Array(array));
            }
            Token::ReadVariable(slot) => stack.push(self.variables.read(slot)),
            Token::WriteVariable(slot) => {
                let value = stack.pop()?;
                let copy = value.duplicate();
                self.variables.assign(slot, value);
                stack.push(copy);
            }
            Token::Operator(symbol) => {
                if let Some(operator) = self.operators.get(symbol).copied() {
                    debug!(symbol, "dispatching operator");
                    return operator.invoke(self, stack);
                }
                let pieces =
                    parser::split_compound(symbol, |piece| self.operators.get(piece).is_some());
                if pieces.len() < 2 {
                    return Err(StackGolfError::new(
                        DiagnosticKind::UnknownOperator,
                        format!("unknown operator `{symbol}`"),
                    ));
                }
                debug!(word = symbol, ?pieces, "splitting compound word");
                for piece in pieces {
                    self.execute_word(stack, piece)?;
                }
            }
        }
        Ok(())
    }
}

/// A program session: the root stack plus its execution context.
pub struct Interpreter {
    stack: Stack,
    context: ExecutionContext,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_console(Console::stdio())
    }

    pub fn with_console(console: Console) -> Self {
        Self {
            stack: Stack::new(),
            context: ExecutionContext::new(console),
        }
    }

    /// Executes one line of source against the session's stack. On failure
    /// the stack keeps whatever state the program had reached.
    pub fn eval_source(&mut self, source: &str) -> Result<&Stack> {
        self.context.run(&mut self.stack, source)?;
        Ok(&self.stack)
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn variables(&self) -> &VariableStore {
        &self.context.variables
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.context.operators
    }

    /// Final output: every element bottom to top, no separators.
    pub fn render(&self) -> String {
        self.stack.iter().map(ToString::to_string).collect()
    }

    /// Clears the stack and restores the preset variables.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.context.variables = VariableStore::new();
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

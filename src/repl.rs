use rustyline::{DefaultEditor, error::ReadlineError};

use crate::{
    diagnostics::{Result, StackGolfError},
    runtime::Interpreter,
};

pub struct Repl {
    interpreter: Interpreter,
}

impl Repl {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()
            .map_err(|err| StackGolfError::from(std::io::Error::other(err)))?;
        loop {
            match editor.readline(">> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    editor.add_history_entry(trimmed).ok();
                    match trimmed {
                        ":quit" | ":exit" => break,
                        ":ops" => {
                            let symbols: Vec<_> = self.interpreter.operators().symbols().collect();
                            println!("{}", symbols.join(" "));
                        }
                        ":vars" => {
                            for (letter, value) in self.interpreter.variables().iter() {
                                println!("{letter} = {value:?}");
                            }
                        }
                        ":reset" => self.interpreter.reset(),
                        source => {
                            if let Err(err) = self.interpreter.eval_source(source) {
                                eprintln!("error: {err}");
                            }
                            println!("{:?}", self.interpreter.stack());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    return Err(StackGolfError::from(std::io::Error::other(err)));
                }
            }
        }
        Ok(())
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

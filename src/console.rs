use std::io::{self, BufRead, BufReader, Write};

use crate::diagnostics::Result;

/// Line-oriented input and output used by the `l`, `t` and `p` operators.
pub struct Console {
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
}

impl Console {
    pub fn new(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        Self { input, output }
    }

    pub fn stdio() -> Self {
        Self::new(
            Box::new(BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }

    /// Reads one raw line including its terminator; `None` at end of stream.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    pub fn write_line(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()?;
        Ok(())
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdio()
    }
}

/// Strips one trailing `\n` (and a preceding `\r`).
pub fn trim_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_lines_until_end_of_stream() {
        let mut console = Console::new(Box::new(Cursor::new("a\nb")), Box::new(io::sink()));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("a\n"));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("b"));
        assert_eq!(console.read_line().unwrap(), None);
    }

    #[test]
    fn trims_unix_and_windows_endings() {
        assert_eq!(trim_line_ending("abc\n".into()), "abc");
        assert_eq!(trim_line_ending("abc\r\n".into()), "abc");
        assert_eq!(trim_line_ending("abc".into()), "abc");
    }
}

//! Interactive console I/O

use std::io::{self, BufRead, Write};

/// Line-oriented user interaction
pub trait Console {
    /// Print text without a newline and flush
    fn print(&mut self, text: &str) -> io::Result<()>;

    /// Print a line
    fn println(&mut self, text: &str) -> io::Result<()> {
        self.print(text)?;
        self.print("\n")
    }

    /// Read one line without its terminator; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// The process's stdin and stdout
#[derive(Debug, Default)]
pub struct Terminal;

impl Console for Terminal {
    fn print(&mut self, text: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Ask for a document name until a non-blank one is entered
pub fn prompt_document_name(console: &mut dyn Console) -> io::Result<String> {
    loop {
        console.print("Input XLSX File Name: ")?;
        match console.read_line()? {
            Some(name) if !name.trim().is_empty() => return Ok(name.trim().to_string()),
            Some(_) => console.println("A file name is required.")?,
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before a file name was entered",
                ))
            }
        }
    }
}

/// Wait for Enter before the window closes
pub fn wait_for_enter(console: &mut dyn Console) -> io::Result<()> {
    console.print("Press enter to exit.")?;
    console.read_line().map(|_| ())
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedConsole;
    use super::*;

    #[test]
    fn test_prompt_repeats_on_blank_name() {
        let mut console = ScriptedConsole::with_input(&["", "   ", " run7 "]);
        let name = prompt_document_name(&mut console).unwrap();
        assert_eq!(name, "run7");
        assert_eq!(console.output.matches("Input XLSX File Name: ").count(), 3);
    }

    #[test]
    fn test_prompt_fails_at_end_of_input() {
        let mut console = ScriptedConsole::with_input(&[]);
        let err = prompt_document_name(&mut console).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}

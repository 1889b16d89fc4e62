use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use super::presentation::PresentationMode;

pub(crate) const QUIT_SENTINEL: &str = "exit";
pub(crate) const FAREWELL: &str = "Exiting the application. Goodbye!";

/// Raw line-oriented terminal access. Rendering and sentinel handling live in
/// [`Prompter`], so implementations only move text.
pub(crate) trait Prompt {
    fn show(&mut self, text: &str) -> Result<()>;
    /// Returns `None` once input is exhausted.
    fn read_line(&mut self) -> Result<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Reply {
    Line(String),
    Quit,
}

pub(crate) struct Prompter<P> {
    io: P,
    mode: PresentationMode,
}

impl<P: Prompt> Prompter<P> {
    pub(crate) fn new(io: P, mode: PresentationMode) -> Self {
        Self { io, mode }
    }

    #[cfg(test)]
    pub(crate) fn mode(&self) -> PresentationMode {
        self.mode
    }

    pub(crate) fn set_mode(&mut self, mode: PresentationMode) {
        self.mode = mode;
    }

    pub(crate) fn say(&mut self, message: &str) -> Result<()> {
        self.io.show(&self.mode.render(message))
    }

    /// Shows `message`, then reads one line. The quit sentinel (any case) and
    /// end of input both come back as [`Reply::Quit`].
    pub(crate) fn ask(&mut self, message: &str) -> Result<Reply> {
        self.say(message)?;
        let Some(line) = self.io.read_line()? else {
            return Ok(Reply::Quit);
        };
        let line = line.trim_end_matches(['\r', '\n']).to_string();
        if line.trim().eq_ignore_ascii_case(QUIT_SENTINEL) {
            return Ok(Reply::Quit);
        }
        Ok(Reply::Line(line))
    }

    #[cfg(test)]
    pub(crate) fn io(&self) -> &P {
        &self.io
    }
}

pub(crate) struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub(crate) fn stdio() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> Prompt for Console<R, W> {
    fn show(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}").context("failed to write to terminal")?;
        self.output.flush().context("failed to flush terminal")
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        write!(self.output, "> ").context("failed to write to terminal")?;
        self.output.flush().context("failed to flush terminal")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from terminal")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console {
            input: Cursor::new(input.as_bytes().to_vec()),
            output: Vec::new(),
        }
    }

    #[test]
    fn ask_returns_line_without_newline() {
        let mut prompter = Prompter::new(console("lofi beats\r\n"), PresentationMode::Plain);
        let reply = prompter.ask("Type the query:").expect("ask");
        assert_eq!(reply, Reply::Line("lofi beats".to_string()));
        let written = String::from_utf8(prompter.io().output.clone()).expect("utf8");
        assert_eq!(written, "Type the query:\n> ");
    }

    #[test]
    fn quit_sentinel_is_case_insensitive() {
        let mut prompter = Prompter::new(console("  ExIt \n"), PresentationMode::Plain);
        assert_eq!(prompter.ask("anything").expect("ask"), Reply::Quit);
    }

    #[test]
    fn end_of_input_quits() {
        let mut prompter = Prompter::new(console(""), PresentationMode::Plain);
        assert_eq!(prompter.ask("anything").expect("ask"), Reply::Quit);
    }

    #[test]
    fn say_renders_with_current_mode() {
        let mut prompter = Prompter::new(console(""), PresentationMode::Plain);
        prompter.set_mode(PresentationMode::Boxed);
        prompter.say("hey").expect("say");
        let written = String::from_utf8(prompter.io().output.clone()).expect("utf8");
        assert_eq!(written, "********\n*  hey *\n********\n");
    }
}

//! Terminal I/O: prompting for and reading raw values.

use std::io::{self, BufRead, Write};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    queue,
    style::Print,
    terminal,
};

use crate::error::{AppError, Result};

pub trait Console {
    fn say(&mut self, message: &str) -> Result<()>;

    /// Reads one trimmed line. `None` once input is exhausted.
    fn prompt(&mut self, label: &str) -> Result<Option<String>>;

    /// Like [`Console::prompt`] but for values that must not be echoed.
    fn prompt_secret(&mut self, label: &str) -> Result<Option<String>> {
        self.prompt(label)
    }
}

/// Line-oriented console over any reader and writer.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        read_trimmed_line(&mut self.input)
    }
}

/// Interactive console on stdin/stdout; hides the PIN when asked to.
pub struct TtyConsole {
    mask_secrets: bool,
}

impl TtyConsole {
    pub fn new(mask_secrets: bool) -> Self {
        Self { mask_secrets }
    }
}

impl Console for TtyConsole {
    fn say(&mut self, message: &str) -> Result<()> {
        let mut out = io::stdout();
        writeln!(out, "{message}")?;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        let mut out = io::stdout();
        write!(out, "{label}")?;
        out.flush()?;
        read_trimmed_line(&mut io::stdin().lock())
    }

    fn prompt_secret(&mut self, label: &str) -> Result<Option<String>> {
        if !self.mask_secrets {
            return self.prompt(label);
        }
        prompt_masked(label)
    }
}

fn read_trimmed_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// What a key press does to a hidden entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keystroke {
    Submit,
    Erase,
    /// Ctrl-D: no more input.
    Close,
    /// Ctrl-C.
    Interrupt,
    Insert(char),
}

fn keystroke(event: &Event) -> Option<Keystroke> {
    let Event::Key(key) = event else {
        return None;
    };
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Some(Keystroke::Submit),
        KeyCode::Backspace => Some(Keystroke::Erase),
        KeyCode::Char('d') if control => Some(Keystroke::Close),
        KeyCode::Char('c') if control => Some(Keystroke::Interrupt),
        KeyCode::Char(ch) if !control => Some(Keystroke::Insert(ch)),
        _ => None,
    }
}

fn echo(out: &mut impl Write, text: &str) -> Result<()> {
    queue!(out, Print(text))?;
    out.flush()?;
    Ok(())
}

/// Reads a PIN in raw mode, echoing one `*` per digit.
fn prompt_masked(label: &str) -> Result<Option<String>> {
    let _raw = RawModeGuard::enter()?;
    let mut out = io::stdout();
    echo(&mut out, &format!("\r{label}"))?;

    let mut entry = String::new();
    loop {
        match keystroke(&event::read()?) {
            Some(Keystroke::Submit) => break,
            Some(Keystroke::Erase) => {
                if entry.pop().is_some() {
                    echo(&mut out, "\u{8} \u{8}")?;
                }
            }
            Some(Keystroke::Close) => {
                echo(&mut out, "\r\n")?;
                return Ok(None);
            }
            Some(Keystroke::Interrupt) => {
                echo(&mut out, "\r\n")?;
                return Err(AppError::Terminal("interrupted".to_string()));
            }
            Some(Keystroke::Insert(ch)) => {
                entry.push(ch);
                echo(&mut out, "*")?;
            }
            None => {}
        }
    }

    echo(&mut out, "\r\n")?;
    Ok(Some(entry))
}

use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};
use std::str::FromStr;

use crate::utils::error::{AppError, AppResult};
use crate::utils::output::OutputStyle;

/// Line-oriented prompt/response channel.
///
/// Handlers read answers from `input` and write everything they print to
/// `output`, so a scripted reader and a byte buffer can stand in for the
/// terminal.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, line: &str) -> AppResult<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Print `prompt` and read one trimmed line. A closed input yields
    /// [`AppError::EndOfInput`].
    pub fn prompt_input(&mut self, prompt: &str) -> AppResult<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut input = String::new();
        if self.input.read_line(&mut input)? == 0 {
            writeln!(self.output)?;
            return Err(AppError::EndOfInput);
        }

        Ok(input.trim().to_string())
    }

    /// Prompt until `parse` accepts the answer, reporting each rejection.
    pub fn prompt_with<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> AppResult<T> {
        loop {
            let input = self.prompt_input(prompt)?;
            match parse(&input) {
                Ok(value) => return Ok(value),
                Err(reason) => self.say(&format!("❌ {}", OutputStyle::error(&reason)))?,
            }
        }
    }

    pub fn prompt_parsed<T: FromStr>(&mut self, prompt: &str) -> AppResult<T> {
        self.prompt_with(prompt, |input| {
            input
                .parse::<T>()
                .map_err(|_| format!("'{}' is not a valid number, try again", input))
        })
    }

    pub fn prompt_non_empty(&mut self, prompt: &str) -> AppResult<String> {
        self.prompt_with(prompt, |input| {
            if input.is_empty() {
                Err("A value is required".to_string())
            } else {
                Ok(input.to_string())
            }
        })
    }

    /// Show a numbered menu and return the chosen option.
    ///
    /// An empty answer picks `default` when there is one; anything that is
    /// not a listed number is reported and asked again.
    pub fn select<T: Copy, S: AsRef<str>>(
        &mut self,
        title: &str,
        options: &[(T, S)],
        default: Option<T>,
    ) -> AppResult<T> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", OutputStyle::header(title))?;
        writeln!(self.output, "{}", OutputStyle::separator())?;
        for (i, (_, label)) in options.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, label.as_ref())?;
        }
        writeln!(self.output, "{}", OutputStyle::separator())?;

        loop {
            let input = self.prompt_input("Choose >>> ")?;
            if input.is_empty()
                && let Some(value) = default
            {
                return Ok(value);
            }

            let picked = input
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i));
            match picked {
                Some((value, _)) => return Ok(*value),
                None => {
                    let msg = format!("Invalid choice '{}', enter 1-{}", input, options.len());
                    self.say(&format!("❌ {}", OutputStyle::error(&msg)))?;
                }
            }
        }
    }
}

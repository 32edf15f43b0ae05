//! Interactive Input - Prompt, Validate, Re-prompt
//!
//! The source decides how to prompt and how to show a rejection. The loop
//! only stops on accepted input or end of input.

use std::io::{self, BufRead, Write};

use crate::profiles::Symbology;
use crate::validation::{ValidationResult, Validator};

pub trait InputSource {
    /// One line of input without its line terminator, or None at EOF.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn reject(&mut self, reason: &str);
}

pub fn prompt_for(symbology: Symbology) -> &'static str {
    match symbology {
        Symbology::Ean13 => "Enter a 12-digit numeric code: ",
        Symbology::Code128 => "Enter alphanumeric input for Code128 (up to 20 chars): ",
        Symbology::Qr => "Enter string data: ",
    }
}

/// Keep asking until the source yields input the validator accepts
pub fn read_valid_input(
    source: &mut dyn InputSource,
    symbology: Symbology,
) -> io::Result<Option<String>> {
    let validator = Validator::new();
    while let Some(line) = source.read_line(prompt_for(symbology))? {
        match validator.validate(symbology, &line) {
            ValidationResult::Accepted(text) => return Ok(Some(text)),
            ValidationResult::Rejected(reason) => source.reject(&reason),
        }
    }
    Ok(None)
}

/// Terminal source: prompts on stdout, rejections on stderr
pub struct StdinSource<R> {
    reader: R,
}

impl StdinSource<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self { reader: io::stdin().lock() }
    }
}

impl<R: BufRead> StdinSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> InputSource for StdinSource<R> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.strip_suffix('\n').unwrap_or(line.as_str());
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(Some(trimmed.to_string()))
    }

    fn reject(&mut self, reason: &str) {
        eprintln!("Invalid input: {}. Please try again.", reason);
    }
}

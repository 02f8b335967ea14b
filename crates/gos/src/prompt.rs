//! Reading project details from standard input

use anyhow::{bail, Result};
use dialoguer::Input;
use std::io::{self, BufRead, Write};

/// Ask for a line of input
///
/// Uses an interactive prompt on a terminal and a plain line read when
/// stdin is piped. End of input is an error.
pub fn ask(prompt: &str) -> Result<String> {
    if console::user_attended() {
        let value: String = Input::new().with_prompt(prompt).interact_text()?;
        return Ok(value.trim().to_string());
    }

    print!("{}: ", prompt);
    io::stdout().flush()?;
    read_answer(&mut io::stdin().lock(), prompt)
}

fn read_answer<R: BufRead>(reader: &mut R, prompt: &str) -> Result<String> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        bail!("No input for '{}'", prompt);
    }
    Ok(line.trim().to_string())
}

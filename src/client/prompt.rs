// file: src/client/prompt.rs
// description: yes/no confirmation before destructive actions

use crate::error::Result;
use std::io::{self, BufRead, Write};

/// Asks on stdout and reads the answer from stdin. Anything but y/yes is a no.
pub fn confirm(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    confirm_with(question, &mut stdin.lock(), &mut stdout)
}

pub fn confirm_with<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "{} [y/N] ", question)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

//! Interactive prompts on stderr/stdin.

use std::io::{self, BufRead, Write};

/// Read a trimmed line of input after printing `prompt`.
pub fn prompt_input(prompt: &str) -> anyhow::Result<String> {
    eprint!("  {}", prompt);
    io::stderr().flush()?;
    read_answer(&mut io::stdin().lock())
}

/// Prompt for a yes/no question with a default.
pub fn prompt_yes_no(prompt: &str, default_yes: bool) -> anyhow::Result<bool> {
    let suffix = if default_yes { "[Y/n]" } else { "[y/N]" };
    let answer = prompt_input(&format!("{} {}: ", prompt, suffix))?;
    Ok(parse_yes_no(&answer, default_yes))
}

/// Ask `prompt` unless `assume_yes` is set.
pub fn confirm(prompt: &str, default_yes: bool, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    prompt_yes_no(prompt, default_yes)
}

fn read_answer(reader: &mut impl BufRead) -> anyhow::Result<String> {
    let mut input = String::new();
    reader.read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn parse_yes_no(answer: &str, default_yes: bool) -> bool {
    if answer.is_empty() {
        default_yes
    } else {
        answer.to_lowercase().starts_with('y')
    }
}

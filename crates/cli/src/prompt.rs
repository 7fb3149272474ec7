//! Choosing how reuse questions are answered.

use std::io::{self, IsTerminal};

use dialoguer::Input;
use gitsvnpush_core::prompt::{AssumeYes, Confirm, LinePrompt};

/// `dialoguer` prompt for an attended terminal. Only `y` or `n` is accepted;
/// anything else asks again.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer: String = Input::new()
            .with_prompt(format!("{question}\nContinue [y/n]"))
            .validate_with(|input: &String| -> Result<(), String> {
                match parse_answer(input) {
                    Some(_) => Ok(()),
                    None => Err("Answer y or n".into()),
                }
            })
            .interact_text()
            .map_err(io::Error::other)?;
        Ok(parse_answer(&answer).unwrap_or(false))
    }
}

/// `y` is yes and `n` is no. Nothing else is an answer.
fn parse_answer(input: &str) -> Option<bool> {
    match input {
        "y" => Some(true),
        "n" => Some(false),
        _ => None,
    }
}

/// `--yes` answers everything; otherwise a terminal gets the interactive
/// prompt and piped input gets the plain `y`/`n` line protocol.
pub fn confirmer(assume_yes: bool) -> Box<dyn Confirm> {
    if assume_yes {
        Box::new(AssumeYes)
    } else if console::user_attended() && io::stdin().is_terminal() {
        Box::new(TerminalConfirm)
    } else {
        Box::new(LinePrompt::stdio())
    }
}

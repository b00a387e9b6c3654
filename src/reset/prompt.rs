//! Yes/no confirmation gate in front of every destructive stage.

use anyhow::{anyhow, Result};
use std::collections::VecDeque;

/// Something that can ask the operator a yes/no question.
pub trait Prompter {
    fn ask(&mut self, question: &str) -> Result<bool>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, question: &str) -> Result<bool> {
        (**self).ask(question)
    }
}

/// Interactive prompt on the terminal. Defaults to "no".
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str) -> Result<bool> {
        Ok(dialoguer::Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()?)
    }
}

/// Answers questions from a fixed queue and records what was asked.
///
/// Once the queue runs dry every further question fails, which the gate
/// treats as a refusal.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Questions shown so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> Result<bool> {
        self.asked.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted answer for {question:?}"))
    }
}

/// Decide whether the stage described by `subject` may run.
///
/// A `forced` answer is returned without asking. Otherwise anything short of
/// an explicit "yes", including a prompt error, means "keep".
pub fn confirm<P: Prompter + ?Sized>(
    prompter: &mut P,
    question: &str,
    subject: &str,
    forced: Option<bool>,
) -> bool {
    let accepted = match forced {
        Some(answer) => answer,
        None => match prompter.ask(question) {
            Ok(answer) => answer,
            Err(err) => {
                tracing::debug!(error = %err, "prompt failed, treating as no");
                false
            }
        },
    };

    if accepted {
        tracing::debug!("proceeding with {subject}");
    } else {
        tracing::info!("keeping {subject}");
    }
    accepted
}

//! Terminal prompts for passphrases and destinations

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use secrecy::{ExposeSecret, SecretString};

use sealbox_bundle::ExtractPrompt;
use sealbox_core::SealResult;

/// Environment variable that supplies the passphrase without a prompt
pub const PASSPHRASE_ENV: &str = "SEALBOX_PASSPHRASE";

pub fn passphrase_from_env() -> Option<SecretString> {
    std::env::var(PASSPHRASE_ENV).ok().map(SecretString::from)
}

/// Passphrase for a new artifact: the environment, or a hidden prompt asked
/// twice. Empty means the artifact opens without one.
pub fn read_new_passphrase() -> Result<SecretString> {
    if let Some(passphrase) = passphrase_from_env() {
        return Ok(passphrase);
    }

    let first = rpassword::prompt_password("Passphrase (empty for none): ")?;
    if first.is_empty() {
        return Ok(SecretString::from(first));
    }
    let second = rpassword::prompt_password("Repeat passphrase: ")?;
    if first != second {
        bail!("passphrases do not match");
    }
    Ok(SecretString::from(first))
}

/// Strip the line ending; `None` for a blank line.
fn non_empty(line: &str) -> Option<&str> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    (!trimmed.trim().is_empty()).then_some(trimmed)
}

/// Extractor prompts on the controlling terminal.
///
/// Answers given up front (`--dest`, `SEALBOX_PASSPHRASE`) are used once
/// instead of asking.
pub struct ConsolePrompt<R> {
    input: R,
    destination: Option<PathBuf>,
    passphrase: Option<SecretString>,
}

impl<R: BufRead> ConsolePrompt<R> {
    pub fn new(input: R, destination: Option<PathBuf>, passphrase: Option<SecretString>) -> Self {
        Self {
            input,
            destination,
            passphrase,
        }
    }
}

impl<R: BufRead> ExtractPrompt for ConsolePrompt<R> {
    fn passphrase(&mut self, artifact_name: &str) -> SealResult<Option<SecretString>> {
        if let Some(passphrase) = self.passphrase.take() {
            return Ok(Some(passphrase));
        }
        let entered = rpassword::prompt_password(format!("Passphrase for {artifact_name}: "))?;
        let entered = SecretString::from(entered);
        Ok((!entered.expose_secret().is_empty()).then_some(entered))
    }

    fn destination(&mut self, artifact_name: &str) -> SealResult<Option<PathBuf>> {
        if let Some(destination) = self.destination.take() {
            return Ok(Some(destination));
        }
        eprint!("Extract {artifact_name} into directory: ");
        io::stderr().flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(non_empty(&line).map(PathBuf::from))
    }
}

//! Passwords supplied by flag, environment variable, or stdin.

use std::io::BufRead;

use anyhow::{bail, Context, Result};

pub const PASSWORD_ENV: &str = "SNEAKER_ADMIN_PASSWORD";
pub const NEW_PASSWORD_ENV: &str = "SNEAKER_ADMIN_NEW_PASSWORD";
pub const CONFIRM_PASSWORD_ENV: &str = "SNEAKER_ADMIN_CONFIRM_PASSWORD";

/// Next line of `reader` without its line terminator.
pub fn read_secret_line<R: BufRead>(reader: &mut R, what: &str) -> Result<String> {
    let mut line = String::new();
    let read = reader
        .read_line(&mut line)
        .with_context(|| format!("failed to read {what} from stdin"))?;
    if read == 0 {
        bail!("stdin closed before the {what} was given");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Stdin wins when requested; otherwise the flag or environment value is used.
///
/// A missing secret resolves to an empty string so the login and password
/// rules report it with their usual messages.
pub fn resolve_secret<R: BufRead>(
    given: Option<String>,
    from_stdin: bool,
    reader: &mut R,
    what: &str,
) -> Result<String> {
    if from_stdin {
        return read_secret_line(reader, what);
    }
    Ok(given.unwrap_or_default())
}

#[cfg(test)]
#[path = "tests/secrets_tests.rs"]
mod tests;

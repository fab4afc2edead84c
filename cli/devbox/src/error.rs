//! Error handling and display for the CLI.

use colored::Colorize;
use devbox_codec::CodecError;
use devbox_convert::ConvertError;
use devbox_idcard::IdCardError;
use devbox_store::StoreError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("unknown config key '{0}'")]
    UnknownConfigKey(String),

    #[error("invalid value for '{key}': {reason}")]
    InvalidConfigValue { key: String, reason: String },

    #[error(transparent)]
    IdCard(#[from] IdCardError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CliError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
    }

    if let Some(hint) = err.downcast_ref::<CliError>().and_then(hint) {
        eprintln!("\n{}", format!("Hint: {}", hint).yellow());
    }
}

fn hint(err: &CliError) -> Option<&'static str> {
    match err {
        CliError::UnknownConfigKey(_) => Some("Run `devbox config show` to list the keys."),
        CliError::IdCard(IdCardError::UnknownArea(_)) => {
            Some("Run `devbox idcard regions` to list the known area codes.")
        }
        CliError::Codec(CodecError::Unknown { .. }) => {
            Some("Run the command with --help to list the supported names.")
        }
        CliError::Codec(CodecError::InvalidUtf8) => {
            Some("The decoded bytes are binary; try `devbox decode hex` on the input instead.")
        }
        CliError::Convert(ConvertError::InvalidRegex(_)) => {
            Some("Patterns use Rust regex syntax; look-around and backreferences are unsupported.")
        }
        CliError::Store(_) => {
            Some("History file could not be read or written. Pass --no-history or check `devbox config path`.")
        }
        _ => None,
    }
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command '{0}' failed with exit code {1}")]
    CommandFailed(String, i32),

    #[error("Command '{0}' not found — is it installed?")]
    CommandNotFound(String),

    #[error("Invalid {axis} '{value}'")]
    Validation { axis: &'static str, value: String },

    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Dependency(String),

    #[error("mkosi exited with code {status}, log kept at {}", .log.display())]
    Build { status: i32, log: PathBuf },

    #[error("another mkosi-wizard is already running (pid {0})")]
    Locked(u32),

    #[error("Aborted by user")]
    Cancelled,

    #[error("Interrupted")]
    Interrupted,

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl WizardError {
    /// Process exit code for this failure. Interrupts use the conventional
    /// 128+SIGINT value so callers can tell a ^C from a real error.
    pub fn exit_code(&self) -> i32 {
        if self.is_interrupt() {
            130
        } else {
            1
        }
    }

    /// True for a malformed command line, where pointing at `--help` is
    /// the right follow-up.
    pub fn is_usage(&self) -> bool {
        matches!(self, WizardError::Usage(_))
    }

    /// True when the underlying cause is the user pressing ^C, either caught
    /// by our signal handler or surfaced by a prompt as an interrupted read.
    pub fn is_interrupt(&self) -> bool {
        match self {
            WizardError::Interrupted => true,
            WizardError::Io(e) => e.kind() == std::io::ErrorKind::Interrupted,
            WizardError::Prompt(dialoguer::Error::IO(e)) => {
                e.kind() == std::io::ErrorKind::Interrupted
            }
            _ => false,
        }
    }
}

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{error::WizardError, ui};

const LOCK_FILE: &str = ".mkosi-wizard.lock";

/// Single-instance lock for one working directory. Dropping the guard
/// releases it.
#[derive(Debug)]
pub struct Lock {
    path: PathBuf,
}

impl Lock {
    /// Writes our pid into the lock file, refusing while another live
    /// process holds it. A lock left behind by a dead process is
    /// discarded with a notice.
    pub fn acquire(dir: &Path) -> Result<Lock, WizardError> {
        let path = dir.join(LOCK_FILE);

        if path.exists() {
            match read_pid(&path) {
                Some(pid) if process_alive(pid) => return Err(WizardError::Locked(pid)),
                Some(pid) => {
                    ui::print_warning(&format!("Discarding stale lock left by pid {}.", pid));
                    fs::remove_file(&path)?;
                }
                None => {
                    ui::print_warning("Discarding unreadable lock file.");
                    fs::remove_file(&path)?;
                }
            }
        }

        // create_new closes the race between the liveness check and the
        // write: whoever creates the file first owns the lock.
        let mut f = match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let pid = read_pid(&path).unwrap_or(0);
                return Err(WizardError::Locked(pid));
            }
            Err(e) => return Err(e.into()),
        };
        writeln!(f, "{}", std::process::id())?;

        Ok(Lock { path })
    }
}

impl Drop for Lock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn read_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Liveness via /proc. Good enough for a cooperative lock between
/// interactive runs.
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use dialoguer::Confirm;

use crate::{cmd, error::WizardError, ui};

/// Oldest mkosi release the image definitions work with; profile support
/// arrived in v15.
const MIN_MAJOR: u32 = 15;

const MKOSI_GIT: &str = "https://github.com/systemd/mkosi.git";

// ── Lookup ────────────────────────────────────────────────────────────────────

/// Finds a usable mkosi: PATH first, then a cached git checkout. When the
/// host has neither, interactive runs get an offer to clone one.
pub fn ensure_mkosi(interactive: bool) -> Result<PathBuf, WizardError> {
    if let Ok(path) = which::which("mkosi") {
        check_version(&path)?;
        return Ok(path);
    }

    let checkout = checkout_dir();
    let binary = checkout.join("bin").join("mkosi");

    if binary.exists() {
        refresh_checkout(&checkout);
        check_version(&binary)?;
        return Ok(binary);
    }

    if !interactive {
        return Err(WizardError::Dependency(
            "mkosi not found in PATH; install it or run interactively to fetch a checkout"
                .to_string(),
        ));
    }

    ui::print_warning("mkosi was not found on this system.");
    println!();
    if !Confirm::new()
        .with_prompt(format!("Clone mkosi from {}?", MKOSI_GIT))
        .default(true)
        .interact()?
    {
        return Err(WizardError::Dependency(
            "mkosi is required to build images".to_string(),
        ));
    }

    println!();
    if let Some(parent) = checkout.parent() {
        fs::create_dir_all(parent)?;
    }
    // git streams its own progress; hand it the terminal.
    cmd::run_interactive(
        "git",
        &["clone", "--depth=1", MKOSI_GIT, &checkout.to_string_lossy()],
    )?;

    if !binary.exists() {
        return Err(WizardError::Dependency(format!(
            "clone finished but {} is missing",
            binary.display()
        )));
    }

    check_version(&binary)?;
    ui::print_success("mkosi checkout ready.");
    Ok(binary)
}

fn checkout_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("mkosi-wizard")
        .join("mkosi")
}

/// Fast-forwards an existing checkout. A failed pull only warns; the
/// checkout we already have still works.
fn refresh_checkout(checkout: &Path) {
    let result = cmd::run_with_spinner(
        "git",
        &["-C", &checkout.to_string_lossy(), "pull", "--ff-only"],
        "Updating the mkosi checkout…",
        "mkosi checkout is up to date.",
    );
    if let Err(e) = result {
        ui::print_warning(&format!("Could not update the mkosi checkout: {}", e));
    }
}

// ── Version gate ──────────────────────────────────────────────────────────────

/// `mkosi --version` prints e.g. `mkosi 20.2`. Anything older than v15
/// predates profiles and is refused; an unparseable line only warns.
fn check_version(mkosi: &Path) -> Result<(), WizardError> {
    let out = cmd::run_capture(&mkosi.to_string_lossy(), &["--version"])?;
    match parse_major(&out) {
        Some(major) if major < MIN_MAJOR => Err(WizardError::Dependency(format!(
            "{} is too old, version {} or newer is required",
            out.trim(),
            MIN_MAJOR
        ))),
        Some(_) => Ok(()),
        None => {
            ui::print_warning(&format!(
                "Could not parse the mkosi version from '{}', continuing anyway.",
                out.trim()
            ));
            Ok(())
        }
    }
}

/// First integer found in the version line ("mkosi 20.2" → 20).
fn parse_major(version_line: &str) -> Option<u32> {
    version_line
        .split_whitespace()
        .find_map(|word| word.split('.').next()?.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_version_parses_from_typical_output() {
        assert_eq!(parse_major("mkosi 20.2"), Some(20));
        assert_eq!(parse_major("mkosi 15"), Some(15));
        assert_eq!(parse_major("25.3"), Some(25));
    }

    #[test]
    fn unparseable_versions_yield_none() {
        assert_eq!(parse_major("mkosi devel"), None);
        assert_eq!(parse_major(""), None);
        assert_eq!(parse_major("vNext~rc"), None);
    }
}

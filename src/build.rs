use std::{
    fs,
    io::{Read, Seek, SeekFrom, Write},
    os::unix::fs::{OpenOptionsExt, PermissionsExt},
    path::{Path, PathBuf},
};

use time::OffsetDateTime;

use crate::{
    cleanup, cmd,
    config::{CleanMode, Config},
    error::WizardError,
    ui,
};

const PASSWORD_FILE: &str = "mkosi.rootpw";
const KEY_FILE: &str = "mkosi.key";
const CERT_FILE: &str = "mkosi.crt";
const LOG_FILE: &str = "mkosi-build.log";

// ── Argument vector ───────────────────────────────────────────────────────────

/// mkosi arguments for one finalized configuration.
pub fn build_args(config: &Config) -> Vec<String> {
    let mut args = vec![
        "-d".to_string(),
        config.distribution.clone(),
        "--architecture".to_string(),
        config.architecture.clone(),
    ];

    if !config.profiles.is_empty() {
        args.push("--profile".to_string());
        args.push(config.profiles.join());
    }
    if config.debug {
        args.push("--debug".to_string());
    }
    match config.clean_mode {
        CleanMode::None => {}
        CleanMode::CacheOnly => args.push("-f".to_string()),
        CleanMode::CacheAndPackages | CleanMode::FullClean => args.push("-ff".to_string()),
    }
    if config.wipe {
        args.push("-w".to_string());
    }
    args
}

// ── Side artifacts ────────────────────────────────────────────────────────────

/// Writes the password side file mkosi reads for the root account.
/// Owner-only from the first byte; the caller registers it for removal.
fn write_password_file(dir: &Path, password: &str) -> Result<PathBuf, WizardError> {
    let path = dir.join(PASSWORD_FILE);
    let mut f = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(&path)?;
    writeln!(f, "{}", password)?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
    Ok(path)
}

/// The signing pair mkosi consumes has to exist and be non-empty, and the
/// private key has to stay owner-only. Content is mkosi's business.
fn verify_signing_pair(dir: &Path) -> Result<(), WizardError> {
    for name in [KEY_FILE, CERT_FILE] {
        let path = dir.join(name);
        let meta = fs::metadata(&path).map_err(|_| {
            WizardError::Dependency(format!("{} was not generated", path.display()))
        })?;
        if meta.len() == 0 {
            return Err(WizardError::Dependency(format!(
                "{} is empty; delete it and retry",
                path.display()
            )));
        }
    }
    fs::set_permissions(
        dir.join(KEY_FILE),
        fs::Permissions::from_mode(0o600),
    )?;
    Ok(())
}

/// Generates `mkosi.key`/`mkosi.crt` once; existing keys are reused so
/// images stay verifiable across builds.
fn ensure_signing_pair(mkosi: &Path, dir: &Path) -> Result<(), WizardError> {
    if dir.join(KEY_FILE).exists() && dir.join(CERT_FILE).exists() {
        return verify_signing_pair(dir);
    }

    cmd::run_with_spinner(
        &mkosi.to_string_lossy(),
        &["genkey"],
        "Generating the image signing key…",
        "Signing key generated.",
    )?;
    verify_signing_pair(dir)
}

// ── Failure classification ────────────────────────────────────────────────────

/// Best-effort read of why mkosi failed, from the tail of its log.
/// Only a bounded window at the end is read; build logs get big.
fn classify_failure(log: &Path) -> Option<&'static str> {
    const TAIL_BYTES: u64 = 64 * 1024;

    let mut f = fs::File::open(log).ok()?;
    let len = f.metadata().ok()?.len();
    f.seek(SeekFrom::Start(len.saturating_sub(TAIL_BYTES))).ok()?;
    let mut bytes = Vec::new();
    f.read_to_end(&mut bytes).ok()?;

    let tail = String::from_utf8_lossy(&bytes)
        .lines()
        .rev()
        .take(80)
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("\n");

    if tail.contains("no space left on device") {
        Some("the disk is full")
    } else if tail.contains("permission denied") || tail.contains("operation not permitted") {
        Some("a permission problem (does this build need root?)")
    } else if tail.contains("network is unreachable")
        || tail.contains("temporary failure in name resolution")
        || tail.contains("connection timed out")
        || tail.contains("failed to download")
    {
        Some("a network problem while fetching packages")
    } else {
        None
    }
}

fn timestamp() -> String {
    let now = OffsetDateTime::now_utc();
    format!(
        "{:04}{:02}{:02}-{:02}{:02}{:02}",
        now.year(),
        now.month() as u8,
        now.day(),
        now.hour(),
        now.minute(),
        now.second()
    )
}

// ── Orchestration ─────────────────────────────────────────────────────────────

/// Runs mkosi for a finalized configuration: side files first, an
/// optional clean pass, then the build with its output logged. On
/// failure the log survives under a timestamped name.
pub fn run(config: &Config, mkosi: &Path) -> Result<(), WizardError> {
    let dir = std::env::current_dir()?;
    let mkosi_cmd = mkosi.to_string_lossy();

    let password_file = match &config.root_password {
        Some(password) => {
            let path = write_password_file(&dir, password)?;
            cleanup::register(&path);
            Some(path)
        }
        None => None,
    };

    ensure_signing_pair(mkosi, &dir)?;

    if config.clean_build || config.clean_mode == CleanMode::FullClean {
        cmd::run_with_spinner(
            &mkosi_cmd,
            &["-d", &config.distribution, "clean"],
            "Cleaning previous build state…",
            "Previous build state cleaned.",
        )?;
    }

    let log = dir.join(LOG_FILE);
    let _ = fs::remove_file(&log);
    cleanup::register(&log);

    let args = build_args(config);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    println!();
    ui::print_info(&format!(
        "Running mkosi {} (log: {})",
        args.join(" "),
        LOG_FILE
    ));
    let result = cmd::run_logged(&mkosi_cmd, &args, &log, "Building the image…");

    // The password has served its purpose the moment mkosi exits.
    if let Some(path) = &password_file {
        let _ = fs::remove_file(path);
        cleanup::unregister(path);
    }

    match result {
        Ok(()) => {
            ui::print_success("Image built successfully.");
            ui::print_info("Build artifacts are in the current directory.");
            Ok(())
        }
        Err(WizardError::CommandFailed(_, status)) => {
            cleanup::unregister(&log);
            let preserved = dir.join(format!("mkosi-build-{}.log", timestamp()));
            let log = match fs::rename(&log, &preserved) {
                Ok(()) => preserved,
                Err(_) => log,
            };

            if let Some(cause) = classify_failure(&log) {
                ui::print_warning(&format!("The log points at {}.", cause));
            }
            Err(WizardError::Build { status, log })
        }
        Err(other) => Err(other),
    }
}

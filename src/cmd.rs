use std::{
    fs::{File, OpenOptions},
    io,
    os::unix::process::CommandExt,
    path::Path,
    process::{Command, ExitStatus, Stdio},
    thread,
    time::Duration,
};

use crate::{error::WizardError, signal, ui};

// ── Internal helpers ──────────────────────────────────────────────────────────

fn not_found_or_io(program: &str, err: io::Error) -> WizardError {
    if err.kind() == io::ErrorKind::NotFound {
        WizardError::CommandNotFound(program.to_string())
    } else {
        WizardError::Io(err)
    }
}

fn print_captured_output(stdout: &[u8], stderr: &[u8]) {
    let out = String::from_utf8_lossy(stdout);
    let err = String::from_utf8_lossy(stderr);
    if !out.trim().is_empty() {
        eprintln!("{}", out.trim());
    }
    if !err.trim().is_empty() {
        eprintln!("{}", err.trim());
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Run a command that **takes over the terminal** (stdin/stdout/stderr
/// inherited). Use for programs that stream their own progress, like
/// `git clone`.
pub fn run_interactive(program: &str, args: &[&str]) -> Result<(), WizardError> {
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| not_found_or_io(program, e))?;

    if !status.success() {
        return Err(WizardError::CommandFailed(
            program.to_string(),
            status.code().unwrap_or(-1),
        ));
    }
    Ok(())
}

/// Run a command **silently** while displaying a spinner.
/// On success prints `done_msg` with a ✓.
/// On failure prints captured output and returns an error.
pub fn run_with_spinner(
    program: &str,
    args: &[&str],
    spin_msg: &str,
    done_msg: &str,
) -> Result<(), WizardError> {
    let pb = ui::spinner(spin_msg);
    let result = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| not_found_or_io(program, e));
    pb.finish_and_clear();

    match result {
        Err(e) => Err(e),
        Ok(output) if !output.status.success() => {
            print_captured_output(&output.stdout, &output.stderr);
            Err(WizardError::CommandFailed(
                program.to_string(),
                output.status.code().unwrap_or(-1),
            ))
        }
        Ok(_) => {
            ui::print_success(done_msg);
            Ok(())
        }
    }
}

/// Run a command, capture its stdout, and return it as a `String`.
pub fn run_capture(program: &str, args: &[&str]) -> Result<String, WizardError> {
    let output = Command::new(program)
        .args(args)
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| not_found_or_io(program, e))?;

    if !output.status.success() {
        return Err(WizardError::CommandFailed(
            program.to_string(),
            output.status.code().unwrap_or(-1),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run a command with its combined stdout/stderr appended to `log`,
/// showing a spinner while it works. The child gets its own process
/// group so an interrupt can take the whole tree down; on ^C the group
/// is terminated and `Interrupted` comes back.
pub fn run_logged(
    program: &str,
    args: &[&str],
    log: &Path,
    spin_msg: &str,
) -> Result<(), WizardError> {
    let out = OpenOptions::new().append(true).create(true).open(log)?;
    let err = out.try_clone()?;

    let pb = ui::spinner(spin_msg);
    let result = wait_logged(program, args, out, err);
    pb.finish_and_clear();

    match result? {
        status if status.success() => Ok(()),
        status => Err(WizardError::CommandFailed(
            program.to_string(),
            status.code().unwrap_or(-1),
        )),
    }
}

fn wait_logged(
    program: &str,
    args: &[&str],
    out: File,
    err: File,
) -> Result<ExitStatus, WizardError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::from(out))
        .stderr(Stdio::from(err))
        .process_group(0)
        .spawn()
        .map_err(|e| not_found_or_io(program, e))?;

    loop {
        if signal::interrupted() {
            // Terminate the whole build tree, not just the direct child.
            unsafe {
                libc::killpg(child.id() as i32, libc::SIGTERM);
            }
            let _ = child.wait();
            return Err(WizardError::Interrupted);
        }
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        thread::sleep(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_returns_stdout() {
        let out = run_capture("sh", &["-c", "printf hello"]).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn missing_program_maps_to_not_found() {
        match run_capture("definitely-not-a-real-binary-9z", &[]) {
            Err(WizardError::CommandNotFound(name)) => {
                assert_eq!(name, "definitely-not-a-real-binary-9z");
            }
            other => panic!("expected CommandNotFound, got {other:?}"),
        }
    }

    #[test]
    fn nonzero_exit_maps_to_command_failed() {
        match run_capture("sh", &["-c", "exit 3"]) {
            Err(WizardError::CommandFailed(name, code)) => {
                assert_eq!(name, "sh");
                assert_eq!(code, 3);
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[test]
    fn logged_run_appends_both_streams() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("run.log");

        run_logged("sh", &["-c", "echo out; echo err >&2"], &log, "working").unwrap();
        run_logged("sh", &["-c", "echo again"], &log, "working").unwrap();

        let content = std::fs::read_to_string(&log).unwrap();
        assert!(content.contains("out"));
        assert!(content.contains("err"));
        assert!(content.contains("again"));
    }

    #[test]
    fn logged_run_reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("run.log");

        match run_logged("sh", &["-c", "echo doomed; exit 7"], &log, "working") {
            Err(WizardError::CommandFailed(_, code)) => assert_eq!(code, 7),
            other => panic!("expected CommandFailed, got {other:?}"),
        }
        assert!(std::fs::read_to_string(&log).unwrap().contains("doomed"));
    }
}

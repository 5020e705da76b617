mod args;
mod build;
mod catalog;
mod cleanup;
mod cmd;
mod config;
mod deps;
mod error;
mod lock;
mod persist;
mod signal;
mod ui;
mod validate;
mod wizard;

use error::WizardError;

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Handlers must be in place before anything can create temp files.
    signal::install();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = match run(&args) {
        Ok(()) => 0,
        Err(e) => {
            println!();
            if e.is_interrupt() {
                ui::print_warning("Interrupted.");
            } else {
                ui::print_error(&format!("{}", e));
                if e.is_usage() {
                    ui::print_info("Run 'mkosi-wizard --help' for usage.");
                }
            }
            e.exit_code()
        }
    };

    // Runs on success, error, and interrupt alike.
    cleanup::remove_all();
    std::process::exit(code);
}

fn run(args: &[String]) -> Result<(), WizardError> {
    let invocation = args::parse(args)?;
    if invocation.help {
        args::print_usage();
        return Ok(());
    }
    let mut config = invocation.config;

    // ── Welcome ───────────────────────────────────────────────────────────────
    if config.fullscreen {
        ui::clear_screen();
    }
    ui::print_banner();

    // ── Single instance ───────────────────────────────────────────────────────
    // Held for the rest of the run; dropping it on any return releases it.
    let workdir = std::env::current_dir()?;
    let _lock = lock::Lock::acquire(&workdir)?;

    // ── Build tool ────────────────────────────────────────────────────────────
    let mkosi = deps::ensure_mkosi(config.interactive)?;

    // ── Configuration ─────────────────────────────────────────────────────────
    if config.interactive {
        wizard::run(&mut config, &mut wizard::TermPrompt)?;
    } else {
        if !invocation.obs_mentioned && config.auto_detect_obs(&config::HostObsProbe) {
            ui::print_info("OBS repositories detected on the host; enabling the obs profile.");
        }
        if config.force_confirm
            && !wizard::confirm_configuration(&config, &mut wizard::TermPrompt)?
        {
            return Err(WizardError::Cancelled);
        }
    }

    if let Some(path) = &invocation.save_to {
        persist::save(&config, path)?;
        ui::print_success(&format!("Configuration saved to {}.", path.display()));
    }

    // ── Build ─────────────────────────────────────────────────────────────────
    build::run(&config, &mkosi)
}

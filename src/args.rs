use std::path::PathBuf;

use crate::{
    catalog::{Axis, OBS_PROFILE},
    config::{CleanMode, Config},
    error::WizardError,
    persist, ui,
    validate::{self, ListVerdict, Verdict},
};

// ── Parsed invocation ─────────────────────────────────────────────────────────

/// What one command line asks for, after validation.
#[derive(Debug)]
pub struct Invocation {
    pub config: Config,
    /// Write the final configuration here before building.
    pub save_to: Option<PathBuf>,
    /// The obs profile appeared literally in a `--profile` value. When it
    /// did, host auto-detection keeps its hands off the flag.
    pub obs_mentioned: bool,
    pub help: bool,
}

// ── Parser ────────────────────────────────────────────────────────────────────

/// Flags that never carry a value. The inline `=` form is refused for
/// these instead of silently dropping the value.
const NO_VALUE_FLAGS: &[&str] = &[
    "--help", "-h", "--debug", "--interactive", "-i", "--fullscreen", "-fs",
    "--confirm", "-c", "-w", "-f", "-ff",
];

/// Single left-to-right scan over the arguments (without argv[0]).
/// Value-bearing flags accept `--flag=value` and `--flag value`; in the
/// second form the next token must not look like a flag itself. Value-less
/// flags refuse an inline `=`. Any validation failure aborts the whole
/// invocation, so a bad flag never half-applies.
pub fn parse(args: &[String]) -> Result<Invocation, WizardError> {
    let mut config = Config::default();
    let mut save_to = None;
    let mut obs_mentioned = false;
    let mut help = false;

    // No arguments at all means the guided wizard.
    if args.is_empty() {
        config.interactive = true;
    }

    let mut i = 0;
    while i < args.len() {
        let (flag, inline) = split_flag(&args[i]);
        if inline.is_some() && NO_VALUE_FLAGS.contains(&flag) {
            return Err(WizardError::Usage(format!(
                "flag '{}' does not take an '=' value",
                flag
            )));
        }

        match flag {
            "--help" | "-h" => {
                help = true;
                break;
            }
            "--debug" => config.debug = true,
            "--interactive" | "-i" => config.interactive = true,
            "--fullscreen" | "-fs" => config.fullscreen = true,
            "--confirm" | "-c" => config.force_confirm = true,
            "-w" => config.wipe = true,
            "-f" | "-ff" => {
                config.clean_mode = if flag == "-f" {
                    CleanMode::CacheOnly
                } else {
                    CleanMode::CacheAndPackages
                };
                // A literal `clean` right after asks for a clean pass too.
                if args.get(i + 1).map(String::as_str) == Some("clean") {
                    config.clean_build = true;
                    i += 1;
                }
            }
            "--arch" => {
                let value = require_value(flag, inline, args, &mut i)?;
                config.architecture = match validate::check_architecture(&value) {
                    Verdict::Accepted => value,
                    Verdict::Normalized(canonical) => canonical,
                    Verdict::Unlisted(kept) => {
                        ui::print_warning(&format!(
                            "Architecture '{}' is not in the catalog; passing it through to mkosi.",
                            kept
                        ));
                        kept
                    }
                    Verdict::Rejected => return Err(reject(Axis::Architecture, &value)),
                };
            }
            "--dist" | "-d" => {
                let value = require_value(flag, inline, args, &mut i)?;
                match validate::check_distribution(&value) {
                    Verdict::Accepted => config.distribution = value,
                    _ => return Err(reject(Axis::Distribution, &value)),
                }
            }
            "--profile" => {
                let value = require_value(flag, inline, args, &mut i)?;
                match validate::check_profiles(&value) {
                    ListVerdict::Accepted(set) => {
                        if set.contains(OBS_PROFILE) {
                            obs_mentioned = true;
                        }
                        config.set_profiles(set);
                    }
                    ListVerdict::Rejected { token } => {
                        return Err(reject(Axis::Profile, &token));
                    }
                }
            }
            "--root-password" => {
                config.root_password = Some(require_value(flag, inline, args, &mut i)?);
            }
            "--save-config" => {
                let path = optional_value(inline, args, &mut i)
                    .map(PathBuf::from)
                    .unwrap_or_else(persist::default_path);
                save_to = Some(path);
            }
            "--load-config" => {
                let path = optional_value(inline, args, &mut i)
                    .map(PathBuf::from)
                    .unwrap_or_else(persist::default_path);
                // Applied in place: flags after this one override the file,
                // flags before it are overridden. A missing file only warns.
                config = persist::load(&path);
            }
            _ => {
                return Err(WizardError::Usage(format!(
                    "unrecognized argument '{}'",
                    args[i]
                )));
            }
        }
        i += 1;
    }

    Ok(Invocation { config, save_to, obs_mentioned, help })
}

// ── Token helpers ─────────────────────────────────────────────────────────────

/// Splits `--flag=value` into the flag and its inline value.
fn split_flag(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((flag, value)) => (flag, Some(value)),
        None => (token, None),
    }
}

/// Value for a flag that requires one: inline `=` form wins, otherwise
/// the next token is consumed unless it starts with `-`.
fn require_value(
    flag: &str,
    inline: Option<&str>,
    args: &[String],
    i: &mut usize,
) -> Result<String, WizardError> {
    if let Some(v) = inline {
        return Ok(v.to_string());
    }
    match args.get(*i + 1) {
        Some(next) if !next.starts_with('-') => {
            *i += 1;
            Ok(next.clone())
        }
        _ => Err(WizardError::Usage(format!("missing argument for '{}'", flag))),
    }
}

/// Same, but for flags where the value may be left out.
fn optional_value(inline: Option<&str>, args: &[String], i: &mut usize) -> Option<String> {
    if let Some(v) = inline {
        return Some(v.to_string());
    }
    match args.get(*i + 1) {
        Some(next) if !next.starts_with('-') => {
            *i += 1;
            Some(next.clone())
        }
        _ => None,
    }
}

fn reject(axis: Axis, value: &str) -> WizardError {
    ui::print_error(&format!("Invalid {} '{}'. Valid values:", axis.name(), value));
    println!();
    ui::print_catalog(axis.title(), &axis.rows(), None, None);
    WizardError::Validation {
        axis: axis.name(),
        value: value.to_string(),
    }
}

// ── Usage ─────────────────────────────────────────────────────────────────────

pub fn print_usage() {
    println!(
        "\
Usage: mkosi-wizard [OPTIONS]

Run without arguments to configure interactively.

Options:
  --arch VALUE            target architecture (aliases like amd64 accepted)
  -d, --dist VALUE        target distribution
  --profile LIST          comma-separated profiles; an empty LIST clears them
  --root-password VALUE   root password baked into the image
  --debug                 verbose mkosi output
  -i, --interactive       force the guided wizard
  -fs, --fullscreen       clear the screen before the banner
  -f [clean]              rebuild the image; with 'clean', run a clean pass first
  -ff [clean]             also rebuild the package cache
  -w                      start mkosi with a fresh workspace
  -c, --confirm           show the configuration and ask before building
  --save-config [FILE]    write the configuration to FILE
  --load-config [FILE]    read the configuration from FILE before later flags
  -h, --help              show this help

FILE defaults to ~/.config/mkosi-wizard/config."
    );
}

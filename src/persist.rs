use std::{
    fs,
    io::Write,
    os::unix::fs::{OpenOptionsExt, PermissionsExt},
    path::{Path, PathBuf},
};

use crate::{
    config::{CleanMode, Config},
    error::WizardError,
    ui,
    validate::{self, ListVerdict, Verdict},
};

/// Default location: `~/.config/mkosi-wizard/config`.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mkosi-wizard")
        .join("config")
}

// ── Save ──────────────────────────────────────────────────────────────────────

/// Writes the configuration as `KEY="value"` lines, owner read/write only.
/// The root password never lands here; it only ever reaches the
/// restricted side file consumed by mkosi.
pub fn save(config: &Config, path: &Path) -> Result<(), WizardError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let flag = |b: bool| if b { "1" } else { "0" };
    let mut out = String::new();
    out.push_str(&format!("ARCHITECTURE=\"{}\"\n", config.architecture));
    out.push_str(&format!("DISTRIBUTION=\"{}\"\n", config.distribution));
    out.push_str(&format!("PROFILES=\"{}\"\n", config.profiles.join()));
    out.push_str(&format!("CLEAN_MODE=\"{}\"\n", config.clean_mode.as_str()));
    out.push_str(&format!("DEBUG=\"{}\"\n", flag(config.debug)));
    out.push_str(&format!("INTERACTIVE=\"{}\"\n", flag(config.interactive)));
    out.push_str(&format!("CONFIRM=\"{}\"\n", flag(config.force_confirm)));
    out.push_str(&format!("CLEAN_BUILD=\"{}\"\n", flag(config.clean_build)));
    out.push_str(&format!("FULLSCREEN=\"{}\"\n", flag(config.fullscreen)));
    out.push_str(&format!("WIPE=\"{}\"\n", flag(config.wipe)));

    let mut f = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    f.write_all(out.as_bytes())?;

    // mode() only applies on creation; tighten pre-existing files too.
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Reads a file written by `save`, re-validating every field. Fields that
/// fail validation fall back to their defaults with a warning; a missing
/// or unreadable file just yields the defaults. Loading never aborts.
pub fn load(path: &Path) -> Config {
    let defaults = Config::default();
    let mut config = defaults.clone();

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => {
            ui::print_warning(&format!(
                "No config file at {}, using defaults.",
                path.display()
            ));
            return config;
        }
    };

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.splitn(2, '=');
        let (key, raw) = match (parts.next(), parts.next()) {
            (Some(k), Some(v)) => (k.trim(), v.trim()),
            _ => continue,
        };
        let value = unquote(raw);

        match key {
            "ARCHITECTURE" => match validate::check_architecture(value) {
                Verdict::Accepted => config.architecture = value.to_string(),
                Verdict::Normalized(canonical) => config.architecture = canonical,
                Verdict::Unlisted(kept) => {
                    ui::print_warning(&format!(
                        "Architecture '{}' from the config file is not in the catalog, keeping it.",
                        kept
                    ));
                    config.architecture = kept;
                }
                Verdict::Rejected => {
                    warn_reset(key, value);
                    config.architecture = defaults.architecture.clone();
                }
            },
            "DISTRIBUTION" => match validate::check_distribution(value) {
                Verdict::Accepted => config.distribution = value.to_string(),
                _ => {
                    warn_reset(key, value);
                    config.distribution = defaults.distribution.clone();
                }
            },
            "PROFILES" => match validate::check_profiles(value) {
                ListVerdict::Accepted(set) => config.set_profiles(set),
                ListVerdict::Rejected { token } => {
                    warn_reset(key, &token);
                    config.set_profiles(defaults.profiles.clone());
                }
            },
            "CLEAN_MODE" => match CleanMode::from_str(value) {
                Some(mode) => config.clean_mode = mode,
                None => {
                    warn_reset(key, value);
                    config.clean_mode = defaults.clean_mode;
                }
            },
            "DEBUG"       => config.debug = load_flag(key, value, defaults.debug),
            "INTERACTIVE" => config.interactive = load_flag(key, value, defaults.interactive),
            "CONFIRM"     => config.force_confirm = load_flag(key, value, defaults.force_confirm),
            "CLEAN_BUILD" => config.clean_build = load_flag(key, value, defaults.clean_build),
            "FULLSCREEN"  => config.fullscreen = load_flag(key, value, defaults.fullscreen),
            "WIPE"        => config.wipe = load_flag(key, value, defaults.wipe),
            _ => {
                ui::print_warning(&format!("Ignoring unknown config key '{}'.", key));
            }
        }
    }

    config
}

fn unquote(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(raw)
}

fn warn_reset(key: &str, value: &str) {
    ui::print_warning(&format!(
        "Invalid {} '{}' in the config file, falling back to the default.",
        key, value
    ));
}

fn load_flag(key: &str, value: &str, default: bool) -> bool {
    match value {
        "1" => true,
        "0" => false,
        _ => {
            warn_reset(key, value);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileSet;

    fn sample() -> Config {
        let mut cfg = Config::default();
        cfg.architecture = "aarch64".to_string();
        cfg.distribution = "debian".to_string();
        cfg.set_profiles(ProfileSet::from_list("desktop,gnome,obs"));
        cfg.clean_mode = CleanMode::CacheAndPackages;
        cfg.debug = true;
        cfg.force_confirm = true;
        cfg.clean_build = true;
        cfg.wipe = true;
        cfg
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");

        let mut cfg = sample();
        cfg.root_password = Some("swordfish1".to_string());
        save(&cfg, &path).unwrap();

        let loaded = load(&path);
        cfg.root_password = None;
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn config_file_is_owner_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");

        save(&sample(), &path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn password_never_reaches_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");

        let mut cfg = sample();
        cfg.root_password = Some("swordfish1".to_string());
        save(&cfg, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("swordfish1"));
        assert!(!content.to_ascii_lowercase().contains("password"));
    }

    #[test]
    fn invalid_fields_reset_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(
            &path,
            concat!(
                "DISTRIBUTION=\"slackware\"\n",
                "PROFILES=\"desktop,bogus\"\n",
                "CLEAN_MODE=\"sparkling\"\n",
                "DEBUG=\"maybe\"\n",
                "WIPE=\"1\"\n",
            ),
        )
        .unwrap();

        let loaded = load(&path);
        let defaults = Config::default();
        assert_eq!(loaded.distribution, defaults.distribution);
        assert!(loaded.profiles.is_empty());
        assert_eq!(loaded.clean_mode, CleanMode::None);
        assert!(!loaded.debug);
        // The one valid line still applies.
        assert!(loaded.wipe);
    }

    #[test]
    fn architecture_aliases_normalize_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "ARCHITECTURE=\"amd64\"\n").unwrap();

        assert_eq!(load(&path).architecture, "x86_64");
    }

    #[test]
    fn unlisted_architecture_survives_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "ARCHITECTURE=\"loongarch64\"\n").unwrap();

        assert_eq!(load(&path).architecture, "loongarch64");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load(&dir.path().join("nope"));
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn obs_flag_tracks_loaded_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "PROFILES=\"desktop,obs\"\n").unwrap();

        let loaded = load(&path);
        assert!(loaded.obs_enabled);
        assert_eq!(loaded.profiles.join(), "desktop,obs");
    }
}

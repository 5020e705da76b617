use std::{fs, path::Path};

use crate::catalog::{self, OBS_PROFILE};

// ── Profile set ───────────────────────────────────────────────────────────────

/// Ordered set of profile tokens. First-seen order is kept, duplicates
/// collapse, and the wire form is a comma join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSet(Vec<String>);

impl ProfileSet {
    /// Parses a comma-separated list. Blank tokens are dropped, so
    /// `"desktop,,gnome,"` equals `"desktop,gnome"`.
    pub fn from_list(list: &str) -> Self {
        let mut set = ProfileSet::default();
        for token in list.split(',') {
            let token = token.trim();
            if !token.is_empty() {
                set.insert(token);
            }
        }
        set
    }

    pub fn insert(&mut self, token: &str) {
        if !self.contains(token) {
            self.0.push(token.to_string());
        }
    }

    pub fn remove(&mut self, token: &str) {
        self.0.retain(|t| t != token);
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|t| t == token)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Canonical comma-joined form, as passed to mkosi and the config file.
    pub fn join(&self) -> String {
        self.0.join(",")
    }
}

// ── Clean mode ────────────────────────────────────────────────────────────────

/// How much of mkosi's cached state to discard before building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleanMode {
    /// Reuse everything from the previous build.
    #[default]
    None,
    /// Rebuild the image from scratch (`-f`).
    CacheOnly,
    /// Also drop the package cache (`-ff`).
    CacheAndPackages,
    /// `-ff` plus an explicit `mkosi clean` pass first.
    FullClean,
}

impl CleanMode {
    /// Token used in the persisted config file.
    pub fn as_str(self) -> &'static str {
        match self {
            CleanMode::None             => "none",
            CleanMode::CacheOnly        => "cache",
            CleanMode::CacheAndPackages => "cache-packages",
            CleanMode::FullClean        => "full",
        }
    }

    pub fn from_str(token: &str) -> Option<Self> {
        match token {
            "none"           => Some(CleanMode::None),
            "cache"          => Some(CleanMode::CacheOnly),
            "cache-packages" => Some(CleanMode::CacheAndPackages),
            "full"           => Some(CleanMode::FullClean),
            _                => None,
        }
    }

    /// Human-readable label for prompts and the summary box.
    pub fn display_name(self) -> &'static str {
        match self {
            CleanMode::None             => "keep caches (incremental build)",
            CleanMode::CacheOnly        => "rebuild image, keep package cache",
            CleanMode::CacheAndPackages => "rebuild image and package cache",
            CleanMode::FullClean        => "full clean before building",
        }
    }
}

// ── OBS probe ─────────────────────────────────────────────────────────────────

/// Host-side check for whether OBS package repositories are in use.
/// A trait so the detection logic stays testable without a real host.
pub trait ObsProbe {
    fn obs_active(&self) -> bool;
}

/// Looks for OBS repository URLs in the host's package-manager config.
pub struct HostObsProbe;

impl ObsProbe for HostObsProbe {
    fn obs_active(&self) -> bool {
        ["/etc/zypp/repos.d", "/etc/yum.repos.d"]
            .iter()
            .any(|dir| dir_mentions_obs(Path::new(dir)))
    }
}

fn dir_mentions_obs(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    for entry in entries.flatten() {
        if let Ok(body) = fs::read_to_string(entry.path()) {
            if body.contains("build.opensuse.org")
                || body.contains("download.opensuse.org/repositories")
            {
                return true;
            }
        }
    }
    false
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Everything one mkosi invocation is driven by. Built from defaults, then
/// mutated by the argument parser and/or the interactive wizard, then handed
/// read-only to the build step.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub architecture: String,
    pub distribution: String,
    pub profiles: ProfileSet,
    /// Never logged, never written to the plain config file.
    pub root_password: Option<String>,
    pub debug: bool,
    pub interactive: bool,
    pub force_confirm: bool,
    pub clean_build: bool,
    pub fullscreen: bool,
    pub wipe: bool,
    pub clean_mode: CleanMode,
    /// Mirrors whether `"obs"` is in `profiles`. Kept in sync by every
    /// mutation path; never set directly.
    pub obs_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            architecture: catalog::normalize_architecture(std::env::consts::ARCH).to_string(),
            distribution: catalog::DEFAULT_DISTRIBUTION.to_string(),
            profiles: ProfileSet::default(),
            root_password: None,
            debug: false,
            interactive: false,
            force_confirm: false,
            clean_build: false,
            fullscreen: false,
            wipe: false,
            clean_mode: CleanMode::None,
            obs_enabled: false,
        }
    }
}

impl Config {
    /// Replaces the whole profile set, keeping the obs flag in lockstep.
    pub fn set_profiles(&mut self, profiles: ProfileSet) {
        self.obs_enabled = profiles.contains(OBS_PROFILE);
        self.profiles = profiles;
    }

    /// Adds or removes the obs profile token. Safe to call repeatedly;
    /// the rest of the profile list keeps its order.
    pub fn toggle_obs(&mut self, enabled: bool) {
        if enabled {
            self.profiles.insert(OBS_PROFILE);
        } else {
            self.profiles.remove(OBS_PROFILE);
        }
        self.obs_enabled = enabled;
    }

    /// Switches the obs profile on when the host itself pulls from OBS
    /// repositories. Never switches it off. Returns true on a flip so the
    /// caller can tell the user.
    pub fn auto_detect_obs(&mut self, probe: &dyn ObsProbe) -> bool {
        if self.obs_enabled || !probe.obs_active() {
            return false;
        }
        self.toggle_obs(true);
        true
    }

    /// Rows for the confirmation box. The password itself never appears,
    /// only whether one is set.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let profiles = if self.profiles.is_empty() {
            "(none)".to_string()
        } else {
            self.profiles.join()
        };
        let password = if self.root_password.is_some() { "set" } else { "not set" };

        let mut rows = vec![
            ("Architecture", self.architecture.clone()),
            ("Distribution", self.distribution.clone()),
            ("Profiles",     profiles),
            ("Root passwd",  password.to_string()),
            ("Cleanup",      self.clean_mode.display_name().to_string()),
        ];
        if self.clean_build {
            rows.push(("Clean pass", "mkosi clean before build".to_string()));
        }
        if self.debug {
            rows.push(("Debug", "on".to_string()));
        }
        if self.wipe {
            rows.push(("Workspace", "wipe before build".to_string()));
        }
        rows
    }
}

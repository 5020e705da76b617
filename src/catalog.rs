// ── Entries ───────────────────────────────────────────────────────────────────

/// One allowed value for a configuration option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionEntry {
    pub key: &'static str,
    pub description: &'static str,
}

// ── Catalogs ──────────────────────────────────────────────────────────────────
//
// Order matters: it is the display order in every prompt and help text, and
// the first entry doubles as the hard-coded default where one exists.

/// CPU architectures offered by name. mkosi itself accepts more; anything
/// outside this list is passed through with a warning.
pub const ARCHITECTURES: &[OptionEntry] = &[
    OptionEntry { key: "x86_64",  description: "64-bit PC (Intel/AMD)" },
    OptionEntry { key: "aarch64", description: "64-bit ARM" },
    OptionEntry { key: "riscv64", description: "64-bit RISC-V" },
    OptionEntry { key: "ppc64le", description: "POWER9+, little-endian" },
    OptionEntry { key: "s390x",   description: "IBM Z" },
];

/// Distributions the image definitions support. Strict: nothing outside
/// this list builds.
pub const DISTRIBUTIONS: &[OptionEntry] = &[
    OptionEntry { key: "fedora",   description: "Fedora Linux" },
    OptionEntry { key: "centos",   description: "CentOS Stream" },
    OptionEntry { key: "debian",   description: "Debian" },
    OptionEntry { key: "ubuntu",   description: "Ubuntu" },
    OptionEntry { key: "opensuse", description: "openSUSE Tumbleweed" },
    OptionEntry { key: "arch",     description: "Arch Linux" },
];

/// Optional feature bundles stacked on the base image.
pub const PROFILES: &[OptionEntry] = &[
    OptionEntry { key: "desktop", description: "graphical base (Wayland, PipeWire)" },
    OptionEntry { key: "gnome",   description: "GNOME desktop environment" },
    OptionEntry { key: "kde",     description: "KDE Plasma desktop environment" },
    OptionEntry { key: "dev",     description: "compilers, debuggers, headers" },
    OptionEntry { key: "obs",     description: "pull extra packages from OBS" },
];

pub const DEFAULT_ARCHITECTURE: &str = "x86_64";
pub const DEFAULT_DISTRIBUTION: &str = "fedora";

/// The profile token tied to the OBS package source flag.
pub const OBS_PROFILE: &str = "obs";

// ── Architecture aliases ──────────────────────────────────────────────────────

/// Alternate spellings silently rewritten to the canonical key.
const ARCH_ALIASES: &[(&str, &str)] = &[
    ("amd64",   "x86_64"),
    ("x86-64",  "x86_64"),
    ("x64",     "x86_64"),
    ("arm64",   "aarch64"),
    ("riscv",   "riscv64"),
    ("ppc64el", "ppc64le"),
];

/// Rewrites a known alias (e.g. "amd64") to its canonical key ("x86_64").
/// Unknown spellings come back unchanged.
pub fn normalize_architecture(token: &str) -> &str {
    for (alias, canonical) in ARCH_ALIASES {
        if *alias == token {
            return canonical;
        }
    }
    token
}

// ── Profile recommendations ───────────────────────────────────────────────────

/// Profiles that rarely make sense without a companion profile, and the
/// note shown when they stand alone.
pub const RECOMMENDATIONS: &[(&str, &str, &str)] = &[
    ("gnome", "desktop", "GNOME images usually need the desktop base profile"),
    ("kde",   "desktop", "KDE images usually need the desktop base profile"),
];

/// Returns `(recommended_base, note)` when `profile` is discouraged from
/// standing alone.
pub fn recommendation_for(profile: &str) -> Option<(&'static str, &'static str)> {
    RECOMMENDATIONS
        .iter()
        .find(|(p, _, _)| *p == profile)
        .map(|(_, base, note)| (*base, *note))
}

/// Profiles that recommend `base` as their companion, in catalog order.
pub fn addons_of(base: &str) -> Vec<&'static str> {
    RECOMMENDATIONS
        .iter()
        .filter(|(_, b, _)| *b == base)
        .map(|(p, _, _)| *p)
        .collect()
}

// ── Axes ──────────────────────────────────────────────────────────────────────

/// The three option families validated against a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Architecture,
    Distribution,
    Profile,
}

impl Axis {
    /// Lowercase noun for messages ("invalid distribution 'foo'").
    pub fn name(self) -> &'static str {
        match self {
            Axis::Architecture => "architecture",
            Axis::Distribution => "distribution",
            Axis::Profile      => "profile",
        }
    }

    /// Title used above the rendered catalog table.
    pub fn title(self) -> &'static str {
        match self {
            Axis::Architecture => "Architectures",
            Axis::Distribution => "Distributions",
            Axis::Profile      => "Profiles",
        }
    }

    /// The ordered catalog for this axis.
    pub fn catalog(self) -> &'static [OptionEntry] {
        match self {
            Axis::Architecture => ARCHITECTURES,
            Axis::Distribution => DISTRIBUTIONS,
            Axis::Profile      => PROFILES,
        }
    }

    /// Exact, case-sensitive membership test.
    pub fn lists(self, token: &str) -> bool {
        self.catalog().iter().any(|e| e.key == token)
    }

    /// Catalog as (key, description) rows for the ui table helper.
    pub fn rows(self) -> Vec<(&'static str, &'static str)> {
        self.catalog().iter().map(|e| (e.key, e.description)).collect()
    }
}

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// ── Terminal helpers ──────────────────────────────────────────────────────────

fn term_width() -> usize {
    Term::stdout().size().1.max(60) as usize
}

/// Wipes the terminal. Used by `--fullscreen` before the banner.
pub fn clear_screen() {
    let _ = Term::stdout().clear_screen();
}

// ── Banner ────────────────────────────────────────────────────────────────────

pub fn print_banner() {
    // ASCII-art title in block letters (fits in ~45 columns)
    let logo = [
        r"   ███╗░░░███╗██╗░░██╗░█████╗░░██████╗██╗",
        r"   ████╗░████║██║░██╔╝██╔══██╗██╔════╝██║",
        r"   ██╔████╔██║█████╔╝░██║░░██║╚█████╗░██║",
        r"   ██║╚██╔╝██║██╔═██╗░██║░░██║░╚═══██╗██║",
        r"   ██║░╚═╝░██║██║░╚██╗╚█████╔╝██████╔╝██║",
        r"   ╚═╝░░░░░╚═╝╚═╝░░╚═╝░╚════╝░╚═════╝░╚═╝",
    ];

    println!();
    for line in &logo {
        println!("{}", style(line).cyan().bold());
    }
    println!();
    println!(
        "{}",
        style("   Image Build Wizard  ·  mkosi front end  ·  v0.1.0")
            .dim()
            .italic()
    );
    println!();
    println!("{}", style("─".repeat(term_width().min(52))).dim());
    println!();
}

// ── Step header ───────────────────────────────────────────────────────────────

/// Prints a visually distinct numbered step header.
pub fn print_step(step: u8, total: u8, title: &str) {
    println!();
    let tag = style(format!(" {}/{} ", step, total)).black().on_cyan().bold();
    let heading = style(format!("  {}", title)).white().bold();
    println!("{}{}", tag, heading);
    println!("{}", style("─".repeat(term_width().min(52))).dim());
}

// ── Feedback messages ─────────────────────────────────────────────────────────

/// Green ✓ — operation completed successfully.
pub fn print_success(msg: &str) {
    println!("  {}  {}", style("✓").green().bold(), style(msg).green());
}

/// Blue → — neutral info / progress note.
pub fn print_info(msg: &str) {
    println!("  {}  {}", style("→").blue().bold(), msg);
}

/// Yellow ⚠  — non-fatal notice.
pub fn print_warning(msg: &str) {
    println!("  {}  {}", style("⚠").yellow().bold(), style(msg).yellow());
}

/// Red ✗ — error (written to stderr).
pub fn print_error(msg: &str) {
    eprintln!("  {}  {}", style("✗").red().bold(), style(msg).red());
}

// ── Info box ──────────────────────────────────────────────────────────────────

/// Renders a bordered key→value box in the terminal.
///
/// ```text
/// ┌─ Build Configuration ─────────────┐
/// │  Architecture  x86_64             │
/// │  Distribution  fedora             │
/// │  Profiles      desktop,gnome      │
/// └───────────────────────────────────┘
/// ```
pub fn print_kv_box(title: &str, rows: &[(&str, &str)]) {
    const BOX_INNER: usize = 38;

    let dashes = "─".repeat(BOX_INNER.saturating_sub(title.chars().count() + 2));
    println!(
        "  ┌─ {} {}┐",
        style(title).white().bold(),
        style(&dashes).dim()
    );

    for (key, val) in rows {
        println!(
            "  │  {:<13}{}",
            style(*key).dim(),
            style(*val).white().bold()
        );
    }

    println!("  └{}┘", style("─".repeat(BOX_INNER + 2)).dim());
}

// ── Catalog table ─────────────────────────────────────────────────────────────

/// Renders the allowed values for one option. The current selection gets a
/// cyan bullet, the hard-coded default a dim suffix.
pub fn print_catalog(
    title: &str,
    rows: &[(&str, &str)],
    current: Option<&str>,
    default: Option<&str>,
) {
    const BOX_INNER: usize = 38;

    let dashes = "─".repeat(BOX_INNER.saturating_sub(title.chars().count() + 2));
    println!(
        "  ┌─ {} {}┐",
        style(title).white().bold(),
        style(&dashes).dim()
    );

    for (token, desc) in rows {
        let mark = if current == Some(*token) { "●" } else { " " };
        let suffix = if default == Some(*token) { "  (default)" } else { "" };
        println!(
            "  │ {} {}{}{}",
            style(mark).cyan().bold(),
            style(format!("{:<14}", token)).white().bold(),
            style(*desc).dim(),
            style(suffix).dim().italic()
        );
    }

    println!("  └{}┘", style("─".repeat(BOX_INNER + 2)).dim());
}

// ── Spinner ───────────────────────────────────────────────────────────────────

/// Returns a running braille spinner.
/// Call `pb.finish_and_clear()` when done.
pub fn spinner(msg: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan.bold}  {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

use crate::{
    catalog::{Axis, DEFAULT_DISTRIBUTION},
    config::Config,
    error::WizardError,
    ui,
    validate::{self, Verdict},
    wizard::Prompt,
};

/// Distribution selection. Strict: only catalog entries build, so the loop
/// holds until one is given.
pub fn run(config: &mut Config, prompt: &mut dyn Prompt) -> Result<(), WizardError> {
    println!();
    ui::print_catalog(
        Axis::Distribution.title(),
        &Axis::Distribution.rows(),
        Some(config.distribution.as_str()),
        Some(DEFAULT_DISTRIBUTION),
    );
    println!();

    loop {
        let value = prompt.input("Distribution", &config.distribution)?;
        match validate::check_distribution(&value) {
            Verdict::Accepted => {
                config.distribution = value;
                return Ok(());
            }
            Verdict::Normalized(canonical) => {
                config.distribution = canonical;
                return Ok(());
            }
            Verdict::Unlisted(_) | Verdict::Rejected => {
                ui::print_warning(&format!("'{}' is not a supported distribution.", value));
            }
        }
    }
}

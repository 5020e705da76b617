use crate::{config::Config, error::WizardError, ui, wizard::Prompt};

/// OBS package source. A plain yes/no; the answer is folded into the
/// profile list so both views of the flag stay consistent.
pub fn run(config: &mut Config, prompt: &mut dyn Prompt) -> Result<(), WizardError> {
    println!();
    ui::print_info("OBS builds pull extra packages from the Open Build Service.");
    let enabled = prompt.confirm("Pull packages from OBS?", config.obs_enabled)?;
    config.toggle_obs(enabled);
    Ok(())
}

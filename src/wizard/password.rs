use crate::{config::Config, error::WizardError, ui, wizard::Prompt};

/// Anything shorter gets a warning and an explicit override prompt.
const MIN_LENGTH: usize = 8;

/// Root password entry: blank skips, otherwise two matching entries are
/// required. The value only ever lands in `config.root_password`; it is
/// never echoed, logged, or written to the plain config file.
pub fn run(config: &mut Config, prompt: &mut dyn Prompt) -> Result<(), WizardError> {
    println!();
    loop {
        let first = prompt.password("Root password (empty to skip)")?;
        if first.is_empty() {
            if config.root_password.is_some() {
                ui::print_info("Keeping the previously entered root password.");
            } else {
                ui::print_info("No root password will be set.");
            }
            return Ok(());
        }

        if first.chars().count() < MIN_LENGTH {
            ui::print_warning(&format!(
                "That password is shorter than {} characters.",
                MIN_LENGTH
            ));
            if !prompt.confirm("Use it anyway?", false)? {
                continue;
            }
        }

        let second = prompt.password("Repeat password")?;
        if first == second {
            config.root_password = Some(first);
            ui::print_success("Root password recorded.");
            return Ok(());
        }
        ui::print_warning("The entries do not match; starting over.");
    }
}

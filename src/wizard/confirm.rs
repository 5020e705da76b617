use crate::{config::Config, error::WizardError, ui, wizard::Prompt};

/// Final gate: show the whole resolved configuration, then ask. `false`
/// sends the caller back to the first stage.
pub fn run(config: &Config, prompt: &mut dyn Prompt) -> Result<bool, WizardError> {
    println!();
    let summary = config.summary();
    let rows: Vec<(&str, &str)> = summary.iter().map(|(k, v)| (*k, v.as_str())).collect();
    ui::print_kv_box("Build Configuration", &rows);
    println!();

    let accepted = prompt.confirm("Build with this configuration?", true)?;
    if !accepted {
        ui::print_info("Starting over from the first step.");
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::script::{Reply, Scripted};

    #[test]
    fn acceptance_and_rejection_pass_through() {
        let config = Config::default();

        let mut yes = Scripted::new(vec![Reply::Confirm(true)]);
        assert!(run(&config, &mut yes).unwrap());

        let mut no = Scripted::new(vec![Reply::Confirm(false)]);
        assert!(!run(&config, &mut no).unwrap());
    }
}

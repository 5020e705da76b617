use crate::{
    catalog::{Axis, DEFAULT_ARCHITECTURE},
    config::Config,
    error::WizardError,
    ui,
    validate::{self, Verdict},
    wizard::Prompt,
};

/// Architecture selection. Free text with alias rewriting; values outside
/// the catalog go through once the user insists.
pub fn run(config: &mut Config, prompt: &mut dyn Prompt) -> Result<(), WizardError> {
    println!();
    ui::print_catalog(
        Axis::Architecture.title(),
        &Axis::Architecture.rows(),
        Some(config.architecture.as_str()),
        Some(DEFAULT_ARCHITECTURE),
    );
    println!();

    loop {
        let value = prompt.input("Target architecture", &config.architecture)?;
        match validate::check_architecture(&value) {
            Verdict::Accepted => {
                config.architecture = value;
                return Ok(());
            }
            Verdict::Normalized(canonical) => {
                ui::print_info(&format!("Using '{}' for '{}'.", canonical, value));
                config.architecture = canonical;
                return Ok(());
            }
            Verdict::Unlisted(kept) => {
                ui::print_warning(&format!(
                    "'{}' is not in the catalog; mkosi may still support it.",
                    kept
                ));
                if prompt.confirm("Use it anyway?", true)? {
                    config.architecture = kept;
                    return Ok(());
                }
            }
            Verdict::Rejected => {
                ui::print_warning("The architecture cannot be empty.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::script::{Reply, Scripted};

    #[test]
    fn alias_input_lands_canonical() {
        let mut config = Config::default();
        let mut prompt = Scripted::new(vec![Reply::Text("amd64")]);

        run(&mut config, &mut prompt).unwrap();
        assert_eq!(config.architecture, "x86_64");
        assert!(prompt.exhausted());
    }

    #[test]
    fn empty_input_keeps_the_current_value() {
        let mut config = Config::default();
        config.architecture = "s390x".to_string();
        let mut prompt = Scripted::new(vec![Reply::Text("")]);

        run(&mut config, &mut prompt).unwrap();
        assert_eq!(config.architecture, "s390x");
    }

    #[test]
    fn declined_unlisted_value_reprompts() {
        let mut config = Config::default();
        let mut prompt = Scripted::new(vec![
            Reply::Text("sparc64"),
            Reply::Confirm(false),
            Reply::Text("riscv64"),
        ]);

        run(&mut config, &mut prompt).unwrap();
        assert_eq!(config.architecture, "riscv64");
        assert!(prompt.exhausted());
    }

    #[test]
    fn accepted_unlisted_value_sticks() {
        let mut config = Config::default();
        let mut prompt = Scripted::new(vec![Reply::Text("loongarch64"), Reply::Confirm(true)]);

        run(&mut config, &mut prompt).unwrap();
        assert_eq!(config.architecture, "loongarch64");
    }
}

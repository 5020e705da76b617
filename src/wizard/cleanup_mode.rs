use crate::{
    config::{CleanMode, Config},
    error::WizardError,
    ui,
    wizard::Prompt,
};

/// Display order of the cleanup levels, least to most destructive.
const MODES: &[CleanMode] = &[
    CleanMode::None,
    CleanMode::CacheOnly,
    CleanMode::CacheAndPackages,
    CleanMode::FullClean,
];

/// Cleanup level selection. Picking the full clean also schedules the
/// explicit `mkosi clean` pass; picking anything else cancels it.
pub fn run(config: &mut Config, prompt: &mut dyn Prompt) -> Result<(), WizardError> {
    println!();
    let rows: Vec<(&str, &str)> = MODES
        .iter()
        .map(|m| (m.as_str(), m.display_name()))
        .collect();
    ui::print_catalog(
        "Cleanup Levels",
        &rows,
        Some(config.clean_mode.as_str()),
        Some(CleanMode::None.as_str()),
    );
    println!();

    loop {
        let value = prompt.input("Cleanup level", config.clean_mode.as_str())?;
        match CleanMode::from_str(value.trim()) {
            Some(mode) => {
                config.clean_mode = mode;
                config.clean_build = mode == CleanMode::FullClean;
                return Ok(());
            }
            None => ui::print_warning(&format!("'{}' is not a cleanup level.", value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::script::{Reply, Scripted};

    #[test]
    fn full_schedules_the_clean_pass() {
        let mut config = Config::default();
        let mut prompt = Scripted::new(vec![Reply::Text("full")]);

        run(&mut config, &mut prompt).unwrap();
        assert_eq!(config.clean_mode, CleanMode::FullClean);
        assert!(config.clean_build);
    }

    #[test]
    fn lesser_levels_cancel_a_scheduled_clean_pass() {
        let mut config = Config::default();
        config.clean_mode = CleanMode::FullClean;
        config.clean_build = true;
        let mut prompt = Scripted::new(vec![Reply::Text("cache")]);

        run(&mut config, &mut prompt).unwrap();
        assert_eq!(config.clean_mode, CleanMode::CacheOnly);
        assert!(!config.clean_build);
    }

    #[test]
    fn unknown_level_holds_the_loop() {
        let mut config = Config::default();
        let mut prompt = Scripted::new(vec![
            Reply::Text("sparkling"),
            Reply::Text("cache-packages"),
        ]);

        run(&mut config, &mut prompt).unwrap();
        assert_eq!(config.clean_mode, CleanMode::CacheAndPackages);
        assert!(prompt.exhausted());
    }

    #[test]
    fn empty_input_keeps_the_current_level() {
        let mut config = Config::default();
        config.clean_mode = CleanMode::CacheOnly;
        let mut prompt = Scripted::new(vec![Reply::Text("")]);

        run(&mut config, &mut prompt).unwrap();
        assert_eq!(config.clean_mode, CleanMode::CacheOnly);
    }
}

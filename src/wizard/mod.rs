mod arch;
mod cleanup_mode;
mod confirm;
mod dist;
mod obs;
mod password;
mod profile;

use dialoguer::{Confirm, Input, Password};

use crate::{config::Config, error::WizardError, signal, ui};

// ── Prompt seam ───────────────────────────────────────────────────────────────

/// The terminal interactions a stage can ask for. A trait so the whole
/// stage sequence also runs against scripted input in tests.
pub trait Prompt {
    /// Free-text input; an empty submission yields `default`.
    fn input(&mut self, prompt: &str, default: &str) -> Result<String, WizardError>;
    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, WizardError>;
    /// Hidden input; empty means "skip".
    fn password(&mut self, prompt: &str) -> Result<String, WizardError>;
}

/// Real terminal prompts via dialoguer.
pub struct TermPrompt;

impl Prompt for TermPrompt {
    fn input(&mut self, prompt: &str, default: &str) -> Result<String, WizardError> {
        let value: String = Input::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()?;
        Ok(value)
    }

    fn confirm(&mut self, prompt: &str, default: bool) -> Result<bool, WizardError> {
        Ok(Confirm::new().with_prompt(prompt).default(default).interact()?)
    }

    fn password(&mut self, prompt: &str) -> Result<String, WizardError> {
        Ok(Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?)
    }
}

// ── Stages ────────────────────────────────────────────────────────────────────

/// The fixed stage order of one configuration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Architecture,
    Distribution,
    Profiles,
    ObsToggle,
    RootPassword,
    Cleanup,
}

impl Stage {
    fn next(self) -> Option<Stage> {
        match self {
            Stage::Architecture => Some(Stage::Distribution),
            Stage::Distribution => Some(Stage::Profiles),
            Stage::Profiles     => Some(Stage::ObsToggle),
            Stage::ObsToggle    => Some(Stage::RootPassword),
            Stage::RootPassword => Some(Stage::Cleanup),
            Stage::Cleanup      => None,
        }
    }

    fn number(self) -> u8 {
        match self {
            Stage::Architecture => 1,
            Stage::Distribution => 2,
            Stage::Profiles     => 3,
            Stage::ObsToggle    => 4,
            Stage::RootPassword => 5,
            Stage::Cleanup      => 6,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Stage::Architecture => "Target Architecture",
            Stage::Distribution => "Target Distribution",
            Stage::Profiles     => "Image Profiles",
            Stage::ObsToggle    => "OBS Packages",
            Stage::RootPassword => "Root Password",
            Stage::Cleanup      => "Cleanup Level",
        }
    }
}

/// Wizard state: walking the stages, confirming the pass, or finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running(Stage),
    Confirming,
    Done,
    Aborted,
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Walks every stage in order, then the confirm gate. Declining the
/// confirmation restarts the whole pass from the first stage, on purpose:
/// one pass is cheap and a partial back-out is easy to get wrong.
pub fn run(config: &mut Config, prompt: &mut dyn Prompt) -> Result<(), WizardError> {
    let mut state = State::Running(Stage::Architecture);

    while state != State::Done {
        if signal::interrupted() {
            state = State::Aborted;
        }
        match state {
            State::Running(stage) => {
                ui::print_step(stage.number(), 7, stage.title());
                run_stage(stage, config, prompt)?;
                state = match stage.next() {
                    Some(next) => State::Running(next),
                    None => State::Confirming,
                };
            }
            State::Confirming => {
                ui::print_step(7, 7, "Confirmation");
                state = if confirm::run(config, prompt)? {
                    State::Done
                } else {
                    State::Running(Stage::Architecture)
                };
            }
            State::Aborted => return Err(WizardError::Interrupted),
            State::Done => unreachable!(),
        }
    }

    Ok(())
}

/// The confirmation gate on its own, for `--confirm` runs that skip the
/// stage walk.
pub fn confirm_configuration(
    config: &Config,
    prompt: &mut dyn Prompt,
) -> Result<bool, WizardError> {
    confirm::run(config, prompt)
}

fn run_stage(
    stage: Stage,
    config: &mut Config,
    prompt: &mut dyn Prompt,
) -> Result<(), WizardError> {
    match stage {
        Stage::Architecture => arch::run(config, prompt),
        Stage::Distribution => dist::run(config, prompt),
        Stage::Profiles     => profile::run(config, prompt),
        Stage::ObsToggle    => obs::run(config, prompt),
        Stage::RootPassword => password::run(config, prompt),
        Stage::Cleanup      => cleanup_mode::run(config, prompt),
    }
}

// ── Scripted prompt for tests ─────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod script {
    use std::collections::VecDeque;

    use super::Prompt;
    use crate::error::WizardError;

    /// One scripted user action.
    #[derive(Debug)]
    pub enum Reply {
        /// Answer to a text prompt; empty means "press Enter".
        Text(&'static str),
        Confirm(bool),
        Password(&'static str),
    }

    /// Replays a fixed sequence of replies and panics on any mismatch,
    /// so a test fails loudly when the prompt order drifts.
    pub struct Scripted(VecDeque<Reply>);

    impl Scripted {
        pub fn new(replies: Vec<Reply>) -> Self {
            Scripted(replies.into_iter().collect())
        }

        pub fn exhausted(&self) -> bool {
            self.0.is_empty()
        }
    }

    impl Prompt for Scripted {
        fn input(&mut self, prompt: &str, default: &str) -> Result<String, WizardError> {
            match self.0.pop_front() {
                Some(Reply::Text(t)) if t.is_empty() => Ok(default.to_string()),
                Some(Reply::Text(t)) => Ok(t.to_string()),
                other => panic!("input prompt {prompt:?} got scripted {other:?}"),
            }
        }

        fn confirm(&mut self, prompt: &str, _default: bool) -> Result<bool, WizardError> {
            match self.0.pop_front() {
                Some(Reply::Confirm(answer)) => Ok(answer),
                other => panic!("confirm prompt {prompt:?} got scripted {other:?}"),
            }
        }

        fn password(&mut self, prompt: &str) -> Result<String, WizardError> {
            match self.0.pop_front() {
                Some(Reply::Password(p)) => Ok(p.to_string()),
                other => panic!("password prompt {prompt:?} got scripted {other:?}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::script::{Reply, Scripted};
    use super::*;

    #[test]
    fn one_clean_pass_reaches_done() {
        let mut config = Config::default();
        let mut prompt = Scripted::new(vec![
            Reply::Text("amd64"),           // architecture, alias form
            Reply::Text("debian"),          // distribution
            Reply::Text("desktop,gnome"),   // profiles, base already paired
            Reply::Confirm(false),          // obs stays off
            Reply::Password(""),            // skip the password
            Reply::Text("none"),            // cleanup level
            Reply::Confirm(true),           // final confirmation
        ]);

        run(&mut config, &mut prompt).unwrap();

        assert_eq!(config.architecture, "x86_64");
        assert_eq!(config.distribution, "debian");
        assert_eq!(config.profiles.join(), "desktop,gnome");
        assert_eq!(config.root_password, None);
        assert!(!config.obs_enabled);
        assert!(prompt.exhausted(), "every scripted reply should be consumed");
    }

    #[test]
    fn rejecting_the_confirmation_restarts_every_stage() {
        let mut config = Config::default();
        let mut prompt = Scripted::new(vec![
            // First pass.
            Reply::Text("x86_64"),
            Reply::Text("debian"),
            Reply::Text("dev"),
            Reply::Confirm(false),
            Reply::Password(""),
            Reply::Text(""),
            Reply::Confirm(false), // start over
            // Second pass: keep everything via defaults except the
            // architecture, proving earlier answers became the defaults.
            Reply::Text("aarch64"),
            Reply::Text(""),
            Reply::Text(""),
            Reply::Confirm(false),
            Reply::Password(""),
            Reply::Text(""),
            Reply::Confirm(true),
        ]);

        run(&mut config, &mut prompt).unwrap();

        assert_eq!(config.architecture, "aarch64");
        assert_eq!(config.distribution, "debian");
        assert_eq!(config.profiles.join(), "dev");
        assert!(prompt.exhausted());
    }

    #[test]
    fn obs_answer_keeps_profiles_in_sync() {
        let mut config = Config::default();
        let mut prompt = Scripted::new(vec![
            Reply::Text(""),
            Reply::Text(""),
            Reply::Text("desktop,gnome"),
            Reply::Confirm(true),  // obs on
            Reply::Password(""),
            Reply::Text(""),
            Reply::Confirm(true),
        ]);

        run(&mut config, &mut prompt).unwrap();

        assert!(config.obs_enabled);
        assert_eq!(config.profiles.join(), "desktop,gnome,obs");
        assert!(prompt.exhausted());
    }
}

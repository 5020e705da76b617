use crate::{
    catalog::{self, Axis},
    config::{Config, ProfileSet},
    error::WizardError,
    ui,
    validate::{self, ListVerdict},
    wizard::Prompt,
};

/// Profile selection: a comma list checked token by token, then the
/// recommendation nudges from the catalog.
pub fn run(config: &mut Config, prompt: &mut dyn Prompt) -> Result<(), WizardError> {
    println!();
    ui::print_catalog(Axis::Profile.title(), &Axis::Profile.rows(), None, None);
    ui::print_info("Comma-separated list; 'none' selects no profiles.");
    println!();

    let current = if config.profiles.is_empty() {
        "none".to_string()
    } else {
        config.profiles.join()
    };

    let mut set = loop {
        let value = prompt.input("Profiles", &current)?;
        if value.trim() == "none" {
            break ProfileSet::default();
        }
        match validate::check_profiles(&value) {
            ListVerdict::Accepted(set) => break set,
            ListVerdict::Rejected { token } => {
                ui::print_warning(&format!("'{}' is not a listed profile.", token));
                if prompt.confirm("Continue with no profiles instead?", false)? {
                    break ProfileSet::default();
                }
            }
        }
    };

    apply_recommendations(&mut set, prompt)?;
    config.set_profiles(set);
    Ok(())
}

/// The two nudges encoded in the recommendation table: an add-on profile
/// without its base, and a base without any of its add-ons.
fn apply_recommendations(set: &mut ProfileSet, prompt: &mut dyn Prompt) -> Result<(), WizardError> {
    // Snapshot of the selection; an accepted offer grows the set mid-loop,
    // and a base added for one profile also covers the ones after it.
    let chosen: Vec<String> = set.iter().map(str::to_string).collect();
    for profile in &chosen {
        let Some((base, note)) = catalog::recommendation_for(profile) else {
            continue;
        };
        if set.contains(base) {
            continue;
        }
        ui::print_info(note);
        if prompt.confirm(&format!("Add the '{}' profile as well?", base), true)? {
            set.insert(base);
        }
    }

    let mut seen: Vec<&str> = Vec::new();
    for (_, base, _) in catalog::RECOMMENDATIONS {
        if seen.contains(base) {
            continue;
        }
        seen.push(base);
        let addons = catalog::addons_of(base);
        if !set.contains(base) || addons.iter().any(|a| set.contains(a)) {
            continue;
        }
        for addon in addons {
            if prompt.confirm(&format!("Attach the '{}' profile?", addon), false)? {
                set.insert(addon);
                break; // one environment is enough
            }
        }
    }

    Ok(())
}

use clap::Subcommand;
use nebula_core::{Nebula, SettingsPatch};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g. "themeId", "timerDurations.focus")
        key: String,
    },
    /// Set a settings value
    Set {
        /// Settings key
        key: String,
        /// New value (durations in seconds)
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(app: &mut Nebula, action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SettingsAction::Get { key } => match app.settings().settings().get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        SettingsAction::Set { key, value } => {
            let patch = SettingsPatch::from_path(app.settings().settings(), &key, &value)?;
            app.update_settings(patch);
            println!("ok");
        }
        SettingsAction::List => {
            let json = serde_json::to_string_pretty(app.settings().settings())?;
            println!("{json}");
        }
        SettingsAction::Reset => {
            app.reset_settings();
            println!("settings reset to defaults");
        }
    }
    Ok(())
}

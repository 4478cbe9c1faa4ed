use clap::Subcommand;
use nebula_core::{theme, Nebula, SettingsPatch};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// List available themes; the active one is starred
    List,
    /// Print a theme's palette as CSS custom properties
    Show {
        /// Theme ID (defaults to the active theme)
        id: Option<String>,
    },
    /// Switch the active theme
    Set {
        /// Theme ID
        id: String,
    },
}

pub fn run(app: &mut Nebula, action: ThemeAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ThemeAction::List => {
            let active = app.settings().current_theme().id;
            for t in theme::themes() {
                let marker = if t.id == active { '*' } else { ' ' };
                println!("{marker} {:<10} {}", t.id, t.name);
            }
        }
        ThemeAction::Show { id } => {
            let theme = match id {
                Some(id) => theme::lookup(&id).ok_or_else(|| format!("unknown theme: {id}"))?,
                None => app.settings().current_theme(),
            };
            println!("{}", theme.colors.to_css());
        }
        ThemeAction::Set { id } => {
            if theme::lookup(&id).is_none() {
                return Err(format!("unknown theme: {id}").into());
            }
            app.update_settings(SettingsPatch::default().theme_id(id.as_str()));
            println!("theme set to {id}");
        }
    }
    Ok(())
}

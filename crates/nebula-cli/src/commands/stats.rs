use clap::Subcommand;
use nebula_core::Nebula;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Cumulative focus statistics
    Show,
    /// Zero the statistics
    Reset,
}

pub fn run(app: &mut Nebula, action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        StatsAction::Show => {
            let stats = app.settings().stats();
            println!("{}", serde_json::to_string_pretty(stats)?);
        }
        StatsAction::Reset => {
            app.reset_stats();
            println!("stats reset");
        }
    }
    Ok(())
}

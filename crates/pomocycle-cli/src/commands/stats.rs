use clap::Subcommand;
use pomocycle_core::{AppConfig, StatsAggregator};

use super::open_store;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Print counters as of today
    Show,
    /// Clear all counters
    Reset,
}

pub fn run(action: StatsAction, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let stats = StatsAggregator::with_local_today(open_store(config)?);

    match action {
        StatsAction::Show => {
            println!("{}", serde_json::to_string_pretty(&stats.current())?);
        }
        StatsAction::Reset => {
            stats.reset()?;
            println!("stats reset");
        }
    }
    Ok(())
}

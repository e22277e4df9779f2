use clap::{Parser, Subcommand};
use tracing::error;

use gridload::config::DataPaths;
use gridload::logging;
use gridload::pipeline;

#[derive(Parser)]
#[command(name = "gridload")]
#[command(about = "AI data-center grid load integration pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw AI facility registry into canonical facility records
    CleanFacilities,
    /// Clean regional generation and emissions data
    CleanEmissions,
    /// Clean generator capacity data and aggregate it per region
    CleanCapacity,
    /// Tag interim facility records with a placeholder geocode status
    Geocode,
    /// Build the region summary and the enriched facility master table
    Integrate,
    /// Run every pipeline stage in dependency order
    Run,
}

fn main() {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    let paths = match DataPaths::load() {
        Ok(paths) => paths,
        Err(e) => {
            error!("Configuration failed: {}", e);
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::CleanFacilities => pipeline::facilities::run(&paths).map(|report| vec![report]),
        Commands::CleanEmissions => pipeline::emissions::run(&paths).map(|report| vec![report]),
        Commands::CleanCapacity => pipeline::capacity::run(&paths).map(|report| vec![report]),
        Commands::Geocode => pipeline::geocode::run(&paths).map(|report| vec![report]),
        Commands::Integrate => {
            pipeline::integrate::run(&paths).map(|(regions, enriched)| vec![regions, enriched])
        }
        Commands::Run => pipeline::run_all(&paths),
    };

    match result {
        Ok(reports) => {
            for report in &reports {
                println!("✅ {}", report.confirmation());
            }
        }
        Err(e) => {
            error!("Pipeline stage failed: {}", e);
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    }
}

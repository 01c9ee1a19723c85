//! CLI interface for vacation-planner

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vacation_planner::config::{DEFAULT_INPUT_FILE, DEFAULT_LISTING_FILE};
use vacation_planner::session::{Session, SessionOutcome};
use vacation_planner::{
    handoff, plan_trip, relay, report, AmadeusClient, FlightQuery, PlannerConfig, TravelPlan,
    TripRequest, VacationPlanner,
};

#[derive(Parser)]
#[command(name = "vacation-planner")]
#[command(about = "Pick representative flights and hotels for a trip within budget")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plan a trip interactively
    Plan {
        /// Selection plan (economic, business, luxury)
        #[arg(long, default_value = "business")]
        plan: String,
        /// Hand-off file holding the "Budget: $..." line
        #[arg(long, default_value = DEFAULT_INPUT_FILE)]
        input_file: PathBuf,
        /// Where the raw hotel listing is saved
        #[arg(long, default_value = DEFAULT_LISTING_FILE)]
        listing_file: PathBuf,
        /// Directory for raw API response dumps
        #[arg(long)]
        dump_dir: Option<PathBuf>,
    },
    /// Plan a trip in one go and print JSON
    Search {
        /// Origin location code
        #[arg(short, long)]
        from: String,
        /// Destination location code
        #[arg(short, long)]
        to: String,
        /// Departure date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Number of adults
        #[arg(long, default_value = "1")]
        adults: u32,
        /// Number of children
        #[arg(long, default_value = "0")]
        children: u32,
        /// Selection plan (economic, business, luxury)
        #[arg(long, default_value = "business")]
        plan: String,
        /// Total budget in whole dollars
        #[arg(long)]
        budget: Option<u64>,
        /// Output file for JSON results
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Look up a hotel in a saved listing
    Hotel {
        /// Exact hotel name
        #[arg(short, long)]
        name: String,
        /// Saved listing file
        #[arg(long, default_value = DEFAULT_LISTING_FILE)]
        listing_file: PathBuf,
    },
    /// Run the local input relay
    Serve {
        /// Address to listen on [default: 127.0.0.1:5000]
        #[arg(long)]
        addr: Option<SocketAddr>,
        /// File the posted data is written to
        #[arg(long, default_value = DEFAULT_INPUT_FILE)]
        input_file: PathBuf,
    },
}

/// Initialize logging to a daily rolling file, keeping stdout for the report
fn init_logging() -> Result<()> {
    let log_dir = PathBuf::from("logs");
    fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "vacation-planner.log");

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive("vacation_planner=debug".parse()?);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .json(),
        )
        .init();

    debug!("Logging initialized - logs will be written to logs/vacation-planner.log.*");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match cli.command {
        Commands::Plan {
            plan,
            input_file,
            listing_file,
            dump_dir,
        } => {
            let plan = plan.parse::<TravelPlan>()?;
            let config = PlannerConfig::from_env()?
                .with_input_file(input_file)
                .with_listing_file(listing_file)
                .with_dump_dir(dump_dir);
            let planner = VacationPlanner::new(AmadeusClient::new(&config)?, config);

            let stdin = io::stdin();
            let mut session = Session::new(stdin.lock(), io::stdout());
            match session.run(&planner, plan).await {
                Ok(SessionOutcome::Quit) => info!("Session ended by user"),
                Ok(outcome) => info!(?outcome, "Session finished"),
                Err(e) => {
                    error!(error = %e, "Session failed");
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Search {
            from,
            to,
            date,
            adults,
            children,
            plan,
            budget,
            output,
        } => {
            let mut query = FlightQuery::new(&from, &to, &date, adults)?;
            query.children = children;
            let request = TripRequest {
                query,
                plan: plan.parse::<TravelPlan>()?,
                budget,
            };

            println!("Planning trip...");
            let result = plan_trip(PlannerConfig::from_env()?, request).await?;

            let json = serde_json::to_string_pretty(&serde_json::json!({
                "plan": result.plan,
                "flight": result.flight,
                "hotel": result.hotel,
                "activity": result.activity.as_ref().map(|a| &a.activity),
                "budget": result.budget,
                "summary": {
                    "totalFlights": result.flights.len(),
                    "totalHotels": result.hotel_offers.len(),
                    "totalActivities": result.activities.len(),
                },
            }))?;

            if let Some(output_file) = output {
                fs::write(&output_file, &json)?;
                println!("Results saved to {}", output_file);
            } else {
                println!("{}", json);
            }

            // Print summary
            println!("\nSummary:");
            println!("Found {} flights, {} priced hotels", result.flights.len(), result.hotel_offers.len());
            if let Some(flight) = &result.flight {
                print!("{}", report::format_selected_flight(flight));
            }
            if let Some(hotel) = &result.hotel {
                print!("{}", report::format_selected_hotel(&hotel.hotel));
            }
            if budget.is_some() {
                print!("{}", report::format_budget(&result.budget));
            }
        }
        Commands::Hotel { name, listing_file } => match handoff::find_hotel_by_name(&listing_file, &name) {
            Ok(Some(hotel)) => print!("{}", report::format_selected_hotel(&hotel)),
            Ok(None) => println!("Hotel '{}' not found in {}", name, listing_file.display()),
            Err(e) => {
                error!(error = %e, "Hotel lookup failed");
                println!("Error: could not read {}: {}", listing_file.display(), e);
            }
        },
        Commands::Serve { addr, input_file } => {
            let config = PlannerConfig::default()
                .with_input_file(input_file)
                .with_relay_addr(addr);
            println!("Input relay listening on http://{}/save-input", config.relay_addr);
            relay::serve(config.relay_addr, config.input_file).await?;
        }
    }

    Ok(())
}

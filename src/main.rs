use chrono::Local;
use color_eyre::eyre::Result;
use dotenv::dotenv;
use medibook_client::{
    api::HttpBookingApi,
    commands::{self, Command, USAGE},
    config::ClientConfig,
    flow::BookingFlow,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let command = Command::parse(std::env::args().skip(1))?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    // Load configuration
    let config = ClientConfig::from_env()?;
    medibook_client::init_logging(config.log_level)?;

    let api = HttpBookingApi::new(&config)?;
    let flow = BookingFlow::new(api, config.slot_deriver()?);

    // Slots are derived against the local calendar date
    let today = Local::now().date_naive();
    let output = commands::run(&flow, command, config.appointment_scope, today).await?;
    println!("{}", output);

    tracing::debug!("Command finished");
    Ok(())
}

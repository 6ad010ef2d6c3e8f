pub use error::ApiError;
pub use error::Error;
mod campaign_api;
mod command;
mod conf;
mod error;
mod log;
mod model;
mod report;
mod rest;
use conf::Conf;
use std::env;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[tokio::main]
async fn main() -> Result<()> {
    log::init();

    let conf = Conf::from_env()?;

    let args: Vec<String> = env::args().collect();

    let command = match args.get(1) {
        Some(some) => some,
        None => Err(Error::CLI("No actions passed".into()))?,
    };

    match command.as_str() {
        "server" => command::server::run(conf).await?,
        "generate" => command::generate::run(&args[2..], &conf).await?,
        "send-report" => command::send_report::run(&args[2..], &conf).await?,
        first_arg => Err(Error::CLI(format!("Unknown command: {first_arg}")))?,
    }

    Ok(())
}

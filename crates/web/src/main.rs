use std::{error::Error, process};

use charging::{client::Client, memory::MemoryDatabase};
use database::{DatabaseConnectionInfo, PgDatabase};
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(why) = run().await {
        log::error!("{}", why);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = WebConfig::from_env();

    // database
    match DatabaseConnectionInfo::from_env() {
        Some(database_connection_info) => {
            let database = PgDatabase::connect(database_connection_info).await?;
            start_web_server(&config, WebState::new(Client::new(database))).await?;
        }
        None => {
            log::warn!("no database configured, data is kept in memory only");
            let database = MemoryDatabase::new();
            start_web_server(&config, WebState::new(Client::new(database))).await?;
        }
    }

    Ok(())
}

use anyhow::Result;

use gt3_keeper::cli::Command;
use gt3_keeper::{
    handle_link, handle_live, handle_monitor, handle_pitwall, handle_races, handle_set_path,
    handle_set_server, handle_unlink, interpret, open_storage,
};

#[tokio::main]
async fn main() -> Result<()> {
    sensible_env_logger::init!();

    let cli = interpret();
    let storage = open_storage(&cli.database)?;

    match cli.command {
        Command::Monitor => handle_monitor(storage).await,
        Command::SetPath { path } => handle_set_path(storage.as_ref(), &path),
        Command::SetServer { url } => handle_set_server(storage.as_ref(), &url),
        Command::Pitwall => handle_pitwall(storage.as_ref()),
        Command::Live => handle_live(storage.as_ref()).await,
        Command::Races { limit } => handle_races(storage.as_ref(), limit),
        Command::Link { race, event } => handle_link(storage, race, event),
        Command::Unlink { race } => handle_unlink(storage, race),
    }
}

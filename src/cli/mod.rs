use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gt3-keeper", version, about = "Championship keeper for an AMS2 dedicated server")]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, default_value = "gt3_championship.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Watch the server stats file and save every finished race
    Monitor,

    /// Set the path of the server stats file
    SetPath {
        /// Filesystem path to the stats file
        path: String,
    },

    /// Set the base URL of the dedicated server
    SetServer {
        /// e.g. http://192.168.1.10:9000
        url: String,
    },

    /// Show the timing table of the most recent race in the stats file
    Pitwall,

    /// Show the live session scraped from the server status page
    Live,

    /// List saved races
    Races {
        /// How many recent races to show
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },

    /// Attach a saved race to a championship event and score it
    Link {
        /// Saved race id
        #[arg(long)]
        race: i64,
        /// Championship event id
        #[arg(long)]
        event: i64,
    },

    /// Detach a saved race from its championship event
    Unlink {
        /// Saved race id
        #[arg(long)]
        race: i64,
    },
}

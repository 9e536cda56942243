pub use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(name = "micron-cli", about = "Alesis Micron/Ion program sync")]
pub struct Opts {
    /// MIDI input port: index, name or `client:port` address
    #[clap(short, long)]
    pub input: Option<String>,

    /// MIDI output port: index, name or `client:port` address
    #[clap(short, long)]
    pub output: Option<String>,

    /// MIDI channel (1-16)
    #[clap(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=16))]
    pub channel: u8,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List MIDI ports
    Ports,

    /// Wait for a program dump from the device and print it
    Dump {
        /// Seconds to wait for the dump
        #[clap(short, long, default_value_t = 30)]
        timeout: u64,

        /// Also save the received program to a state file
        #[clap(short, long)]
        save: Option<PathBuf>,
    },

    /// Send a saved state file to the device
    Send {
        file: PathBuf,

        /// Send individual NRPN updates instead of one program dump
        #[clap(long)]
        nrpn: bool,
    },

    /// Set one parameter by name
    Set {
        name: String,

        #[clap(allow_hyphen_values = true)]
        value: i32,
    },
}

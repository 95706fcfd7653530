use clap::{Parser, Subcommand};
use slicer_inspect::{ShowOptions, run_collapse, run_expand, run_show};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slicer-inspect")]
#[command(about = "Build the slicer filter model from a dataset file and print it")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the visible filter tree after applying toggles, clears and search
    Show {
        /// Dataset file (.json or .toml)
        dataset: PathBuf,

        #[arg(long)]
        session: Option<PathBuf>,

        #[arg(long)]
        search: Option<String>,

        /// Value to toggle, as GROUP|LEVEL|KEY (repeatable)
        #[arg(long = "toggle", value_name = "GROUP|LEVEL|KEY")]
        toggles: Vec<String>,

        /// Group to clear after the toggles (repeatable)
        #[arg(long = "clear", value_name = "GROUP")]
        clears: Vec<String>,

        #[arg(long)]
        json: bool,
    },
    /// Toggle one node's expansion and save the session
    Expand {
        dataset: PathBuf,

        #[arg(long)]
        session: PathBuf,

        #[arg(long)]
        group: String,

        #[arg(long, default_value = "0")]
        level: usize,

        #[arg(long)]
        key: String,
    },
    /// Toggle a group's collapsed flag and save the session
    Collapse {
        dataset: PathBuf,

        #[arg(long)]
        session: PathBuf,

        #[arg(long)]
        group: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Show {
            dataset,
            session,
            search,
            toggles,
            clears,
            json,
        } => run_show(ShowOptions {
            dataset,
            session,
            search,
            toggles,
            clears,
            json,
        }),
        Commands::Expand {
            dataset,
            session,
            group,
            level,
            key,
        } => run_expand(&dataset, &session, &group, level, &key),
        Commands::Collapse {
            dataset,
            session,
            group,
        } => run_collapse(&dataset, &session, &group),
    };

    match result {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

use clap::{Parser, Subcommand};
use log::{LevelFilter, warn};
use placebook::core::config::{self, CliOverrides};
use placebook::core::model::Location;
use placebook::core::state::App;
use placebook::tui;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::{self, File};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "placebook", about = "Record trips as books of visited places")]
struct Args {
    /// Directory holding the book files (default: ~/.placebooks)
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Report this fixed position when adding the current location
    #[arg(long, value_name = "LAT,LON", value_parser = config::parse_location, conflicts_with = "no_location")]
    location: Option<Location>,

    /// Disable the current-location action even if configured
    #[arg(long)]
    no_location: bool,

    /// Log verbosity: error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print every book in the data directory and exit
    List,
}

fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level).unwrap_or_else(|_| {
        warn!("Unknown log level '{}', using info", level);
        LevelFilter::Info
    })
}

/// Writes `placebook.log` next to the config file. The TUI owns the
/// terminal, so nothing is logged to stdout.
fn init_logging() {
    let app_dir = config::app_dir();
    if fs::create_dir_all(&app_dir).is_err() {
        return;
    }

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(app_dir.join("placebook.log")) {
        // The logger accepts everything; the facade's max level does the filtering
        // so it can be lowered once the config file has been read.
        let _ = WriteLogger::init(LevelFilter::Trace, log_config, log_file);
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    init_logging();
    log::set_max_level(args.log_level.as_deref().map_or(LevelFilter::Info, parse_level));

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Ignoring config file: {}", e);
        config::PlacebookConfig::default()
    });
    let cli = CliOverrides {
        data_dir: args.data_dir,
        location: args.location,
        no_location: args.no_location,
        log_level: args.log_level,
    };
    let resolved = config::resolve(&file_config, &cli);
    log::set_max_level(parse_level(&resolved.log_level));

    log::info!(
        "Place book starting (data dir: {}, location: {:?})",
        resolved.data_dir.display(),
        resolved.location
    );

    match args.command {
        Some(Command::List) => {
            let mut app = App::from_config(&resolved);
            app.refresh_books_list();
            if app.books.is_empty() {
                println!("No books found in {}", resolved.data_dir.display());
            }
            for book in &app.books {
                println!("{}", book.summary());
            }
            Ok(())
        }
        None => tui::run(resolved),
    }
}

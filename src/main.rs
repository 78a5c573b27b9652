use clap::{Parser, ValueEnum};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use sprig::core::config::{self, CliOverrides, SprigConfig};
use std::fs::{self, File};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sprig", about = "Interactive directory tree, drawn inline below your prompt")]
struct Args {
    /// Directory to browse
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Deepest level shown below the root (unlimited if unset)
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,

    /// Show hidden files
    #[arg(short, long)]
    all: bool,

    /// Log file [default: ~/.sprig/sprig.log]
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log verbosity
    #[arg(long, default_value_t, value_enum)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // The terminal is in raw mode while browsing, so logs go to a file only.
    let log_path = args
        .log_file
        .clone()
        .or_else(|| config::sprig_dir().map(|d| d.join("sprig.log")));
    if let Some(path) = log_path {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let log_config = ConfigBuilder::new()
            .set_time_format_rfc3339()
            .build();
        if let Ok(log_file) = File::create(&path) {
            let _ = WriteLogger::init(args.log_level.into(), log_config, log_file);
        }
    }

    log::info!("sprig starting up in {}", args.path.display());

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        eprintln!("sprig: {e}; using defaults");
        SprigConfig::default()
    });
    let cli = CliOverrides {
        max_depth: args.max_depth,
        show_hidden: args.all,
    };
    let resolved = config::resolve(&file_config, &cli);
    log::debug!("Resolved config: {:?}", resolved);

    sprig::tui::run(&args.path, &resolved).map_err(|e| {
        log::error!("sprig exiting: {}", e);
        e.into()
    })
}

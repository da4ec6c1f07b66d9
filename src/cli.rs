use std::path::PathBuf;

use clap::{ ArgEnum, Parser };
use log::LevelFilter;

use crate::consts::{ NUM_THREADS, OUT_FILE };

#[derive(Copy, Clone, Debug, PartialEq, Eq, ArgEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
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

/// Traces a batch of rays against a scene and writes the nearest hits.
#[derive(Debug, Parser)]
#[clap(name = "analytic-tracer", author, version, about)]
pub struct Args {
    /// Scene description (JSON)
    #[clap(short, long)]
    pub scene: PathBuf,

    /// Rays to trace (JSON array of origin/direction pairs)
    #[clap(short, long)]
    pub rays: PathBuf,

    /// Where to write the hits (JSON, one entry per ray, null for a miss)
    #[clap(short, long, default_value = OUT_FILE)]
    pub output: PathBuf,

    /// Worker threads
    #[clap(short, long, default_value_t = NUM_THREADS)]
    pub threads: usize,

    #[clap(long, arg_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/* Tests */

#[test]
fn defaults_fill_optional_arguments() {
    let args = Args::parse_from(&["analytic-tracer", "--scene", "s.json", "--rays", "r.json"]);

    assert_eq!(args.output, PathBuf::from(OUT_FILE));
    assert_eq!(args.threads, NUM_THREADS);
    assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Info);
}

#[test]
fn log_level_is_parsed() {
    let args = Args::parse_from(&["analytic-tracer", "-s", "s.json", "-r", "r.json",
        "--log-level", "debug", "-t", "2"]);

    assert_eq!(args.log_level, LogLevel::Debug);
    assert_eq!(args.threads, 2);
}

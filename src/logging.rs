// env_logger setup shared by the binaries

use std::io::Write;

use log::LevelFilter;

/// Map a `-v` count to a level filter: warn, info, debug, then trace.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Initialise logging to stderr. `RUST_LOG` directives are applied on top.
pub fn init_verbose(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(level_for(verbosity))
        .parse_default_env()
        .format(format_log)
        .init();
}

fn format_log(buf: &mut env_logger::fmt::Formatter, record: &log::Record) -> std::io::Result<()> {
    let ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(buf, "{ts} [{}] - {}", record.level(), record.args())
}

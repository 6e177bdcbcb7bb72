//! Logging setup shared by the sweep driver and the binary: maps the textual
//! `loglevel` of the run configuration onto `simplelog` backends.

use std::fs::File;

use chrono::Local;
use simplelog::*;

/// "debug"/"info"/"warn"/"error" -> LevelFilter; None defaults to Info.
/// Panics on unknown level names, which the configuration layer treats as a
/// setup error.
pub fn loglevel_filter(loglevel: &Option<String>) -> LevelFilter {
    if let Some(level) = loglevel {
        match level.as_str() {
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            _ => panic!("loglevel must be debug, info, warn or error"),
        }
    } else {
        LevelFilter::Info
    }
}

/// Install a terminal logger at the requested level. Double initialization
/// (several sweeps in one process) is not an error: the first logger wins
/// and later calls return false.
pub fn init_terminal_logging(loglevel: &Option<String>) -> bool {
    let log_option = loglevel_filter(loglevel);
    let logger_instance = CombinedLogger::init(vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
    logger_instance.is_ok()
}

/// Terminal logger plus a timestamped log file next to the results.
pub fn init_file_logging(loglevel: &Option<String>, dir: &str) -> bool {
    let log_option = loglevel_filter(loglevel);
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let name = format!("{}/sweep_log_{}.txt", dir, date_and_time);
    let file = match File::create(&name) {
        Ok(file) => file,
        Err(_) => return init_terminal_logging(loglevel),
    };
    let logger_instance = CombinedLogger::init(vec![
        TermLogger::new(
            log_option,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(log_option, Config::default(), file),
    ]);
    logger_instance.is_ok()
}

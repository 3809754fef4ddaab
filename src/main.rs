use std::process::ExitCode;

use seglabel::AppConfig;

fn main() -> ExitCode {
    let (config, config_note) = AppConfig::load_or_default();

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    if let Some(note) = config_note {
        log::info!("{}", note);
    }

    match seglabel::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Annotation stopped: {}", e);
            eprintln!("Application error: {}", e);
            ExitCode::FAILURE
        }
    }
}

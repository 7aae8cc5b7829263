//! rotlab - interactive 3D rotation workbench
//!
//! Reads commands from a script file (first argument) or stdin, applies each one
//! to the current frame and prints the derived rotation views.

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use rotlab::commands::{Command, Session};
use rotlab::config::AppConfig;
use rotlab::display::ViewFormatter;
use rotlab_core::PresetLibrary;

fn main() {
    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting rotlab");

    if let Err(e) = &loaded {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let presets = load_presets(&config);
    let mut session = Session::new(config.engine.to_settings(), presets);
    let formatter = ViewFormatter::new(config.display.precision);

    let input: Box<dyn BufRead> = match std::env::args().nth(1) {
        Some(path) => match File::open(&path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                log::error!("Failed to open script '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => Box::new(io::stdin().lock()),
    };

    for (index, line) in input.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                break;
            }
        };

        let result = Command::parse(&line).and_then(|command| match command {
            Some(command) => session.execute(&command).map(|report| Some((command, report))),
            None => Ok(None),
        });

        match result {
            Ok(Some((command, report))) => {
                print!("{}", formatter.report(&report));
                if config.display.show_all_representations || command == Command::Show {
                    print!("{}", formatter.transform(session.transform(), session.point()));
                    println!(
                        "{}",
                        formatter.tracked_points(session.transform(), session.points())
                    );
                }
            }
            Ok(None) => {}
            Err(e) => log::error!("line {}: {}", index + 1, e),
        }
    }
}

/// Built-in presets, extended by the configured library if there is one
fn load_presets(config: &AppConfig) -> PresetLibrary {
    let mut presets = PresetLibrary::builtin();
    if let Some(path) = &config.presets.library {
        match PresetLibrary::load(path) {
            Ok(library) => presets.extend(library),
            Err(e) => log::warn!("Failed to load presets from {}: {}", path.display(), e),
        }
    }
    presets
}

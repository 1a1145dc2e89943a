use std::io::{BufRead, Write};

use assembly_tracker_lib::command::{execute_json, execute_json_batch, CommandResponse};
use assembly_tracker_lib::fixtures::demo_seeds;
use assembly_tracker_lib::harness::TrackerHarness;
use assembly_tracker_lib::i18n::{self, Lang};
use assembly_tracker_lib::state::TrackerSettings;
use shared::PartSeed;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assembly_tracker=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut settings = TrackerSettings::load();
    if let Some(lang) = args.lang {
        settings.language = lang;
    }
    i18n::set_lang(settings.language);

    let seeds = args.parts.unwrap_or_else(demo_seeds);
    let mut harness = TrackerHarness::with_settings(seeds, settings.clone());

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {e}");
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let output = if line.starts_with('[') {
            match execute_json_batch(&mut harness, line) {
                Ok(responses) => serde_json::to_string(&responses),
                Err(e) => serde_json::to_string(&CommandResponse::err(e)),
            }
        } else {
            match execute_json(&mut harness, line) {
                Ok(response) => serde_json::to_string(&response),
                Err(e) => serde_json::to_string(&CommandResponse::err(e)),
            }
        };

        match output {
            Ok(json) => {
                if writeln!(stdout, "{json}").and_then(|()| stdout.flush()).is_err() {
                    break;
                }
            }
            Err(e) => tracing::error!("Failed to serialize response: {e}"),
        }
    }

    if harness.state.settings != settings {
        harness.state.settings.save();
    }
}

/// Command line options
struct Args {
    /// Parts from `--parts <path>`
    parts: Option<Vec<PartSeed>>,
    /// `--lang <en|et>`
    lang: Option<Lang>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut parsed = Args {
            parts: None,
            lang: None,
        };
        let mut i = 1;
        while i < args.len() {
            match (args[i].as_str(), args.get(i + 1)) {
                ("--parts", Some(path)) => {
                    parsed.parts = load_parts(path);
                    i += 1;
                }
                ("--lang", Some(value)) => {
                    match value.parse::<Lang>() {
                        Ok(lang) => parsed.lang = Some(lang),
                        Err(e) => tracing::error!("{e}"),
                    }
                    i += 1;
                }
                (other, _) => tracing::warn!("Ignoring argument {other}"),
            }
            i += 1;
        }
        parsed
    }
}

fn load_parts(path: &str) -> Option<Vec<PartSeed>> {
    match std::fs::read_to_string(path) {
        Ok(json) => match serde_json::from_str::<Vec<PartSeed>>(&json) {
            Ok(seeds) => {
                tracing::info!("Loaded {} parts from {path}", seeds.len());
                Some(seeds)
            }
            Err(e) => {
                tracing::error!("Failed to parse parts JSON from {path}: {e}");
                None
            }
        },
        Err(e) => {
            tracing::error!("Failed to read parts file {path}: {e}");
            None
        }
    }
}

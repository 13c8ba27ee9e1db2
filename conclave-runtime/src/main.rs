//! Thin CLI entry point: parse flags, build a `RuntimeConfig`, drive one
//! admin agent cycle with the echo demo provider, print the outcome.

use conclave_runtime::{init_tracing, run, EchoProvider, RuntimeConfig};

#[tokio::main]
async fn main() {
    std::process::exit(run_cli().await);
}

async fn run_cli() -> i32 {
    let mut prompt: Option<String> = None;
    let mut max_agents: Option<usize> = None;
    let mut log_level: Option<String> = None;

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    while let Some(flag) = args.first().cloned() {
        args.remove(0);
        match flag.as_str() {
            "--prompt" => match take_arg("--prompt", &mut args) {
                Ok(value) => prompt = Some(value),
                Err(message) => return config_error(&message),
            },
            "--max-agents" => match take_arg("--max-agents", &mut args) {
                Ok(value) => match value.parse() {
                    Ok(parsed) => max_agents = Some(parsed),
                    Err(_) => return config_error(&format!("--max-agents: not a number: {value}")),
                },
                Err(message) => return config_error(&message),
            },
            "--log-level" => match take_arg("--log-level", &mut args) {
                Ok(value) => log_level = Some(value),
                Err(message) => return config_error(&message),
            },
            "--help" | "-h" => {
                print_usage();
                return 0;
            }
            other => return config_error(&format!("unknown flag: {other}")),
        }
    }

    let mut config = RuntimeConfig::default();
    if let Some(max_agents) = max_agents {
        config.max_agents = max_agents;
    }
    if let Some(log_level) = log_level {
        config.log_level = log_level;
    }

    init_tracing(&config);

    let prompt = prompt.unwrap_or_else(|| "Hello.".to_string());
    match run(config, EchoProvider::default(), &prompt).await {
        Ok(_manager) => {
            tracing::info!("cycle completed");
            0
        }
        Err(error) => {
            eprintln!("conclave-runtime error: {error}");
            1
        }
    }
}

fn take_arg(flag: &str, remaining: &mut Vec<String>) -> Result<String, String> {
    if remaining.is_empty() {
        return Err(format!("{flag} requires a value"));
    }
    Ok(remaining.remove(0))
}

fn config_error(message: &str) -> i32 {
    eprintln!("conclave-runtime error: {message}");
    2
}

fn print_usage() {
    println!(
        "conclave-runtime [--prompt TEXT] [--max-agents N] [--log-level LEVEL]\n\n\
         Drives one admin agent through a single cycle using a fixed echo\n\
         provider (no real model backend is wired in) and prints the outcome."
    );
}

//! FanZone CLI
//!
//! Command-line client for a running FanZone server:
//! - Submit RSVPs
//! - Show the attendee window and count
//! - Predict the champion
//! - Check the kickoff countdown

use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fanzone-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client for the FIFA FanZone 2026 RSVP service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8026", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit an RSVP
    Rsvp {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Home country code (e.g. mx, gb-eng)
        #[arg(short, long)]
        country: String,
    },

    /// Show the attendee window currently on display
    Window,

    /// Show how many people have RSVP'd
    Count,

    /// Show the time left until kickoff
    Countdown,

    /// Predict the tournament champion
    Predict {
        /// Qualified team code
        country: String,
    },

    /// List country codes
    Countries {
        /// List every country instead of the qualified teams
        #[arg(long)]
        all: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let json = cli.format == "json";

    match cli.command {
        Commands::Rsvp {
            name,
            email,
            country,
        } => {
            let body = serde_json::json!({
                "name": name,
                "email": email,
                "country_code": country,
            });

            let response = client
                .post(format!("{}/api/v1/rsvps", cli.api_url))
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            let outcome: serde_json::Value = response.json().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }

            match status {
                StatusCode::CREATED => {
                    if !json {
                        println!("{}", outcome["confirmation"]["title"].as_str().unwrap_or("RSVP Successful!"));
                        println!("{}", outcome["confirmation"]["description"].as_str().unwrap_or(""));
                    }
                }
                StatusCode::UNPROCESSABLE_ENTITY => {
                    if let Some(errors) = outcome["errors"].as_array() {
                        for error in errors {
                            eprintln!(
                                "{}: {}",
                                error["field"].as_str().unwrap_or("?"),
                                error["message"].as_str().unwrap_or("invalid")
                            );
                        }
                    }
                    std::process::exit(1);
                }
                _ => {
                    eprintln!(
                        "{}",
                        outcome["notice"].as_str().unwrap_or("RSVP failed")
                    );
                    if let Some(error) = outcome["error"].as_str() {
                        eprintln!("  ({})", error);
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Window => {
            let data = get_json(&client, &format!("{}/api/v1/rsvps/window", cli.api_url)).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_window(&data["frame"]);
            }
        }

        Commands::Count => {
            let data = get_json(&client, &format!("{}/api/v1/rsvps/count", cli.api_url)).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                println!("{} attending", data["count"].as_u64().unwrap_or(0));
            }
        }

        Commands::Countdown => {
            let data = get_json(&client, &format!("{}/api/v1/countdown", cli.api_url)).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else if data["started"].as_bool().unwrap_or(false) {
                println!("Kickoff! The FanZone is open.");
            } else {
                println!("Kickoff: {}", data["kickoff"].as_str().unwrap_or("unknown"));
                println!("Time left: {}", data["display"].as_str().unwrap_or("-"));
            }
        }

        Commands::Predict { country } => {
            let response = client
                .post(format!("{}/api/v1/bracket", cli.api_url))
                .json(&serde_json::json!({ "country_code": country }))
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body: serde_json::Value = response.json().await.unwrap_or_default();
                eprintln!(
                    "Prediction failed ({}): {}",
                    status,
                    body["error"]["message"].as_str().unwrap_or("unknown error")
                );
                std::process::exit(1);
            }

            let prediction: serde_json::Value = response.json().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&prediction)?);
            } else {
                println!("{}", prediction["title"].as_str().unwrap_or(""));
                println!("{}", prediction["description"].as_str().unwrap_or(""));
            }
        }

        Commands::Countries { all } => {
            let which = if all { "all" } else { "qualified" };
            let data = get_json(
                &client,
                &format!("{}/api/v1/countries/{}", cli.api_url, which),
            )
            .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_countries(&data);
            }
        }

        Commands::Config { output } => {
            let config = fanzone::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// GET a JSON document, exiting on a non-success status
async fn get_json(
    client: &reqwest::Client,
    url: &str,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        eprintln!("Request failed ({}): {}", status, text);
        std::process::exit(1);
    }

    Ok(response.json().await?)
}

fn print_window(frame: &serde_json::Value) {
    match frame["state"].as_str() {
        Some("showing") => {
            println!(
                "Showing from #{} of {}",
                frame["cursor"].as_u64().unwrap_or(0) + 1,
                frame["total"].as_u64().unwrap_or(0)
            );
            println!();
            for entry in frame["entries"].as_array().into_iter().flatten() {
                println!(
                    "  [{:<6}] {}",
                    entry["country_code"].as_str().unwrap_or("-"),
                    entry["caption"].as_str().unwrap_or("")
                );
            }
        }
        _ => {
            println!("{}", frame["message"].as_str().unwrap_or("Nothing on display"));
        }
    }
}

fn print_countries(data: &serde_json::Value) {
    let countries = match data["countries"].as_array() {
        Some(c) if !c.is_empty() => c,
        _ => {
            println!("No countries");
            return;
        }
    };

    println!("{:<8} | {}", "Code", "Name");
    println!("{}", "-".repeat(40));
    for country in countries {
        println!(
            "{:<8} | {}",
            country["code"].as_str().unwrap_or("-"),
            country["name"].as_str().unwrap_or("-")
        );
    }
    println!();
    println!("{} countries", data["count"].as_u64().unwrap_or(0));
}

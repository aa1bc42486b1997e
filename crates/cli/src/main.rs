//! Scout CLI - shop Mercari Japan from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # One-shot request
//! scout ask "ポケモンカードの旧裏面を1万円以下で探して"
//!
//! # Interactive session (default when no subcommand is given)
//! scout
//! ```
//!
//! Requires `ANTHROPIC_API_KEY` in the environment or a `.env` file.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scout_agent::{AgentError, ScoutConfig, ShoppingAgent};
use scout_core::{AgentResponse, ItemDetail};

#[derive(Parser)]
#[command(name = "scout")]
#[command(author, version, about = "LLM shopping agent for Mercari Japan")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle a single shopping request and exit
    Ask {
        /// The shopping request, in any language
        utterance: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match ScoutConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("configuration error: {e}");
            eprintln!("Sorry, the agent is not configured correctly: {e}");
            std::process::exit(1);
        }
    };
    let agent = ShoppingAgent::from_config(&config);

    match Cli::parse().command {
        Some(Commands::Ask { utterance }) => {
            if !handle_one(&agent, &utterance).await {
                std::process::exit(1);
            }
        }
        None => interactive(&agent).await,
    }
}

/// Read-eval loop; a blank line or EOF ends the session.
async fn interactive(agent: &ShoppingAgent) {
    println!("Tell me what you are shopping for (blank line to quit).");
    let stdin = io::stdin();
    loop {
        print!("User: ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("input error: {e}");
                break;
            }
        }
        let utterance = line.trim();
        if utterance.is_empty() {
            break;
        }

        handle_one(agent, utterance).await;
    }
}

/// Run one request and print the outcome. Returns whether it succeeded.
async fn handle_one(agent: &ShoppingAgent, utterance: &str) -> bool {
    match agent.handle(utterance).await {
        Ok(response) => {
            print_response(&response);
            true
        }
        Err(AgentError::ResponseGeneration { products, source }) => {
            // The narration failed, but the products are intact.
            tracing::warn!("narration failed: {source}");
            println!("\nSorry, I could not write up a summary, but here is what I found.");
            for (rank, product) in products.iter().enumerate() {
                print_product(rank + 1, product);
            }
            true
        }
        Err(e) => {
            tracing::error!("request failed: {e}");
            eprintln!("{}", e.user_message());
            false
        }
    }
}

fn print_response(response: &AgentResponse) {
    println!("\n{}", response.message);
    for (rank, product) in response.products.iter().enumerate() {
        print_product(rank + 1, product);
    }
}

fn print_product(rank: usize, product: &ItemDetail) {
    println!("\n{rank}. {} - {}", product.name, product.price);
    println!("   condition: {}", product.condition);
    println!(
        "   seller: {} (rating: {})",
        product.seller_name,
        product.seller_rating_display()
    );
    println!("   shipping: {}", product.shipping_display());
    println!("   {}", product.listing_url);
}

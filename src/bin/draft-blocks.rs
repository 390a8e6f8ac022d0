use clap::{Parser, Subcommand};
use draft_blocks::{Draft, DropSpot, OpenAiClient, develop, generate_blocks};
use std::env;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an outline of writing blocks for a topic
    Blocks {
        topic: String,
        #[arg(long)]
        json: bool,
    },
    /// Generate blocks and develop them into a full draft
    Draft { topic: String },
    /// Verify the API key works
    Check,
}

fn main() {
    let cli = Cli::parse();
    let client = match api_client() {
        Ok(client) => client,
        Err(message) => {
            eprintln!("Error: {message}");
            std::process::exit(1);
        }
    };

    match &cli.command {
        Commands::Blocks { topic, json } => blocks_command(&client, topic, *json),
        Commands::Draft { topic } => draft_command(&client, topic),
        Commands::Check => check_command(&client),
    }
}

fn api_client() -> Result<OpenAiClient, String> {
    let key = env::var("OPENAI_API_KEY")
        .map_err(|_| "OPENAI_API_KEY is not set".to_string())?;
    Ok(OpenAiClient::new(key))
}

fn blocks_command(client: &OpenAiClient, topic: &str, json: bool) {
    let blocks = match generate_blocks(client, topic, &[]) {
        Ok(blocks) => blocks,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    if json {
        match serde_json::to_string_pretty(&blocks) {
            Ok(out) => println!("{out}"),
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        }
        return;
    }
    for block in &blocks {
        println!("{:>4}  {}", block.id, block.title);
        println!("      {}", block.summary);
    }
}

fn draft_command(client: &OpenAiClient, topic: &str) {
    let blocks = match generate_blocks(client, topic, &[]) {
        Ok(blocks) => blocks,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    let mut draft = Draft::new();
    for block in blocks {
        draft.insert_block(block, DropSpot::End);
    }
    if let Err(err) = develop(&mut draft, client, topic) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
    println!("{}", draft.full_text());
}

fn check_command(client: &OpenAiClient) {
    match client.check_connection() {
        Ok(()) => println!("Connection OK"),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trading_card_generator::app::App;
use trading_card_generator::identity::CardId;
use trading_card_generator::stream;

#[derive(Debug, Parser)]
#[command(name = "trading-card-generator")]
#[command(about = "Generate and store illustrated trading cards")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate artwork for a new card and store it. Prints the card id.
    Generate {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
    /// Print a stored card's metadata as JSON.
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },
    /// Write a stored card's image to a file.
    Image {
        #[arg(value_name = "ID")]
        id: String,
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
    },
}

async fn run(app: &App, command: Command) -> Result<bool> {
    let manager = app.manager();

    match command {
        Command::Generate { title, description } => {
            let id = manager.generate_and_save_card(&title, &description).await?;
            println!("{}", id);
            Ok(true)
        }
        Command::Show { id } => match manager.get_card(&CardId::from(id)).await? {
            Some(card) => {
                println!("{}", serde_json::to_string_pretty(&card)?);
                Ok(true)
            }
            None => {
                eprintln!("card not found");
                Ok(false)
            }
        },
        Command::Image { id, output } => {
            match manager.get_card_image(&CardId::from(id)).await? {
                Some(image) => {
                    let bytes = stream::drain(image).await?;
                    tokio::fs::write(&output, &bytes).await?;
                    info!("Wrote {} bytes to {}", bytes.len(), output.display());
                    Ok(true)
                }
                None => {
                    eprintln!("card not found");
                    Ok(false)
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trading_card_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let app = match App::new().await {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    match run(&app, args.command).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Command failed: {}", e);
            std::process::exit(1);
        }
    }
}

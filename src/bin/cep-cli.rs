use clap::{Parser, Subcommand};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "cep-cli")]
#[command(about = "Query the CEP weather services", long_about = None)]
struct Cli {
    /// Base URL of the service to call.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the input service (POST /)
    Lookup { cep: String },
    /// Ask the weather service directly (GET /weather)
    Weather { cep: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Lookup { cep } => {
            client
                .post(format!("{}/", base))
                .json(&json!({ "cep": cep }))
                .send()
                .await?
        }
        Commands::Weather { cep } => {
            client
                .get(format!("{}/weather", base))
                .query(&[("cep", cep)])
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if status != StatusCode::OK {
        eprintln!("Error: service returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}

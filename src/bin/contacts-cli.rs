use clap::{Args, Parser, Subcommand};
use reqwest::multipart::Form;
use reqwest::StatusCode;
use serde_json::Value;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "contacts-cli")]
#[command(about = "Command-line client for the contacts API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List contacts, optionally filtered
    List {
        /// Only favorites (true) or only non-favorites (false)
        #[arg(long)]
        favorite: Option<bool>,
        /// Name substring
        #[arg(long)]
        name: Option<String>,
    },
    /// Show one contact
    Get { id: String },
    /// Create a contact
    Create(ContactFields),
    /// Update the given fields of a contact
    Update {
        id: String,
        #[command(flatten)]
        fields: ContactFields,
    },
    /// Delete one contact
    Delete { id: String },
    /// Delete every contact
    DeleteAll,
}

#[derive(Args)]
struct ContactFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    favorite: Option<bool>,
}

impl ContactFields {
    fn into_form(self) -> Form {
        let mut form = Form::new();
        for (key, value) in [
            ("name", self.name),
            ("email", self.email),
            ("address", self.address),
            ("phone", self.phone),
            ("favorite", self.favorite.map(|f| f.to_string())),
        ] {
            if let Some(value) = value {
                form = form.text(key, value);
            }
        }
        form
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!("{}/api/v1/contacts", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::List { favorite, name } => {
            let mut query = Vec::new();
            if let Some(favorite) = favorite {
                query.push(("favorite", favorite.to_string()));
            }
            if let Some(name) = name {
                query.push(("name", name));
            }
            client.get(&base).query(&query).send().await?
        }
        Commands::Get { id } => client.get(format!("{}/{}", base, id)).send().await?,
        Commands::Create(fields) => {
            client
                .post(&base)
                .multipart(fields.into_form())
                .send()
                .await?
        }
        Commands::Update { id, fields } => {
            client
                .put(format!("{}/{}", base, id))
                .multipart(fields.into_form())
                .send()
                .await?
        }
        Commands::Delete { id } => client.delete(format!("{}/{}", base, id)).send().await?,
        Commands::DeleteAll => client.delete(&base).send().await?,
    };

    let status = res.status();
    let text = res.text().await?;
    match render(status, &text) {
        Ok(out) => {
            println!("{}", out);
            Ok(ExitCode::SUCCESS)
        }
        Err(out) => {
            eprintln!("{}", out);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Format a response body for the terminal. `Err` means a non-2xx status.
fn render(status: StatusCode, text: &str) -> Result<String, String> {
    let body = match serde_json::from_str::<Value>(text) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| text.to_string()),
        Err(_) => text.to_string(),
    };
    if status.is_success() {
        Ok(body)
    } else {
        Err(format!(
            "Error: contacts API returned status {}\n{}",
            status, body
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_pretty_printed() {
        let out = render(StatusCode::OK, r#"{"status":"success","data":null}"#).unwrap();
        assert!(out.contains("\"status\": \"success\""));
    }

    #[test]
    fn test_error_status_fails() {
        let err = render(
            StatusCode::NOT_FOUND,
            r#"{"status":"fail","message":"Contact not found"}"#,
        )
        .unwrap_err();
        assert!(err.starts_with("Error: contacts API returned status 404"));
        assert!(err.contains("Contact not found"));

        let err = render(StatusCode::METHOD_NOT_ALLOWED, "plain text").unwrap_err();
        assert!(err.ends_with("plain text"));
    }
}

use aiweb_core::{ApiClient, DevServerConfig, WeatherApi};
use clap::{Parser, Subcommand};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "aiweb", version, about = "aiweb backend client")]
pub struct Cli {
    /// Origin the relative API base path resolves against.
    /// Defaults to the local dev server, which proxies to the backend.
    #[arg(long, global = true, default_value = "http://localhost:5173")]
    pub origin: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the weather report for a city.
    Weather {
        /// City name; reserved characters are escaped before sending.
        city: String,
    },

    /// Search weather entries matching a query.
    Search {
        query: String,
    },

    /// Inspect or create the dev-server configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the config file path and the resolved table.
    Show,

    /// Write the default configuration to disk.
    Init,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Weather { city } => {
                let api = ApiClient::new(&self.origin)?;
                let report = api.get_weather(&city).await?;
                println!("{report}");
            }
            Command::Search { query } => {
                let api = ApiClient::new(&self.origin)?;
                for entry in api.search(&query).await? {
                    println!("{entry}");
                }
            }
            Command::Config { action } => run_config(action)?,
        }

        Ok(())
    }
}

fn run_config(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let path = DevServerConfig::config_file_path()?;
            let cfg = DevServerConfig::load()?;

            println!("# {}", path.display());
            print!("{}", cfg.to_toml()?);
        }
        ConfigAction::Init => {
            let path = DevServerConfig::config_file_path()?;

            if path.exists() {
                let overwrite = inquire::Confirm::new(&format!(
                    "Overwrite existing configuration at {}?",
                    path.display()
                ))
                .with_default(false)
                .prompt()?;

                if !overwrite {
                    return Ok(());
                }
            }

            DevServerConfig::default().save()?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_client::{ClientConfig, DEFAULT_CONFIG_NAME};
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// WebSocket base URL (overrides the default)
    #[arg(long)]
    pub ws_url: Option<String>,

    /// REST base URL (overrides the default)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = ClientConfig::path_in(cwd);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let mut config = ClientConfig::default();
    if let Some(url) = args.api_url {
        config.v1_base_url = url;
    }
    if let Some(url) = args.ws_url {
        config.ws_v1_base_url = url;
    }

    config.save(cwd)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!("    api: {}", config.v1_base_url);
    println!("    ws:  {}", config.ws_v1_base_url);

    Ok(())
}

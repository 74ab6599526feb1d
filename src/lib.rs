pub mod backend;
pub mod chat;
pub mod cli;
pub mod config;
pub mod models;
pub mod server;

use backend::new_client;
use cli::{ admin::run_admin, repl::run_chat, Args, Command };
use config::SiteContentStore;
use log::{ info, error };
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let backend_config = args.backend_config();

    info!("--- Core Configuration ---");
    info!("Backend URL: {}", backend_config.base_url);
    info!("Backend Timeout: {}s", backend_config.timeout.as_secs());
    info!("User Id: {}", backend_config.user_id.as_deref().unwrap_or("none"));
    if let Command::Serve(serve) = &args.command {
        info!("Server Address: {}", serve.server_addr);
        info!("Site Content Path: {}", serve.site_content);
        info!("Assets Dir: {}", serve.assets_dir);
        info!("Max Sessions: {}", serve.max_sessions);
        info!("Default Language: {}", serve.language);
        info!("TLS Enabled: {}", serve.enable_tls);
    }
    info!("-------------------------");

    let client = new_client(&backend_config)?;

    match args.command {
        Command::Serve(serve) => {
            let content = Arc::new(SiteContentStore::initialize(&serve.site_content)?);
            let server = Server::new(serve, client, content);
            server.run().await?;
        }
        Command::Chat(chat) => {
            run_chat(client, chat.language).await?;
        }
        Command::Health => {
            match client.health().await {
                Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                Err(e) => {
                    error!("Backend at {} is offline: {}", client.base_url(), e);
                    return Err(e.into());
                }
            }
        }
        Command::Admin { action } => {
            let result = run_admin(client.as_ref(), &action).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

pub mod admin;
pub mod repl;

use clap::{ Parser, Subcommand };
use std::time::Duration;

use crate::backend::BackendConfig;
use crate::models::chat::Language;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Backend Args ---
    /// Base URL of the AWAL language backend (serves /health and /chat)
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:8000", global = true)]
    pub backend_url: String,

    /// Timeout in seconds for every backend request
    #[arg(long, env = "BACKEND_TIMEOUT_SECS", default_value = "30", global = true)]
    pub backend_timeout_secs: u64,

    /// Optional user id injected as `user_id` into backend request bodies
    #[arg(long, env = "AWAL_USER_ID", global = true)]
    pub user_id: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the marketing site, the chat page and /api/data
    Serve(ServeArgs),
    /// Chat with AWAL GPT from the terminal
    Chat(ChatArgs),
    /// Check whether the backend is reachable
    Health,
    /// Operator calls against the backend
    Admin {
        #[command(subcommand)]
        action: AdminCommand,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub server_addr: String,

    /// Path to the site content file (navigation, plans, FAQ, footer...).
    /// The compiled-in copy is used when the file does not exist.
    #[arg(long, env = "SITE_CONTENT_PATH", default_value = "json/site.json")]
    pub site_content: String,

    /// Directory served under /images.
    #[arg(long, env = "ASSETS_DIR", default_value = "public")]
    pub assets_dir: String,

    /// Maximum number of live web chat sessions kept in memory.
    #[arg(long, env = "MAX_SESSIONS", default_value = "1000")]
    pub max_sessions: usize,

    /// Language selected when a web chat session starts (fr, ber, ar).
    #[arg(long, env = "AWAL_LANGUAGE", default_value = "fr")]
    pub language: Language,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ChatArgs {
    /// Conversation language (fr, ber, ar)
    #[arg(long, env = "AWAL_LANGUAGE", default_value = "fr")]
    pub language: Language,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
    /// Show a user's conversation history
    History {
        user_id: String,
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Show backend statistics
    Stats,
    /// Trigger model training
    Train,
    /// Export the training dataset
    Export,
    /// Create a backend backup
    Backup,
}

impl Args {
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.backend_url.clone(),
            timeout: Duration::from_secs(self.backend_timeout_secs),
            user_id: self.user_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_defaults() {
        let args = Args::try_parse_from(["awal", "serve"]).unwrap();
        assert_eq!(args.backend_url, "http://localhost:8000");
        match args.command {
            Command::Serve(serve) => {
                assert_eq!(serve.server_addr, "127.0.0.1:3000");
                assert_eq!(serve.language, Language::Fr);
                assert!(!serve.enable_tls);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_backend_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "awal",
            "chat",
            "--language",
            "ber",
            "--backend-url",
            "http://10.0.0.2:8000",
            "--user-id",
            "u-1",
        ]).unwrap();
        let config = args.backend_config();
        assert_eq!(config.base_url, "http://10.0.0.2:8000");
        assert_eq!(config.user_id.as_deref(), Some("u-1"));
        assert!(matches!(args.command, Command::Chat(ChatArgs { language: Language::Ber })));
    }

    #[test]
    fn admin_history_limit() {
        let args = Args::try_parse_from(["awal", "admin", "history", "u-9", "--limit", "5"]).unwrap();
        assert!(
            matches!(args.command, Command::Admin {
                action: AdminCommand::History { ref user_id, limit: 5 },
            } if user_id == "u-9")
        );
    }

    #[test]
    fn bad_language_is_rejected() {
        assert!(Args::try_parse_from(["awal", "chat", "--language", "xx"]).is_err());
    }
}

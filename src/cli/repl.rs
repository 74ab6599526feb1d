use chrono::Local;
use log::info;
use std::error::Error;
use std::sync::Arc;
use tokio::io::{ AsyncBufReadExt, AsyncWriteExt, BufReader };

use crate::backend::BackendClient;
use crate::chat::ChatSession;
use crate::models::chat::{ ApiStatus, ChatMessage, Language, MessageSource, QuickAction, Sender };

const HELP: &str = "\
Commandes :
  /new               nouvelle discussion
  /lang <fr|ber|ar>  changer de langue
  /steps             afficher/masquer les étapes de traitement
  /list              lister les discussions
  /switch <id>       reprendre une discussion
  /quick <action>    traduction | apprentissage | culture | dialectes
  /status            vérifier le backend
  /help              cette aide
  /quit              quitter";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Send(String),
    New,
    Language(Language),
    Steps,
    List,
    Switch(String),
    Quick(QuickAction),
    Status,
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return ReplCommand::Send(line.trim_end_matches(['\r', '\n']).to_string());
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match (name, arg) {
        ("new", _) => ReplCommand::New,
        ("steps", _) => ReplCommand::Steps,
        ("list", _) => ReplCommand::List,
        ("status", _) => ReplCommand::Status,
        ("help", _) => ReplCommand::Help,
        ("quit" | "exit", _) => ReplCommand::Quit,
        ("lang", code) =>
            match code.parse::<Language>() {
                Ok(lang) => ReplCommand::Language(lang),
                Err(e) => ReplCommand::Invalid(e.to_string()),
            }
        ("switch", id) if !id.is_empty() => ReplCommand::Switch(id.to_string()),
        ("quick", slug) =>
            match QuickAction::from_slug(&slug.to_lowercase()) {
                Some(action) => ReplCommand::Quick(action),
                None => ReplCommand::Invalid(format!("Action inconnue : '{}'", slug)),
            }
        _ => ReplCommand::Invalid(format!("Commande inconnue : '{}'", trimmed)),
    }
}

pub fn render_message(message: &ChatMessage, show_steps: bool) -> String {
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    let author = match message.sender {
        Sender::User => "Vous",
        Sender::Bot => "AWAL GPT",
    };
    let badge = match message.source() {
        Some(MessageSource::Backend) => " [DeepSeek]",
        Some(MessageSource::Fallback) => " [Local]",
        Some(MessageSource::System) => " [Système]",
        None => "",
    };

    let mut out = format!("[{}] {}{}: {}", time, author, badge, message.text);
    if show_steps {
        if let Some(meta) = &message.metadata {
            for step in &meta.steps {
                out.push_str(&format!("\n    • {}: {}", step.label, step.detail));
            }
        }
    }
    out
}

fn status_line(status: ApiStatus) -> &'static str {
    match status {
        ApiStatus::Online => "✅ Backend Connecté",
        ApiStatus::Offline => "⚠️ Mode local",
        ApiStatus::Checking => "Vérification...",
    }
}

async fn print(text: &str) -> std::io::Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

pub async fn run_chat(
    client: Arc<dyn BackendClient>,
    language: Language
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut session = ChatSession::new(language);
    let status = session.check_api_status(client.as_ref()).await;
    info!("Terminal chat started against {} ({:?})", client.base_url(), status);

    print(&format!("AWAL GPT • Assistant Amazigh • {}", status_line(status))).await?;
    print("Tapez /help pour la liste des commandes.").await?;
    for message in session.messages() {
        print(&render_message(message, false)).await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            ReplCommand::Send(text) => {
                if let Some(reply) = session.send_message(client.as_ref(), &text).await {
                    print(&render_message(&reply, session.show_processing_steps())).await?;
                }
            }
            ReplCommand::New => {
                session.new_chat();
                for message in session.messages() {
                    print(&render_message(message, false)).await?;
                }
            }
            ReplCommand::Language(lang) => {
                if let Some(notice) = session.set_language(lang) {
                    print(&render_message(&notice, false)).await?;
                }
            }
            ReplCommand::Steps => {
                let shown = session.toggle_processing_steps();
                print(if shown { "Étapes de traitement : affichées" } else { "Étapes de traitement : masquées" }).await?;
            }
            ReplCommand::List => {
                for conv in session.conversations() {
                    let marker = if conv.id == session.active_conversation() { "*" } else { " " };
                    print(&format!("{} {} • {} • {}", marker, conv.id, conv.title, conv.last_message)).await?;
                }
            }
            ReplCommand::Switch(id) => {
                if !session.select_conversation(&id) {
                    print(&format!("Discussion inconnue : {}", id)).await?;
                }
            }
            ReplCommand::Quick(action) => {
                print(&format!("> {}", session.quick_action(action))).await?;
                if let Some(reply) = session.send_draft(client.as_ref()).await {
                    print(&render_message(&reply, session.show_processing_steps())).await?;
                }
            }
            ReplCommand::Status => {
                let status = session.check_api_status(client.as_ref()).await;
                print(&format!("Backend API : {} ({})", status.label(), status.badge())).await?;
            }
            ReplCommand::Help => print(HELP).await?,
            ReplCommand::Quit => break,
            ReplCommand::Invalid(msg) => print(&msg).await?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::{ MessageMetadata, ProcessingStep };
    use serde_json::json;

    #[test]
    fn plain_lines_are_sent_verbatim() {
        assert_eq!(parse_line("Azul  \n"), ReplCommand::Send("Azul  ".into()));
        assert_eq!(parse_line("   "), ReplCommand::Send("   ".into()));
    }

    #[test]
    fn slash_commands_parse() {
        assert_eq!(parse_line("/lang ber"), ReplCommand::Language(Language::Ber));
        assert_eq!(parse_line(" /quick Culture "), ReplCommand::Quick(QuickAction::Culture));
        assert_eq!(parse_line("/switch 2"), ReplCommand::Switch("2".into()));
        assert_eq!(parse_line("/exit"), ReplCommand::Quit);
        assert!(matches!(parse_line("/lang xx"), ReplCommand::Invalid(_)));
        assert!(matches!(parse_line("/switch"), ReplCommand::Invalid(_)));
        assert!(matches!(parse_line("/dance"), ReplCommand::Invalid(_)));
    }

    #[test]
    fn rendering_shows_badge_and_optional_steps() {
        let message = ChatMessage::bot(
            "3".into(),
            "Tanemmirt",
            Some(MessageMetadata {
                source: MessageSource::Backend,
                extra: Default::default(),
                steps: vec![ProcessingStep { label: "Prétraitement".into(), detail: json!("ok") }],
            })
        );

        let hidden = render_message(&message, false);
        assert!(hidden.contains("AWAL GPT [DeepSeek]: Tanemmirt"));
        assert!(!hidden.contains("Prétraitement"));

        let shown = render_message(&message, true);
        assert!(shown.contains("• Prétraitement: \"ok\""));
    }
}

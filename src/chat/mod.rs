pub mod fallback;
pub mod store;

use chrono::{ Local, Utc };
use log::{ error, info, warn };
use serde::Serialize;

use crate::backend::BackendClient;
use crate::models::backend::{ BackendReply, ChatRequest };
use crate::models::chat::{
    ApiStatus,
    ChatMessage,
    Conversation,
    Language,
    MessageMetadata,
    MessageSource,
    QuickAction,
};
use self::fallback::generate_fallback_response;

pub const WELCOME_MESSAGE: &str =
    "ⵣ Azul ! Je suis AWAL GPT, votre assistant Amazigh. Je peux vous aider avec la traduction, l'apprentissage de la langue Tamazight, et vous parler de la culture Amazighe.";
pub const NEW_CHAT_MESSAGE: &str = "ⵣ Azul ! Nouvelle discussion. Comment puis-je vous aider ?";
const FIRST_CONVERSATION_TITLE: &str = "Discussion du jour";
const FIRST_CONVERSATION_PREVIEW: &str = "ⵣ Azul ! Comment puis-je vous aider ?";
const NEW_CONVERSATION_PREVIEW: &str = "Nouvelle conversation";
const PREVIEW_CHARS: usize = 40;

/// Sidebar preview of a message: first 40 characters, `...` when cut.
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() { format!("{}...", head) } else { head }
}

/// In-memory state of one chat view: message list, sidebar conversations and UI toggles.
#[derive(Clone, Debug, Serialize)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    conversations: Vec<Conversation>,
    active_conversation: String,
    draft: String,
    is_bot_typing: bool,
    sidebar_open: bool,
    language: Language,
    api_status: ApiStatus,
    show_processing_steps: bool,
    #[serde(skip)]
    next_id: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

impl ChatSession {
    pub fn new(language: Language) -> Self {
        let mut session = Self {
            messages: Vec::new(),
            conversations: vec![Conversation {
                id: "1".to_string(),
                title: FIRST_CONVERSATION_TITLE.to_string(),
                last_message: FIRST_CONVERSATION_PREVIEW.to_string(),
                timestamp: Utc::now(),
            }],
            active_conversation: "1".to_string(),
            draft: String::new(),
            is_bot_typing: false,
            sidebar_open: true,
            language,
            api_status: ApiStatus::Checking,
            show_processing_steps: false,
            next_id: 1,
        };
        let welcome = session.bot_message(WELCOME_MESSAGE, None);
        session.messages.push(welcome);
        session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn active_conversation(&self) -> &str {
        &self.active_conversation
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_bot_typing(&self) -> bool {
        self.is_bot_typing
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn api_status(&self) -> ApiStatus {
        self.api_status
    }

    pub fn show_processing_steps(&self) -> bool {
        self.show_processing_steps
    }

    fn take_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        id.to_string()
    }

    fn bot_message(&mut self, text: &str, metadata: Option<MessageMetadata>) -> ChatMessage {
        let id = self.take_id();
        ChatMessage::bot(id, text, metadata)
    }

    pub async fn check_api_status(&mut self, client: &dyn BackendClient) -> ApiStatus {
        self.api_status = ApiStatus::Checking;
        self.api_status = match client.health().await {
            Ok(_) => ApiStatus::Online,
            Err(e) => {
                warn!("Backend health check failed ({}): {}", client.base_url(), e);
                ApiStatus::Offline
            }
        };
        self.api_status
    }

    /// Records the user line and marks a reply as pending. Returns the request to send,
    /// or `None` when the text is blank or a reply is already pending.
    pub fn begin_send(&mut self, text: &str) -> Option<ChatRequest> {
        if text.trim().is_empty() || self.is_bot_typing {
            return None;
        }

        let id = self.take_id();
        self.messages.push(ChatMessage::user(id, text));
        self.is_bot_typing = true;

        let active = self.active_conversation.clone();
        if let Some(conv) = self.conversations.iter_mut().find(|c| c.id == active) {
            conv.last_message = preview(text);
            conv.timestamp = Utc::now();
        }

        Some(ChatRequest {
            message: text.to_string(),
            conversation_id: Some(active),
            language: Some(self.language.code().to_string()),
            user_id: None,
        })
    }

    /// Appends exactly one bot line for the pending request: the backend text, or the
    /// keyword fallback when the call failed.
    pub fn finish_send<E: std::fmt::Display>(
        &mut self,
        user_text: &str,
        result: Result<BackendReply, E>
    ) -> ChatMessage {
        let message = match result {
            Ok(reply) => {
                let metadata = MessageMetadata {
                    source: MessageSource::Backend,
                    extra: reply.metadata,
                    steps: reply.steps,
                };
                self.bot_message(&reply.text, Some(metadata))
            }
            Err(e) => {
                error!("Backend error, using fallback: {}", e);
                let text = generate_fallback_response(user_text);
                self.bot_message(text, Some(MessageMetadata::source(MessageSource::Fallback)))
            }
        };
        self.messages.push(message.clone());
        self.is_bot_typing = false;
        message
    }

    pub async fn send_message(
        &mut self,
        client: &dyn BackendClient,
        text: &str
    ) -> Option<ChatMessage> {
        let request = self.begin_send(text)?;
        let result = client.send_message(request).await;
        Some(self.finish_send(text, result))
    }

    pub async fn send_draft(&mut self, client: &dyn BackendClient) -> Option<ChatMessage> {
        let text = std::mem::take(&mut self.draft);
        let sent = self.send_message(client, &text).await;
        if sent.is_none() {
            self.draft = text;
        }
        sent
    }

    pub fn set_draft(&mut self, text: &str) {
        self.draft = text.to_string();
    }

    pub fn quick_action(&mut self, action: QuickAction) -> &str {
        self.draft = action.prompt().to_string();
        &self.draft
    }

    pub fn new_chat(&mut self) -> &Conversation {
        let id = (self.conversations.len() + 1).to_string();
        let conversation = Conversation {
            id: id.clone(),
            title: format!("Discussion {}", Local::now().format("%H:%M")),
            last_message: NEW_CONVERSATION_PREVIEW.to_string(),
            timestamp: Utc::now(),
        };
        info!("New conversation {}", id);
        self.conversations.insert(0, conversation);
        self.active_conversation = id;
        self.messages.clear();
        let welcome = self.bot_message(NEW_CHAT_MESSAGE, None);
        self.messages.push(welcome);
        &self.conversations[0]
    }

    pub fn select_conversation(&mut self, id: &str) -> bool {
        if !self.conversations.iter().any(|c| c.id == id) {
            return false;
        }
        self.active_conversation = id.to_string();
        self.sidebar_open = false;
        true
    }

    /// Switching to another language appends one system notice; re-selecting is a no-op.
    pub fn set_language(&mut self, language: Language) -> Option<ChatMessage> {
        if language == self.language {
            return None;
        }
        self.language = language;
        let text = format!(
            "Langue sélectionnée : {} ({})",
            language.display_name(),
            language.label()
        );
        let notice = self.bot_message(&text, Some(MessageMetadata::source(MessageSource::System)));
        self.messages.push(notice.clone());
        Some(notice)
    }

    pub fn toggle_processing_steps(&mut self) -> bool {
        self.show_processing_steps = !self.show_processing_steps;
        self.show_processing_steps
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }
}

use chrono::{ DateTime, Utc };
use serde::{ Serialize, Deserialize };
use serde_json::{ Map, Value as JsonValue };
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// Where a bot line came from. Drives the small badge next to the author.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSource {
    Backend,
    Fallback,
    System,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStep {
    pub label: String,
    pub detail: JsonValue,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    pub source: MessageSource,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<ProcessingStep>,
}

impl MessageMetadata {
    pub fn source(source: MessageSource) -> Self {
        Self { source, extra: Map::new(), steps: Vec::new() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl ChatMessage {
    pub fn user(id: String, text: &str) -> Self {
        Self {
            id,
            text: text.to_string(),
            sender: Sender::User,
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    pub fn bot(id: String, text: &str, metadata: Option<MessageMetadata>) -> Self {
        Self {
            id,
            text: text.to_string(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
            metadata,
        }
    }

    pub fn source(&self) -> Option<MessageSource> {
        self.metadata.as_ref().map(|m| m.source)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub last_message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    Ber,
    Ar,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Fr, Language::Ber, Language::Ar];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::Ber => "ber",
            Language::Ar => "ar",
        }
    }

    /// Short label shown on the selector buttons.
    pub fn label(&self) -> &'static str {
        match self {
            Language::Fr => "FR",
            Language::Ber => "ⵜⵎⵣ",
            Language::Ar => "AR",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Fr => "Français",
            Language::Ber => "Tamazight",
            Language::Ar => "Arabe",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseLanguageError {
    message: String,
}

impl fmt::Display for ParseLanguageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseLanguageError {}

impl FromStr for Language {
    type Err = ParseLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fr" => Ok(Language::Fr),
            "ber" | "tmz" | "zgh" => Ok(Language::Ber),
            "ar" => Ok(Language::Ar),
            _ =>
                Err(ParseLanguageError {
                    message: format!("Invalid language: '{}' (expected fr, ber or ar)", s),
                }),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Online,
    Offline,
    #[default]
    Checking,
}

impl ApiStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ApiStatus::Online => "Connecté",
            ApiStatus::Offline => "Hors ligne",
            ApiStatus::Checking => "Vérification...",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            ApiStatus::Online => "API Online",
            ApiStatus::Offline => "API Offline",
            ApiStatus::Checking => "Checking...",
        }
    }
}

/// Canned prompts offered under the message list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickAction {
    Traduction,
    Apprentissage,
    Culture,
    Dialectes,
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        QuickAction::Traduction,
        QuickAction::Apprentissage,
        QuickAction::Culture,
        QuickAction::Dialectes,
    ];

    pub fn prompt(&self) -> &'static str {
        match self {
            QuickAction::Traduction => "Traduis \"bonjour\" en Tamazight",
            QuickAction::Apprentissage => "Apprends-moi 5 mots en Tamazight",
            QuickAction::Culture => "Parle-moi de la culture Amazighe",
            QuickAction::Dialectes => "Quels sont les dialectes Amazighs ?",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            QuickAction::Traduction => "Traduction",
            QuickAction::Apprentissage => "Apprentissage",
            QuickAction::Culture => "Culture",
            QuickAction::Dialectes => "Dialectes",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            QuickAction::Traduction => "Traduire un mot ou phrase",
            QuickAction::Apprentissage => "Vocabulaire et grammaire",
            QuickAction::Culture => "Traditions et histoire",
            QuickAction::Dialectes => "Variantes régionales",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            QuickAction::Traduction => "traduction",
            QuickAction::Apprentissage => "apprentissage",
            QuickAction::Culture => "culture",
            QuickAction::Dialectes => "dialectes",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.slug() == slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_parses_codes_and_aliases() {
        assert_eq!("FR".parse::<Language>(), Ok(Language::Fr));
        assert_eq!("tmz".parse::<Language>(), Ok(Language::Ber));
        assert_eq!(" ar ".parse::<Language>(), Ok(Language::Ar));
        assert!("en".parse::<Language>().is_err());
    }

    #[test]
    fn message_serializes_sender_and_source_lowercase() {
        let msg = ChatMessage::bot(
            "7".into(),
            "Azul",
            Some(MessageMetadata::source(MessageSource::Fallback))
        );
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["sender"], "bot");
        assert_eq!(json["metadata"]["source"], "fallback");
        assert!(json["metadata"].get("steps").is_none());
    }

    #[test]
    fn quick_action_slugs_resolve() {
        for action in QuickAction::ALL {
            assert_eq!(QuickAction::from_slug(action.slug()), Some(action));
        }
        assert_eq!(QuickAction::from_slug("unknown"), None);
    }
}

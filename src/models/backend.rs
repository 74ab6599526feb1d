use crate::backend::BackendError;
use crate::models::chat::ProcessingStep;
use serde::{ Serialize, Deserialize };
use serde_json::{ Map, Value as JsonValue };

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NestedReply {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub metadata: Option<JsonValue>,
}

/// Every `/chat` body shape the backend has been seen to return.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ChatResponseBody {
    Nested {
        success: bool,
        response: NestedReply,
        #[serde(default)]
        error: Option<String>,
    },
    Flat {
        success: bool,
        response: String,
        #[serde(default)]
        intent: Option<JsonValue>,
        #[serde(default)]
        detected_dialect: Option<JsonValue>,
        #[serde(default)]
        processing_time_ms: Option<JsonValue>,
        #[serde(default)]
        conversation_id: Option<JsonValue>,
        #[serde(default)]
        metadata: Option<JsonValue>,
        #[serde(default)]
        error: Option<JsonValue>,
    },
    Pipeline {
        success: bool,
        llm_response: String,
        #[serde(default)]
        preprocessed: Option<JsonValue>,
        #[serde(default)]
        corpus_matches: Option<JsonValue>,
        #[serde(default)]
        translated_context: Option<JsonValue>,
        #[serde(default)]
        error: Option<String>,
    },
    Failure {
        #[serde(default)]
        success: bool,
        #[serde(default)]
        error: Option<String>,
    },
}

/// Normalised result of a successful `/chat` call.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendReply {
    pub text: String,
    pub metadata: Map<String, JsonValue>,
    pub steps: Vec<ProcessingStep>,
}

fn rejected(error: Option<String>) -> BackendError {
    BackendError::Rejected(error.unwrap_or_else(|| "Unknown error".to_string()))
}

fn non_empty(text: String) -> Result<String, BackendError> {
    if text.trim().is_empty() { Err(BackendError::EmptyReply) } else { Ok(text) }
}

fn push_step(steps: &mut Vec<ProcessingStep>, label: &str, detail: Option<JsonValue>) {
    match detail {
        None | Some(JsonValue::Null) => {}
        Some(detail) => steps.push(ProcessingStep { label: label.to_string(), detail }),
    }
}

fn present(map: &mut Map<String, JsonValue>, key: &str, value: Option<JsonValue>) {
    match value {
        None | Some(JsonValue::Null) => {}
        Some(value) => {
            map.insert(key.to_string(), value);
        }
    }
}

fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ChatResponseBody {
    pub fn into_reply(self) -> Result<BackendReply, BackendError> {
        match self {
            ChatResponseBody::Nested { success, response, error } => {
                if !success {
                    return Err(rejected(error));
                }
                let text = non_empty(response.text.ok_or(BackendError::EmptyReply)?)?;
                let metadata = match response.metadata {
                    Some(JsonValue::Object(map)) => map,
                    _ => Map::new(),
                };
                Ok(BackendReply { text, metadata, steps: Vec::new() })
            }
            ChatResponseBody::Flat {
                success,
                response,
                intent,
                detected_dialect,
                processing_time_ms,
                conversation_id,
                metadata,
                error,
            } => {
                if !success {
                    return Err(rejected(error.map(|e| display_value(&e))));
                }
                let text = non_empty(response)?;
                let mut extra = match metadata {
                    Some(JsonValue::Object(map)) => map,
                    _ => Map::new(),
                };
                present(&mut extra, "conversation_id", conversation_id);

                let mut analysis = Map::new();
                present(&mut analysis, "intent", intent);
                present(&mut analysis, "detected_dialect", detected_dialect);
                present(&mut analysis, "processing_time_ms", processing_time_ms);
                let mut steps = Vec::new();
                if !analysis.is_empty() {
                    extra.extend(analysis.clone());
                    push_step(&mut steps, "Analyse", Some(JsonValue::Object(analysis)));
                }

                Ok(BackendReply { text, metadata: extra, steps })
            }
            ChatResponseBody::Pipeline {
                success,
                llm_response,
                preprocessed,
                corpus_matches,
                translated_context,
                error,
            } => {
                if !success {
                    return Err(rejected(error));
                }
                let text = non_empty(llm_response)?;
                let mut steps = Vec::new();
                push_step(&mut steps, "Prétraitement", preprocessed);
                push_step(&mut steps, "Correspondances du corpus", corpus_matches);
                push_step(&mut steps, "Contexte traduit", translated_context);
                Ok(BackendReply { text, metadata: Map::new(), steps })
            }
            ChatResponseBody::Failure { success, error } => {
                if success { Err(BackendError::EmptyReply) } else { Err(rejected(error)) }
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub original_message: String,
    pub response: String,
    #[serde(default)]
    pub intent: Option<String>,
    #[serde(default)]
    pub dialect: Option<String>,
    #[serde(default)]
    pub processing_time_ms: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserHistory {
    pub success: bool,
    pub user_id: String,
    #[serde(default)]
    pub conversations: Vec<HistoryEntry>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SystemStats {
    pub success: bool,
    #[serde(default)]
    pub system_stats: Map<String, JsonValue>,
    #[serde(default)]
    pub response_generator_stats: Map<String, JsonValue>,
    #[serde(default)]
    pub database_stats: Map<String, JsonValue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: JsonValue) -> Result<BackendReply, BackendError> {
        serde_json::from_value::<ChatResponseBody>(value).unwrap().into_reply()
    }

    #[test]
    fn nested_shape_keeps_metadata() {
        let reply = decode(
            json!({
            "success": true,
            "response": { "text": "Azul!", "metadata": { "model": "deepseek" } }
        })
        ).unwrap();
        assert_eq!(reply.text, "Azul!");
        assert_eq!(reply.metadata["model"], "deepseek");
        assert!(reply.steps.is_empty());

        let reply = decode(
            json!({
            "success": true,
            "response": { "text": "Azul!", "metadata": "n/a" }
        })
        ).unwrap();
        assert_eq!(reply.text, "Azul!");
        assert!(reply.metadata.is_empty());
    }

    #[test]
    fn pipeline_shape_becomes_processing_steps() {
        let reply = decode(
            json!({
            "success": true,
            "llm_response": "Tanemmirt",
            "preprocessed": { "tokens": ["azul"] },
            "corpus_matches": [{ "fr": "bonjour", "ber": "azul" }],
            "translated_context": null
        })
        ).unwrap();
        assert_eq!(reply.text, "Tanemmirt");
        let labels: Vec<_> = reply.steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Prétraitement", "Correspondances du corpus"]);
    }

    #[test]
    fn flat_shape_collects_analysis() {
        let reply = decode(
            json!({
            "success": true,
            "original_message": "salut",
            "processed_message": "salut",
            "response": "Azul fell-ak",
            "intent": "greeting",
            "detected_dialect": "tachelhit",
            "processing_time_ms": 12.5,
            "metadata": {}
        })
        ).unwrap();
        assert_eq!(reply.text, "Azul fell-ak");
        assert_eq!(reply.metadata["intent"], "greeting");
        assert_eq!(reply.steps.len(), 1);
        assert_eq!(reply.steps[0].label, "Analyse");
    }

    #[test]
    fn flat_shape_accepts_loosely_typed_fields() {
        let reply = decode(
            json!({
            "success": true,
            "response": "Azul fell-ak",
            "conversation_id": 7,
            "intent": null,
            "processing_time_ms": "12",
            "metadata": []
        })
        ).unwrap();
        assert_eq!(reply.text, "Azul fell-ak");
        assert_eq!(reply.metadata["conversation_id"], 7);
        assert!(reply.metadata.get("intent").is_none());
        assert_eq!(reply.steps[0].detail, json!({ "processing_time_ms": "12" }));
    }

    #[test]
    fn unsuccessful_bodies_are_rejected() {
        let err = decode(json!({ "success": false, "error": "model down" })).unwrap_err();
        assert!(matches!(err, BackendError::Rejected(ref m) if m == "model down"));

        let err = decode(json!({ "success": false, "response": { "text": "x" } })).unwrap_err();
        assert!(matches!(err, BackendError::Rejected(_)));
    }

    #[test]
    fn success_without_text_is_empty_reply() {
        let err = decode(json!({ "success": true, "response": {} })).unwrap_err();
        assert!(matches!(err, BackendError::EmptyReply));

        let err = decode(json!({ "success": true })).unwrap_err();
        assert!(matches!(err, BackendError::EmptyReply));
    }

    #[test]
    fn request_omits_absent_fields() {
        let req = ChatRequest { message: "azul".into(), ..Default::default() };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({ "message": "azul" }));
    }
}

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Fixed rewrite instruction. The model must return only the text.
const SYSTEM_INSTRUCTION: &str = "You are a relationship harmony assistant. \
Rewrite the following message to be gentler, more loving, and less aggressive, \
while preserving the core meaning. If the message is already kind, return it \
as is. Do not add explanations, just return the text.";

/// Best-effort pass-through to a chat-completions endpoint that softens
/// outgoing messages. Never required for correctness: any failure falls
/// back to the original text.
pub struct Harmony {
    client: reqwest::Client,
    config: Option<HarmonyConfig>,
}

struct HarmonyConfig {
    url: String,
    api_key: String,
    model: String,
}

impl Harmony {
    /// Reads TANDEM_HARMONY_URL / TANDEM_HARMONY_KEY / TANDEM_HARMONY_MODEL.
    /// Disabled unless both URL and key are set.
    pub fn from_env() -> Self {
        let config = match (
            std::env::var("TANDEM_HARMONY_URL"),
            std::env::var("TANDEM_HARMONY_KEY"),
        ) {
            (Ok(url), Ok(api_key)) => Some(HarmonyConfig {
                url,
                api_key,
                model: std::env::var("TANDEM_HARMONY_MODEL")
                    .unwrap_or_else(|_| "gpt-4o-mini".into()),
            }),
            _ => {
                debug!("Harmony rewrite not configured, softening disabled");
                None
            }
        };

        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            config: None,
        }
    }

    /// Returns the softened text, or `None` on any failure — missing
    /// config, transport error, non-2xx, unparseable body, empty reply.
    pub async fn soften(&self, text: &str) -> Option<String> {
        let config = self.config.as_ref()?;

        let body = json!({
            "model": config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_INSTRUCTION },
                { "role": "user", "content": text },
            ],
            "temperature": 0.7,
        });

        let response = self
            .client
            .post(&config.url)
            .bearer_auth(&config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| warn!("Harmony request failed: {}", e))
            .ok()?;

        if !response.status().is_success() {
            warn!("Harmony endpoint returned {}", response.status());
            return None;
        }

        let reply: ChatReply = response
            .json()
            .await
            .map_err(|e| warn!("Harmony reply unparseable: {}", e))
            .ok()?;

        extract_text(reply)
    }
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn extract_text(reply: ChatReply) -> Option<String> {
    let text = reply.choices.into_iter().next()?.message.content?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_harmony_always_falls_back() {
        let harmony = Harmony::disabled();
        assert_eq!(harmony.soften("you never listen").await, None);
    }

    #[test]
    fn extract_text_takes_first_choice() {
        let reply: ChatReply = serde_json::from_value(serde_json::json!({
            "choices": [
                { "message": { "content": "  could we talk about this?  " } },
                { "message": { "content": "ignored" } }
            ]
        }))
        .unwrap();
        assert_eq!(extract_text(reply).unwrap(), "could we talk about this?");
    }

    #[test]
    fn empty_or_missing_content_is_a_failure() {
        let empty: ChatReply = serde_json::from_value(serde_json::json!({
            "choices": [ { "message": { "content": "   " } } ]
        }))
        .unwrap();
        assert_eq!(extract_text(empty), None);

        let missing: ChatReply =
            serde_json::from_value(serde_json::json!({ "choices": [] })).unwrap();
        assert_eq!(extract_text(missing), None);
    }
}

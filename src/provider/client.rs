//! Generation client - wraps the remote text/image completion REST API

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::constants::SYSTEM_INSTRUCTION;
use crate::messages::provider::ImageSource;
use crate::models::StyleOptions;
use crate::provider::error::ProviderError;
use crate::provider::retry::retry_on_overload;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ContentBody<'a>>,
    contents: Vec<ContentBody<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct ContentBody<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

// ============================================================================
// Client
// ============================================================================

/// Client for the generative text/image provider. All operations retry on
/// transient overload per the configured backoff policy.
pub struct GenerationClient {
    http: reqwest::Client,
    config: AppConfig,
    images_dir: PathBuf,
}

impl GenerationClient {
    pub fn new(config: AppConfig, images_dir: PathBuf) -> Self {
        GenerationClient {
            http: create_client(),
            config,
            images_dir,
        }
    }

    // ------------------------------------------------------------------
    // Text operations
    // ------------------------------------------------------------------

    /// A word of support for a chosen situation (3-4 blocks)
    pub async fn generate_word(
        &self,
        situation: &str,
        style: &StyleOptions,
    ) -> Result<String, ProviderError> {
        let prompt = format!(
            "Ситуация: \"{}\". Дай глубокое слово поддержки (3-4 блока).{}",
            situation,
            style_suffix(style)
        );
        let text = self.generate_text(&prompt, 0.8).await?;
        Ok(or_fallback(text, &self.config.fallbacks.word))
    }

    /// A letter of the given type (5-7 blocks)
    pub async fn generate_letter(
        &self,
        label: &str,
        context: &str,
        style: &StyleOptions,
    ) -> Result<String, ProviderError> {
        let prompt = format!(
            "Напиши \"{}\". Контекст: {}. (5-7 блоков).{}",
            label,
            context,
            style_suffix(style)
        );
        let text = self.generate_text(&prompt, 0.9).await?;
        Ok(or_fallback(text, &self.config.fallbacks.letter))
    }

    /// A short reply to a journal entry (3 blocks)
    pub async fn generate_journal_reply(&self, user_text: &str) -> Result<String, ProviderError> {
        let prompt = format!(
            "Запись в дневнике: \"{}\". Ответь как VERA (3 блока).",
            user_text
        );
        let text = self.generate_text(&prompt, 0.7).await?;
        Ok(or_fallback(text, &self.config.fallbacks.journal))
    }

    /// The once-a-day greeting phrase
    pub async fn generate_daily(&self) -> Result<String, ProviderError> {
        let prompt = "Придумай одну глубокую фразу на сегодня для девушки (1-2 предложения).";
        let text = self.generate_text(prompt, 1.0).await?;
        Ok(or_fallback(text, &self.config.fallbacks.daily))
    }

    async fn generate_text(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError> {
        retry_on_overload(
            self.config.retry,
            || self.generate_text_once(prompt, temperature),
            |d| tokio::time::sleep(d),
        )
        .await
    }

    async fn generate_text_once(
        &self,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let body = GenerateRequest {
            system_instruction: Some(ContentBody {
                parts: vec![TextPart {
                    text: SYSTEM_INSTRUCTION,
                }],
            }),
            contents: vec![ContentBody {
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: Some(GenerationConfig { temperature }),
        };

        let response = self.post_generate(&self.config.text_model, &body).await?;
        Ok(first_text(&response).unwrap_or_default())
    }

    // ------------------------------------------------------------------
    // Image operation
    // ------------------------------------------------------------------

    /// Generate an image from the user's description plus a style
    /// descriptor. Returns either an inline `data:` URI or a hosted URL
    /// already checked for reachability.
    pub async fn generate_image(
        &self,
        user_prompt: &str,
        style_prompt: &str,
    ) -> Result<ImageSource, ProviderError> {
        let prompt = format!(
            "Aesthetic artistic illustration: {}, {}, high quality, dreamy, minimalist.",
            user_prompt, style_prompt
        );

        let source = retry_on_overload(
            self.config.retry,
            || self.generate_image_once(&prompt),
            |d| tokio::time::sleep(d),
        )
        .await?;

        // Hosted URLs get a lightweight existence check before we hand them
        // to the UI; a dead link is indistinguishable from no image at all.
        if let ImageSource::Url(url) = &source {
            self.check_url(url).await?;
        }
        Ok(source)
    }

    async fn generate_image_once(&self, prompt: &str) -> Result<ImageSource, ProviderError> {
        let body = GenerateRequest {
            system_instruction: None,
            contents: vec![ContentBody {
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: None,
        };

        let response = self.post_generate(&self.config.image_model, &body).await?;

        for part in response
            .candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
        {
            if let Some(inline) = &part.inline_data {
                let uri = format!("data:{};base64,{}", inline.mime_type, inline.data);
                return Ok(ImageSource::DataUri(uri));
            }
            if let Some(text) = &part.text {
                let trimmed = text.trim();
                if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
                    return Ok(ImageSource::Url(trimmed.to_string()));
                }
            }
        }
        Err(ProviderError::Empty)
    }

    async fn check_url(&self, url: &str) -> Result<(), ProviderError> {
        let response = self
            .http
            .head(url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::Unreachable(format!(
                "HTTP {} for {}",
                response.status().as_u16(),
                url
            )))
        }
    }

    /// Fetch or decode a generated image and write it under the images dir.
    pub async fn save_image(&self, source: &ImageSource) -> Result<PathBuf, ProviderError> {
        let (bytes, extension) = match source {
            ImageSource::DataUri(uri) => decode_data_uri(uri)?,
            ImageSource::Url(url) => {
                let response = self.http.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ProviderError::Api {
                        status: status.as_u16(),
                        message: format!("fetching {}", url),
                    });
                }
                (response.bytes().await?.to_vec(), String::from("jpg"))
            }
        };

        std::fs::create_dir_all(&self.images_dir)
            .map_err(|e| ProviderError::Http(e.to_string()))?;
        let path = self.images_dir.join(format!(
            "vera-art-{}.{}",
            chrono::Utc::now().timestamp_millis(),
            extension
        ));
        std::fs::write(&path, bytes).map_err(|e| ProviderError::Http(e.to_string()))?;
        Ok(path)
    }

    // ------------------------------------------------------------------
    // Notification side-channel
    // ------------------------------------------------------------------

    /// One-shot new-user notification to the configured chat endpoint.
    /// Best effort: failures are logged and swallowed.
    pub async fn notify_new_user(&self, name: &str, user_id: &str) {
        let (Some(token), Some(chat_id)) = (
            self.config.notify.bot_token.as_deref(),
            self.config.notify.admin_chat_id.as_deref(),
        ) else {
            return;
        };

        let url = format!("https://api.telegram.org/bot{}/sendMessage", token);
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": format!("Новая душа в VERA\n\nИмя: {}\nID: {}", name, user_id),
            "parse_mode": "Markdown",
        });

        match self.http.post(&url).json(&body).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!("New-user notification sent");
            }
            Ok(response) => {
                tracing::warn!(status = response.status().as_u16(), "New-user notification rejected");
            }
            Err(e) => {
                tracing::warn!(error = %e, "New-user notification failed");
            }
        }
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    async fn post_generate(
        &self,
        model: &str,
        body: &GenerateRequest<'_>,
    ) -> Result<GenerateResponse, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_base, model, self.config.api_key
        );

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status().as_u16();

        match status {
            200..=299 => Ok(response.json::<GenerateResponse>().await?),
            429 | 503 => Err(ProviderError::Overloaded { status }),
            _ => {
                let message = response.text().await.unwrap_or_default();
                Err(ProviderError::Api { status, message })
            }
        }
    }
}

/// First text part of the first candidate, if any
fn first_text(response: &GenerateResponse) -> Option<String> {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.iter().find_map(|p| p.text.clone()))
}

/// Substitute the fallback phrase for an empty generation
fn or_fallback(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

/// Style options rendered as a prompt suffix; empty when none are set
fn style_suffix(style: &StyleOptions) -> String {
    let mut parts = Vec::new();
    if let Some(tone) = style.tone {
        parts.push(format!("тон: {}", tone.as_str()));
    }
    if let Some(mood) = style.mood {
        parts.push(format!("настроение: {}", mood.as_str()));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" Стиль — {}.", parts.join(", "))
    }
}

/// Decode a `data:<mime>;base64,<payload>` URI into bytes plus an extension
fn decode_data_uri(uri: &str) -> Result<(Vec<u8>, String), ProviderError> {
    let rest = uri.strip_prefix("data:").ok_or(ProviderError::Empty)?;
    let (mime, payload) = rest.split_once(";base64,").ok_or(ProviderError::Empty)?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| ProviderError::Http(e.to_string()))?;
    let extension = match mime {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    };
    Ok((bytes, extension.to_string()))
}

/// Create an HTTP client with default configuration
fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Save destination for generated images under a config dir
pub fn images_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("images")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Mood, Tone};

    #[test]
    fn test_or_fallback_substitutes_empty() {
        assert_eq!(or_fallback(String::new(), "Тишина..."), "Тишина...");
        assert_eq!(or_fallback(String::from("  \n"), "Тишина..."), "Тишина...");
        assert_eq!(or_fallback(String::from("слово"), "Тишина..."), "слово");
    }

    #[test]
    fn test_style_suffix_empty_when_unset() {
        assert_eq!(style_suffix(&StyleOptions::default()), "");
    }

    #[test]
    fn test_style_suffix_names_both_options() {
        let suffix = style_suffix(&StyleOptions {
            tone: Some(Tone::FemaleDirected),
            mood: Some(Mood::Hard),
        });
        assert!(suffix.contains("женский"));
        assert!(suffix.contains("жёсткий"));
    }

    #[test]
    fn test_decode_data_uri() {
        let (bytes, ext) = decode_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
        assert_eq!(ext, "png");
    }

    #[test]
    fn test_decode_data_uri_rejects_plain_url() {
        assert!(decode_data_uri("https://example.com/a.png").is_err());
    }

    #[test]
    fn test_response_parsing_inline_data() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": "QUJD" } }
                ]}
            }]
        }"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        let inline = response.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts[0]
            .inline_data
            .as_ref()
            .unwrap();
        assert_eq!(inline.mime_type, "image/png");
    }

    #[test]
    fn test_response_parsing_text() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Блок1\n\nБлок2"}]}}]}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(first_text(&response).unwrap(), "Блок1\n\nБлок2");
    }

    #[test]
    fn test_response_parsing_no_candidates() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(first_text(&response).is_none());
    }
}

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

use crate::config::TranslationConfig;
use crate::errors::{Result, TimetableError};

/// Interface languages offered by the language selector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Kannada,
    Hindi,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Kannada, Language::Hindi];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "english" => Some(Language::English),
            "kannada" => Some(Language::Kannada),
            "hindi" => Some(Language::Hindi),
            _ => None,
        }
    }

    /// Lowercase name, as used in the selector and in prompts
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Kannada => "kannada",
            Language::Hindi => "hindi",
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Language::English
    }
}

/// Every UI string that gets machine translated
pub const UI_LABELS: [&str; 16] = [
    "Timetable Generator",
    "Semester Details",
    "Semester",
    "Room Number",
    "Number of Students",
    "Subjects",
    "Subject Name",
    "Teacher Name",
    "Credits (theory:tutorial:practical)",
    "Add Subject",
    "Generate Timetable",
    "Export to Excel",
    "Generated Timetable",
    "Day",
    "Light Mode",
    "Dark Mode",
];

/// External text-generation capability
pub trait TextGenerator: Send + Sync + 'static {
    /// Complete `prompt` and return the generated text
    fn generate(&self, prompt: String) -> impl Future<Output = Result<String>> + Send;
}

pub fn translation_prompt(language: Language, text: &str) -> String {
    format!(
        "Translate the following English text to {}: \"{}\"",
        language.name(),
        text
    )
}

/// Translate every label into `language`, one concurrent request per label
///
/// All requests are joined before returning. The first failed request aborts
/// the remaining ones and fails the whole batch. For English nothing is
/// requested and the map is empty.
pub async fn translate<G: TextGenerator>(
    generator: Arc<G>,
    language: Language,
    labels: &[&str],
) -> Result<HashMap<String, String>> {
    let mut translations = HashMap::new();
    if language.is_default() {
        return Ok(translations);
    }

    let mut tasks = JoinSet::new();
    for label in labels {
        let generator = Arc::clone(&generator);
        let label = label.to_string();
        let prompt = translation_prompt(language, &label);
        tasks.spawn(async move {
            let text = generator.generate(prompt).await?;
            Ok::<_, TimetableError>((label, text.trim().to_string()))
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (label, text) = joined.map_err(|e| TimetableError::TaskFailed(e.to_string()))??;
        translations.insert(label, text);
    }

    Ok(translations)
}

/// Translated labels for the current language
#[derive(Clone, Debug, Default, Serialize)]
pub struct TranslationCache {
    language: Language,
    entries: HashMap<String, String>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Translation of `text`, or `text` itself when none is cached
    pub fn label<'a>(&'a self, text: &'a str) -> &'a str {
        self.entries.get(text).map(String::as_str).unwrap_or(text)
    }

    pub fn replace(&mut self, language: Language, entries: HashMap<String, String>) {
        self.language = language;
        self.entries = entries;
    }

    pub fn clear(&mut self) {
        self.language = Language::English;
        self.entries.clear();
    }
}

/// `TextGenerator` backed by an OpenAI-style chat completions API
pub struct OpenAiGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

impl OpenAiGenerator {
    /// Build a client from config, reading the key from the configured
    /// environment variable
    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.is_empty());
        Self::new(config, api_key)
    }

    pub fn new(config: &TranslationConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
        })
    }

    async fn call_api(&self, prompt: String) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TimetableError::MissingApiKey(self.api_key_env.clone()))?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TimetableError::ApiError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| TimetableError::ApiError("No choices in response".to_string()))
    }
}

impl TextGenerator for OpenAiGenerator {
    fn generate(&self, prompt: String) -> impl Future<Output = Result<String>> + Send {
        self.call_api(prompt)
    }
}

use crate::openai::dto::{ApiErrorBody, ChatCompletionBody};
use crate::{ApiKey, ChatMessage, ChatRequest, ChatResponse};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use metronome_error::{HttpError, MetronomeResult, OpenAIError, OpenAIErrorKind, OpenAIResult};
use metronome_rate_limit::{ClientConfig, HeaderRateLimitDetector, Pacer, TierConfig};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Chat completions client that consults a [`Pacer`] before every request.
///
/// Cloning is cheap; clones share the pacer, the spacing limiter and the
/// detected-limits cache, so concurrent tasks are paced together.
#[derive(Clone)]
pub struct OpenAIClient {
    http: Client,
    api_key: ApiKey,
    base_url: String,
    model: String,
    pacer: Arc<Pacer>,
    spacing: Option<Arc<DefaultDirectRateLimiter>>,
    detector: HeaderRateLimitDetector,
}

impl fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("pacer", &self.pacer)
            .field("spacing", &self.spacing.is_some())
            .finish()
    }
}

impl OpenAIClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an HTTP error if the underlying client cannot be built.
    #[instrument(skip(config, api_key, pacer), fields(base_url = %config.base_url, model = %config.model))]
    pub fn new(config: &ClientConfig, api_key: ApiKey, pacer: Arc<Pacer>) -> MetronomeResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;

        let spacing = Quota::with_period(Duration::from_millis(config.min_request_interval_ms))
            .map(|quota| Arc::new(RateLimiter::direct(quota)));

        debug!(spacing = spacing.is_some(), "Creating new OpenAI client");

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            pacer,
            spacing,
            detector: HeaderRateLimitDetector::new(),
        })
    }

    /// The pacer gating this client.
    pub fn pacer(&self) -> &Arc<Pacer> {
        &self.pacer
    }

    /// Model used when a request does not name one.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Limits last reported by the remote service, if any.
    pub async fn detected_limits(&self) -> Option<TierConfig> {
        self.detector.get_cached().await
    }

    /// Sends one paced chat completion request.
    ///
    /// # Errors
    ///
    /// Returns a classified [`OpenAIError`]; see [`OpenAIErrorKind`].
    #[instrument(skip(self, request), fields(messages = request.messages().len()))]
    pub async fn chat(&self, request: &ChatRequest) -> OpenAIResult<ChatResponse> {
        self.wait_for_slot().await?;

        let body = ChatCompletionBody {
            model: request.model().as_deref().unwrap_or(self.model.as_str()),
            messages: request.messages(),
            max_tokens: *request.max_tokens(),
            temperature: *request.temperature(),
        };
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = body.model, %url, "Sending request to OpenAI API");

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to OpenAI API");
                OpenAIError::new(OpenAIErrorKind::Network(e.to_string()))
            })?;

        let status = response.status();
        if status.is_success() {
            self.observe_limits(response.headers()).await;
        }

        let text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read OpenAI response body");
            OpenAIError::new(OpenAIErrorKind::Network(e.to_string()))
        })?;

        if !status.is_success() {
            error!(status = %status, body = %text, "OpenAI API returned error");
            return Err(OpenAIError::new(classify_status(status, &text)));
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, "Failed to parse OpenAI response");
            OpenAIError::new(OpenAIErrorKind::ResponseParsing(e.to_string()))
        })?;

        if parsed.choices().is_empty() {
            return Err(OpenAIError::new(OpenAIErrorKind::EmptyResponse));
        }

        if let Some(usage) = parsed.usage() {
            debug!(
                prompt_tokens = usage.prompt_tokens(),
                completion_tokens = usage.completion_tokens(),
                "Received response from OpenAI"
            );
        }
        Ok(parsed)
    }

    /// Sends a single user prompt and returns the reply text.
    ///
    /// # Errors
    ///
    /// `EmptyPrompt` for blank input (nothing is sent), `EmptyResponse` when
    /// the reply carries no text, otherwise whatever [`OpenAIClient::chat`]
    /// reports.
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    pub async fn complete(&self, prompt: &str) -> OpenAIResult<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(OpenAIError::new(OpenAIErrorKind::EmptyPrompt));
        }

        let request = ChatRequest::builder()
            .messages(vec![ChatMessage::user(prompt)])
            .build()
            .map_err(|e| OpenAIError::new(OpenAIErrorKind::InvalidRequest(e.to_string())))?;

        let response = self.chat(&request).await?;
        response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| OpenAIError::new(OpenAIErrorKind::EmptyResponse))
    }

    /// Sends a tiny request to confirm the key and endpoint work.
    #[instrument(skip(self))]
    pub async fn check_connection(&self) -> OpenAIResult<String> {
        let request = ChatRequest::builder()
            .messages(vec![
                ChatMessage::system("You are a helpful assistant."),
                ChatMessage::user("Say hello"),
            ])
            .max_tokens(10u32)
            .temperature(0.7f32)
            .build()
            .map_err(|e| OpenAIError::new(OpenAIErrorKind::InvalidRequest(e.to_string())))?;

        let response = self.chat(&request).await?;
        let reply = response.first_content().unwrap_or_default().to_string();
        info!("Connection check succeeded");
        Ok(reply)
    }

    /// Spacing first, then the pacer on a blocking thread.
    async fn wait_for_slot(&self) -> OpenAIResult<()> {
        if let Some(spacing) = &self.spacing {
            spacing.until_ready().await;
        }

        if let Some(wait) = self.pacer.pending_wait().filter(|w| !w.is_zero()) {
            info!(wait_secs = wait.as_secs_f64(), "Request will be paced");
        }

        let pacer = Arc::clone(&self.pacer);
        match tokio::task::spawn_blocking(move || pacer.await_slot()).await {
            Ok(()) => Ok(()),
            Err(e) => match e.try_into_panic() {
                Ok(payload) => std::panic::resume_unwind(payload),
                Err(e) => Err(OpenAIError::new(OpenAIErrorKind::Network(format!(
                    "Pacing task cancelled: {}",
                    e
                )))),
            },
        }
    }

    async fn observe_limits(&self, headers: &reqwest::header::HeaderMap) {
        let Some(detected) = self.detector.detect_openai(headers).await else {
            return;
        };
        let configured = self.pacer.requests_per_minute().get();
        match detected.rpm {
            Some(remote) if remote < configured => warn!(
                remote,
                configured,
                tier = %detected.name,
                "Remote limit is tighter than the configured pacing"
            ),
            Some(remote) if remote > configured => debug!(
                remote,
                configured,
                tier = %detected.name,
                "Remote limit is looser than the configured pacing"
            ),
            _ => {}
        }
    }
}

fn classify_status(status: StatusCode, body: &str) -> OpenAIErrorKind {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => OpenAIErrorKind::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => OpenAIErrorKind::QuotaExceeded(message),
        _ => OpenAIErrorKind::HttpStatus {
            status_code: status.as_u16(),
            message,
        },
    }
}

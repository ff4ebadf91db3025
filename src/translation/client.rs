/*!
 * Rate-limited translation client.
 *
 * `TranslationClient::translate` never fails: every provider error is
 * logged, the shared interval is doubled (up to its ceiling), the caller
 * sleeps for the new interval and the request is tried again. The retry
 * loop is written as an explicit state machine so it can be driven with a
 * `ManualClock` and a `MockProvider` in tests.
 */

use async_trait::async_trait;
use log::{debug, trace, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::Provider;

use super::Translate;
use super::prompts::TranslationPromptBuilder;
use super::rate_limit::{Clock, RateLimiter, SystemClock};

/// Phase of a single `translate` call
#[derive(Debug)]
pub enum AttemptState {
    /// Nothing issued yet
    Idle,
    /// Reserving a slot and waiting for it
    Waiting { attempt: u32 },
    /// Request in flight
    Requesting { attempt: u32 },
    /// Provider returned text
    Succeeded { attempt: u32, text: String },
    /// Provider failed; backing off before the next attempt
    FailedRetrying { attempt: u32, error: ProviderError },
}

/// Counters across all calls on one client
#[derive(Debug, Default)]
pub struct ClientStats {
    requests: AtomicUsize,
    failures: AtomicUsize,
    successes: AtomicUsize,
}

impl ClientStats {
    /// Requests issued, including failed ones
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    pub fn successes(&self) -> usize {
        self.successes.load(Ordering::SeqCst)
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} requests, {} succeeded, {} failed",
            self.requests(),
            self.successes(),
            self.failures()
        )
    }
}

/// Translation client sharing one rate limiter across all callers
#[derive(Debug)]
pub struct TranslationClient<P: Provider> {
    provider: P,
    prompts: TranslationPromptBuilder,
    limiter: Arc<RateLimiter>,
    clock: Arc<dyn Clock>,
    stats: ClientStats,
}

impl<P: Provider> TranslationClient<P> {
    /// Create a client using the system clock
    pub fn new(provider: P, prompts: TranslationPromptBuilder, limiter: Arc<RateLimiter>) -> Self {
        Self::with_clock(provider, prompts, limiter, Arc::new(SystemClock))
    }

    /// Create a client with an explicit clock
    pub fn with_clock(
        provider: P,
        prompts: TranslationPromptBuilder,
        limiter: Arc<RateLimiter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            prompts,
            limiter,
            clock,
            stats: ClientStats::default(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn stats(&self) -> &ClientStats {
        &self.stats
    }

    /// Translate `text`, retrying until the provider succeeds.
    ///
    /// Empty input returns immediately without touching the rate limiter.
    pub async fn translate(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let mut state = AttemptState::Idle;
        loop {
            state = match state {
                AttemptState::Idle => AttemptState::Waiting { attempt: 1 },

                AttemptState::Waiting { attempt } => {
                    let reservation = self.limiter.reserve(self.clock.now());
                    if !reservation.wait.is_zero() {
                        trace!("Attempt {} waiting {:?} for its slot", attempt, reservation.wait);
                        self.clock.sleep(reservation.wait).await;
                    }
                    AttemptState::Requesting { attempt }
                }

                AttemptState::Requesting { attempt } => {
                    self.stats.requests.fetch_add(1, Ordering::SeqCst);
                    match self.request(text).await {
                        Ok(text) => AttemptState::Succeeded { attempt, text },
                        Err(error) => AttemptState::FailedRetrying { attempt, error },
                    }
                }

                AttemptState::Succeeded { attempt, text } => {
                    self.stats.successes.fetch_add(1, Ordering::SeqCst);
                    self.limiter.record_success();
                    if attempt > 1 {
                        debug!("Request succeeded after {} attempts", attempt);
                    }
                    return text;
                }

                AttemptState::FailedRetrying { attempt, error } => {
                    self.stats.failures.fetch_add(1, Ordering::SeqCst);
                    warn!("{}", error);
                    let delay = self.limiter.record_failure();
                    warn!("Rate limit hit. Sleeping for {} seconds.", delay.as_secs_f64());
                    self.clock.sleep(delay).await;
                    AttemptState::Waiting { attempt: attempt + 1 }
                }
            };
        }
    }

    async fn request(&self, text: &str) -> Result<String, ProviderError> {
        let request = self
            .provider
            .build_request(self.prompts.system_prompt(), &self.prompts.user_prompt(text));
        let response = self.provider.complete(request).await?;
        let translated = P::extract_text(&response)?;
        Ok(translated.trim().to_string())
    }
}

#[async_trait]
impl<P: Provider> Translate for TranslationClient<P> {
    async fn translate(&self, text: &str) -> String {
        TranslationClient::translate(self, text).await
    }
}

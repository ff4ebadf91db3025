/*!
 * Tests for the translation client and dispatcher working together
 */

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use paratrans::providers::mock::MockProvider;
use paratrans::translation::{
    Dispatcher, ManualClock, RateLimiter, Translate, TranslationClient, TranslationPromptBuilder,
};

fn client_with(provider: MockProvider, limiter: RateLimiter) -> (Arc<TranslationClient<MockProvider>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let client = TranslationClient::with_clock(
        provider,
        TranslationPromptBuilder::new("Spanish"),
        Arc::new(limiter),
        clock.clone(),
    );
    (Arc::new(client), clock)
}

fn default_limiter() -> RateLimiter {
    RateLimiter::new(Duration::from_secs(1), Duration::from_secs(60))
}

fn paragraphs(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Paragraph number {}.", i)).collect()
}

/// Output order matches input order regardless of worker count
#[tokio::test]
async fn test_dispatcher_withMockClient_shouldPreserveOrder() {
    for workers in [1, 3, 10] {
        let provider = MockProvider::working();
        let (client, _clock) = client_with(provider.clone(), default_limiter());
        let input = paragraphs(17);

        let output = Dispatcher::new(client, workers).translate_all(&input, |_, _| {}).await;

        assert_eq!(output.len(), input.len());
        for (source, translated) in input.iter().zip(&output) {
            assert_eq!(translated, &format!("[TRANSLATED] {}", source));
        }
        assert_eq!(provider.request_count(), 17);
    }
}

/// Intermittent provider failures are retried until every paragraph succeeds
#[tokio::test]
async fn test_dispatcher_withIntermittentProvider_shouldTranslateEverything() {
    let provider = MockProvider::intermittent(4);
    let (client, _clock) = client_with(provider.clone(), default_limiter());
    let input = paragraphs(12);

    let output = Dispatcher::new(Arc::clone(&client), 3)
        .translate_all(&input, |_, _| {})
        .await;

    assert!(output.iter().all(|t| t.starts_with("[TRANSLATED] ")));
    let stats = client.stats();
    assert_eq!(stats.successes(), 12);
    assert_eq!(stats.requests(), stats.successes() + stats.failures());
    assert!(stats.failures() >= 3);
    assert!(client.limiter().current_interval() > Duration::from_secs(1));
}

/// Empty text is a success and does not back off
#[tokio::test]
async fn test_client_withEmptyProviderText_shouldReturnEmptyWithoutRetry() {
    let provider = MockProvider::empty();
    let (client, clock) = client_with(provider.clone(), default_limiter());

    assert_eq!(client.translate("Something").await, "");
    assert_eq!(provider.request_count(), 1);
    assert!(clock.sleeps().is_empty());
}

/// Reset-on-success restores the initial interval after a recovery
#[tokio::test]
async fn test_client_withResetOnSuccess_shouldRestoreInitialInterval() {
    let provider = MockProvider::fail_first(3);
    let (client, clock) = client_with(provider, default_limiter().with_reset_on_success(true));

    let translated = Translate::translate(client.as_ref(), "Hello").await;

    assert_eq!(translated, "[TRANSLATED] Hello");
    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_secs(2), Duration::from_secs(4), Duration::from_secs(8)]
    );
    assert_eq!(client.limiter().current_interval(), Duration::from_secs(1));
}

/// Split paragraphs produce two requests and one joined output
#[tokio::test]
async fn test_dispatcher_withOversizedParagraph_shouldSplitAndRejoin() {
    let provider = MockProvider::working();
    let (client, _clock) = client_with(provider.clone(), default_limiter());
    let input = vec!["Alpha beta gamma. Delta epsilon zeta. Eta theta.".to_string()];

    let output = Dispatcher::new(client, 2)
        .with_max_words(4)
        .translate_all(&input, |_, _| {})
        .await;

    assert_eq!(
        output,
        vec!["[TRANSLATED] Alpha beta gamma. [TRANSLATED] Delta epsilon zeta. Eta theta."]
    );
    assert_eq!(
        provider.seen_texts(),
        vec!["Alpha beta gamma.".to_string(), "Delta epsilon zeta. Eta theta.".to_string()]
    );
}

/// Echo translator whose latency varies per call
struct Jittery;

#[async_trait]
impl Translate for Jittery {
    async fn translate(&self, text: &str) -> String {
        let delay = rand::rng().random_range(0..15u64);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        text.to_uppercase()
    }
}

/// Completion order is random; output order is not
#[tokio::test]
async fn test_dispatcher_withRandomLatency_shouldPreserveOrder() {
    let input = paragraphs(30);
    let expected: Vec<String> = input.iter().map(|p| p.to_uppercase()).collect();

    let output = Dispatcher::new(Arc::new(Jittery), 8)
        .translate_all(&input, |_, _| {})
        .await;

    assert_eq!(output, expected);
}

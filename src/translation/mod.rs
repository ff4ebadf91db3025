/*!
 * Translation core.
 *
 * This module turns paragraphs into translated paragraphs. It is split into
 * several submodules:
 *
 * - `client`: Rate-limited, retry-forever translation client
 * - `dispatcher`: Bounded concurrent fan-out that preserves paragraph order
 * - `prompts`: System persona and user instruction
 * - `rate_limit`: Shared interval/backoff state and injectable clocks
 * - `splitter`: Sentence tokenizer and oversized paragraph splitting
 */

use async_trait::async_trait;

// Re-export main types for easier usage
pub use self::client::{AttemptState, ClientStats, TranslationClient};
pub use self::dispatcher::{Dispatcher, TranslationJob};
pub use self::prompts::TranslationPromptBuilder;
pub use self::rate_limit::{Clock, ManualClock, RateLimiter, RateState, SystemClock};
pub use self::splitter::{Chunk, Half, MAX_WORDS_PER_CHUNK};

// Submodules
pub mod client;
pub mod dispatcher;
pub mod prompts;
pub mod rate_limit;
pub mod splitter;

/// Anything that turns a piece of text into its translation
#[async_trait]
pub trait Translate: Send + Sync {
    /// Translate `text`. Implementations never surface errors to the caller.
    async fn translate(&self, text: &str) -> String;
}

/*!
 * # paratrans - paragraph-level document translation
 *
 * A Rust library for translating text documents through an LLM
 * chat-completion API, one paragraph at a time.
 *
 * ## Features
 *
 * - Plain text, markdown, rich text and HTML sources, local or by URL
 * - Concurrent translation under one shared, self-widening rate limit
 * - Retry-forever requests with exponential backoff
 * - Oversized paragraphs split at the middle sentence boundary
 * - Translated-only or bilingual (source + translation) output
 * - Optional untranslated copies of the leading paragraphs, and an untranslated references section
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `translation`: Translation core:
 *   - `translation::client`: Rate-limited, retrying translation client
 *   - `translation::dispatcher`: Ordered concurrent fan-out
 *   - `translation::rate_limit`: Shared interval/backoff state and clocks
 *   - `translation::splitter`: Sentence tokenizer and chunk splitting
 *   - `translation::prompts`: Prompt construction
 * - `document`: Reading, HTML extraction, sections and output rendering
 * - `file_utils`: File system operations and the idempotency guard
 * - `app_controller`: Main application controller
 * - `providers`: Completion API clients (`openai`, `mock`)
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, FileOutcome};
pub use document::{Document, OutputMode, Sections};
pub use errors::{ConfigError, DocumentError, ProviderError};
pub use translation::{Dispatcher, RateLimiter, Translate, TranslationClient};

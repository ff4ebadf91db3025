/*!
 * Concurrent paragraph dispatch.
 *
 * Each paragraph runs its own split-then-translate pipeline on a spawned
 * tokio task, so sentence splitting of large paragraphs uses the runtime's
 * worker threads. A semaphore keeps at most `concurrency` pipelines in
 * flight. Results carry their paragraph index and are placed by it, so
 * completion order never affects output order.
 */

use futures::future::join_all;
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tokio::sync::Semaphore;

use super::Translate;
use super::splitter::{self, Chunk};

/// A paragraph's chunks paired with their joined translation
#[derive(Debug, Clone)]
pub struct TranslationJob {
    /// Position of the paragraph in the input
    pub paragraph_index: usize,
    /// One chunk, or two when the paragraph was split
    pub chunks: Vec<Chunk>,
    /// Set once when the job completes
    pub translation: Option<String>,
}

impl TranslationJob {
    /// Create a pending job for one paragraph
    pub fn new(paragraph_index: usize, paragraph: &str, max_words: usize) -> Self {
        Self {
            paragraph_index,
            chunks: splitter::chunk_paragraph(paragraph_index, paragraph, max_words),
            translation: None,
        }
    }

    pub fn is_split(&self) -> bool {
        self.chunks.len() > 1
    }

    /// Translate every chunk in order and join the results with a space
    pub async fn run<T: Translate + ?Sized>(mut self, translator: &T) -> Self {
        let mut parts = Vec::with_capacity(self.chunks.len());
        for chunk in &self.chunks {
            parts.push(translator.translate(&chunk.text).await);
        }
        self.translation = Some(parts.join(" "));
        self
    }
}

/// Bounded pool translating paragraphs through a shared translator
pub struct Dispatcher<T: Translate + 'static> {
    translator: Arc<T>,
    concurrency: usize,
    max_words: usize,
}

impl<T: Translate + 'static> Dispatcher<T> {
    /// Create a dispatcher; a concurrency of 0 is treated as 1
    pub fn new(translator: Arc<T>, concurrency: usize) -> Self {
        Self {
            translator,
            concurrency: concurrency.max(1),
            max_words: splitter::MAX_WORDS_PER_CHUNK,
        }
    }

    /// Override the split threshold
    pub fn with_max_words(mut self, max_words: usize) -> Self {
        self.max_words = max_words.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn translator(&self) -> &Arc<T> {
        &self.translator
    }

    /// Translate every paragraph, returning results in input order.
    ///
    /// `progress(completed, total)` is called once per finished paragraph.
    /// A panic inside any pipeline is re-raised here and aborts the batch.
    pub async fn translate_all<F>(&self, paragraphs: &[String], progress: F) -> Vec<String>
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        let total = paragraphs.len();
        if total == 0 {
            return Vec::new();
        }

        let start_time = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let completed = Arc::new(AtomicUsize::new(0));
        let progress = Arc::new(progress);

        let handles = paragraphs.iter().enumerate().map(|(index, paragraph)| {
            let semaphore = Arc::clone(&semaphore);
            let translator = Arc::clone(&self.translator);
            let completed = Arc::clone(&completed);
            let progress = Arc::clone(&progress);
            let paragraph = paragraph.clone();
            let max_words = self.max_words;

            tokio::spawn(async move {
                // The semaphore is never closed, so a permit is always granted
                let _permit = semaphore.acquire().await.ok();
                let job = TranslationJob::new(index, &paragraph, max_words);
                if job.is_split() {
                    debug!("Paragraph {} split into two chunks", index + 1);
                }
                let job = job.run(translator.as_ref()).await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                progress(done, total);
                job
            })
        });

        let mut finished = Vec::with_capacity(total);
        for result in join_all(handles).await {
            match result {
                Ok(job) => finished.push(job),
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => warn!("Translation task did not complete: {}", e),
            }
        }

        info!(
            "Translated {} paragraphs in {:.1}s",
            total,
            start_time.elapsed().as_secs_f64()
        );

        // Place results by paragraph index to keep the original order
        let mut output = vec![String::new(); total];
        for job in finished {
            output[job.paragraph_index] = job.translation.unwrap_or_default();
        }
        output
    }
}

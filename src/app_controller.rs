use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::document::{self, OutputMode, Sections};
use crate::file_utils::{FileCheck, FileManager};
use crate::providers::Provider;
use crate::providers::openai::OpenAI;
use crate::translation::{
    Clock, Dispatcher, RateLimiter, SystemClock, TranslationClient, TranslationPromptBuilder,
};

// @module: Application controller for document translation

/// Result of processing a single source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Output written to this path
    Written(PathBuf),
    /// Source skipped, with the reason
    Skipped(String),
}

/// Main application controller for document translation
pub struct Controller<P: Provider> {
    // @field: App configuration
    config: Config,
    // @field: Translation client shared by every file in the run
    client: Arc<TranslationClient<P>>,
    // @field: HTTP client for URL sources
    http: reqwest::Client,
    // @field: Progress bar container
    progress: MultiProgress,
}

impl Controller<OpenAI> {
    // @method: Create a controller talking to the configured OpenAI endpoint
    pub fn new(config: Config) -> Result<Self> {
        let translation = &config.translation;
        let provider = OpenAI::new(
            translation.api_key.clone(),
            translation.endpoint.clone(),
            translation.model.clone(),
            translation.timeout(),
        )
        .with_temperature(translation.temperature);
        Self::with_provider(config, provider, Arc::new(SystemClock))
    }
}

impl<P: Provider> Controller<P> {
    // @method: Create a controller around any provider and clock
    pub fn with_provider(config: Config, provider: P, clock: Arc<dyn Clock>) -> Result<Self> {
        let translation = &config.translation;
        let limiter = RateLimiter::new(translation.initial_interval()?, translation.max_backoff()?)
            .with_reset_on_success(translation.reset_backoff_on_success);
        let prompts = TranslationPromptBuilder::new(config.target_language.clone())
            .preserve_names(config.document.preserve_names);
        let client = TranslationClient::with_clock(provider, prompts, Arc::new(limiter), clock);

        let http = reqwest::Client::builder()
            .timeout(translation.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            config,
            client: Arc::new(client),
            http,
            progress: MultiProgress::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &TranslationClient<P> {
        &self.client
    }

    /// Output mode selected by the configuration
    pub fn mode(&self) -> OutputMode {
        OutputMode::from_bilingual(self.config.document.bilingual)
    }

    /// Translate a folder, a file or a URL
    pub async fn run(&self, input: &str) -> Result<()> {
        let start_time = Instant::now();

        if FileManager::dir_exists(input) {
            self.run_folder(Path::new(input)).await?;
        } else {
            self.run_file(input).await?;
        }

        info!(
            "Finished in {} ({})",
            Self::format_duration(start_time.elapsed()),
            self.client.stats().summary()
        );
        Ok(())
    }

    /// Translate one file or URL
    pub async fn run_file(&self, input: &str) -> Result<FileOutcome> {
        let input = if FileManager::is_url(input) {
            document::reader::normalize_url(input)
        } else {
            input.to_string()
        };
        let mode = self.mode();

        if let FileCheck::Skip(reason) = FileManager::check_file_path(&input, mode)? {
            return Ok(FileOutcome::Skipped(reason));
        }

        let start_time = Instant::now();
        info!("Translating {}...", input);

        let doc = document::read_source(&input, &self.http).await?;
        debug!("Read {} paragraphs ({} words)", doc.len(), doc.word_count());

        let sections = document::split_sections(
            &doc.paragraphs,
            self.config.document.keep_leading_paragraphs,
            self.config.document.exclude_references,
        )?;

        let translations = self.translate_with_progress(&sections).await;
        let text = mode.render(&sections, &translations);

        let output_path = FileManager::output_path(&input, mode);
        FileManager::write_to_file(&output_path, &text)?;
        info!(
            "{} text saved to {} in {}",
            if mode == OutputMode::Bilingual { "Bilingual" } else { "Translated" },
            output_path.display(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(FileOutcome::Written(output_path))
    }

    /// Translate every allowed file under `input_dir`, one after another.
    ///
    /// The first error aborts the whole folder.
    pub async fn run_folder(&self, input_dir: &Path) -> Result<Vec<FileOutcome>> {
        let filter = self.config.document.extension_filter.as_deref();
        let files = FileManager::find_files(input_dir, filter)?;
        if let Some(ext) = filter {
            info!("Only processing files with extension {}", ext);
        }
        info!("Found {} files to process", files.len());

        let folder_pb = self.progress.add(ProgressBar::new(files.len() as u64));
        folder_pb.set_style(Self::bar_style("files"));
        folder_pb.set_message("Processing files");

        let total = files.len();
        let mut outcomes = Vec::with_capacity(total);
        for (index, file) in files.iter().enumerate() {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let outcome = self.run_file(&file.to_string_lossy()).await?;
            outcomes.push(outcome);

            folder_pb.inc(1);
            info!(
                "Processed file {} of {}. Only {} files left to process.",
                index + 1,
                total,
                total - index - 1
            );
        }

        folder_pb.finish_with_message("Folder processing complete");

        let written = outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Written(_)))
            .count();
        info!(
            "Folder processing completed: {} translated, {} skipped",
            written,
            outcomes.len() - written
        );
        Ok(outcomes)
    }

    async fn translate_with_progress(&self, sections: &Sections) -> Vec<String> {
        let progress_bar = self.progress.add(ProgressBar::new(sections.body.len() as u64));
        progress_bar.set_style(Self::bar_style("paragraphs"));
        progress_bar.set_message("Translating");

        info!(
            "Translating {} paragraphs into {} with {}",
            sections.body.len(),
            self.config.target_language,
            self.config.translation.model
        );

        let dispatcher = Dispatcher::new(
            Arc::clone(&self.client),
            self.config.translation.concurrent_requests,
        )
        .with_max_words(self.config.translation.max_words_per_chunk);

        let pb = progress_bar.clone();
        let translations = dispatcher
            .translate_all(&sections.body, move |completed, _total| {
                pb.set_position(completed as u64);
            })
            .await;

        // Only the folder bar stays visible between files
        progress_bar.finish_and_clear();
        translations
    }

    fn bar_style(unit: &str) -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}",
                unit
            ))
            .or_else(|_| {
                ProgressStyle::default_bar()
                    .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
            })
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░")
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

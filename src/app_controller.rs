use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};
use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::subtitle_document::SubtitleDocument;
use crate::subtitle_format::{SubtitleFormat, Srv3SubtitleFormat};

// @module: Application controller for subtitle export

/// Result of converting one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Output written to this path
    Written(PathBuf),
    /// Output already existed and overwriting was not requested
    Skipped(PathBuf),
}

/// Counts gathered while converting a directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for subtitle export
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Output format
    format: Srv3SubtitleFormat,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        Ok(Self {
            config,
            format: Srv3SubtitleFormat,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convert a file or every subtitle file below a directory.
    ///
    /// Output goes next to each input unless `output_dir` is given.
    pub fn run(&self, input_path: &Path, output_dir: Option<&Path>, force_overwrite: bool) -> Result<()> {
        if input_path.is_file() {
            let output_dir = output_dir
                .map(Path::to_path_buf)
                .unwrap_or_else(|| input_path.parent().unwrap_or(Path::new(".")).to_path_buf());
            match self.convert_file(input_path, &output_dir, force_overwrite)? {
                ConversionOutcome::Written(path) => info!("Success: {:?}", path),
                ConversionOutcome::Skipped(path) => {
                    warn!("Output file already exists: {:?}. Use -f to force overwrite.", path)
                }
            }
            Ok(())
        } else if input_path.is_dir() {
            let summary = self.run_folder(input_path, output_dir, force_overwrite)?;
            if summary.failed > 0 {
                return Err(anyhow::anyhow!("{} file(s) failed to convert", summary.failed));
            }
            Ok(())
        } else {
            Err(anyhow::anyhow!("Input path does not exist: {:?}", input_path))
        }
    }

    /// Convert a single subtitle file into `output_dir`
    pub fn convert_file(&self, input_file: &Path, output_dir: &Path, force_overwrite: bool) -> Result<ConversionOutcome> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = FileManager::generate_output_path(input_file, output_dir, Srv3SubtitleFormat::EXTENSION);
        if output_path.exists() && !force_overwrite {
            return Ok(ConversionOutcome::Skipped(output_path));
        }

        let document = SubtitleDocument::from_file(input_file)?;
        debug!("{}", document);

        FileManager::ensure_dir(output_dir)?;
        self.format
            .write_file(&document, &output_path, &self.config.export)
            .with_context(|| format!("Failed to write {} file: {:?}", self.format.name(), output_path))?;

        Ok(ConversionOutcome::Written(output_path))
    }

    /// Convert every subtitle file below `input_dir`, continuing past failures
    pub fn run_folder(&self, input_dir: &Path, output_dir: Option<&Path>, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow::anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let subtitle_files = FileManager::find_subtitle_files(input_dir)?;
        if subtitle_files.is_empty() {
            return Err(anyhow::anyhow!("No subtitle files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(subtitle_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        let mut summary = FolderSummary::default();

        for subtitle_file in &subtitle_files {
            let file_name = subtitle_file.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            // Keep the input's position relative to the scanned root when writing elsewhere
            let target_dir = match (output_dir, subtitle_file.parent()) {
                (Some(out), Some(parent)) => out.join(parent.strip_prefix(input_dir).unwrap_or(Path::new(""))),
                (None, Some(parent)) => parent.to_path_buf(),
                (_, None) => input_dir.to_path_buf(),
            };

            match self.convert_file(subtitle_file, &target_dir, force_overwrite) {
                Ok(ConversionOutcome::Written(_)) => summary.converted += 1,
                Ok(ConversionOutcome::Skipped(path)) => {
                    debug!("Skipping {:?}, output exists", path);
                    summary.skipped += 1;
                }
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_and_clear();

        info!(
            "Finished {} files in {:.1?}: {} converted, {} skipped, {} failed",
            subtitle_files.len(),
            start_time.elapsed(),
            summary.converted,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }
}

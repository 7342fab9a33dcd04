//! Main processing functions for Markdown content.
use std::{fs, io, path::Path};

use log::error;

use super::types::{MarkdownOptions, MarkdownProcessor};
use crate::types::MarkdownResult;

/// Process markdown content with error recovery.
///
/// Renders with the given playground setting and substitutes an error
/// `<div>` if rendering panics.
#[must_use]
pub fn process_with_recovery(
  processor: &MarkdownProcessor,
  content: &str,
  playgrounds: bool,
) -> MarkdownResult {
  match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    processor.render_with(content, playgrounds)
  })) {
    Ok(result) => result,
    Err(panic_err) => {
      error!("Panic during markdown processing: {panic_err:?}");
      MarkdownResult {
        html:         "<div class=\"error\">Critical error processing \
                       markdown content</div>"
          .to_string(),
        placeholders: 0,
      }
    },
  }
}

/// Safely process markup content with error recovery.
///
/// Runs `processor_fn` and returns `fallback` (or the original content when
/// `fallback` is empty) if it panics.
pub fn process_safe<F>(content: &str, processor_fn: F, fallback: &str) -> String
where
  F: FnOnce(&str) -> String,
{
  if content.is_empty() {
    return String::new();
  }

  let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    processor_fn(content)
  }));

  match result {
    Ok(processed_text) => processed_text,
    Err(e) => {
      if let Some(error_msg) = e.downcast_ref::<String>() {
        error!("Error processing markup: {error_msg}");
      } else if let Some(error_msg) = e.downcast_ref::<&str>() {
        error!("Error processing markup: {error_msg}");
      } else {
        error!("Unknown error occurred while processing markup");
      }

      if fallback.is_empty() {
        content.to_string()
      } else {
        fallback.to_string()
      }
    },
  }
}

/// Read and render a markdown file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn process_markdown_file(
  processor: &MarkdownProcessor,
  path: &Path,
  playgrounds: bool,
) -> io::Result<MarkdownResult> {
  let content = fs::read_to_string(path)?;
  Ok(process_with_recovery(processor, &content, playgrounds))
}

/// Create a processor with sensible defaults for library usage.
#[must_use]
pub fn create_processor(preset: ProcessorPreset) -> MarkdownProcessor {
  let options = match preset {
    ProcessorPreset::Basic => {
      MarkdownOptions {
        playgrounds: false,
        ..MarkdownOptions::default()
      }
    },
    ProcessorPreset::Interactive => {
      MarkdownOptions {
        playgrounds: true,
        ..MarkdownOptions::default()
      }
    },
    ProcessorPreset::Plain => {
      MarkdownOptions {
        gfm: false,
        highlight_code: false,
        playgrounds: false,
        video_marker: String::new(),
        ..MarkdownOptions::default()
      }
    },
  };

  MarkdownProcessor::new(options)
}

/// Preset configurations for common use cases.
#[derive(Debug, Clone, Copy)]
pub enum ProcessorPreset {
  /// GFM with video links and highlighting, no playgrounds
  Basic,
  /// Like `Basic`, with playground placeholders enabled
  Interactive,
  /// `CommonMark` only, no rewrites and no highlighting
  Plain,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_process_safe_returns_fallback_on_panic() {
    #[allow(clippy::panic, reason = "exercising the recovery path")]
    let out = process_safe("input", |_| panic!("boom"), "fallback");
    assert_eq!(out, "fallback");
  }

  #[test]
  fn test_process_safe_returns_content_without_fallback() {
    #[allow(clippy::panic, reason = "exercising the recovery path")]
    let out = process_safe("input", |_| panic!("boom"), "");
    assert_eq!(out, "input");
  }

  #[test]
  fn test_process_safe_skips_empty_content() {
    assert_eq!(process_safe("", |_| "x".to_string(), "y"), "");
  }

  #[test]
  fn test_presets() {
    let plain = create_processor(ProcessorPreset::Plain);
    assert!(!plain.options().gfm);
    assert!(plain.options().video_marker.is_empty());

    let interactive = create_processor(ProcessorPreset::Interactive);
    assert!(interactive.options().playgrounds);
  }

  #[test]
  fn test_process_markdown_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("doc.md");
    fs::write(&path, "# Title\n").expect("write");

    let processor = create_processor(ProcessorPreset::Plain);
    let result =
      process_markdown_file(&processor, &path, false).expect("read file");
    assert_eq!(result.html, "<h1>Title</h1>\n");

    assert!(
      process_markdown_file(&processor, &dir.path().join("missing.md"), false)
        .is_err()
    );
  }
}

//! # livemark-commonmark
//!
//! CommonMark processor with overridable render rules, built for documents
//! that embed videos and live code playgrounds.
//!
//! ## Quick Start
//!
//! ```rust
//! use livemark_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor = MarkdownProcessor::new(MarkdownOptions {
//!   highlight_code: false,
//!   ..MarkdownOptions::default()
//! });
//! let result = processor.render_with(
//!   "[demo](movie.mp4?type=video)\n\n```jsx template=\"react\"\nexport default () => null;\n```\n",
//!   true,
//! );
//!
//! assert!(result.html.contains("<video"));
//! assert_eq!(result.placeholders, 1);
//! ```
//!
//! ## Features
//!
//! - **AST-based processing** using `comrak`
//! - **Render rules** for link open, link close and fenced code blocks,
//!   looked up per token kind from a [`RuleSet`]
//! - **Video links**: `[label](clip.mp4?type=video)` renders as `<video>`
//! - **Playground placeholders**: fenced blocks naming a known `template`
//!   become inert `<div data-playground>` elements for a widget layer to
//!   mount
//! - **Syntax highlighting** for the remaining code blocks, with escaped
//!   plain text as the fallback
//! - **Error recovery** with graceful degradation for malformed input

pub mod directive;
pub mod processor;
pub mod rules;
pub mod syntax;
pub mod templates;
mod types;
pub mod utils;

pub use crate::{
  directive::DirectiveAttributes,
  processor::{
    MarkdownOptions,
    MarkdownOptionsBuilder,
    MarkdownProcessor,
    PlaygroundAttributeFilter,
    ProcessorPreset,
    create_processor,
    process_safe,
    process_with_recovery,
  },
  rules::{
    PlaygroundFenceRule,
    RenderEnv,
    RenderRule,
    RuleSet,
    Token,
    TokenKind,
    VideoLinkRule,
  },
  templates::TemplateSet,
  types::{
    ATTR_AUTORUN,
    ATTR_CODE,
    ATTR_PLAYGROUND,
    ATTR_TEMPLATE,
    MarkdownResult,
    PLACEHOLDER_SELECTOR,
    PlaceholderRecord,
  },
};

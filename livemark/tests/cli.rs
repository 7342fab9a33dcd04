#![allow(clippy::expect_used, reason = "Fine in tests")]
use std::{fs, process::Command};

use livemark_commonmark::utils;
use livemark_config::Config;
use tempfile::tempdir;

fn livemark() -> Command {
  Command::new(env!("CARGO_BIN_EXE_livemark"))
}

#[test]
fn test_render_writes_mounted_tree() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let input = temp_dir.path().join("doc.md");
  let output = temp_dir.path().join("doc.html");
  fs::write(
    &input,
    "Watch [this](intro.mp4?type=video).\n\n```js template=\"vanilla\"\nconsole.log(1);\n```\n",
  )
  .expect("Failed to write doc.md in test");

  let status = livemark()
    .current_dir(temp_dir.path())
    .args(["render", "doc.md", "-o", "doc.html", "--playground", "--theme", "dark"])
    .args(["--config", "markdown.highlight_code=false"])
    .status()
    .expect("Failed to run livemark");
  assert!(status.success());

  let html = fs::read_to_string(&output).expect("Failed to read doc.html");
  assert!(html.starts_with("<div class=\"markdown-body\">"));
  assert!(!html.contains("?type=video"));

  let document = utils::parse_fragment(&html);
  let video = document.select_first("video").expect("video element");
  let attributes = video.attributes.borrow();
  assert_eq!(attributes.get("src"), Some("intro.mp4"));
  assert_eq!(attributes.get("class"), Some("centered-video"));
  assert!(attributes.contains("controls"));
  assert!(document.select_first("a").is_err());
  assert!(html.contains(r#"class="playground playground-dark""#));
  assert!(html.contains(r#"data-playground-id="pg-1-0""#));
  assert!(html.contains("<pre class=\"playground-source\">"));
}

#[test]
fn test_init_refuses_to_overwrite() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let path = temp_dir.path().join("livemark.toml");

  let first = livemark()
    .args(["init", "-o"])
    .arg(&path)
    .status()
    .expect("Failed to run livemark");
  assert!(first.success());
  assert_eq!(
    Config::from_file(&path).expect("generated config loads"),
    Config::default()
  );

  let second = livemark()
    .args(["init", "-o"])
    .arg(&path)
    .status()
    .expect("Failed to run livemark");
  assert!(!second.success());
}

#[test]
fn test_render_missing_input_fails() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let status = livemark()
    .current_dir(temp_dir.path())
    .args(["render", "missing.md"])
    .status()
    .expect("Failed to run livemark");
  assert!(!status.success());
}

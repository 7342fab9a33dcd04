use std::{
  fs,
  io::{self, Write},
  rc::Rc,
};

use color_eyre::eyre::{Context, Result, bail};
use livemark::{
  cli::{Cli, Commands},
  Document,
  MarkdownRenderer,
  RenderContext,
  Scheduler,
  StaticPreviewFactory,
};
use livemark_config::Config;
use log::{LevelFilter, debug, info};

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  let playground_flag = cli.playground_flag();
  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => {
      // Check if file already exists and that we're not forcing overwrite
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
          fs::create_dir_all(parent).wrap_err_with(|| {
            format!("Failed to create directory: {}", parent.display())
          })?;
          info!("Created directory: {}", parent.display());
        }
      }

      Config::generate_default_config(format, output).wrap_err_with(|| {
        format!(
          "Failed to generate configuration file: {}",
          output.display()
        )
      })?;

      info!(
        "Configuration file created successfully. Edit it to customize \
         rendering."
      );
    },

    Commands::Render {
      input,
      output,
      theme,
      ..
    } => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)
        .wrap_err("Failed to load configuration")?;

      let text = fs::read_to_string(input)
        .wrap_err_with(|| format!("Failed to read {}", input.display()))?;
      let document = Document::new(text)
        .with_playgrounds(playground_flag.unwrap_or(config.playground.enable));
      let context = RenderContext::new(theme.unwrap_or(config.theme));

      let scheduler = Scheduler::new();
      let factory = Rc::new(StaticPreviewFactory::new(config.templates()));
      let mut renderer = MarkdownRenderer::new(
        config.markdown_options(),
        factory,
        scheduler.clone(),
      );

      let attached = renderer
        .render(&document, context)
        .wrap_err_with(|| format!("Failed to render {}", input.display()))?;
      scheduler.run_until_idle();
      debug!(
        "Rendered {} with {} placeholder(s), {} widget(s) mounted",
        input.display(),
        attached.placeholders,
        renderer.mounted_count()
      );

      let html = attached.to_html();
      match output {
        Some(path) => {
          fs::write(path, &html)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
          info!("Wrote {}", path.display());
        },
        None => {
          let mut stdout = io::stdout().lock();
          writeln!(stdout, "{html}").wrap_err("Failed to write output")?;
        },
      }

      renderer.dispose();
      scheduler.run_until_idle();
    },
  }

  Ok(())
}

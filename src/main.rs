//! Command-line entry point.
//!
//! - `normalize <file>`: print the normalized body and page metadata as JSON.
//! - `pages <file>`: print the display pages as a JSON array.
//! - `view <file> [profile]`: page through the file interactively.
//! - `export-bindings <dir>`: write TypeScript types for the view model.

use anyhow::{Context, Result, anyhow};
use folio::cache::ProfileCache;
use folio::config::{AppConfig, DEFAULT_CONFIG_PATH, ViewerSettings, load_config};
use folio::normalizer::ContentNormalizer;
use folio::pagination::Paginator;
use folio::runtime::{RenderSurface, ViewerHandle, ViewerRuntime};
use folio::viewer::{NavKey, ViewModel, Viewer, export_ts_bindings};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

enum Command {
    Normalize(PathBuf),
    Pages(PathBuf),
    View {
        path: PathBuf,
        profile: Option<String>,
    },
    ExportBindings(PathBuf),
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let command = parse_args()?;
    let config = load_config(Path::new(DEFAULT_CONFIG_PATH));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    let normalizer = ContentNormalizer::load(Path::new(&config.normalizer_path));

    match command {
        Command::Normalize(path) => {
            let body = read_body(&path)?;
            let normalized = normalizer.normalize(Some(&body));
            info!(
                path = %path.display(),
                pages = normalized.metadata.page_count,
                "Normalized content"
            );
            println!("{}", serde_json::to_string_pretty(&normalized)?);
        }
        Command::Pages(path) => {
            let body = read_body(&path)?;
            let pages = Paginator::new(normalizer).paginate(Some(&body));
            println!("{}", serde_json::to_string_pretty(&pages)?);
        }
        Command::View { path, profile } => {
            let body = read_body(&path)?;
            let (settings, normalizer) = match profile {
                Some(id) => {
                    let mut profiles = ProfileCache::new(&config.profile_dir);
                    let profile = profiles.get(&id);
                    info!(profile = %id, "Using viewer profile");
                    (profile.viewer, profile.normalizer())
                }
                None => (config.viewer_settings(), normalizer),
            };
            view(&config, body, settings, normalizer)?;
        }
        Command::ExportBindings(out_dir) => {
            export_ts_bindings(&out_dir)?;
            println!("exported TS bindings to {}", out_dir.display());
        }
    }
    Ok(())
}

fn parse_args() -> Result<Command> {
    parse_command(env::args().skip(1))
}

const USAGE: &str = "Usage: folio <normalize|pages|view|export-bindings> <path> [profile]";

fn parse_command(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let command = args.next().ok_or_else(|| anyhow!(USAGE))?;
    let path = PathBuf::from(args.next().ok_or_else(|| anyhow!(USAGE))?);

    match command.as_str() {
        "normalize" => Ok(Command::Normalize(existing_file(path)?)),
        "pages" => Ok(Command::Pages(existing_file(path)?)),
        "view" => Ok(Command::View {
            path: existing_file(path)?,
            profile: args.next(),
        }),
        "export-bindings" => Ok(Command::ExportBindings(path)),
        other => Err(anyhow!("Unknown command `{other}`. {USAGE}")),
    }
}

fn existing_file(path: PathBuf) -> Result<PathBuf> {
    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.display()));
    }
    Ok(path)
}

fn read_body(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Prints each view to stdout.
struct TerminalSurface;

impl RenderSurface for TerminalSurface {
    fn render(&mut self, view: &ViewModel) {
        if let Some(placeholder) = &view.placeholder {
            println!("{placeholder}");
            return;
        }
        if view.opacity == 0.0 {
            return;
        }
        println!("{}", view.fragment);
        if let Some(controls) = &view.controls {
            let dots: String = controls
                .indicators
                .iter()
                .map(|indicator| if indicator.active { '●' } else { '○' })
                .collect();
            println!("-- {} {dots} --", controls.page_label);
        }
    }

    fn scroll_to_top(&mut self) {
        println!();
    }
}

fn view(
    config: &AppConfig,
    body: String,
    settings: ViewerSettings,
    normalizer: ContentNormalizer,
) -> Result<()> {
    let tokio_runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    info!(
        show_pagination = settings.show_pagination,
        fade_out_ms = settings.fade_out_ms,
        fade_in_ms = settings.fade_in_ms,
        profile_dir = %config.profile_dir,
        "Starting viewer"
    );

    tokio_runtime.block_on(async move {
        let viewer = Viewer::new(Paginator::new(normalizer), settings);
        let (runtime, handle) = ViewerRuntime::new(viewer, TerminalSurface);
        let task = tokio::spawn(runtime.run());

        handle.set_content(Some(body))?;
        read_commands(&handle).await?;
        drop(handle);

        task.await.context("viewer runtime panicked")?;
        anyhow::Ok(())
    })
}

async fn read_commands(handle: &ViewerHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        match line {
            "" => continue,
            "q" | "quit" => break,
            "n" | "next" => handle.next_page()?,
            "p" | "prev" => handle.previous_page()?,
            other => {
                if let Some(key) = NavKey::from_key_name(other) {
                    handle.key_pressed(key)?;
                } else if let Ok(page) = other.parse::<usize>() {
                    handle.select_page(page.saturating_sub(1))?;
                } else {
                    warn!(input = other, "Unrecognized command; use n, p, a page number or q");
                }
            }
        }
    }
    Ok(())
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    if env::var_os("RUST_LOG").is_some() {
        return;
    }
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed) {
        warn!(%level, "Failed to update log level from config: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        parse_command(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn unknown_command_is_reported_before_missing_file() {
        let err = parse(&["bogus", "missing.txt"]).err().expect("unknown command");
        assert!(err.to_string().starts_with("Unknown command `bogus`"));
    }

    #[test]
    fn file_commands_require_an_existing_file() {
        for command in ["normalize", "pages", "view"] {
            let err = parse(&[command, "definitely-missing.html"]).err().expect("missing file");
            assert_eq!(err.to_string(), "File not found: definitely-missing.html");
        }
    }

    #[test]
    fn export_bindings_accepts_a_new_directory() {
        let command = parse(&["export-bindings", "bindings-not-yet-created"]).expect("parsed");
        assert!(matches!(command, Command::ExportBindings(path) if path == Path::new("bindings-not-yet-created")));
    }

    #[test]
    fn view_takes_an_optional_profile() {
        let manifest = env!("CARGO_MANIFEST_DIR");
        let file = format!("{manifest}/Cargo.toml");
        let command = parse(&["view", &file, "editorial"]).expect("parsed");
        assert!(matches!(command, Command::View { profile: Some(ref id), .. } if id == "editorial"));
    }

    #[test]
    fn missing_arguments_print_usage() {
        let err = parse(&["pages"]).err().expect("usage");
        assert_eq!(err.to_string(), USAGE);
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Dungeon Runner.

mod app;
mod scene;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_runner_core::WINDOW_TITLE;
use dungeon_runner_rendering::{visuals, AudioHooks, Presentation, RenderingBackend, Scene};
use dungeon_runner_rendering_macroquad::{AssetManifest, MacroquadBackend};
use dungeon_runner_system_session::Session;

use self::app::App;

/// Endless side-scrolling platformer with a web-swing mechanic.
#[derive(Debug, Parser)]
#[command(name = "dungeon-runner", version)]
struct CliArgs {
    /// Seed for level generation; a random seed is used when absent.
    #[arg(long)]
    seed: Option<u64>,
    /// Asset manifest listing sprites and sounds.
    #[arg(long, default_value_os_t = AssetManifest::default_path())]
    manifest: PathBuf,
    /// Skip asset loading and draw flat shapes.
    #[arg(long)]
    no_sprites: bool,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,
    /// Render as fast as possible.
    #[arg(long, overrides_with = "vsync")]
    no_vsync: bool,
    /// Log frame rate once per second.
    #[arg(long)]
    show_fps: bool,
    /// Play the optional web sound when the web attaches.
    #[arg(long)]
    web_sound: bool,
    /// Play the optional dash sound when an enemy dashes.
    #[arg(long)]
    dash_sound: bool,
    /// Simulate this many frames without a window and print a summary.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u64>,
    /// Inputs for a headless run, e.g. `0:space 30:web@600/200 90:flip`.
    #[arg(long, requires = "headless")]
    script: Option<String>,
}

/// Entry point for the Dungeon Runner command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    if let Some(frames) = args.headless {
        return run_headless(seed, frames, args.script.as_deref());
    }

    let hooks = AudioHooks {
        web: args.web_sound,
        dash: args.dash_sound,
    };
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync || !args.no_vsync)
        .with_show_fps(args.show_fps)
        .with_manifest_path(args.manifest)
        .with_asset_loading(!args.no_sprites);
    let presentation = Presentation::new(WINDOW_TITLE, Scene::new(visuals::BACKGROUND));

    let mut app = App::new(Session::new(seed), hooks);
    backend.run(presentation, move |dt, input, scene| app.frame(dt, input, scene))
}

fn run_headless(seed: u64, frames: u64, script: Option<&str>) -> Result<()> {
    let script = script
        .map(script::parse)
        .transpose()
        .context("invalid --script")?
        .unwrap_or_default();

    log::info!("simulating {frames} frames without a window");
    let mut session = Session::new(seed);
    let summary = session.run_script(&script, frames);
    println!("seed:          {}", session.seed());
    println!("{summary}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn defaults_enable_vsync_and_sprites() {
        let args = CliArgs::try_parse_from(["dungeon-runner"]).expect("defaults parse");
        assert_eq!(args.seed, None);
        assert_eq!(args.manifest, AssetManifest::default_path());
        assert!(!args.no_sprites);
        assert!(!args.no_vsync);
        assert_eq!(args.headless, None);
    }

    #[test]
    fn later_vsync_flag_wins() {
        let args = CliArgs::try_parse_from(["dungeon-runner", "--no-vsync", "--vsync"])
            .expect("flags parse");
        assert!(args.vsync);
        assert!(!args.no_vsync);
    }

    #[test]
    fn script_requires_headless_mode() {
        assert!(CliArgs::try_parse_from(["dungeon-runner", "--script", "0:jump"]).is_err());
        let args = CliArgs::try_parse_from([
            "dungeon-runner",
            "--headless",
            "120",
            "--seed",
            "9",
            "--script",
            "0:jump",
        ])
        .expect("headless script parses");
        assert_eq!(args.headless, Some(120));
        assert_eq!(args.seed, Some(9));
    }

    #[test]
    fn headless_run_rejects_bad_scripts() {
        assert!(run_headless(1, 10, Some("0:fly")).is_err());
        assert!(run_headless(1, 10, Some("0:space 5:flip")).is_ok());
    }
}

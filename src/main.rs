use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, trace, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use rs_wirecube::config::{Args, Config};
use rs_wirecube::input::{self, Input};
use rs_wirecube::render::{Renderer, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use rs_wirecube::scene::{update, Scene, SimState};
use rs_wirecube::term::{term_size, TerminalSink};
use rs_wirecube::tick::{step_seconds, FrameStats, Ticker};

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    // stdout is the display, so logs go to a file or stay quiet on stderr
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
            let fmt_layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt_layer)
                .init();
        }
        None => {
            let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
            let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt_layer)
                .init();
        }
    }
    Ok(())
}

fn grid_size(config: &Config) -> (u16, u16) {
    let probed = match (config.width, config.height) {
        (Some(w), Some(h)) => return (w, h),
        _ => term_size(),
    };
    let (w, h) = probed.unwrap_or_else(|err| {
        warn!(%err, "terminal size unavailable, using {DEFAULT_WIDTH}x{DEFAULT_HEIGHT}");
        (DEFAULT_WIDTH, DEFAULT_HEIGHT)
    });
    (config.width.unwrap_or(w), config.height.unwrap_or(h))
}

fn main() -> Result<()> {
    let config = Config::from_args(Args::parse())?;
    init_tracing(config.log_file.as_deref())?;
    info!(
        fps = config.fps,
        cubes = config.cubes,
        size = config.size,
        placement = ?config.render.placement,
        ramp_len = config.render.ramp.len(),
        "starting"
    );

    let mut sink = TerminalSink::new(config.background);
    sink.enter()?;

    let result = run(&mut sink, &config);

    // Always try to restore terminal state.
    if let Err(err) = sink.exit() {
        warn!(?err, "failed to restore terminal");
    }
    result
}

fn run(sink: &mut TerminalSink, config: &Config) -> Result<()> {
    let (width, height) = grid_size(config);
    let mut renderer = Renderer::new(config.render.clone());
    renderer.resize(width, height);
    debug!(width, height, "grid size");

    let mut state = SimState::new(Scene::row(config.cubes).scaled(config.size));
    let mut ticker = Ticker::from_fps(config.fps);
    let mut stats = FrameStats::default();

    loop {
        if let Some(elapsed) = ticker.poll(Instant::now()) {
            state = update(state, step_seconds(elapsed), &config.motion);

            let start = Instant::now();
            let mut frame = renderer.render_frame(&state);
            let render_time = start.elapsed();
            stats.record(elapsed, render_time);

            if config.show_stats {
                stats.overlay(&mut frame.color);
            }
            sink.present(frame.color)?;
            trace!(frame = stats.frames(), us = render_time.as_micros() as u64, "frame presented");

            if config.frames.is_some_and(|limit| stats.frames() >= limit) {
                break;
            }
        }

        match input::poll(ticker.time_until_next(Instant::now()))? {
            Some(Input::Quit) => break,
            Some(Input::Resize(w, h)) => {
                let w = config.width.unwrap_or(w);
                let h = config.height.unwrap_or(h);
                if w > 0 && h > 0 {
                    debug!(width = w, height = h, "terminal resized");
                    renderer.resize(w, h);
                    sink.invalidate();
                }
            }
            None => {}
        }
    }

    info!(frames = stats.frames(), fps = stats.fps(), "exiting");
    Ok(())
}

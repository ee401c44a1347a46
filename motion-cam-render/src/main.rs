//! Render a thermal camera style motion overlay for a sequence of frames.

use anyhow::{anyhow, Context, Result};
use log::*;
use motion_cam::prelude::v1::*;
use std::path::Path;

mod canvas;
mod config;
mod overlay;
mod source;
mod timer;

use canvas::Canvas;
use config::RenderConfig;
use overlay::Layout;
use source::FrameSource;
use timer::Timer;

#[derive(Default, Debug)]
struct Stats {
    moved: usize,
    still: usize,
    primed: usize,
    skipped: usize,
}

fn main() -> Result<()> {
    env_logger::init();

    let matches = config::cli().get_matches();

    let input = matches
        .value_of("input")
        .ok_or_else(|| anyhow!("Please supply a frame directory!"))?;
    let output = matches
        .value_of("output")
        .ok_or_else(|| anyhow!("Please supply an output directory!"))?;

    let config = RenderConfig::from_matches(&matches)?;

    debug!("{:?}", config);

    let stats = render(input, output, &config)?;

    info!(
        "{} frames with motion, {} static, {} primed, {} skipped",
        stats.moved, stats.still, stats.primed, stats.skipped
    );

    Ok(())
}

fn render(input: &str, output: &str, config: &RenderConfig) -> Result<Stats> {
    let source = FrameSource::open(input)?;

    if source.is_empty() {
        return Err(anyhow!("No frames found in {input}"));
    }

    info!("rendering {} frames from {input}", source.len());

    std::fs::create_dir_all(output).with_context(|| format!("creating {output}"))?;

    let mut tracker = MotionTracker::new(config.tracker)?;
    let mut canvas: Option<Canvas> = None;
    let mut timer = None;
    let mut stats = Stats::default();
    let interval = config.interval()?;

    for (cnt, frame) in source.enumerate() {
        let (path, frame) = match frame {
            Ok(frame) => frame,
            Err(e) => {
                warn!("skipping frame {cnt}: {e:#}");
                stats.skipped += 1;
                continue;
            }
        };

        Timer::handle_option(&mut timer, config.realtime, interval);

        let (w, h) = frame.dimensions();
        let size = config.canvas.unwrap_or((w, h));

        // Start from a clean canvas whenever the output size changes.
        let canvas = match &mut canvas {
            Some(c) if c.dim() == size => c,
            slot => slot.insert(Canvas::new(size.0, size.1)),
        };

        let tick = match tracker.tick(frame.as_raw(), w as usize, h as usize) {
            Ok(tick) => tick,
            Err(e) => {
                warn!("skipping {}: {e}", path.display());
                stats.skipped += 1;
                continue;
            }
        };

        match tick {
            Tick::Static => {
                trace!("{} is static", path.display());
                stats.still += 1;
            }
            tick => {
                if !config.trails {
                    canvas.clear();
                }

                let layout = Layout::new(
                    canvas.dim(),
                    (w as usize, h as usize),
                    tracker.grid_size(),
                );

                // There is no flow to show until a second frame arrives.
                if tick == Tick::Moved {
                    stats.moved += 1;
                    overlay::draw_zones(canvas, &layout, tracker.field(), &config.palette);
                } else {
                    stats.primed += 1;
                }

                overlay::draw_overlay(canvas, &layout, &config.palette);
            }
        }

        save(canvas, output, cnt)?;
    }

    Ok(stats)
}

fn save(canvas: &Canvas, output: &str, cnt: usize) -> Result<()> {
    let path = Path::new(output).join(format!("{cnt:06}.png"));
    canvas
        .save(&path)
        .with_context(|| format!("writing {}", path.display()))
}

//! Render configuration, loaded from JSON and overridden from the command line.

use anyhow::{anyhow, Context, Result};
use clap::*;
use motion_cam::prelude::v1::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub tracker: TrackerConfig,
    pub palette: ThermalPalette,
    /// Playback rate used with `realtime`.
    pub fps: f64,
    /// Pace output to `fps` instead of rendering as fast as possible.
    pub realtime: bool,
    /// Keep drawing over the previous canvas instead of clearing it.
    pub trails: bool,
    /// Canvas size. Defaults to the frame size.
    pub canvas: Option<(u32, u32)>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tracker: Default::default(),
            palette: Default::default(),
            fps: 20.0,
            realtime: false,
            trails: false,
            canvas: None,
        }
    }
}

impl RenderConfig {
    /// Load configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing config {}", path.display()))
    }

    /// Build configuration from parsed command line arguments.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mut config = match matches.value_of("config") {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_matches(matches)?;
        Ok(config)
    }

    /// Override fields with any values given on the command line.
    pub fn apply_matches(&mut self, matches: &ArgMatches) -> Result<()> {
        if let Some(v) = matches.value_of("grid-size") {
            self.tracker.grid_size = v.parse().context("parsing --grid-size")?;
        }
        if let Some(v) = matches.value_of("sample-step") {
            self.tracker.sample_step = v.parse().context("parsing --sample-step")?;
        }
        if let Some(v) = matches.value_of("fps") {
            self.fps = v.parse().context("parsing --fps")?;
        }
        if let Some(v) = matches.value_of("canvas") {
            self.canvas = Some(parse_size(v)?);
        }
        self.realtime |= matches.is_present("realtime");
        self.trails |= matches.is_present("trails");

        self.interval()?;

        Ok(())
    }

    /// Time between frames at `fps`.
    ///
    /// Fails if `fps` is not positive, or too small for the interval to fit a [`Duration`].
    pub fn interval(&self) -> Result<Duration> {
        if !(self.fps > 0.0) {
            return Err(anyhow!("fps must be positive, got {}", self.fps));
        }
        Duration::try_from_secs_f64(1.0 / self.fps)
            .with_context(|| format!("fps {} is out of range", self.fps))
    }
}

/// Parse a `WIDTHxHEIGHT` size.
pub fn parse_size(s: &str) -> Result<(u32, u32)> {
    let (w, h) = s
        .split_once('x')
        .ok_or_else(|| anyhow!("Invalid size {s:?}, expected WIDTHxHEIGHT"))?;
    Ok((w.trim().parse()?, h.trim().parse()?))
}

/// Command line interface of the tool.
pub fn cli() -> Command<'static> {
    Command::new("motion-cam-render")
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .takes_value(true)
                .required(true)
                .help("Directory of frame images, processed in file name order"),
        )
        .arg(
            Arg::new("grid-size")
                .long("grid-size")
                .short('g')
                .takes_value(true),
        )
        .arg(
            Arg::new("sample-step")
                .long("sample-step")
                .short('s')
                .takes_value(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .takes_value(true)
                .help("JSON configuration file"),
        )
        .arg(Arg::new("fps").long("fps").takes_value(true))
        .arg(
            Arg::new("canvas")
                .long("canvas")
                .takes_value(true)
                .help("Canvas size as WIDTHxHEIGHT"),
        )
        .arg(Arg::new("realtime").long("realtime").short('r'))
        .arg(Arg::new("trails").long("trails").short('t'))
        .arg(Arg::new("output").takes_value(true).required(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<RenderConfig> {
        let matches = cli().try_get_matches_from(
            ["motion-cam-render", "-i", "in", "out"]
                .iter()
                .chain(args),
        )?;
        RenderConfig::from_matches(&matches)
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config, RenderConfig::default());
        assert_eq!(config.tracker.grid_size, 12);
        assert_eq!(config.fps, 20.0);
    }

    #[test]
    fn overrides() {
        let config = parse(&[
            "-g",
            "8",
            "--sample-step",
            "3",
            "--canvas",
            "640x480",
            "-t",
        ])
        .unwrap();
        assert_eq!(config.tracker.grid_size, 8);
        assert_eq!(config.tracker.sample_step, 3);
        assert_eq!(config.canvas, Some((640, 480)));
        assert!(config.trails);
        assert!(!config.realtime);
    }

    #[test]
    fn bad_values() {
        assert!(parse(&["-g", "big"]).is_err());
        assert!(parse(&["--fps", "0"]).is_err());
        assert!(parse(&["--fps", "1e-300"]).is_err());
        assert!(parse(&["--fps", "NaN"]).is_err());
        assert!(parse(&["--canvas", "640"]).is_err());
    }

    #[test]
    fn partial_json() {
        let config: RenderConfig = serde_json::from_str(
            r#"{ "tracker": { "grid_size": 16 }, "palette": { "ignore_threshold": 20.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.tracker.grid_size, 16);
        assert_eq!(config.tracker.sample_step, TrackerConfig::default().sample_step);
        assert_eq!(config.palette.ignore_threshold, 20.0);
        assert_eq!(config.palette.still, ThermalPalette::default().still);
        assert_eq!(config.fps, 20.0);
    }

    #[test]
    fn frame_interval() -> Result<()> {
        let config = RenderConfig {
            fps: 4.0,
            ..Default::default()
        };
        assert_eq!(config.interval()?, Duration::from_millis(250));

        let slow = RenderConfig {
            fps: 1e-300,
            ..Default::default()
        };
        assert!(slow.interval().is_err());
        Ok(())
    }

    #[test]
    fn sizes() {
        assert_eq!(parse_size("24x12").unwrap(), (24, 12));
        assert!(parse_size("24x").is_err());
    }
}

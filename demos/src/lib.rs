//! Console session shared by the `flowfield` demo.
//!
//! Parses the command line and the interactive commands, and drives a
//! [`Grid`] and its [`Propagator`] between renders.

use std::fmt;
use std::time::Duration;

use flowgrid_core::{Grid, GridError, Layout, Point};
use flowgrid_paths::{FieldError, PassReport, Propagator};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub const WIDTH: i32 = 40;
pub const HEIGHT: i32 = 30;
pub const TARGET: Point = Point::new(20, 15);
pub const FRAME_DELAY: Duration = Duration::from_millis(100);

pub const HELP_TEXT: &str = "\
re       re-initialize the grid
set X,Y  place an obstacle (1-based column, row)
step     run one pass
pass     run passes until the field settles
quit     exit";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Demo settings, taken from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    pub size: Point,
    pub target: Point,
    /// Seed for obstacle placement; random when absent.
    pub seed: Option<u64>,
    /// Pause between animated passes. Zero settles the field at once.
    pub delay: Duration,
    /// Print plain frames instead of driving the terminal.
    pub plain: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            size: Point::new(WIDTH, HEIGHT),
            target: TARGET,
            seed: None,
            delay: FRAME_DELAY,
            plain: false,
        }
    }
}

impl DemoConfig {
    /// Parse `--size WxH`, `--target X,Y` (0-based), `--seed N`,
    /// `--delay MS` and `--plain`.
    pub fn from_args<I>(args: I) -> Result<Self, CommandError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            if flag == "--plain" {
                config.plain = true;
                continue;
            }
            let value = args
                .next()
                .ok_or_else(|| CommandError::BadOption(format!("{flag} needs a value")))?;
            let bad = || CommandError::BadOption(format!("{flag} {value}"));
            match flag.as_str() {
                "--size" => {
                    let (w, h) = value.split_once('x').ok_or_else(bad)?;
                    config.size = Point::new(
                        w.trim().parse().map_err(|_| bad())?,
                        h.trim().parse().map_err(|_| bad())?,
                    );
                }
                "--target" => config.target = parse_pair(&value).ok_or_else(bad)?,
                "--seed" => config.seed = Some(value.parse().map_err(|_| bad())?),
                "--delay" => {
                    config.delay = Duration::from_millis(value.parse().map_err(|_| bad())?)
                }
                _ => return Err(CommandError::BadOption(flag.clone())),
            }
        }
        Ok(config)
    }
}

fn parse_pair(s: &str) -> Option<Point> {
    let (x, y) = s.split_once(',')?;
    Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// An interactive command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reinit,
    /// Place an obstacle. Holds the 0-based position.
    Set(Point),
    Step,
    Pass,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Positions are typed 1-based, as labelled on
    /// screen.
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match word {
            "re" => Ok(Command::Reinit),
            "step" => Ok(Command::Step),
            "pass" => Ok(Command::Pass),
            "help" | "?" => Ok(Command::Help),
            "quit" | "q" => Ok(Command::Quit),
            "set" => {
                let rest = rest.trim();
                if rest.is_empty() {
                    return Err(CommandError::MissingPosition);
                }
                let p = parse_pair(rest).ok_or_else(|| CommandError::BadPosition(rest.into()))?;
                Ok(Command::Set(p.shift(-1, -1)))
            }
            _ => Err(CommandError::Unknown(word.into())),
        }
    }
}

/// Errors in the command line or in an interactive command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingPosition,
    BadPosition(String),
    BadOption(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(w) => write!(f, "unknown command \u{201c}{w}\u{201d} (try help)"),
            Self::MissingPosition => write!(f, "usage: set X,Y"),
            Self::BadPosition(s) => write!(f, "bad position \u{201c}{s}\u{201d}, expected X,Y"),
            Self::BadOption(s) => write!(f, "bad option: {s}"),
        }
    }
}

impl std::error::Error for CommandError {}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A grid, its propagator and the random stream used to re-initialize it.
pub struct Session {
    grid: Grid,
    layout: Layout,
    rng: StdRng,
    prop: Propagator,
}

impl Session {
    /// Build and initialize the grid described by `config`.
    pub fn new(config: &DemoConfig) -> Result<Self, GridError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!("obstacle seed {seed}");
        let mut session = Self {
            grid: Grid::new(config.size, config.target)?,
            layout: Layout::default(),
            rng: StdRng::seed_from_u64(seed),
            prop: Propagator::new(),
        };
        session.reinit()?;
        Ok(session)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Re-populate the grid with the next samples of the stream.
    pub fn reinit(&mut self) -> Result<(), GridError> {
        self.grid.init(&self.layout, &mut self.rng)
    }

    pub fn set_block(&mut self, p: Point) -> Result<(), GridError> {
        self.grid.set_block(p)
    }

    /// Run one pass.
    pub fn step(&mut self) -> PassReport {
        self.prop.step(&mut self.grid)
    }

    /// Run passes until the field settles, without rendering in between.
    /// Also settles a field edited since its last initialization.
    pub fn settle(&mut self) -> Result<usize, FieldError> {
        let limit = self.grid.pass_limit();
        self.prop.run(&mut self.grid, limit)
    }
}

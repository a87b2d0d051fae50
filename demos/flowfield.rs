//! Interactive flow-field console.
//!
//! Type `help` at the prompt for the command list. Set `RUST_LOG=debug` to
//! see per-pass logging on stderr.

use std::error::Error;
use std::io::{self, BufRead, Stdout, Write};
use std::thread;

use flowgrid_core::Grid;
use flowgrid_crossterm::{ConsoleRenderer, frame};
use flowgrid_demos::{Command, DemoConfig, HELP_TEXT, Session};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

enum View {
    Console(ConsoleRenderer<Stdout>),
    Plain,
}

impl View {
    fn show(&mut self, grid: &Grid) -> io::Result<()> {
        match self {
            View::Console(r) => r.render(grid),
            View::Plain => {
                let mut out = io::stdout().lock();
                writeln!(out, "{}pass {}", frame(grid), grid.pass())?;
                out.flush()
            }
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn prompt(status: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if !status.is_empty() {
        writeln!(out, "{status}")?;
    }
    write!(out, "command: ")?;
    out.flush()
}

/// Animate passes until one changes nothing, redrawing after each.
fn animate(session: &mut Session, view: &mut View, config: &DemoConfig) -> io::Result<String> {
    loop {
        let report = session.step();
        view.show(session.grid())?;
        if report.is_quiet() {
            return Ok(format!("settled after pass {}", report.pass));
        }
        thread::sleep(config.delay);
    }
}

fn run(config: DemoConfig) -> Result<(), Box<dyn Error>> {
    let mut session = Session::new(&config)?;
    let mut view = if config.plain {
        View::Plain
    } else {
        let mut r = ConsoleRenderer::stdout();
        r.init(session.grid())?;
        View::Console(r)
    };
    view.show(session.grid())?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut status = String::new();
    loop {
        prompt(&status)?;
        status.clear();
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(c) => c,
            Err(e) => {
                status = e.to_string();
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Help => {
                status = HELP_TEXT.to_string();
                continue;
            }
            Command::Reinit => session.reinit()?,
            Command::Set(p) => {
                if let Err(e) = session.set_block(p) {
                    status = e.to_string();
                }
            }
            Command::Step => {
                let report = session.step();
                status = format!("pass {}: {} tiles changed", report.pass, report.changed);
            }
            Command::Pass if config.delay.is_zero() => match session.settle() {
                Ok(passes) => status = format!("settled after {passes} passes"),
                Err(e) => status = e.to_string(),
            },
            Command::Pass => {
                status = animate(&mut session, &mut view, &config)?;
            }
        }
        view.show(session.grid())?;
    }
    Ok(())
}

fn main() {
    init_logging();
    let config = match DemoConfig::from_args(std::env::args().skip(1)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = run(config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

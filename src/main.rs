use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use glam::Vec2;
use std::env;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use termfireworks::color::{self, Rgb};
use termfireworks::input::{self, Action};
use termfireworks::pacing::FrameClock;
use termfireworks::{Config, Error, Framebuffer, Result, Simulation};

fn print_usage() {
    eprintln!("termfireworks - Fireworks in the terminal");
    eprintln!();
    eprintln!("Usage: termfireworks [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config PATH      Load settings from a TOML file");
    eprintln!("  --seed N           Seed the random source for a reproducible show");
    eprintln!("  --bg-color RRGGBB  Set background color as hex (e.g., --bg-color 1a1b26)");
    eprintln!("  --monochrome       Explosions use the launcher's color only");
    eprintln!("  --no-trails        Disable particle trails");
    eprintln!("  --log-file PATH    Write log output to PATH (filter with RUST_LOG)");
    eprintln!();
    eprintln!("Keys: 1 = launch one, 2 = launch ten, q / ESC / Ctrl+C = exit");
}

#[derive(Debug, Default, PartialEq)]
struct Options {
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    bg_color: Option<Rgb>,
    monochrome: bool,
    no_trails: bool,
    log_file: Option<PathBuf>,
    help: bool,
}

fn option_value<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| Error::Usage(format!("{name} requires a value")))
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                options.config_path = Some(PathBuf::from(option_value(args, i, "--config")?));
                i += 2;
            }
            "--seed" => {
                let raw = option_value(args, i, "--seed")?;
                let seed = raw
                    .parse::<u64>()
                    .map_err(|_| Error::Usage(format!("invalid seed: {raw}")))?;
                options.seed = Some(seed);
                i += 2;
            }
            "--bg-color" => {
                let raw = option_value(args, i, "--bg-color")?;
                let color = color::parse_hex(raw).ok_or_else(|| {
                    Error::Usage(format!(
                        "invalid hex color: {raw} (expected RRGGBB, e.g. 1a1b26)"
                    ))
                })?;
                options.bg_color = Some(color);
                i += 2;
            }
            "--log-file" => {
                options.log_file = Some(PathBuf::from(option_value(args, i, "--log-file")?));
                i += 2;
            }
            "--monochrome" => {
                options.monochrome = true;
                i += 1;
            }
            "--no-trails" => {
                options.no_trails = true;
                i += 1;
            }
            "help" | "--help" | "-h" => {
                options.help = true;
                i += 1;
            }
            arg => return Err(Error::Usage(format!("unknown option: {arg}"))),
        }
    }

    Ok(options)
}

fn load_config(options: &Options) -> Result<Config> {
    let mut config = match &options.config_path {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };

    if let Some(bg) = options.bg_color {
        config.display.background = bg;
    }
    if options.monochrome {
        config.firework.colorful = false;
    }
    if options.no_trails {
        config.trail.enabled = false;
    }

    config.validate()?;
    Ok(config)
}

fn init_logger(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Raw mode and the alternate screen, undone on drop so an error mid-loop
/// still leaves a usable terminal.
struct TerminalGuard;

impl TerminalGuard {
    fn enter<W: Write>(out: &mut W) -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn framebuffer_for(cols: u16, rows: u16, config: &Config) -> Framebuffer {
    let world = Vec2::new(config.display.width, config.display.height);
    Framebuffer::new(cols as usize, rows as usize, world, config.display.background)
}

fn run(config: Config, seed: u64) -> Result<()> {
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout());
    let _guard = TerminalGuard::enter(&mut stdout)?;

    let (cols, rows) = terminal::size()?;
    let mut framebuffer = framebuffer_for(cols, rows, &config);
    let mut clock = FrameClock::new(config.display.frame_rate, Instant::now());

    let mut simulation = Simulation::new(config, seed);
    simulation.launch();

    loop {
        if event::poll(clock.until_next_tick(Instant::now()))? {
            let event = event::read()?;
            if let Event::Resize(cols, rows) = event {
                log::debug!("terminal resized to {cols}x{rows}");
                framebuffer = framebuffer_for(cols, rows, simulation.config());
                execute!(stdout, Clear(ClearType::All))?;
            }
            match input::action_for(&event) {
                Some(Action::Quit) => break,
                Some(Action::LaunchOne) => simulation.launch(),
                Some(Action::LaunchBurst) => simulation.launch_burst(),
                None => {}
            }
        }

        if clock.tick(Instant::now()) {
            framebuffer.clear();
            simulation.draw_stars(&mut framebuffer);
            simulation.tick(&mut framebuffer);
            framebuffer.present(&mut stdout)?;
        }
    }

    log::info!(
        "exiting after {} ticks with {} fireworks and {} trails live",
        simulation.ticks(),
        simulation.fireworks().len(),
        simulation.trails().len()
    );
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let result = parse_args(&args).and_then(|options| {
        if options.help {
            print_usage();
            return Ok(());
        }

        init_logger(options.log_file.as_ref())?;
        let config = load_config(&options)?;
        let seed = options.seed.unwrap_or_else(|| fastrand::u64(..));
        log::info!("starting with seed {seed}");
        log::debug!("{config:?}");
        run(config, seed)
    });

    if let Err(err) = result {
        eprintln!("termfireworks: {err}");
        if matches!(err, Error::Usage(_)) {
            eprintln!();
            print_usage();
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("termfireworks")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn no_args_means_defaults() {
        assert_eq!(parse_args(&args(&[])).unwrap(), Options::default());
    }

    #[test]
    fn parses_every_option() {
        let options = parse_args(&args(&[
            "--seed",
            "42",
            "--bg-color",
            "1a1b26",
            "--monochrome",
            "--no-trails",
            "--config",
            "sky.toml",
            "--log-file",
            "fw.log",
        ]))
        .unwrap();

        assert_eq!(options.seed, Some(42));
        assert_eq!(options.bg_color, Some((0x1a, 0x1b, 0x26)));
        assert!(options.monochrome);
        assert!(options.no_trails);
        assert_eq!(options.config_path, Some(PathBuf::from("sky.toml")));
        assert_eq!(options.log_file, Some(PathBuf::from("fw.log")));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(parse_args(&args(&["--seed", "abc"])), Err(Error::Usage(_))));
        assert!(matches!(parse_args(&args(&["--bg-color", "fff"])), Err(Error::Usage(_))));
        assert!(matches!(parse_args(&args(&["--seed"])), Err(Error::Usage(_))));
        assert!(matches!(parse_args(&args(&["--sparkle"])), Err(Error::Usage(_))));
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let options = Options {
            bg_color: Some((0, 0, 0)),
            monochrome: true,
            no_trails: true,
            ..Default::default()
        };
        let config = load_config(&options).unwrap();
        assert_eq!(config.display.background, (0, 0, 0));
        assert!(!config.firework.colorful);
        assert!(!config.trail.enabled);
    }
}

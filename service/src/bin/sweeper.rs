use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use sweeper_protocol::{Envelope, FlagReport, GameSnapshot, MarkReport, to_json};
use sweeper_service::{GameId, GameService, GameStore, JsonDirStore, ServiceError, Settings};

#[derive(Parser, Debug)]
#[command(version, about = "Play minesweeper games kept on disk")]
struct Cli {
    /// Settings file, defaults apply when it does not exist
    #[arg(long, default_value = "sweeper.toml")]
    config: PathBuf,

    /// Directory holding saved games, overrides the settings file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Print JSON envelopes instead of boards
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    verbose: Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a new game
    New {
        #[arg(long)]
        size: Option<i64>,
        #[arg(long)]
        mines: Option<i64>,
        #[arg(long, default_value = "anonymous")]
        owner: String,
    },
    /// Reveal one cell
    Mark {
        game: u64,
        #[arg(allow_negative_numbers = true)]
        x: i64,
        #[arg(allow_negative_numbers = true)]
        y: i64,
    },
    /// Put a flag on a cell or take it off
    Flag {
        game: u64,
        #[arg(allow_negative_numbers = true)]
        x: i64,
        #[arg(allow_negative_numbers = true)]
        y: i64,
    },
    /// Show a game
    Show { game: u64 },
    /// Read `x y` moves (or `f x y` to flag) from stdin until the game ends
    Play { game: u64 },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let mut settings = Settings::load(&cli.config)
        .with_context(|| format!("reading settings from {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }

    let store = JsonDirStore::open(&settings.data_dir)
        .with_context(|| format!("opening game directory {}", settings.data_dir.display()))?;
    let service = GameService::new(store, settings);

    match cli.command {
        Command::New { size, mines, owner } => {
            let size = size.unwrap_or(service.settings().default_size);
            let mines = mines.unwrap_or(service.settings().default_mines);
            let started = service.create_game(size, mines, &owner);
            match started {
                Ok(started) if cli.json => {
                    println!("{}", to_json(&Envelope::new("Game started", started))?)
                }
                Ok(started) => {
                    println!("game {} with {} mines", started.game_id, started.mine_count);
                    print_map(&started.map);
                }
                Err(err) => return fail(&err, cli.json),
            }
        }
        Command::Mark { game, x, y } => match service.mark(GameId(game), x, y) {
            Ok(report) if cli.json => {
                println!("{}", to_json(&Envelope::new("Game marked", report))?)
            }
            Ok(report) => print_report(&service, GameId(game), &report)?,
            Err(err) => return fail(&err, cli.json),
        },
        Command::Flag { game, x, y } => match service.flag(GameId(game), x, y) {
            Ok(report) if cli.json => {
                println!("{}", to_json(&Envelope::new("Game flagged", report))?)
            }
            Ok(report) => print_flag(&service, GameId(game), report)?,
            Err(err) => return fail(&err, cli.json),
        },
        Command::Show { game } => match service.game(GameId(game)) {
            Ok(snapshot) if cli.json => println!("{}", to_json(&snapshot)?),
            Ok(snapshot) => print_snapshot(&snapshot),
            Err(err) => return fail(&err, cli.json),
        },
        Command::Play { game } => play(&service, GameId(game))?,
    }

    Ok(())
}

fn play<S: GameStore>(service: &GameService<S>, id: GameId) -> anyhow::Result<()> {
    print_snapshot(&service.game(id)?);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("x y> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        let (flag, coords) = match line.trim().strip_prefix('f') {
            Some(rest) => (true, rest),
            None => (false, line.as_str()),
        };
        let mut parts = coords.split_whitespace().map(str::parse::<i64>);
        let (Some(Ok(x)), Some(Ok(y)), None) = (parts.next(), parts.next(), parts.next()) else {
            println!("expected two integers, prefixed with `f` to flag");
            continue;
        };

        let played = if flag {
            service
                .flag(id, x, y)
                .and_then(|report| print_flag(service, id, report))
                .map(|()| false)
        } else {
            service.mark(id, x, y).and_then(|report| {
                print_report(service, id, &report)?;
                Ok(report.is_terminal())
            })
        };
        match played {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(ServiceError::Game(err)) => println!("{err}"),
            Err(err) => return Err(err.into()),
        }
    }
}

fn fail(err: &ServiceError, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", to_json(&err.to_report())?);
        std::process::exit(1);
    }
    bail!("{err}")
}

fn print_report<S: GameStore>(
    service: &GameService<S>,
    id: GameId,
    report: &MarkReport,
) -> sweeper_service::Result<()> {
    match report {
        MarkReport::Dead { map } => {
            println!("boom, game over");
            print_map(map);
        }
        MarkReport::Win { map } => {
            println!("cleared, you win");
            print_map(map);
        }
        MarkReport::Clear { num_bombs } => {
            println!("{num_bombs} mines nearby");
            print_map(&service.game(id)?.map);
        }
        MarkReport::Superclear { empties, .. } => {
            println!("opened {} cells", empties.len());
            print_map(&service.game(id)?.map);
        }
    }
    Ok(())
}

fn print_flag<S: GameStore>(
    service: &GameService<S>,
    id: GameId,
    report: FlagReport,
) -> sweeper_service::Result<()> {
    let verb = if report.flagged { "placed" } else { "removed" };
    println!("flag {verb}, {} flags down", report.flag_count);
    print_map(&service.game(id)?.map);
    Ok(())
}

fn print_snapshot(snapshot: &GameSnapshot) {
    println!(
        "{:?}, {} mines, {} flags, {} marks",
        snapshot.status, snapshot.mine_count, snapshot.flag_count, snapshot.mark_count
    );
    print_map(&snapshot.map);
}

fn print_map(map: &[String]) {
    for row in map {
        let spaced: Vec<String> = row.chars().map(String::from).collect();
        println!("{}", spaced.join(" "));
    }
}

use anyhow::{Context, Result};
use chess_lab::board::Position;
use chess_lab::config::{parse_engine_option, Opponent, Settings, Side};
use chess_lab::game::Game;
use chess_lab::gui::{self, sprites::SpriteImages};
use chess_lab::source::{MoveSource, RandomSource, UciSource};
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess by dragging pieces against a random mover or a UCI engine", long_about = None)]
struct Args {
    /// Who plays the other side
    #[arg(long, value_enum)]
    opponent: Option<Opponent>,

    /// Path to a UCI engine executable (implies --opponent engine)
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Engine thinking time per move in milliseconds
    #[arg(long)]
    movetime: Option<u64>,

    /// Engine option forwarded as setoption, NAME=VALUE (repeatable)
    #[arg(long = "engine-option", value_parser = parse_engine_option)]
    engine_option: Vec<(String, String)>,

    /// Your color
    #[arg(long, value_enum)]
    color: Option<Side>,

    /// Random seed for the random mover
    #[arg(long)]
    seed: Option<u64>,

    /// Starting FEN position
    #[arg(long)]
    fen: Option<String>,

    /// Directory holding wK.png .. bP.png piece sprites
    #[arg(long)]
    assets: Option<PathBuf>,

    /// JSON settings file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep the window open after the game ends
    #[arg(long)]
    keep_open: bool,

    /// Window scale factor
    #[arg(long)]
    scale: Option<f32>,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut s = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(path) = &args.engine {
        s.engine = Some(path.clone());
        s.opponent = Opponent::Engine;
    }
    if let Some(o) = args.opponent { s.opponent = o; }
    if let Some(ms) = args.movetime { s.movetime_ms = ms; }
    for (name, value) in &args.engine_option { s.engine_options.insert(name.clone(), value.clone()); }
    if let Some(c) = args.color { s.human = c; }
    if args.seed.is_some() { s.seed = args.seed; }
    if args.fen.is_some() { s.fen = args.fen.clone(); }
    if args.assets.is_some() { s.assets = args.assets.clone(); }
    if args.keep_open { s.keep_open = true; }
    if let Some(scale) = args.scale { s.scale = scale; }
    s.validate()?;
    Ok(s)
}

fn build_source(s: &Settings) -> Result<Box<dyn MoveSource>> {
    let mut source: Box<dyn MoveSource> = match s.opponent {
        Opponent::Random => Box::new(RandomSource::new(s.seed)),
        Opponent::Engine => {
            let path = s.engine.as_deref().context("engine opponent needs --engine")?;
            Box::new(UciSource::spawn(path, &s.engine_options(), s.movetime())
                .with_context(|| format!("starting engine {}", path.display()))?)
        }
    };
    source.new_game()?;
    Ok(source)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    if args.print_config {
        println!("{}", settings.to_json());
        return Ok(());
    }

    let position = match &settings.fen {
        Some(fen) => Position::from_fen(fen)?,
        None => Position::startpos(),
    };
    let images = match &settings.assets {
        Some(dir) => Some(SpriteImages::load(dir).context("loading piece sprites")?),
        None => None,
    };
    let source = build_source(&settings)?;
    info!("playing {} against {}", if settings.human == Side::White { "white" } else { "black" }, source.name());

    let game = Game::new(position, settings.human.color(), source);
    gui::run(game, images, &settings)
}

use chess_lab::uci::UciServer;

#[derive(clap::Parser, Debug)]
#[command(name = "randfish", about = "UCI engine that plays random legal moves")]
struct Args {
    /// Random seed (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    use clap::Parser;
    env_logger::init();
    let args = Args::parse();
    UciServer::new(args.seed).run_loop()?;
    Ok(())
}

use std::io::{self, BufRead, Write};

use crate::board::Position;
use crate::source::{MoveSource, RandomSource};

/// Minimal UCI engine answering every `go` with a random legal move.
pub struct UciServer {
    pos: Position,
    mover: RandomSource,
}

impl UciServer {
    pub fn new(seed: Option<u64>) -> Self { Self { pos: Position::startpos(), mover: RandomSource::new(seed) } }

    pub fn position(&self) -> &Position { &self.pos }

    fn cmd_uci<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name randfish")?;
        writeln!(out, "id author Chess Lab Team")?;
        writeln!(out, "uciok")
    }

    fn cmd_position(&mut self, args: &str) {
        // position startpos [moves ...] | position fen <6 fields> [moves ...]
        let mut tokens = args.split_whitespace();
        let base = match tokens.next() {
            Some("startpos") => Some(Position::startpos()),
            Some("fen") => {
                let fen_fields: Vec<&str> = tokens.by_ref().take_while(|&t| t != "moves").collect();
                Position::from_fen(&fen_fields.join(" ")).ok()
            }
            _ => None,
        };
        let Some(mut pos) = base else { return };
        for mv in tokens.filter(|&t| t != "moves") {
            if pos.play_uci(mv).is_err() { return; }
        }
        self.pos = pos;
    }

    fn cmd_go<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.mover.choose(&self.pos) {
            Ok(mv) => writeln!(out, "bestmove {}", self.pos.to_uci(mv)),
            Err(_) => writeln!(out, "bestmove (none)"),
        }
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() { continue; }
            match line {
                "uci" => self.cmd_uci(out)?,
                "isready" => writeln!(out, "readyok")?,
                "ucinewgame" => self.pos = Position::startpos(),
                "quit" => break,
                "stop" => {}
                _ => {
                    if let Some(rest) = line.strip_prefix("position ") { self.cmd_position(rest); }
                    else if line == "go" || line.starts_with("go ") { self.cmd_go(out)?; }
                    // setoption and unknown commands are ignored
                }
            }
            out.flush()?;
        }
        Ok(())
    }

    pub fn run_loop(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        self.run(stdin.lock(), &mut stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session(script: &str) -> (UciServer, String) {
        let mut server = UciServer::new(Some(7));
        let mut out = Vec::new();
        server.run(Cursor::new(script), &mut out).unwrap();
        (server, String::from_utf8(out).unwrap())
    }

    #[test]
    fn handshake() {
        let (_, out) = session("uci\nisready\nquit\n");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["id name randfish", "id author Chess Lab Team", "uciok", "readyok"]);
    }

    #[test]
    fn fen_with_moves_is_applied_on_top_of_fen() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let (server, _) = session(&format!("position fen {} moves e1g1 e8c8\n", fen));
        assert_eq!(server.position().ply(), 2);
        assert_eq!(server.position().history_uci(), &["e1g1".to_string(), "e8c8".to_string()]);
    }

    #[test]
    fn go_answers_a_legal_move() {
        let (server, out) = session("position startpos moves e2e4\ngo movetime 10\n");
        let mv = out.lines().last().unwrap().strip_prefix("bestmove ").unwrap().to_string();
        assert!(server.position().find_move(&mv).is_some(), "{mv} not legal");
    }

    #[test]
    fn mated_side_has_no_move() {
        let (_, out) = session("position startpos moves f2f3 e7e5 g2g4 d8h4\ngo\n");
        assert_eq!(out.trim(), "bestmove (none)");
    }

    #[test]
    fn bad_position_keeps_previous() {
        let (server, _) = session("position startpos moves e2e4\nposition startpos moves e2e5\n");
        assert_eq!(server.position().history_uci(), &["e2e4".to_string()]);
    }
}

use cozy_chess::Move;
use log::{debug, info, warn};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use super::{EngineError, MoveSource};
use crate::board::Position;

/// Client side of a UCI conversation with an engine child process.
pub struct UciSource {
    name: String,
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    movetime: Duration,
    closed: bool,
}

impl UciSource {
    /// Launches the engine and runs the `uci`/`isready` handshake, then
    /// forwards `options` as `setoption` commands.
    pub fn spawn(path: &Path, options: &[(String, String)], movetime: Duration) -> Result<Self, EngineError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn { path: path.to_path_buf(), source })?;
        let stdin = BufWriter::new(child.stdin.take().ok_or(EngineError::Closed)?);
        let stdout = BufReader::new(child.stdout.take().ok_or(EngineError::Closed)?);
        let mut engine = Self {
            name: path.display().to_string(),
            child,
            stdin,
            stdout,
            movetime,
            closed: false,
        };

        engine.identify().map_err(|e| match e {
            // an engine that dies at launch shows up as EOF or a broken pipe
            EngineError::Closed => EngineError::Handshake { expected: "uciok" },
            EngineError::Io(io) if io.kind() == ErrorKind::BrokenPipe => EngineError::Handshake { expected: "uciok" },
            other => other,
        })?;
        for (name, value) in options {
            engine.send(&format!("setoption name {} value {}", name, value))?;
        }
        engine.sync()?;
        info!("engine '{}' ready (movetime {} ms)", engine.name, engine.movetime().as_millis());
        Ok(engine)
    }

    /// `uci` up to `uciok`, picking up the engine's `id name`.
    fn identify(&mut self) -> Result<(), EngineError> {
        self.send("uci")?;
        loop {
            let line = self.read_line()?;
            if let Some(name) = line.strip_prefix("id name ") { self.name = name.trim().to_string(); }
            if line == "uciok" { return Ok(()); }
        }
    }

    fn send(&mut self, command: &str) -> Result<(), EngineError> {
        debug!("> {}", command);
        writeln!(self.stdin, "{}", command)?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 { return Err(EngineError::Closed); }
        let line = line.trim().to_string();
        debug!("< {}", line);
        Ok(line)
    }

    /// `isready` round trip.
    fn sync(&mut self) -> Result<(), EngineError> {
        self.send("isready")?;
        loop {
            match self.read_line() {
                Ok(line) if line == "readyok" => return Ok(()),
                Ok(_) => continue,
                Err(EngineError::Closed) => return Err(EngineError::Handshake { expected: "readyok" }),
                Err(e) => return Err(e),
            }
        }
    }

    pub fn movetime(&self) -> Duration { self.movetime }
}

/// `position` command replaying the game from its starting FEN.
pub fn position_command(pos: &Position) -> String {
    let mut cmd = format!("position fen {}", pos.start_fen());
    if !pos.history_uci().is_empty() {
        cmd.push_str(" moves ");
        cmd.push_str(&pos.history_uci().join(" "));
    }
    cmd
}

/// Move text from a `bestmove` line. `Ok(None)` means the engine has no move.
pub fn parse_bestmove(line: &str) -> Result<Option<String>, EngineError> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("bestmove") { return Err(EngineError::Protocol(line.to_string())); }
    match tokens.next() {
        None => Err(EngineError::Protocol(line.to_string())),
        Some("(none)") | Some("0000") => Ok(None),
        Some(mv) => Ok(Some(mv.to_string())),
    }
}

impl MoveSource for UciSource {
    fn name(&self) -> &str { &self.name }

    fn choose(&mut self, pos: &Position) -> Result<Move, EngineError> {
        self.send(&position_command(pos))?;
        self.send(&format!("go movetime {}", self.movetime.as_millis()))?;
        loop {
            let line = self.read_line()?;
            if !line.starts_with("bestmove") { continue; }
            let text = parse_bestmove(&line)?.ok_or(EngineError::NoMove)?;
            return pos.find_move(&text).ok_or(EngineError::IllegalMove(text));
        }
    }

    fn new_game(&mut self) -> Result<(), EngineError> {
        self.send("ucinewgame")?;
        self.sync()
    }

    fn quit(&mut self) {
        if self.closed { return; }
        self.closed = true;
        if let Err(e) = self.send("quit") { warn!("engine quit: {}", e); }
        match self.child.wait() {
            Ok(status) => info!("engine '{}' exited ({})", self.name, status),
            Err(e) => warn!("engine wait: {}", e),
        }
    }
}

impl Drop for UciSource {
    fn drop(&mut self) { self.quit(); }
}

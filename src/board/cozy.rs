use cozy_chess::{Board as CozyBoard, BitBoard, Color, File, Move, Piece, Square};
use std::fmt;

use super::BoardError;

/// Plies without a capture or pawn move after which the game is drawn outright.
pub const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;
/// Occurrences of one position after which the game is drawn outright.
pub const FIVEFOLD: usize = 5;
/// Highest half-move clock the board library accepts in a FEN.
const LIBRARY_CLOCK_CAP: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub termination: Termination,
    pub winner: Option<Color>,
}

impl Outcome {
    pub fn result(&self) -> &'static str {
        match self.winner {
            Some(Color::White) => "1-0",
            Some(Color::Black) => "0-1",
            None => "1/2-1/2",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.termination {
            Termination::Checkmate => "checkmate",
            Termination::Stalemate => "stalemate",
            Termination::InsufficientMaterial => "insufficient material",
            Termination::SeventyFiveMoves => "seventy-five move rule",
            Termination::FivefoldRepetition => "fivefold repetition",
        };
        write!(f, "{} ({})", self.result(), reason)
    }
}

/// Per-frame read-only view of the board, indexed `[rank][file]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub grid: [[Option<(Color, Piece)>; 8]; 8],
    pub side_to_move: Color,
}

impl Snapshot {
    pub fn at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.grid[sq.rank() as usize][sq.file() as usize]
    }
}

/// A game in progress: the current board plus what is needed to replay it
/// to an engine and to detect draws the board alone cannot see.
#[derive(Clone, Debug)]
pub struct Position {
    start: CozyBoard,
    board: CozyBoard,
    moves: Vec<Move>,
    history_uci: Vec<String>,
    hashes: Vec<u64>,
    quiet_plies: u32,
}

impl Position {
    pub fn startpos() -> Self { Self::from_board(CozyBoard::default(), 0) }

    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        // The board library refuses half-move clocks above 100; keep the real
        // count here and hand it a capped one.
        let clock = fen.split_whitespace().nth(4).and_then(|f| f.parse::<u32>().ok());
        let capped = clock.map(|c| c.min(LIBRARY_CLOCK_CAP).to_string());
        let mut fields: Vec<&str> = fen.split_whitespace().collect();
        if let Some(c) = capped.as_deref() { fields[4] = c; }
        let board = CozyBoard::from_fen(&fields.join(" "), false)
            .map_err(|e| BoardError::InvalidFen { fen: fen.to_string(), reason: format!("{e:?}") })?;
        let quiet_plies = clock.unwrap_or(board.halfmove_clock() as u32);
        Ok(Self::from_board(board, quiet_plies))
    }

    fn from_board(board: CozyBoard, quiet_plies: u32) -> Self {
        Self {
            start: board.clone(),
            hashes: vec![board.hash()],
            board,
            moves: Vec::new(),
            history_uci: Vec::new(),
            quiet_plies,
        }
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    pub fn start_fen(&self) -> String { format!("{}", self.start) }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    pub fn ply(&self) -> usize { self.moves.len() }

    pub fn moves(&self) -> &[Move] { &self.moves }

    /// Moves played so far in standard UCI notation.
    pub fn history_uci(&self) -> &[String] { &self.history_uci }

    pub fn quiet_plies(&self) -> u32 { self.quiet_plies }

    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        match (self.board.color_on(sq), self.board.piece_on(sq)) {
            (Some(c), Some(p)) => Some((c, p)),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut grid = [[None; 8]; 8];
        for sq in self.board.occupied() {
            grid[sq.rank() as usize][sq.file() as usize] = self.piece_at(sq);
        }
        Snapshot { grid, side_to_move: self.side_to_move() }
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut v = Vec::new();
        self.board.generate_moves(|ml| { v.extend(ml); false });
        v
    }

    pub fn is_legal(&self, mv: Move) -> bool { self.legal_moves().contains(&mv) }

    /// The board library encodes castling as the king capturing its own rook.
    pub fn is_castle(&self, mv: Move) -> bool {
        self.board.piece_on(mv.from) == Some(Piece::King)
            && self.board.colors(self.side_to_move()).has(mv.to)
    }

    /// Square the king actually lands on, which differs from `mv.to` for castling.
    pub fn king_destination(&self, mv: Move) -> Square {
        if !self.is_castle(mv) { return mv.to; }
        let file = if mv.to.file() as usize > mv.from.file() as usize { File::G } else { File::C };
        Square::new(file, mv.from.rank())
    }

    /// Standard UCI text for a move (castling as a two-file king move).
    pub fn to_uci(&self, mv: Move) -> String {
        if self.is_castle(mv) {
            format!("{}{}", mv.from, self.king_destination(mv))
        } else {
            format!("{}", mv)
        }
    }

    /// Finds the legal move a UCI string names. Both standard castling
    /// (`e1g1`) and king-takes-rook (`e1h1`) notation are accepted.
    pub fn find_move(&self, uci: &str) -> Option<Move> {
        let uci = uci.trim();
        self.legal_moves().into_iter().find(|&m| format!("{}", m) == uci || self.to_uci(m) == uci)
    }

    pub fn play(&mut self, mv: Move) -> Result<(), BoardError> {
        if !self.is_legal(mv) {
            return Err(BoardError::IllegalMove { mv: format!("{}", mv), fen: self.fen() });
        }
        let resets_clock = self.board.piece_on(mv.from) == Some(Piece::Pawn)
            || self.board.colors(!self.side_to_move()).has(mv.to);
        let uci = self.to_uci(mv);
        self.board.play(mv);
        self.quiet_plies = if resets_clock { 0 } else { self.quiet_plies + 1 };
        self.moves.push(mv);
        self.history_uci.push(uci);
        self.hashes.push(self.board.hash());
        Ok(())
    }

    pub fn play_uci(&mut self, mv_uci: &str) -> Result<(), BoardError> {
        match self.find_move(mv_uci) {
            Some(m) => self.play(m),
            None if mv_uci.trim().parse::<Move>().is_err() => Err(BoardError::BadMoveText(mv_uci.to_string())),
            None => Err(BoardError::IllegalMove { mv: mv_uci.to_string(), fen: self.fen() }),
        }
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self, BoardError> {
        let mut pos = Self::startpos();
        for m in moves { pos.play_uci(m)?; }
        Ok(pos)
    }

    pub fn is_check(&self) -> bool { !self.board.checkers().is_empty() }

    pub fn is_game_over(&self) -> bool { self.outcome().is_some() }

    /// Game termination without draw claims: only the rules that end the
    /// game on their own.
    pub fn outcome(&self) -> Option<Outcome> {
        let mut has_move = false;
        self.board.generate_moves(|ml| { has_move = !ml.is_empty(); has_move });
        if !has_move {
            return Some(if self.is_check() {
                Outcome { termination: Termination::Checkmate, winner: Some(!self.side_to_move()) }
            } else {
                Outcome { termination: Termination::Stalemate, winner: None }
            });
        }
        let draw = |termination| Some(Outcome { termination, winner: None });
        if self.is_insufficient_material() { return draw(Termination::InsufficientMaterial); }
        if self.quiet_plies >= SEVENTY_FIVE_MOVE_PLIES { return draw(Termination::SeventyFiveMoves); }
        if self.repetitions() >= FIVEFOLD { return draw(Termination::FivefoldRepetition); }
        None
    }

    /// How many times the current position has occurred, including now.
    pub fn repetitions(&self) -> usize {
        let current = self.board.hash();
        self.hashes.iter().filter(|&&h| h == current).count()
    }

    pub fn is_insufficient_material(&self) -> bool {
        Color::ALL.iter().all(|&c| self.has_insufficient_material(c))
    }

    /// Whether `color` could never deliver mate, whatever the opponent does.
    pub fn has_insufficient_material(&self, color: Color) -> bool {
        let b = &self.board;
        let ours = b.colors(color);
        let theirs = b.colors(!color);
        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !(ours & heavy).is_empty() { return false; }
        if !(ours & b.pieces(Piece::Knight)).is_empty() {
            let their_extras = theirs & !b.pieces(Piece::King) & !b.pieces(Piece::Queen);
            return ours.len() <= 2 && their_extras.is_empty();
        }
        let bishops = b.pieces(Piece::Bishop);
        if !(ours & bishops).is_empty() {
            let (dark, light) = split_square_colors(bishops);
            let same_color = dark.is_empty() || light.is_empty();
            return same_color && b.pieces(Piece::Pawn).is_empty() && b.pieces(Piece::Knight).is_empty();
        }
        true
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.board) }
}

fn split_square_colors(bb: BitBoard) -> (BitBoard, BitBoard) {
    let (mut dark, mut light) = (BitBoard::EMPTY, BitBoard::EMPTY);
    for sq in bb {
        if (sq.file() as usize + sq.rank() as usize) % 2 == 0 { dark |= sq.bitboard(); } else { light |= sq.bitboard(); }
    }
    (dark, light)
}

use chess_lab::board::{Position, Termination};
use cozy_chess::{Color, Piece};
use pretty_assertions::assert_eq;

fn sq(name: &str) -> cozy_chess::Square { name.parse().expect("square") }

#[test]
fn apply_startpos_moves_sequence() {
    let moves = vec!["e2e4".to_string(), "e7e5".to_string(), "g1f3".to_string()];
    let pos = Position::set_from_start_and_moves(&moves).expect("legal move sequence");
    assert_eq!(pos.side_to_move(), Color::Black, "expected black to move after 3 plies");
    assert_eq!(pos.ply(), 3);
    assert_eq!(pos.fen(), "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2");
}

#[test]
fn illegal_moves_never_change_the_board() {
    let mut pos = Position::startpos();
    let before = pos.fen();
    assert!(pos.play_uci("e2e5").is_err());
    assert!(pos.play_uci("e7e5").is_err());
    assert!(pos.play_uci("zz").is_err());
    assert_eq!(pos.fen(), before);
    assert_eq!(pos.ply(), 0);
}

#[test]
fn castling_accepts_both_notations() {
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
    let mut a = Position::from_fen(fen).unwrap();
    let mut b = Position::from_fen(fen).unwrap();
    a.play_uci("e1g1").unwrap();
    b.play_uci("e1h1").unwrap();
    assert_eq!(a.fen(), b.fen());
    assert_eq!(a.piece_at(sq("g1")), Some((Color::White, Piece::King)));
    assert_eq!(a.piece_at(sq("f1")), Some((Color::White, Piece::Rook)));
    assert_eq!(a.history_uci(), &["e1g1".to_string()]);
}

#[test]
fn fools_mate_is_checkmate() {
    let mut pos = Position::startpos();
    for m in ["f2f3", "e7e5", "g2g4"] { pos.play_uci(m).unwrap(); }
    assert_eq!(pos.outcome(), None);
    pos.play_uci("d8h4").unwrap();
    let outcome = pos.outcome().expect("game over");
    assert_eq!(outcome.termination, Termination::Checkmate);
    assert_eq!(outcome.winner, Some(Color::Black));
    assert_eq!(outcome.result(), "0-1");
}

#[test]
fn stalemate_is_a_draw() {
    let pos = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    let outcome = pos.outcome().expect("game over");
    assert_eq!(outcome.termination, Termination::Stalemate);
    assert_eq!(outcome.result(), "1/2-1/2");
}

#[test]
fn insufficient_material() {
    for fen in ["8/8/8/4k3/8/8/8/4K3 w - - 0 1", "8/8/8/4k3/8/8/8/4K2N w - - 0 1", "5b2/8/8/4k3/8/8/8/2B1K3 w - - 0 1"] {
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.outcome().map(|o| o.termination), Some(Termination::InsufficientMaterial), "{fen}");
    }
    for fen in ["4b3/8/8/4k3/8/8/8/2B1K3 w - - 0 1", "8/8/8/4k3/8/8/8/R3K3 w - - 0 1", "8/8/8/4k3/8/8/4P3/4K3 w - - 0 1"] {
        let pos = Position::from_fen(fen).unwrap();
        assert_eq!(pos.outcome(), None, "{fen}");
    }
}

#[test]
fn fivefold_repetition_ends_the_game() {
    let mut pos = Position::startpos();
    let cycle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    for _ in 0..3 {
        for m in cycle { pos.play_uci(m).unwrap(); }
    }
    assert_eq!(pos.repetitions(), 4);
    assert_eq!(pos.outcome(), None);
    for m in cycle { pos.play_uci(m).unwrap(); }
    assert_eq!(pos.repetitions(), 5);
    assert_eq!(pos.outcome().map(|o| o.termination), Some(Termination::FivefoldRepetition));
}

#[test]
fn quiet_plies_reset_on_pawn_moves_and_captures() {
    let mut pos = Position::startpos();
    pos.play_uci("g1f3").unwrap();
    pos.play_uci("b8c6").unwrap();
    assert_eq!(pos.quiet_plies(), 2);
    pos.play_uci("e2e4").unwrap();
    assert_eq!(pos.quiet_plies(), 0);
    pos.play_uci("c6d4").unwrap();
    pos.play_uci("f3d4").unwrap();
    assert_eq!(pos.quiet_plies(), 0);
}

#[test]
fn snapshot_matches_piece_lookup() {
    let pos = Position::startpos();
    let snap = pos.snapshot();
    assert_eq!(snap.at(sq("e1")), Some((Color::White, Piece::King)));
    assert_eq!(snap.at(sq("d8")), Some((Color::Black, Piece::Queen)));
    assert_eq!(snap.at(sq("e4")), None);
    let occupied = snap.grid.iter().flatten().filter(|c| c.is_some()).count();
    assert_eq!(occupied, 32);
}

#[test]
fn invalid_fen_is_rejected() {
    assert!(Position::from_fen("not a fen").is_err());
}

#[test]
fn fen_clock_above_hundred_is_kept() {
    let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 149 80").expect("clock over 100 loads");
    assert_eq!(pos.quiet_plies(), 149);
    assert_eq!(pos.outcome(), None);
    pos.play_uci("a1a2").unwrap();
    assert_eq!(pos.quiet_plies(), 150);
    assert_eq!(pos.outcome().map(|o| o.termination), Some(Termination::SeventyFiveMoves));
}

#[test]
fn fifty_quiet_plies_from_a_hundred_ends_the_game() {
    let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3K2R w - - 100 60").unwrap();
    for ply in 0..50 {
        let last = ply == 49;
        let next = pos.legal_moves().into_iter().find_map(|mv| {
            if pos.board().colors(!pos.side_to_move()).has(mv.to) { return None; }
            let mut child = pos.clone();
            child.play(mv).ok()?;
            let termination = child.outcome().map(|o| o.termination);
            let fits = if last { termination == Some(Termination::SeventyFiveMoves) } else { termination.is_none() };
            (fits && child.repetitions() == 1).then_some(child)
        });
        pos = next.unwrap_or_else(|| panic!("no fresh quiet move at ply {ply}"));
    }
    assert_eq!(pos.ply(), 50);
    assert_eq!(pos.quiet_plies(), 150);
    assert_eq!(pos.outcome().map(|o| o.termination), Some(Termination::SeventyFiveMoves));
}

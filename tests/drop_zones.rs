use chess_lab::layout::{BoardLayout, DROP_RADIUS};

fn layout() -> BoardLayout { BoardLayout::new((0.0, 0.0), 100.0, false) }

fn name(sq: Option<cozy_chess::Square>) -> Option<String> { sq.map(|s| format!("{}", s)) }

#[test]
fn central_region_resolves_to_the_square() {
    let l = layout();
    // e2 spans x 400..500, y 600..700
    for &(x, y) in &[(450.0, 650.0), (440.0, 620.0), (487.5, 687.5), (412.5, 612.5)] {
        assert_eq!(name(l.drop_target(x, y)), Some("e2".to_string()), "({x}, {y})");
    }
}

#[test]
fn dead_zone_band_is_discarded() {
    let l = layout();
    let edge = 100.0 * (0.5 - DROP_RADIUS);
    for &(x, y) in &[(405.0, 650.0), (495.0, 650.0), (450.0, 601.0), (450.0, 699.0), (400.0 + edge - 1.0, 650.0)] {
        assert_eq!(l.drop_target(x, y), None, "({x}, {y})");
        assert_eq!(name(l.square_at(x, y)), Some("e2".to_string()));
    }
}

#[test]
fn off_board_is_discarded() {
    let l = layout();
    assert_eq!(l.drop_target(-1.0, 50.0), None);
    assert_eq!(l.drop_target(50.0, 800.0), None);
    assert_eq!(l.square_at(850.0, 10.0), None);
}

#[test]
fn origin_offset_and_flip() {
    let l = BoardLayout::new((20.0, 10.0), 50.0, true);
    assert_eq!(name(l.square_at(21.0, 11.0)), Some("h1".to_string()));
    assert_eq!(name(l.drop_target(20.0 + 25.0, 10.0 + 25.0)), Some("h1".to_string()));
    let sq = l.square_at(300.0, 300.0).unwrap();
    let (cx, cy) = l.square_center(sq);
    assert_eq!(l.drop_target(cx, cy), Some(sq));
}

#[test]
fn pieces_cover_eighty_percent_of_the_square() {
    let l = layout();
    let side = l.piece_side();
    assert!((side * side - 0.8 * 100.0 * 100.0).abs() < 1e-2);
    let sq = l.square_at(50.0, 50.0).unwrap();
    let (x, y, s) = l.piece_rect(sq);
    assert!((x + s / 2.0 - 50.0).abs() < 1e-4 && (y + s / 2.0 - 50.0).abs() < 1e-4);
}

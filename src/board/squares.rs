//! Square naming: algebraic names, (file, rank) indices and on-screen
//! (column, row) cells. Row 0 is the top of the screen.

use cozy_chess::{File, Rank, Square};

pub const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

pub fn square_at(file: usize, rank: usize) -> Option<Square> {
    if file >= 8 || rank >= 8 { return None; }
    Some(Square::new(File::index(file), Rank::index(rank)))
}

pub fn coordinates(sq: Square) -> (usize, usize) { (sq.file() as usize, sq.rank() as usize) }

/// `(0, 0)` is `"a1"`.
pub fn square_name(file: usize, rank: usize) -> Option<String> {
    if file >= 8 || rank >= 8 { return None; }
    Some(format!("{}{}", FILES[file], rank + 1))
}

pub fn parse_square_name(name: &str) -> Option<(usize, usize)> {
    let mut chars = name.trim().chars();
    let (f, r) = (chars.next()?, chars.next()?);
    if chars.next().is_some() { return None; }
    let file = FILES.iter().position(|&c| c == f.to_ascii_lowercase())?;
    let rank = r.to_digit(10)? as usize;
    if !(1..=8).contains(&rank) { return None; }
    Some((file, rank - 1))
}

/// Screen cell to square. Unflipped, White sits at the bottom: row 0 is rank 8.
pub fn cell_to_square(col: usize, row: usize, flipped: bool) -> Option<Square> {
    if col >= 8 || row >= 8 { return None; }
    if flipped { square_at(7 - col, row) } else { square_at(col, 7 - row) }
}

pub fn square_to_cell(sq: Square, flipped: bool) -> (usize, usize) {
    let (file, rank) = coordinates(sq);
    if flipped { (7 - file, rank) } else { (file, 7 - rank) }
}

/// Light squares are the ones where file and rank differ in parity; a1 is dark.
pub fn is_light(sq: Square) -> bool {
    let (file, rank) = coordinates(sq);
    (file + rank) % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_library_display() {
        for rank in 0..8 {
            for file in 0..8 {
                let sq = square_at(file, rank).unwrap();
                assert_eq!(square_name(file, rank).unwrap(), format!("{}", sq));
            }
        }
    }

    #[test]
    fn rejects_malformed_names() {
        assert_eq!(parse_square_name("i1"), None);
        assert_eq!(parse_square_name("a0"), None);
        assert_eq!(parse_square_name("a9"), None);
        assert_eq!(parse_square_name("a10"), None);
        assert_eq!(parse_square_name(""), None);
        assert_eq!(parse_square_name("E4"), Some((4, 3)));
    }
}

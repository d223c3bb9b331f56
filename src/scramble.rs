use std::str::FromStr;

use rand::random;

use crate::constants::{ALL_MOVES, N_MOVE};
use crate::cubie::CubieCube;
use crate::{error::Error, Move};

/// Parse a whitespace separated move string like "R U R' U'" or "R U R3 U3".
pub fn scramble_from_str(s: &str) -> Result<Vec<Move>, Error> {
    s.split_whitespace()
        .map(|word| Move::from_str(word.trim()))
        .collect()
}

/// Format a move sequence as a whitespace separated move string.
pub fn scramble_to_str(s: &[Move]) -> String {
    s.iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Apply the moves of a scramble string to a state.
pub fn scramble(cc: &CubieCube, s: &str) -> Result<CubieCube, Error> {
    let moves = scramble_from_str(s)?;
    Ok(cc.apply_moves(&moves))
}

/// Generate a random scramble of n moves.
///
/// Successive moves never turn the same face, and an A B A pattern on
/// opposite faces (like U D U) is rejected as well.
pub fn gen_scramble(n: usize) -> Vec<Move> {
    let mut moves: Vec<Move> = Vec::with_capacity(n);
    while moves.len() < n {
        let m = ALL_MOVES[random::<usize>() % N_MOVE];
        if let Some(&last) = moves.last() {
            if m.is_same_layer(last) {
                continue;
            }
            if moves.len() >= 2 {
                let prev = moves[moves.len() - 2];
                if m.is_inverse(last) && m.is_same_layer(prev) {
                    continue;
                }
            }
        }
        moves.push(m);
    }
    moves
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::moves::Move::*;

    #[test]
    fn test_scramble_from_str() {
        let m = vec![R, U, R3, U3, F, L3, D3, B2, R3, U3];
        assert_eq!(scramble_from_str("R U R' U' F L' D' B2 R' U'").unwrap(), m);
        assert_eq!(scramble_from_str("R U R3 U3 F L3 D3 B2 R3 U3").unwrap(), m);
        assert!(scramble_from_str("R U X").is_err());
    }

    #[test]
    fn test_scramble_to_str() {
        let m = vec![R, U, R3, U3, F, L3, D3, B2, R3, U3];
        assert_eq!(scramble_to_str(&m), "R U R3 U3 F L3 D3 B2 R3 U3");
        assert_eq!(scramble_from_str(&scramble_to_str(&m)).unwrap(), m);
    }

    #[test]
    fn test_scramble_applies_moves() {
        let cc = CubieCube::default();
        let scrambled = scramble(&cc, "U3 D2 R3 L2 F3").unwrap();
        assert_eq!(scrambled.get_twist(), 1749);
        assert_eq!(scrambled.get_flip(), 550);
    }

    #[test]
    fn test_gen_scramble() {
        for _ in 0..20 {
            let s = gen_scramble(25);
            assert_eq!(s.len(), 25);
            for w in s.windows(2) {
                assert!(!w[0].is_same_layer(w[1]));
            }
            for w in s.windows(3) {
                assert!(!(w[2].is_same_layer(w[0]) && w[2].is_inverse(w[1])));
            }
        }
    }
}

use std::path::Path;
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use self::Move::*;
use crate::constants::*;
use crate::cubie::{self, Corner::*, CubieCube, Edge::*};
use crate::error::Error;
use crate::facelet::Color;
use crate::{decode_table, write_table};

/// Layer moves: Up, Right, Front, Down, Left, Back.
///
/// $ clockwise, $2 double, $3 counter-clockwise.
#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Move {
    U, U2, U3,
    R, R2, R3,
    F, F2, F3,
    D, D2, D3,
    L, L2, L3,
    B, B2, B3,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R" => Ok(R),
            "R'" | "R3" => Ok(R3),
            "R2" => Ok(R2),
            "L" => Ok(L),
            "L'" | "L3" => Ok(L3),
            "L2" => Ok(L2),
            "U" => Ok(U),
            "U'" | "U3" => Ok(U3),
            "U2" => Ok(U2),
            "D" => Ok(D),
            "D'" | "D3" => Ok(D3),
            "D2" => Ok(D2),
            "F" => Ok(F),
            "F'" | "F3" => Ok(F3),
            "F2" => Ok(F2),
            "B" => Ok(B),
            "B'" | "B3" => Ok(B3),
            "B2" => Ok(B2),
            _ => Err(Error::InvalidScramble),
        }
    }
}

#[rustfmt::skip]
impl Move {
    /// True if the two moves turn opposite faces.
    pub fn is_inverse(&self, other: Move) -> bool {
        matches!(
            (&self, other),
            (U | U2 | U3, D | D2 | D3)
            | (R | R2 | R3, L | L2 | L3)
            | (F | F2 | F3, B | B2 | B3)
            | (D | D2 | D3, U | U2 | U3)
            | (L | L2 | L3, R | R2 | R3)
            | (B | B2 | B3, F | F2 | F3)
        )
    }

    /// True if the two moves turn the same face.
    pub fn is_same_layer(&self, other: Move) -> bool {
        matches!(
            (&self, other),
            (U | U2 | U3, U | U2 | U3)
            | (D | D2 | D3, D | D2 | D3)
            | (R | R2 | R3, R | R2 | R3)
            | (L | L2 | L3, L | L2 | L3)
            | (F | F2 | F3, F | F2 | F3)
            | (B | B2 | B3, B | B2 | B3)
        )
    }

    pub fn get_inverse(self) -> Self {
        match self {
            U => U3,
            U3 => U,
            D => D3,
            D3 => D,
            R => R3,
            R3 => R,
            L => L3,
            L3 => L,
            F => F3,
            F3 => F,
            B => B3,
            B3 => B,
            _ => self,
        }
    }
}

/// The basic six cube moves described by permutations and changes in orientation.
///
/// U_MOVE
pub const U_MOVE: CubieCube = CubieCube {
    cp: [UBR, URF, UFL, ULB, DFR, DLF, DBL, DRB],
    co: [0, 0, 0, 0, 0, 0, 0, 0],
    ep: [UB, UR, UF, UL, DR, DF, DL, DB, FR, FL, BL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// The basic six cube moves described by permutations and changes in orientation.
///
/// R_MOVE
pub const R_MOVE: CubieCube = CubieCube {
    cp: [DFR, UFL, ULB, URF, DRB, DLF, DBL, UBR], // permutation of the corners
    co: [2, 0, 0, 1, 1, 0, 0, 2],                 // changes of the orientations of the corners
    ep: [FR, UF, UL, UB, BR, DF, DL, DB, DR, FL, BL, UR], // permutation of the edges
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],     // changes of the orientations of the edges
};

/// The basic six cube moves described by permutations and changes in orientation.
///
/// F_MOVE
pub const F_MOVE: CubieCube = CubieCube {
    cp: [UFL, DLF, ULB, UBR, URF, DFR, DBL, DRB],
    co: [1, 2, 0, 0, 2, 1, 0, 0],
    ep: [UR, FL, UL, UB, DR, FR, DL, DB, UF, DF, BL, BR],
    eo: [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
};

/// The basic six cube moves described by permutations and changes in orientation.
///
/// D_MOVE
pub const D_MOVE: CubieCube = CubieCube {
    cp: [URF, UFL, ULB, UBR, DLF, DBL, DRB, DFR],
    co: [0, 0, 0, 0, 0, 0, 0, 0],
    ep: [UR, UF, UL, UB, DF, DL, DB, DR, FR, FL, BL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// The basic six cube moves described by permutations and changes in orientation.
///
/// L_MOVE
pub const L_MOVE: CubieCube = CubieCube {
    cp: [URF, ULB, DBL, UBR, DFR, UFL, DLF, DRB],
    co: [0, 1, 2, 0, 0, 2, 1, 0],
    ep: [UR, UF, BL, UB, DR, DF, FL, DB, FR, UL, DL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// The basic six cube moves described by permutations and changes in orientation.
///
/// B_MOVE
pub const B_MOVE: CubieCube = CubieCube {
    cp: [URF, UFL, UBR, DRB, DFR, DLF, ULB, DBL],
    co: [0, 0, 1, 2, 0, 0, 2, 1],
    ep: [UR, UF, UL, BR, DR, DF, DL, BL, FR, FL, UB, DB],
    eo: [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1],
};

/// The move tables: for each coordinate, the coordinate reached by applying
/// each of the 18 moves. Built once on the cubie level, cached on disk
/// afterwards.
pub struct MoveTables {
    pub twist_move: Vec<u16>,
    pub flip_move: Vec<u16>,
    pub slice_sorted_move: Vec<u16>,
    pub u_edges_move: Vec<u16>,
    pub d_edges_move: Vec<u16>,
    pub ud_edges_move: Vec<u16>,
    pub corners_move: Vec<u16>,
}

impl MoveTables {
    pub fn new(dir: &Path) -> Result<Self, Error> {
        Ok(Self {
            twist_move: move_twist(dir)?,
            flip_move: move_flip(dir)?,
            slice_sorted_move: move_slice_sorted(dir)?,
            u_edges_move: move_u_edges(dir)?,
            d_edges_move: move_d_edges(dir)?,
            ud_edges_move: move_ud_edges(dir)?,
            corners_move: move_corners(dir)?,
        })
    }
}

/// Move table for the twists of the corners.
///
/// The twist coordinate describes the 3^7 = 2187 possible orientations of the 8 corners.
///
/// 0 <= twist < 2187 in phase 1, twist = 0 in phase 2.
fn move_twist(dir: &Path) -> Result<Vec<u16>, Error> {
    let mut a = CubieCube::default();
    let bmc = cubie::basic_move_cubes();
    let fname = dir.join("move_twist");
    let table = std::fs::read(&fname).unwrap_or_default();
    let mut twist_move = vec![0; N_TWIST * N_MOVE];
    if table.is_empty() {
        println!("Creating move_twist table...");
        for i in 0..N_TWIST {
            a.set_twist(i as u16);
            for j in ALL_COLORS {
                // six faces U, R, F, D, L, B
                for k in 0..3 {
                    // three moves for each face, for example U, U2, U3 = U'
                    a.corner_multiply(bmc[j as usize]);
                    twist_move[N_MOVE * i + 3 * j as usize + k] = a.get_twist();
                }
                a.corner_multiply(bmc[j as usize]); // 4th move restores the face
            }
        }
        write_table(&fname, &twist_move)?;
    } else {
        twist_move = decode_table(&table)?;
    }
    Ok(twist_move)
}

/// Move table for the flip of the edges.
///
/// The flip coordinate describes the 2^11 = 2048 possible orientations of the 12 edges.
///
/// 0 <= flip < 2048 in phase 1, flip = 0 in phase 2.
fn move_flip(dir: &Path) -> Result<Vec<u16>, Error> {
    let mut a = CubieCube::default();
    let bmc = cubie::basic_move_cubes();
    let fname = dir.join("move_flip");
    let table = std::fs::read(&fname).unwrap_or_default();
    let mut flip_move = vec![0; N_FLIP * N_MOVE];
    if table.is_empty() {
        println!("Creating move_flip table...");
        for i in 0..N_FLIP {
            a.set_flip(i as u16);
            for j in ALL_COLORS {
                for k in 0..3 {
                    a.edge_multiply(bmc[j as usize]);
                    flip_move[N_MOVE * i + 3 * j as usize + k] = a.get_flip();
                }
                a.edge_multiply(bmc[j as usize]);
            }
        }
        write_table(&fname, &flip_move)?;
    } else {
        flip_move = decode_table(&table)?;
    }
    Ok(flip_move)
}

/// Move table for the four UD-slice edges FR, FL, BL and BR.
///
/// The slice_sorted coordinate describes the 12!/8! = 11880 possible positions
/// of the FR, FL, BL and BR edges. For phase 1 only the "unsorted" slice
/// coordinate with Binomial(12,4) = 495 positions is relevant, but using the
/// slice_sorted coordinate gives us the permutation of the FR, FL, BL and BR
/// edges at the beginning of phase 2 for free.
///
/// 0 <= slice_sorted < 11880 in phase 1, 0 <= slice_sorted < 24 in phase 2,
/// slice_sorted = 0 for a solved cube.
fn move_slice_sorted(dir: &Path) -> Result<Vec<u16>, Error> {
    let mut a = CubieCube::default();
    let bmc = cubie::basic_move_cubes();
    let fname = dir.join("move_slice_sorted");
    let table = std::fs::read(&fname).unwrap_or_default();
    let mut slice_move = vec![0; N_SLICE_SORTED * N_MOVE];
    if table.is_empty() {
        println!("Creating move_slice_sorted table...");
        for i in 0..N_SLICE_SORTED {
            a.set_slice_sorted(i as u16);
            for j in ALL_COLORS {
                for k in 0..3 {
                    a.edge_multiply(bmc[j as usize]);
                    slice_move[N_MOVE * i + 3 * j as usize + k] = a.get_slice_sorted();
                }
                a.edge_multiply(bmc[j as usize]);
            }
        }
        write_table(&fname, &slice_move)?;
    } else {
        slice_move = decode_table(&table)?;
    }
    Ok(slice_move)
}

/// Move table for the u_edges coordinate for the transition phase 1 -> phase 2.
///
/// The u_edges coordinate describes the 12!/8! = 11880 possible positions of
/// the UR, UF, UL and UB edges. It is needed at the end of phase 1 to set up
/// the coordinates of phase 2.
///
/// 0 <= u_edges < 11880 in phase 1, 0 <= u_edges < 1680 in phase 2,
/// u_edges = 1656 for a solved cube.
fn move_u_edges(dir: &Path) -> Result<Vec<u16>, Error> {
    let mut a = CubieCube::default();
    let bmc = cubie::basic_move_cubes();
    let fname = dir.join("move_u_edges");
    let table = std::fs::read(&fname).unwrap_or_default();
    let mut u_edges_move = vec![0; N_SLICE_SORTED * N_MOVE];
    if table.is_empty() {
        println!("Creating move_u_edges table...");
        for i in 0..N_SLICE_SORTED {
            a.set_u_edges(i as u16);
            for j in ALL_COLORS {
                for k in 0..3 {
                    a.edge_multiply(bmc[j as usize]);
                    u_edges_move[N_MOVE * i + 3 * j as usize + k] = a.get_u_edges();
                }
                a.edge_multiply(bmc[j as usize]);
            }
        }
        write_table(&fname, &u_edges_move)?;
    } else {
        u_edges_move = decode_table(&table)?;
    }
    Ok(u_edges_move)
}

/// Move table for the d_edges coordinate for the transition phase 1 -> phase 2.
///
/// The d_edges coordinate describes the 12!/8! = 11880 possible positions of
/// the DR, DF, DL and DB edges.
///
/// 0 <= d_edges < 11880 in phase 1, 0 <= d_edges < 1680 in phase 2,
/// d_edges = 0 for a solved cube.
fn move_d_edges(dir: &Path) -> Result<Vec<u16>, Error> {
    let mut a = CubieCube::default();
    let bmc = cubie::basic_move_cubes();
    let fname = dir.join("move_d_edges");
    let table = std::fs::read(&fname).unwrap_or_default();
    let mut d_edges_move = vec![0; N_SLICE_SORTED * N_MOVE];
    if table.is_empty() {
        println!("Creating move_d_edges table...");
        for i in 0..N_SLICE_SORTED {
            a.set_d_edges(i as u16);
            for j in ALL_COLORS {
                for k in 0..3 {
                    a.edge_multiply(bmc[j as usize]);
                    d_edges_move[N_MOVE * i + 3 * j as usize + k] = a.get_d_edges();
                }
                a.edge_multiply(bmc[j as usize]);
            }
        }
        write_table(&fname, &d_edges_move)?;
    } else {
        d_edges_move = decode_table(&table)?;
    }
    Ok(d_edges_move)
}

/// Move table for the edges in the U-face and D-face.
///
/// The ud_edges coordinate describes the 40320 permutations of the edges UR,
/// UF, UL, UB, DR, DF, DL and DB in phase 2. Entries for the quarter turns of
/// R, F, L and B are left at zero since these moves do not occur in phase 2.
///
/// ud_edges undefined in phase 1, 0 <= ud_edges < 40320 in phase 2,
/// ud_edges = 0 for a solved cube.
fn move_ud_edges(dir: &Path) -> Result<Vec<u16>, Error> {
    let mut a = CubieCube::default();
    let bmc = cubie::basic_move_cubes();
    let fname = dir.join("move_ud_edges");
    let table = std::fs::read(&fname).unwrap_or_default();
    let mut ud_edges_move = vec![0; N_UD_EDGES * N_MOVE];
    if table.is_empty() {
        println!("Creating move_ud_edges table...");
        for i in 0..N_UD_EDGES {
            a.set_ud_edges(i);
            for j in ALL_COLORS {
                for k in 0..3 {
                    a.edge_multiply(bmc[j as usize]);
                    // only R2, F2, L2 and B2 are phase 2 moves
                    if (j == Color::R || j == Color::F || j == Color::L || j == Color::B) && k != 1
                    {
                        continue;
                    }
                    ud_edges_move[N_MOVE * i + 3 * j as usize + k] = a.get_ud_edges();
                }
                a.edge_multiply(bmc[j as usize]);
            }
        }
        write_table(&fname, &ud_edges_move)?;
    } else {
        ud_edges_move = decode_table(&table)?;
    }
    Ok(ud_edges_move)
}

/// Move table for the corners coordinate in phase 2.
///
/// The corners coordinate describes the 8! = 40320 permutations of the corners.
///
/// 0 <= corners < 40320, corners = 0 for a solved cube.
fn move_corners(dir: &Path) -> Result<Vec<u16>, Error> {
    let mut a = CubieCube::default();
    let bmc = cubie::basic_move_cubes();
    let fname = dir.join("move_corners");
    let table = std::fs::read(&fname).unwrap_or_default();
    let mut corners_move = vec![0; N_CORNERS * N_MOVE];
    if table.is_empty() {
        println!("Creating move_corners table...");
        for i in 0..N_CORNERS {
            a.set_corners(i as u16);
            for j in ALL_COLORS {
                for k in 0..3 {
                    a.corner_multiply(bmc[j as usize]);
                    corners_move[N_MOVE * i + 3 * j as usize + k] = a.get_corners();
                }
                a.corner_multiply(bmc[j as usize]);
            }
        }
        write_table(&fname, &corners_move)?;
    } else {
        corners_move = decode_table(&table)?;
    }
    Ok(corners_move)
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use crate::moves::*;

    #[test]
    fn test_move_parsing() {
        assert_eq!("U'".parse::<Move>().unwrap(), U3);
        assert_eq!("U3".parse::<Move>().unwrap(), U3);
        assert_eq!("R2".parse::<Move>().unwrap(), R2);
        assert_eq!(U3.to_string(), "U3");
        assert_eq!(R.to_string(), "R");
        assert!("X2".parse::<Move>().is_err());
    }

    #[test]
    fn test_move_twist() {
        let move_twist = move_twist(Path::new("tables")).unwrap();
        assert_eq!(move_twist.len(), 39366);
        assert_eq!(move_twist[39365], 1995);
        assert_eq!(move_twist[3936], 142);
        assert_eq!(move_twist[393], 158);
        assert_eq!(move_twist[39], 1505);
        assert_eq!(move_twist[3], 1494);
    }

    #[test]
    fn test_move_flip() {
        let move_flip = move_flip(Path::new("tables")).unwrap();
        assert_eq!(move_flip.len(), 36864);
        assert_eq!(move_flip[36863], 1910);
        assert_eq!(move_flip[3686], 204);
        assert_eq!(move_flip[368], 54);
        assert_eq!(move_flip[36], 2);
        assert_eq!(move_flip[3], 0);
    }

    #[test]
    fn test_move_slice_sorted() {
        let move_slice = move_slice_sorted(Path::new("tables")).unwrap();
        assert_eq!(move_slice.len(), 213840);
        assert_eq!(move_slice[213839], 11687);
        assert_eq!(move_slice[21383], 2849);
        assert_eq!(move_slice[2138], 3490);
        assert_eq!(move_slice[213], 1914);
        assert_eq!(move_slice[2], 0);
    }

    #[test]
    fn test_move_u_edges() {
        let move_u_edges = move_u_edges(Path::new("tables")).unwrap();
        assert_eq!(move_u_edges.len(), 213840);
        assert_eq!(move_u_edges[213839], 10967);
        assert_eq!(move_u_edges[21383], 1187);
        assert_eq!(move_u_edges[2138], 5260);
        assert_eq!(move_u_edges[213], 1769);
        assert_eq!(move_u_edges[21], 7921);
    }

    #[test]
    fn test_move_d_edges() {
        let move_d_edges = move_d_edges(Path::new("tables")).unwrap();
        assert_eq!(move_d_edges.len(), 213840);
        assert_eq!(move_d_edges[213839], 10967);
        assert_eq!(move_d_edges[21383], 1187);
        assert_eq!(move_d_edges[2138], 5260);
        assert_eq!(move_d_edges[213], 1769);
        assert_eq!(move_d_edges[21], 7921);
    }

    #[test]
    fn test_move_ud_edges() {
        let move_ud_edges = move_ud_edges(Path::new("tables")).unwrap();
        assert_eq!(move_ud_edges.len(), 725760);
        assert_eq!(move_ud_edges[725759], 0);
        assert_eq!(move_ud_edges[72], 10);
        assert_eq!(move_ud_edges[7], 313);
    }

    #[test]
    fn test_move_corners() {
        let move_corners = move_corners(Path::new("tables")).unwrap();
        assert_eq!(move_corners.len(), 725760);
        assert_eq!(move_corners[725759], 16668);
        assert_eq!(move_corners[7275], 27211);
        assert_eq!(move_corners[725], 22323);
        assert_eq!(move_corners[72], 10);
        assert_eq!(move_corners[7], 157);
    }

    #[test]
    fn test_move_table_matches_cubie_product() {
        use crate::cubie::CubieCube;
        let mv = MoveTables::new(Path::new("tables")).unwrap();
        let cc = CubieCube::from(&vec![R, U2, F3, L, D]);
        for (mi, m) in ALL_MOVES.iter().enumerate() {
            let cc1 = cc.apply_move(*m);
            assert_eq!(
                cc1.get_twist(),
                mv.twist_move[N_MOVE * cc.get_twist() as usize + mi]
            );
            assert_eq!(
                cc1.get_flip(),
                mv.flip_move[N_MOVE * cc.get_flip() as usize + mi]
            );
            assert_eq!(
                cc1.get_slice_sorted(),
                mv.slice_sorted_move[N_MOVE * cc.get_slice_sorted() as usize + mi]
            );
            assert_eq!(
                cc1.get_u_edges(),
                mv.u_edges_move[N_MOVE * cc.get_u_edges() as usize + mi]
            );
            assert_eq!(
                cc1.get_d_edges(),
                mv.d_edges_move[N_MOVE * cc.get_d_edges() as usize + mi]
            );
            assert_eq!(
                cc1.get_corners(),
                mv.corners_move[N_MOVE * cc.get_corners() as usize + mi]
            );
        }
    }
}

use rand::random;
use std::fmt;
use std::ops::Mul;

use self::{Corner::*, Edge::*};
use crate::constants::*;
use crate::error::Error;
use crate::facelet::{Color, FaceCube, CORNER_COLOR, CORNER_FACELET, EDGE_COLOR, EDGE_FACELET};
use crate::moves::{Move, B_MOVE, D_MOVE, F_MOVE, L_MOVE, R_MOVE, U_MOVE};

/// Represents the 8 corners on the cube, described by the layers they touch.
///
/// Example: `ULB` (Up, Left, Back).
#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Eq, Hash)]
pub enum Corner {
    URF, UFL, ULB, UBR, DFR, DLF, DBL, DRB,
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl TryFrom<u8> for Corner {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(URF),
            1 => Ok(UFL),
            2 => Ok(ULB),
            3 => Ok(UBR),
            4 => Ok(DFR),
            5 => Ok(DLF),
            6 => Ok(DBL),
            7 => Ok(DRB),
            _ => Err(Error::UnknownCorner),
        }
    }
}

/// Represents the 12 edges on the cube, described by the layers they touch.
///
/// Example: `BL` (Back, Left).
#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Eq, Hash)]
pub enum Edge {
    UR, UF, UL, UB, DR, DF, DL, DB, FR, FL, BL, BR,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl TryFrom<u8> for Edge {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(UR),
            1 => Ok(UF),
            2 => Ok(UL),
            3 => Ok(UB),
            4 => Ok(DR),
            5 => Ok(DF),
            6 => Ok(DL),
            7 => Ok(DB),
            8 => Ok(FR),
            9 => Ok(FL),
            10 => Ok(BL),
            11 => Ok(BR),
            _ => Err(Error::UnknownEdge),
        }
    }
}

/// Cube on the cubie level.
///
/// A state is a permutation of the 8 corners and 12 edges together with their
/// orientations, i.e. an element of the cubie group. The group product is
/// `multiply`, the 18 face turns are the distinguished elements defined in
/// [`crate::moves`].
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct CubieCube {
    /// Corner permutation, relative to SOLVED_CUBIE_CUBE.
    pub cp: [Corner; 8],
    /// Corner orientation: 0 (oriented), 1 (twisted clockwise), 2 (twisted
    /// counter-clockwise). The values 3..5 encode the same twists of a
    /// mirrored cube and only occur in symmetry cubes.
    pub co: [u8; 8],
    /// Edge permutation, relative to SOLVED_CUBIE_CUBE.
    pub ep: [Edge; 12],
    /// Edge orientation, 0 (oriented) or 1 (flipped).
    pub eo: [u8; 12],
}

/// Solved cube on the cubie level.
pub const SOLVED_CUBIE_CUBE: CubieCube = CubieCube {
    cp: [URF, UFL, ULB, UBR, DFR, DLF, DBL, DRB],
    co: [0, 0, 0, 0, 0, 0, 0, 0],
    ep: [UR, UF, UL, UB, DR, DF, DL, DB, FR, FL, BL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

impl Default for CubieCube {
    fn default() -> Self {
        SOLVED_CUBIE_CUBE
    }
}

impl Mul for CubieCube {
    type Output = Self;

    fn mul(self, rhs: CubieCube) -> Self::Output {
        let mut res = self;
        res.multiply(rhs);
        res
    }
}

impl fmt::Display for CubieCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = String::new();
        for i in 0..8 {
            s.push_str(&format!("({},{})", self.cp[i], self.co[i]));
        }
        for i in 0..12 {
            s.push_str(&format!("({},{})", self.ep[i], self.eo[i]));
        }
        write!(f, "{s}")
    }
}

impl From<&Vec<Move>> for CubieCube {
    fn from(moves: &Vec<Move>) -> Self {
        CubieCube::default().apply_moves(moves)
    }
}

/// Gives the cubie representation of a face cube.
impl TryFrom<&FaceCube> for CubieCube {
    type Error = Error;
    fn try_from(face_cube: &FaceCube) -> Result<Self, Self::Error> {
        let mut state = CubieCube::default();

        for i in 0..8 {
            let fac = CORNER_FACELET[i];
            // get the colors of the cubie at corner i, starting with U/D
            let mut ori = 0;
            while ori < 3 {
                let col = face_cube.f[fac[ori] as usize];
                if col == Color::U || col == Color::D {
                    break;
                }
                ori += 1;
            }
            if ori == 3 {
                return Err(Error::UnknownCorner);
            }

            let col1 = face_cube.f[fac[(ori + 1) % 3] as usize];
            let col2 = face_cube.f[fac[(ori + 2) % 3] as usize];

            let j = (0..8)
                .find(|&j| col1 == CORNER_COLOR[j][1] && col2 == CORNER_COLOR[j][2])
                .ok_or(Error::UnknownCorner)?;
            // in corner position i we have corner cubie j
            state.cp[i] = ALL_CORNERS[j];
            state.co[i] = ori as u8 % 3;
        }

        for i in 0..12 {
            let fac = EDGE_FACELET[i];
            let col0 = face_cube.f[fac[0] as usize];
            let col1 = face_cube.f[fac[1] as usize];
            let mut matched = false;
            for j in 0..12 {
                if col0 == EDGE_COLOR[j][0] && col1 == EDGE_COLOR[j][1] {
                    state.ep[i] = ALL_EDGES[j];
                    state.eo[i] = 0;
                    matched = true;
                    break;
                }
                if col0 == EDGE_COLOR[j][1] && col1 == EDGE_COLOR[j][0] {
                    state.ep[i] = ALL_EDGES[j];
                    state.eo[i] = 1;
                    matched = true;
                    break;
                }
            }
            if !matched {
                return Err(Error::UnknownEdge);
            }
        }

        state.verify()?;
        Ok(state)
    }
}

impl CubieCube {
    /// Applies a move to the current state.
    pub fn apply_move(self, m: Move) -> Self {
        use Move::*;
        let move_state = match m {
            U => U_MOVE,
            U2 => U_MOVE * U_MOVE,
            U3 => U_MOVE * U_MOVE * U_MOVE,
            R => R_MOVE,
            R2 => R_MOVE * R_MOVE,
            R3 => R_MOVE * R_MOVE * R_MOVE,
            F => F_MOVE,
            F2 => F_MOVE * F_MOVE,
            F3 => F_MOVE * F_MOVE * F_MOVE,
            D => D_MOVE,
            D2 => D_MOVE * D_MOVE,
            D3 => D_MOVE * D_MOVE * D_MOVE,
            L => L_MOVE,
            L2 => L_MOVE * L_MOVE,
            L3 => L_MOVE * L_MOVE * L_MOVE,
            B => B_MOVE,
            B2 => B_MOVE * B_MOVE,
            B3 => B_MOVE * B_MOVE * B_MOVE,
        };
        self * move_state
    }

    /// Applies a sequence of moves to the current state.
    pub fn apply_moves(&self, moves: &[Move]) -> Self {
        moves.iter().fold(*self, |acc, &m| acc.apply_move(m))
    }

    /// Multiply this cubie cube with another cubie cube b, restricted to the corners.
    ///
    /// The orientations compose through `combine_corner_ori`, which also
    /// covers the reflected values 3..5 of the symmetry cubes.
    pub fn corner_multiply(&mut self, b: CubieCube) {
        let mut cp = [URF; 8];
        let mut co = [0; 8];
        for i in 0..8 {
            let piece = b.cp[i] as usize;
            cp[i] = self.cp[piece];
            co[i] = combine_corner_ori(self.co[piece], b.co[i]);
        }
        self.cp = cp;
        self.co = co;
    }

    /// Multiply this cubie cube with another cubie cube b, restricted to the edges.
    pub fn edge_multiply(&mut self, b: CubieCube) {
        let mut ep = [UR; 12];
        let mut eo = [0; 12];
        for i in 0..12 {
            let piece = b.ep[i] as usize;
            ep[i] = self.ep[piece];
            eo[i] = (self.eo[piece] + b.eo[i]) & 1;
        }
        self.ep = ep;
        self.eo = eo;
    }

    /// Multiply this cubie cube with another cubie cube b.
    pub fn multiply(&mut self, b: CubieCube) {
        self.corner_multiply(b);
        self.edge_multiply(b);
    }

    /// Return the inverse of this cubie cube.
    pub fn inverse_cubie_cube(&self) -> Self {
        let mut d = CubieCube::default();
        for ei in ALL_EDGES {
            let e = ei as usize;
            d.ep[self.ep[e] as usize] = ei;
        }
        for ei in ALL_EDGES {
            let e = ei as usize;
            d.eo[e] = self.eo[d.ep[e] as usize];
        }

        for ci in ALL_CORNERS {
            let c = ci as usize;
            d.cp[self.cp[c] as usize] = ci;
        }
        for ci in ALL_CORNERS {
            let c = ci as usize;
            let ori = self.co[d.cp[c] as usize];
            if ori >= 3 {
                // mirrored orientations are their own inverse
                d.co[c] = ori;
            } else {
                d.co[c] = 3 - ori;
                if d.co[c] == 3 {
                    d.co[c] = 0;
                }
            }
        }
        d
    }

    /// Give the parity of the corner permutation.
    pub fn corner_parity(&self) -> bool {
        let mut s = 0;
        for i in ((URF as usize + 1)..=(DRB as usize)).rev() {
            for j in ((URF as usize)..i).rev() {
                if self.cp[j] > self.cp[i] {
                    s += 1;
                }
            }
        }
        (s % 2) == 0
    }

    /// Give the parity of the edge permutation. A solvable cube has the same
    /// corner and edge parity.
    pub fn edge_parity(&self) -> bool {
        let mut s = 0;
        for i in ((UR as usize + 1)..=(BR as usize)).rev() {
            for j in ((UR as usize)..i).rev() {
                if self.ep[j] > self.ep[i] {
                    s += 1;
                }
            }
        }
        (s % 2) == 0
    }

    /// Check that this state is a legal cube, reporting the first violated
    /// invariant.
    pub fn verify(&self) -> Result<(), Error> {
        let mut corner_count = [0; 8];
        for c in self.cp {
            corner_count[c as usize] += 1;
        }
        if corner_count.iter().any(|&c| c != 1) {
            return Err(Error::UnknownCorner);
        }
        let mut edge_count = [0; 12];
        for e in self.ep {
            edge_count[e as usize] += 1;
        }
        if edge_count.iter().any(|&c| c != 1) {
            return Err(Error::UnknownEdge);
        }
        if self.co.iter().map(|&c| c as u32).sum::<u32>() % 3 != 0 {
            return Err(Error::CornerOriSum);
        }
        if self.eo.iter().map(|&e| e as u32).sum::<u32>() % 2 != 0 {
            return Err(Error::EdgeOriSum);
        }
        if self.corner_parity() != self.edge_parity() {
            return Err(Error::ParityMismatch);
        }
        Ok(())
    }

    /// Checks if this state is a legal cube.
    pub fn is_solvable(&self) -> bool {
        self.verify().is_ok()
    }

    /// Get the twist of the 8 corners. 0 <= twist < 2187 in phase 1, twist = 0 in phase 2.
    pub fn get_twist(&self) -> u16 {
        let mut twist = 0;
        for i in (URF as usize)..(DRB as usize) {
            twist = 3 * twist + self.co[i] as u16;
        }
        twist
    }

    /// Set the twist of the 8 corners; the orientation of the last corner
    /// follows from the other seven.
    pub fn set_twist(&mut self, twist: u16) {
        let mut twistparity = 0;
        let mut twist = twist;
        for i in ((URF as usize)..(DRB as usize)).rev() {
            self.co[i] = (twist % 3) as u8;
            twistparity += self.co[i];
            twist /= 3;
        }
        self.co[DRB as usize] = (3 - twistparity % 3) % 3;
    }

    /// Get the flip of the 12 edges. 0 <= flip < 2048 in phase 1, flip = 0 in phase 2.
    pub fn get_flip(&self) -> u16 {
        let mut flip = 0;
        for i in (UR as usize)..(BR as usize) {
            flip = 2 * flip + self.eo[i] as u16;
        }
        flip
    }

    /// Set the flip of the 12 edges; the orientation of the last edge follows
    /// from the other eleven.
    pub fn set_flip(&mut self, flip: u16) {
        let mut flipparity = 0;
        let mut flip = flip;
        for i in ((UR as usize)..(BR as usize)).rev() {
            self.eo[i] = (flip % 2) as u8;
            flipparity += self.eo[i];
            flip /= 2;
        }
        self.eo[BR as usize] = (2 - flipparity % 2) % 2;
    }

    /// Get the location of the UD-slice edges FR, FL, BL and BR ignoring their
    /// permutation.
    ///
    /// 0 <= slice < 495 in phase 1, slice = 0 in phase 2.
    pub fn get_slice(&self) -> u16 {
        let mut a = 0;
        let mut x = 0;
        for j in ((UR as usize)..=(BR as usize)).rev() {
            if FR <= self.ep[j] && self.ep[j] <= BR {
                a += c_nk((11 - j) as u32, x + 1);
                x += 1;
            }
        }
        a as u16
    }

    /// Set the location of the UD-slice edges FR, FL, BL and BR ignoring their
    /// permutation.
    pub fn set_slice(&mut self, idx: u16) {
        let slice_edge = [FR, FL, BL, BR];
        let other_edge = [UR, UF, UL, UB, DR, DF, DL, DB];
        let mut a = idx;
        let mut ep = [-1; 12];

        let mut x: i32 = 4; // set slice edges
        for j in 0..12 {
            if a >= c_nk(11 - j as u32, x as u32) as u16 {
                self.ep[j] = slice_edge[(4 - x) as usize];
                ep[j] = slice_edge[(4 - x) as usize] as i32;
                a -= c_nk(11 - j as u32, x as u32) as u16;
                x -= 1;
            }
        }
        let mut x = 0; // set the remaining edges UR..DB
        for j in 0..12 {
            if ep[j] == -1 {
                self.ep[j] = other_edge[x];
                x += 1;
            }
        }
    }

    /// Get the permutation and location of the UD-slice edges FR, FL, BL and BR.
    ///
    /// 0 <= slice_sorted < 11880 in phase 1, 0 <= slice_sorted < 24 in phase 2,
    /// slice_sorted = 0 for a solved cube.
    pub fn get_slice_sorted(&self) -> u16 {
        let mut a = 0;
        let mut x = 0;
        let mut edge4 = [FR; 4];
        for j in ((UR as usize)..=(BR as usize)).rev() {
            if FR <= self.ep[j] && self.ep[j] <= BR {
                a += c_nk((11 - j) as u32, x as u32 + 1);
                edge4[3 - x] = self.ep[j];
                x += 1;
            }
        }
        let mut b = 0;
        for j in (1..4).rev() {
            let mut k = 0;
            while edge4[j] as usize != j + 8 {
                rotate_left(&mut edge4, 0, j);
                k += 1;
            }
            b = (j as u32 + 1) * b + k;
        }
        (24 * a + b) as u16
    }

    /// Set the permutation and location of the UD-slice edges FR, FL, BL and BR.
    pub fn set_slice_sorted(&mut self, idx: u16) {
        let mut slice_edge = [FR, FL, BL, BR];
        let other_edge = [UR, UF, UL, UB, DR, DF, DL, DB];
        let mut b = idx % N_PERM_4 as u16;
        let mut a = idx / N_PERM_4 as u16;
        let mut ep = [-1; 12];

        for j in 1..4 {
            // generate permutation of the slice edges from index b
            let mut k = b % (j as u16 + 1);
            b /= j as u16 + 1;
            while k > 0 {
                rotate_right(&mut slice_edge, 0, j);
                k -= 1;
            }
        }
        let mut x: i32 = 4; // set slice edges
        for j in 0..12 {
            if a >= c_nk(11 - j as u32, x as u32) as u16 {
                self.ep[j] = slice_edge[(4 - x) as usize];
                ep[j] = slice_edge[(4 - x) as usize] as i32;
                a -= c_nk(11 - j as u32, x as u32) as u16;
                x -= 1;
            }
        }
        let mut x = 0; // set the remaining edges UR..DB
        for j in 0..12 {
            if ep[j] == -1 {
                self.ep[j] = other_edge[x];
                x += 1;
            }
        }
    }

    /// Get the permutation and location of the edges UR, UF, UL and UB.
    ///
    /// 0 <= u_edges < 11880 in phase 1, 0 <= u_edges < 1680 in phase 2,
    /// u_edges = 1656 for a solved cube.
    pub fn get_u_edges(&self) -> u16 {
        let mut a = 0;
        let mut x = 0;
        let mut edge4 = [UR; 4];
        let mut ep_mod = self.ep;
        for _ in 0..4 {
            rotate_right(&mut ep_mod, 0, 11);
        }
        for j in ((UR as usize)..=(BR as usize)).rev() {
            if UR <= ep_mod[j] && ep_mod[j] <= UB {
                a += c_nk((11 - j) as u32, x as u32 + 1);
                edge4[3 - x] = ep_mod[j];
                x += 1;
            }
        }
        let mut b = 0;
        for j in (1..4).rev() {
            let mut k = 0;
            while edge4[j] as usize != j {
                rotate_left(&mut edge4, 0, j);
                k += 1;
            }
            b = (j as u32 + 1) * b + k;
        }
        (24 * a + b) as u16
    }

    /// Set the permutation and location of the edges UR, UF, UL and UB.
    pub fn set_u_edges(&mut self, idx: u16) {
        let mut slice_edge = [UR, UF, UL, UB];
        let other_edge = [DR, DF, DL, DB, FR, FL, BL, BR];
        let mut b = idx % N_PERM_4 as u16;
        let mut a = idx / N_PERM_4 as u16;
        let mut ep = [-1; 12];

        for j in 1..4 {
            let mut k = b % (j as u16 + 1);
            b /= j as u16 + 1;
            while k > 0 {
                rotate_right(&mut slice_edge, 0, j);
                k -= 1;
            }
        }
        let mut x: i32 = 4;
        for j in 0..12 {
            if a >= c_nk(11 - j as u32, x as u32) as u16 {
                self.ep[j] = slice_edge[(4 - x) as usize];
                ep[j] = slice_edge[(4 - x) as usize] as i32;
                a -= c_nk(11 - j as u32, x as u32) as u16;
                x -= 1;
            }
        }
        let mut x = 0;
        for j in 0..12 {
            if ep[j] == -1 {
                self.ep[j] = other_edge[x];
                x += 1;
            }
        }
        for _ in 0..4 {
            rotate_left(&mut self.ep, 0, 11);
        }
    }

    /// Get the permutation and location of the edges DR, DF, DL and DB.
    ///
    /// 0 <= d_edges < 11880 in phase 1, 0 <= d_edges < 1680 in phase 2,
    /// d_edges = 0 for a solved cube.
    pub fn get_d_edges(&self) -> u16 {
        let mut a = 0;
        let mut x = 0;
        let mut edge4 = [DR; 4];
        let mut ep_mod = self.ep;
        for _ in 0..4 {
            rotate_right(&mut ep_mod, 0, 11);
        }
        for j in ((UR as usize)..=(BR as usize)).rev() {
            if DR <= ep_mod[j] && ep_mod[j] <= DB {
                a += c_nk((11 - j) as u32, x as u32 + 1);
                edge4[3 - x] = ep_mod[j];
                x += 1;
            }
        }
        let mut b = 0;
        for j in (1..4).rev() {
            let mut k = 0;
            while edge4[j] as usize != j + 4 {
                rotate_left(&mut edge4, 0, j);
                k += 1;
            }
            b = (j as u32 + 1) * b + k;
        }
        (24 * a + b) as u16
    }

    /// Set the permutation and location of the edges DR, DF, DL and DB.
    pub fn set_d_edges(&mut self, idx: u16) {
        let mut slice_edge = [DR, DF, DL, DB];
        let other_edge = [FR, FL, BL, BR, UR, UF, UL, UB];
        let mut b = idx % N_PERM_4 as u16;
        let mut a = idx / N_PERM_4 as u16;
        let mut ep = [-1; 12];

        for j in 1..4 {
            let mut k = b % (j as u16 + 1);
            b /= j as u16 + 1;
            while k > 0 {
                rotate_right(&mut slice_edge, 0, j);
                k -= 1;
            }
        }
        let mut x: i32 = 4;
        for j in 0..12 {
            if a >= c_nk(11 - j as u32, x as u32) as u16 {
                self.ep[j] = slice_edge[(4 - x) as usize];
                ep[j] = slice_edge[(4 - x) as usize] as i32;
                a -= c_nk(11 - j as u32, x as u32) as u16;
                x -= 1;
            }
        }
        let mut x = 0;
        for j in 0..12 {
            if ep[j] == -1 {
                self.ep[j] = other_edge[x];
                x += 1;
            }
        }
        for _ in 0..4 {
            rotate_left(&mut self.ep, 0, 11);
        }
    }

    /// Get the permutation of the 8 corners.
    ///
    /// 0 <= corners < 40320, corners = 0 for a solved cube.
    pub fn get_corners(&self) -> u16 {
        let mut perm = self.cp;
        let mut b = 0;
        for j in ((URF as usize + 1)..=(DRB as usize)).rev() {
            let mut k = 0;
            while perm[j] as usize != j {
                rotate_left(&mut perm, 0, j);
                k += 1;
            }
            b = (j as u16 + 1) * b + k;
        }
        b
    }

    /// Set the permutation of the 8 corners.
    pub fn set_corners(&mut self, idx: u16) {
        self.cp = ALL_CORNERS;
        let mut idx = idx;
        for j in ALL_CORNERS {
            let mut k = idx % (j as u16 + 1);
            idx /= j as u16 + 1;
            while k > 0 {
                rotate_right(&mut self.cp, 0, j as usize);
                k -= 1;
            }
        }
    }

    /// Get the permutation of the 8 U and D edges.
    ///
    /// Undefined if the 4 UD-slice edges are not in the UD-slice; callers
    /// check `get_slice_sorted() < 24` first.
    pub fn get_ud_edges(&self) -> u16 {
        let mut perm = [UR; 8];
        perm.copy_from_slice(&self.ep[0..8]);
        let mut b = 0;
        for j in ((UR as usize + 1)..=(DB as usize)).rev() {
            let mut k = 0;
            while perm[j] as usize != j {
                rotate_left(&mut perm, 0, j);
                k += 1;
            }
            b = (j as u16 + 1) * b + k;
        }
        b
    }

    /// Set the permutation of the 8 U and D edges. The positions of the FR,
    /// FL, BL and BR edges are not affected.
    pub fn set_ud_edges(&mut self, idx: usize) {
        let mut idx = idx;
        for (i, e) in ALL_EDGES[0..8].iter().enumerate() {
            self.ep[i] = *e;
        }
        for j in 0..8 {
            let mut k = idx % (j + 1);
            idx /= j + 1;
            while k > 0 {
                rotate_right(&mut self.ep, 0, j);
                k -= 1;
            }
        }
    }

    /// Generate a uniformly distributed random legal cube state.
    pub fn randomize(&mut self) {
        // The permutation of the 12 edges. 0 <= idx < 12!.
        let mut idx = random::<usize>() % 479001600;
        for j in ALL_EDGES {
            let mut k = idx % (j as usize + 1);
            idx /= j as usize + 1;
            while k > 0 {
                rotate_right(&mut self.ep, 0, j as usize);
                k -= 1;
            }
        }
        let p = self.edge_parity();
        loop {
            self.set_corners(random::<u16>() % 40320); // 8!
            if p == self.corner_parity() {
                // parities of edge and corner permutations must be the same
                break;
            }
        }
        self.set_flip(random::<u16>() % 2048); // 2^11
        self.set_twist(random::<u16>() % 2187); // 3^7
    }
}

/// Compose two corner orientations.
///
/// Values 0..2 are the twists of a regular cube, 3..5 the twists of a
/// reflected one. A reflection reverses the sense of a twist, so a reflected
/// left operand subtracts the incoming twist instead of adding it, and the
/// result is reflected exactly when one of the operands is. Plain addition
/// mod 3 would produce wrong symmetry tables.
fn combine_corner_ori(a: u8, b: u8) -> u8 {
    let (twist_a, mirr_a) = if a < 3 { (a, false) } else { (a - 3, true) };
    let (twist_b, mirr_b) = if b < 3 { (b, false) } else { (b - 3, true) };
    let twist = if mirr_a {
        (3 + twist_a - twist_b) % 3
    } else {
        (twist_a + twist_b) % 3
    };
    match mirr_a == mirr_b {
        true => twist,
        false => twist + 3,
    }
}

/// The six basic face-turn cubes in the face order U, R, F, D, L, B.
pub fn basic_move_cubes() -> [CubieCube; 6] {
    [U_MOVE, R_MOVE, F_MOVE, D_MOVE, L_MOVE, B_MOVE]
}

/// Shift arr[left..=right] one place towards the back; the last element
/// wraps around to position left.
pub fn rotate_right<T: Copy>(arr: &mut [T], left: usize, right: usize) {
    let last = arr[right];
    arr.copy_within(left..right, left + 1);
    arr[left] = last;
}

/// Shift arr[left..=right] one place towards the front; the first element
/// wraps around to position right.
pub fn rotate_left<T: Copy>(arr: &mut [T], left: usize, right: usize) {
    let first = arr[left];
    arr.copy_within(left + 1..=right, left);
    arr[right] = first;
}

/// Binomial coefficient [n choose k].
pub fn c_nk(n: u32, k: u32) -> u32 {
    let mut k = k;
    if n < k {
        return 0;
    }
    if k > n / 2 {
        k = n - k;
    }
    let mut s: u64 = 1;
    let mut i = n as u64;
    let mut j = 1;
    while i != (n - k) as u64 {
        s *= i;
        s /= j;
        i -= 1;
        j += 1;
    }
    s as u32
}

#[cfg(test)]
mod test {
    use crate::cubie::*;
    use crate::moves::Move::*;

    #[test]
    fn test_four_turns_are_identity() {
        for m in [U, R, F, D, L, B] {
            let mut cc = CubieCube::default();
            for _ in 0..4 {
                cc = cc.apply_move(m);
            }
            assert_eq!(cc, SOLVED_CUBIE_CUBE, "{m} applied four times");
        }
        for m in [U2, R2, F2, D2, L2, B2] {
            let cc = CubieCube::default().apply_move(m).apply_move(m);
            assert_eq!(cc, SOLVED_CUBIE_CUBE, "{m} applied twice");
        }
    }

    #[test]
    fn test_mult() {
        let state = CubieCube::default().apply_move(R);
        assert_eq!(state, R_MOVE);

        let r2_state = CubieCube::default().apply_move(R).apply_move(R);
        assert_eq!(r2_state, R_MOVE * R_MOVE);

        let fr_state = CubieCube {
            cp: [URF, DLF, ULB, UFL, DRB, DFR, DBL, UBR],
            co: [1, 2, 0, 2, 1, 1, 0, 2],
            ep: [UF, FL, UL, UB, BR, FR, DL, DB, DR, DF, BL, UR],
            eo: [1, 1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0],
        };
        assert_eq!(F_MOVE * R_MOVE, fr_state);
    }

    #[test]
    fn test_inverse() {
        let state = CubieCube {
            cp: [DLF, ULB, DBL, DRB, UBR, UFL, DFR, URF],
            co: [2, 1, 2, 1, 2, 2, 0, 2],
            ep: [BR, BL, UB, UR, DR, FR, FL, UF, DF, DL, DB, UL],
            eo: [1, 0, 1, 0, 0, 1, 0, 0, 1, 1, 0, 1],
        };
        let ic = state.inverse_cubie_cube();
        let d = CubieCube {
            cp: [DRB, DLF, UFL, DFR, DBL, URF, ULB, UBR],
            co: [1, 1, 2, 1, 0, 1, 1, 2],
            ep: [UB, DB, BR, UL, DR, FR, FL, BL, DF, DL, UF, UR],
            eo: [0, 0, 1, 1, 0, 1, 1, 0, 1, 0, 0, 1],
        };
        assert_eq!(ic, d);
        assert_eq!(ic.inverse_cubie_cube(), state);

        let mut id = state;
        id.multiply(ic);
        assert_eq!(id, SOLVED_CUBIE_CUBE);
    }

    #[test]
    fn test_mirrored_orientation_algebra() {
        // reflecting a twist twice restores it
        for a in 0..3u8 {
            let reflected = combine_corner_ori(a, 3);
            assert!(reflected >= 3);
            assert_eq!(combine_corner_ori(reflected, 3), a);
        }
        // the LR reflection is an involution on the corner level
        use crate::symmetries::MIRR_LR2;
        let mut cc = MIRR_LR2;
        cc.corner_multiply(MIRR_LR2);
        assert_eq!(cc.cp, SOLVED_CUBIE_CUBE.cp);
        assert_eq!(cc.co, SOLVED_CUBIE_CUBE.co);
    }

    #[test]
    fn test_parity() {
        let state = CubieCube::default();
        assert!(state.corner_parity());
        assert!(state.edge_parity());

        let state = CubieCube::from(&vec![R, U, R3, U3, R3, F, R, F3]);
        assert!(state.corner_parity());
        assert!(state.edge_parity());

        let state = CubieCube::default().apply_move(R);
        assert_eq!(state.corner_parity(), state.edge_parity());
    }

    #[test]
    fn test_scramble() {
        // U F' D' F2 D B2 D' R2 U' F2 R2 D2 R2 U' L B L R F' D B'
        let scramble = vec![
            U, F3, D3, F2, D, B2, D3, R2, U3, F2, R2, D2, R2, U3, L, B, L, R, F3, D, B3,
        ];
        let state = CubieCube::default().apply_moves(&scramble);

        let expected = CubieCube {
            cp: [DFR, UBR, DLF, ULB, DRB, UFL, URF, DBL],
            co: [2, 0, 1, 2, 0, 0, 2, 2],
            ep: [DF, UB, FL, BL, BR, UL, DR, FR, DL, DB, UF, UR],
            eo: [1, 1, 0, 1, 1, 0, 1, 0, 1, 1, 0, 1],
        };
        assert_eq!(state, expected);
    }

    #[test]
    fn test_verify() {
        assert!(CubieCube::default().verify().is_ok());

        let mut cc = CubieCube::default();
        cc.co[0] = 1;
        assert!(matches!(cc.verify(), Err(Error::CornerOriSum)));

        let mut cc = CubieCube::default();
        cc.eo[0] = 1;
        assert!(matches!(cc.verify(), Err(Error::EdgeOriSum)));

        let mut cc = CubieCube::default();
        cc.cp.swap(0, 1); // two corners exchanged, edges untouched
        assert!(matches!(cc.verify(), Err(Error::ParityMismatch)));

        let mut cc = CubieCube::default();
        cc.ep[0] = UF; // UF occurs twice
        assert!(matches!(cc.verify(), Err(Error::UnknownEdge)));
    }

    #[test]
    fn test_coord_roundtrips() {
        let mut cc = CubieCube::default();
        for twist in [0, 1, 999, 2186] {
            cc.set_twist(twist);
            assert_eq!(cc.get_twist(), twist);
            assert!(cc.co.iter().map(|&c| c as u32).sum::<u32>() % 3 == 0);
        }
        for flip in [0, 1, 1023, 2047] {
            cc.set_flip(flip);
            assert_eq!(cc.get_flip(), flip);
            assert!(cc.eo.iter().map(|&e| e as u32).sum::<u32>() % 2 == 0);
        }
        let mut cc = CubieCube::default();
        for slice in [0, 1, 247, 494] {
            cc.set_slice(slice);
            assert_eq!(cc.get_slice(), slice);
        }
        let mut cc = CubieCube::default();
        for idx in [0, 1, 5939, 11879] {
            cc.set_slice_sorted(idx);
            assert_eq!(cc.get_slice_sorted(), idx);
        }
        let mut cc = CubieCube::default();
        for idx in [0, 1, 1656, 5939, 11879] {
            cc.set_u_edges(idx);
            assert_eq!(cc.get_u_edges(), idx);
        }
        let mut cc = CubieCube::default();
        for idx in [0, 1, 5939, 11879] {
            cc.set_d_edges(idx);
            assert_eq!(cc.get_d_edges(), idx);
        }
        let mut cc = CubieCube::default();
        for idx in [0, 1, 20159, 40319] {
            cc.set_corners(idx);
            assert_eq!(cc.get_corners(), idx);
        }
        let mut cc = CubieCube::default();
        for idx in [0, 1, 20159, 40319] {
            cc.set_ud_edges(idx);
            assert_eq!(cc.get_ud_edges(), idx as u16);
        }
    }

    #[test]
    fn test_solved_coords() {
        let cc = CubieCube::default();
        assert_eq!(cc.get_twist(), 0);
        assert_eq!(cc.get_flip(), 0);
        assert_eq!(cc.get_slice(), 0);
        assert_eq!(cc.get_slice_sorted(), 0);
        assert_eq!(cc.get_u_edges(), 1656);
        assert_eq!(cc.get_d_edges(), 0);
        assert_eq!(cc.get_corners(), 0);
        assert_eq!(cc.get_ud_edges(), 0);
    }

    #[test]
    fn test_scramble_coords() {
        // seed vector for the coordinate layer
        let cc = CubieCube::from(&vec![U3, D2, R3, L2, F3]);
        assert_eq!(cc.get_twist(), 1749);
        assert_eq!(cc.get_flip(), 550);
        assert_eq!(cc.get_slice_sorted(), 9155);
        assert_eq!(cc.get_u_edges(), 5691);
        assert_eq!(cc.get_d_edges(), 9512);
        assert_eq!(cc.get_corners(), 19131);
    }

    #[test]
    fn test_randomize() {
        let mut cc = CubieCube::default();
        for _ in 0..10 {
            cc.randomize();
            assert!(cc.verify().is_ok());
        }
    }

    #[test]
    fn test_c_nk() {
        assert_eq!(c_nk(12, 4), 495);
        assert_eq!(c_nk(11, 4), 330);
        assert_eq!(c_nk(8, 4), 70);
        assert_eq!(c_nk(3, 4), 0);
        assert_eq!(c_nk(11, 0), 1);
    }
}

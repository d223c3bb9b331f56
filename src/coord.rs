use std::fmt;
use std::path::Path;

use crate::constants::*;
use crate::cubie::{CubieCube, Edge::*};
use crate::error::Error;
use crate::moves::{Move, MoveTables};
use crate::symmetries::SymmetriesTables;
use crate::{decode_table, write_table};

/// Represent a cube on the coordinate level.
///
/// In phase 1 a state is uniquely determined by the three coordinates flip,
/// twist and slice = slice_sorted / 24.
///
/// In phase 2 a state is uniquely determined by the three coordinates
/// corners, ud_edges and slice_sorted % 24.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct CoordCube {
    pub twist: u16,        // twist of corners
    pub flip: u16,         // flip of edges
    pub slice_sorted: u16, // position of FR, FL, BL, BR edges. The phase 1 slice coordinate is slice_sorted / 24
    pub u_edges: u16,      // valid in phase 1 (<11880) and phase 2 (<1680). 1656 for a solved cube
    pub d_edges: u16,      // valid in phase 1 (<11880) and phase 2 (<1680)
    pub corners: u16,      // corner permutation, valid in phase 1 and phase 2
    pub ud_edges: u16,     // permutation of the ud-edges, defined only in phase 2. 65535 else
    pub flipslice_classidx: u16, // symmetry reduced flipslice coordinate used in phase 1
    pub flipslice_sym: u8,
    pub flipslice_rep: u32,
    pub corner_classidx: u16, // symmetry reduced corner permutation coordinate used in phase 2
    pub corner_sym: u8,
    pub corner_rep: u16,
}

impl Default for CoordCube {
    fn default() -> Self {
        Self {
            twist: 0,
            flip: 0,
            slice_sorted: 0,
            u_edges: 1656,
            d_edges: 0,
            corners: 0,
            ud_edges: 0,
            flipslice_classidx: 0,
            flipslice_sym: 0,
            flipslice_rep: 0,
            corner_classidx: 0,
            corner_sym: 0,
            corner_rep: 0,
        }
    }
}

impl fmt::Display for CoordCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(twist: {}, flip: {}, slice: {}, U-edges: {}, D-edges: {}, E-edges: {}, Corners: {}, UD-Edges: {})",
            self.twist, self.flip, self.slice_sorted / 24, self.u_edges, self.d_edges,
            self.slice_sorted, self.corners, self.ud_edges)
    }
}

impl CoordCube {
    /// Build a CoordCube from a CubieCube.
    ///
    /// The symmetry tables are needed to derive the symmetry-reduced
    /// flipslice and corner class coordinates.
    pub fn from_cubie(cc: &CubieCube, sy: &SymmetriesTables) -> Result<Self, Error> {
        if !cc.is_solvable() {
            return Err(Error::Unsolvable);
        }

        let twist = cc.get_twist();
        let flip = cc.get_flip();
        let slice_sorted = cc.get_slice_sorted();
        let u_edges = cc.get_u_edges();
        let d_edges = cc.get_d_edges();
        let corners = cc.get_corners();
        let ud_edges = if slice_sorted < N_PERM_4 as u16 {
            // phase 2 cube
            cc.get_ud_edges()
        } else {
            65535 // invalid
        };

        let flipslice = N_FLIP * (slice_sorted as usize / N_PERM_4) + flip as usize;
        let flipslice_classidx = sy.flipslice_classidx[flipslice];
        let flipslice_sym = sy.flipslice_sym[flipslice];
        let flipslice_rep = sy.flipslice_rep[flipslice_classidx as usize];
        let corner_classidx = sy.corner_classidx[corners as usize];
        let corner_sym = sy.corner_sym[corners as usize];
        let corner_rep = sy.corner_rep[corner_classidx as usize];

        Ok(Self {
            twist,
            flip,
            slice_sorted,
            u_edges,
            d_edges,
            corners,
            ud_edges,
            flipslice_classidx,
            flipslice_sym,
            flipslice_rep,
            corner_classidx,
            corner_sym,
            corner_rep,
        })
    }

    /// Update the phase 1 coordinates when a move is applied.
    pub fn phase1_move(&mut self, m: Move, mv: &MoveTables, sy: &SymmetriesTables) {
        self.twist = mv.twist_move[N_MOVE * self.twist as usize + m as usize];
        self.flip = mv.flip_move[N_MOVE * self.flip as usize + m as usize];
        self.slice_sorted = mv.slice_sorted_move[N_MOVE * self.slice_sorted as usize + m as usize];
        // u_edges and d_edges are carried along so the initial phase 2
        // ud_edges can be merged cheaply once phase 1 is finished
        self.u_edges = mv.u_edges_move[N_MOVE * self.u_edges as usize + m as usize];
        self.d_edges = mv.d_edges_move[N_MOVE * self.d_edges as usize + m as usize];
        self.corners = mv.corners_move[N_MOVE * self.corners as usize + m as usize];

        let flipslice = N_FLIP * (self.slice_sorted as usize / N_PERM_4) + self.flip as usize;
        self.flipslice_classidx = sy.flipslice_classidx[flipslice];
        self.flipslice_sym = sy.flipslice_sym[flipslice];
        self.flipslice_rep = sy.flipslice_rep[self.flipslice_classidx as usize];
        self.corner_classidx = sy.corner_classidx[self.corners as usize];
        self.corner_sym = sy.corner_sym[self.corners as usize];
        self.corner_rep = sy.corner_rep[self.corner_classidx as usize];
    }

    /// Update the phase 2 coordinates when a phase 2 move is applied.
    ///
    /// The ud_edges coordinate must be defined; a cube that is not yet in the
    /// phase 2 subgroup keeps the invalid marker.
    pub fn phase2_move(&mut self, m: Move, mv: &MoveTables) {
        self.slice_sorted = mv.slice_sorted_move[N_MOVE * self.slice_sorted as usize + m as usize];
        self.corners = mv.corners_move[N_MOVE * self.corners as usize + m as usize];
        if self.ud_edges != 65535 {
            self.ud_edges = mv.ud_edges_move[N_MOVE * self.ud_edges as usize + m as usize];
        }
    }
}

/// EdgeMergeTables stores the initial phase 2 ud_edges coordinate derived
/// from the u_edges and d_edges coordinates.
pub struct EdgeMergeTables {
    pub upd_ud_edges: Vec<u16>,
}

impl EdgeMergeTables {
    pub fn new(dir: &Path) -> Result<Self, Error> {
        Ok(Self {
            upd_ud_edges: create_phase2_edgemerge_table(dir)?,
        })
    }
}

/// phase2_edgemerge retrieves the initial phase 2 ud_edges coordinate from
/// the u_edges and d_edges coordinates.
fn create_phase2_edgemerge_table(dir: &Path) -> Result<Vec<u16>, Error> {
    let fname = dir.join("phase2_edgemerge");
    let mut u_edges_plus_d_edges_to_ud_edges = vec![0; N_U_EDGES_PHASE2 * N_PERM_4];
    let mut c_u = CubieCube::default();
    let mut c_d = CubieCube::default();
    let mut c_ud = CubieCube::default();
    let edge_u = [UR, UF, UL, UB];
    let edge_d = [DR, DF, DL, DB];
    let edge_ud = [UR, UF, UL, UB, DR, DF, DL, DB];

    let table = std::fs::read(&fname).unwrap_or_default();
    if table.is_empty() {
        println!("Creating phase2_edgemerge table...");
        for i in 0..N_U_EDGES_PHASE2 {
            c_u.set_u_edges(i as u16);
            for j in 0..N_CHOOSE_8_4 {
                c_d.set_d_edges((j * N_PERM_4) as u16);
                let mut invalid = false;
                for ei in edge_ud {
                    let e = ei as usize;
                    let mut merged = false;
                    if edge_u.contains(&c_u.ep[e]) {
                        c_ud.ep[e] = c_u.ep[e];
                        merged = true;
                    }
                    if edge_d.contains(&c_d.ep[e]) {
                        c_ud.ep[e] = c_d.ep[e];
                        merged = true;
                    }
                    if !merged {
                        invalid = true; // edge collision
                        break;
                    }
                }
                if !invalid {
                    for k in 0..N_PERM_4 {
                        c_d.set_d_edges((j * N_PERM_4 + k) as u16);
                        for ei in edge_ud {
                            let e = ei as usize;
                            if edge_u.contains(&c_u.ep[e]) {
                                c_ud.ep[e] = c_u.ep[e];
                            }
                            if edge_d.contains(&c_d.ep[e]) {
                                c_ud.ep[e] = c_d.ep[e];
                            }
                        }
                        u_edges_plus_d_edges_to_ud_edges[N_PERM_4 * i + k] = c_ud.get_ud_edges();
                    }
                }
            }
        }
        write_table(&fname, &u_edges_plus_d_edges_to_ud_edges)?;
    } else {
        u_edges_plus_d_edges_to_ud_edges = decode_table(&table)?;
    }
    Ok(u_edges_plus_d_edges_to_ud_edges)
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use crate::coord::*;
    use crate::cubie::CubieCube;
    use crate::facelet::FaceCube;
    use crate::moves::Move::*;

    #[test]
    fn test_coordcube() {
        let sy = SymmetriesTables::new(Path::new("tables")).unwrap();
        let mv = MoveTables::new(Path::new("tables")).unwrap();
        let fc =
            FaceCube::try_from("RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF").unwrap();
        let cc = CubieCube::try_from(&fc).unwrap();
        let mut cdc = CoordCube::from_cubie(&cc, &sy).unwrap();
        assert_eq!(cdc.twist, 149);
        assert_eq!(cdc.flip, 1514);
        assert_eq!(cdc.slice_sorted, 1701);
        assert_eq!(cdc.u_edges, 407);
        assert_eq!(cdc.d_edges, 9068);
        assert_eq!(cdc.ud_edges, 65535);
        assert_eq!(cdc.corners, 3935);
        assert_eq!(cdc.flipslice_classidx, 1940);
        assert_eq!(cdc.flipslice_sym, 9);
        assert_eq!(cdc.flipslice_rep, 3802);
        assert_eq!(cdc.corner_classidx, 716);
        assert_eq!(cdc.corner_sym, 7);
        assert_eq!(cdc.corner_rep, 1260);

        cdc.phase1_move(U2, &mv, &sy);
        let cc2 = cc.apply_move(U2);
        let cdc2 = CoordCube::from_cubie(&cc2, &sy).unwrap();
        assert_eq!(cdc, cdc2);
    }

    #[test]
    fn test_phase2_move() {
        let sy = SymmetriesTables::new(Path::new("tables")).unwrap();
        let mv = MoveTables::new(Path::new("tables")).unwrap();
        // a phase 2 subgroup state: only phase 2 moves applied
        let cc = CubieCube::from(&vec![U, R2, D3, L2, F2]);
        let mut cdc = CoordCube::from_cubie(&cc, &sy).unwrap();
        assert_ne!(cdc.ud_edges, 65535);

        cdc.phase2_move(R2, &mv);
        let cc2 = cc.apply_move(R2);
        let cdc2 = CoordCube::from_cubie(&cc2, &sy).unwrap();
        assert_eq!(cdc.slice_sorted, cdc2.slice_sorted);
        assert_eq!(cdc.corners, cdc2.corners);
        assert_eq!(cdc.ud_edges, cdc2.ud_edges);
    }

    #[test]
    fn test_create_phase2_edgemerge_table() {
        let ud_edges = create_phase2_edgemerge_table(Path::new("tables")).unwrap();
        assert_eq!(ud_edges.len(), 40320);
        assert_eq!(ud_edges[4], 24504);
        assert_eq!(ud_edges[40], 11521);
        assert_eq!(ud_edges[403], 15256);
        assert_eq!(ud_edges[4031], 23963);
        assert_eq!(ud_edges[40319], 39767);
    }
}

use std::path::Path;

use crate::constants::*;
use crate::cubie::CubieCube;
use crate::error::Error;
use crate::moves::MoveTables;
use crate::symmetries::SymmetriesTables;
use crate::{decode_table, write_table};

/// The pruning tables cut the search tree during the search.
///
/// The pruning values are stored modulo 3 in 2 bits per entry, 16 entries per
/// 32-bit word; the absolute depth is recovered during the search with the
/// `distance` array. The 2-bit value 3 marks an entry that is not filled
/// (phase 2 leaves everything of depth >= 11 unfilled).
pub struct PruningTables {
    pub flipslice_twist_depth3: Vec<u32>,
    pub corners_ud_edges_depth3: Vec<u32>,
    pub cornslice_depth: Vec<u16>,
    /// distance[3 * old_depth + new_depth_mod3] is the new absolute depth.
    ///
    /// We need this array because the pruning tables only store the depths
    /// mod 3.
    pub distance: Vec<u16>,
}

impl Default for PruningTables {
    fn default() -> Self {
        let mut distance = vec![0; 60];
        for i in 0..20 {
            for j in 0..3 {
                distance[3 * i + j] = ((i / 3) * 3 + j) as u16;
                if i % 3 == 2 && j == 0 {
                    distance[3 * i + j] += 3;
                } else if i % 3 == 0 && j == 2 && distance[3 * i + j] >= 3 {
                    distance[3 * i + j] -= 3;
                }
            }
        }
        Self {
            flipslice_twist_depth3: vec![0xffffffff; N_FLIPSLICE_CLASS * N_TWIST / 16 + 1],
            corners_ud_edges_depth3: vec![0xffffffff; N_CORNERS_CLASS * N_UD_EDGES / 16],
            cornslice_depth: vec![65535; N_CORNERS * N_PERM_4],
            distance,
        }
    }
}

impl PruningTables {
    /// get_flipslice_twist_depth3(ix) is *exactly* the number of moves % 3 to
    /// solve phase 1 of a cube with index ix.
    pub fn get_flipslice_twist_depth3(&self, ix: usize) -> u32 {
        let mut y = self.flipslice_twist_depth3[ix / 16];
        y >>= (ix % 16) * 2;
        y & 3
    }

    /// get_corners_ud_edges_depth3(ix) is *at least* the number of moves % 3
    /// to solve phase 2 of a cube with index ix.
    pub fn get_corners_ud_edges_depth3(&self, ix: usize) -> u32 {
        let mut y = self.corners_ud_edges_depth3[ix / 16];
        y >>= (ix % 16) * 2;
        y & 3
    }

    pub fn set_flipslice_twist_depth3(&mut self, ix: usize, value: u32) {
        let shift = (ix % 16) * 2;
        let base = ix >> 4;
        self.flipslice_twist_depth3[base] &= !(3 << shift);
        self.flipslice_twist_depth3[base] |= value << shift;
    }

    pub fn set_corners_ud_edges_depth3(&mut self, ix: usize, value: u32) {
        let shift = (ix % 16) * 2;
        let base = ix >> 4;
        self.corners_ud_edges_depth3[base] &= !(3 << shift);
        self.corners_ud_edges_depth3[base] |= value << shift;
    }

    /// Create/load the flipslice_twist_depth3 pruning table for phase 1.
    ///
    /// The depth is the distance of the symmetry-reduced (flipslice, twist)
    /// pair from the phase 2 subgroup, taken over all 18 moves. The forward
    /// frontier outgrows the unfilled set around depth 9, so the fill
    /// switches to a backward sweep there.
    pub fn create_phase1_prun_table(
        &mut self,
        sy: &SymmetriesTables,
        mv: &MoveTables,
        dir: &Path,
    ) -> Result<(), Error> {
        let total = N_FLIPSLICE_CLASS * N_TWIST;
        let fname = dir.join("phase1_prun");
        let table = std::fs::read(&fname).unwrap_or_default();

        if !table.is_empty() {
            self.flipslice_twist_depth3 = decode_table(&table)?;
            return Ok(());
        }

        println!("Creating phase1_prun table...");
        println!("This may take a few minutes, depending on the hardware.");

        // the self-symmetries of each flipslice class; a new table entry must
        // also be stored for every further representation of its class
        let mut cc = CubieCube::default();
        let mut fs_sym = vec![0u16; N_FLIPSLICE_CLASS];
        for i in 0..N_FLIPSLICE_CLASS {
            let rep = sy.flipslice_rep[i] as usize;
            cc.set_slice((rep / N_FLIP) as u16);
            cc.set_flip((rep % N_FLIP) as u16);

            for s in 0..N_SYM_D4H {
                let mut ss = sy.sc[s];
                ss.edge_multiply(cc); // s * cc
                ss.edge_multiply(sy.sc[sy.inv_idx[s] as usize]); // s * cc * s^-1
                if ss.get_slice() as usize == rep / N_FLIP && ss.get_flip() as usize == rep % N_FLIP
                {
                    fs_sym[i] |= 1 << s;
                }
            }
        }

        let fs_classidx = 0; // value for solved phase 1
        let twist = 0;
        self.set_flipslice_twist_depth3(N_TWIST * fs_classidx + twist, 0);
        let mut done = 1;
        let mut depth = 0u32;
        let mut backsearch = false;
        println!("depth: {} done: {}/{}", depth, done, total);

        while done != total {
            let depth3 = depth % 3;
            if depth == 9 {
                // backwards search is faster for depth >= 9
                println!("flipping to backwards search...");
                backsearch = true;
            }
            let mut idx = 0;
            for fs_classidx in 0..N_FLIPSLICE_CLASS {
                let mut twist = 0;
                while twist < N_TWIST {
                    // skip completely empty words, this is the usual case
                    // early in the forward fill
                    if !backsearch
                        && idx % 16 == 0
                        && self.flipslice_twist_depth3[idx / 16] == 0xffffffff
                        && twist < N_TWIST - 16
                    {
                        twist += 16;
                        idx += 16;
                        continue;
                    }

                    let mat = match backsearch {
                        true => self.get_flipslice_twist_depth3(idx) == 3,
                        false => self.get_flipslice_twist_depth3(idx) == depth3,
                    };

                    if mat {
                        let flipslice = sy.flipslice_rep[fs_classidx] as usize;
                        let flip = flipslice % N_FLIP;
                        let slice_ = flipslice / N_FLIP;

                        for m in ALL_MOVES {
                            let twist1 = mv.twist_move[N_MOVE * twist + m as usize] as usize;
                            let flip1 = mv.flip_move[N_MOVE * flip + m as usize] as usize;
                            let slice1 = mv.slice_sorted_move
                                [N_MOVE * N_PERM_4 * slice_ + m as usize]
                                as usize
                                / N_PERM_4;
                            let flipslice1 = (slice1 << 11) + flip1;
                            let fs1_classidx = sy.flipslice_classidx[flipslice1] as usize;
                            let fs1_sym = sy.flipslice_sym[flipslice1] as usize;
                            let twist1 = sy.twist_conj[(twist1 << 4) + fs1_sym] as usize;
                            let idx1 = N_TWIST * fs1_classidx + twist1;
                            if !backsearch {
                                if self.get_flipslice_twist_depth3(idx1) == 3 {
                                    // entry not yet filled
                                    self.set_flipslice_twist_depth3(idx1, (depth + 1) % 3);
                                    done += 1;
                                    // a symmetric class has more than one representation
                                    let mut sym = fs_sym[fs1_classidx];
                                    if sym != 1 {
                                        for k in 1..N_SYM_D4H {
                                            sym >>= 1;
                                            if sym % 2 == 1 {
                                                let twist2 =
                                                    sy.twist_conj[(twist1 << 4) + k] as usize;
                                                // fs2_classidx = fs1_classidx due to symmetry
                                                let idx2 = N_TWIST * fs1_classidx + twist2;
                                                if self.get_flipslice_twist_depth3(idx2) == 3 {
                                                    self.set_flipslice_twist_depth3(
                                                        idx2,
                                                        (depth + 1) % 3,
                                                    );
                                                    done += 1;
                                                }
                                            }
                                        }
                                    }
                                }
                            } else {
                                // backwards search: fill the open entry from
                                // any neighbour at the current depth
                                if self.get_flipslice_twist_depth3(idx1) == depth3 {
                                    self.set_flipslice_twist_depth3(idx, (depth + 1) % 3);
                                    done += 1;
                                    break;
                                }
                            }
                        }
                    }
                    twist += 1;
                    idx += 1; // idx = N_TWIST * fs_classidx + twist
                }
            }
            depth += 1;
            println!("depth: {} done: {}/{}", depth, done, total);
        }
        write_table(&fname, &self.flipslice_twist_depth3)?;
        Ok(())
    }

    /// Create/load the corners_ud_edges_depth3 pruning table for phase 2.
    ///
    /// The table is only filled to depth 10; unfilled entries read as 3 and
    /// stand for a depth of at least 11.
    pub fn create_phase2_prun_table(
        &mut self,
        sy: &SymmetriesTables,
        mv: &MoveTables,
        dir: &Path,
    ) -> Result<(), Error> {
        let total = N_CORNERS_CLASS * N_UD_EDGES;
        let fname = dir.join("phase2_prun");
        let table = std::fs::read(&fname).unwrap_or_default();

        if !table.is_empty() {
            self.corners_ud_edges_depth3 = decode_table(&table)?;
            return Ok(());
        }

        println!("Creating phase2_prun table...");

        // the self-symmetries of each corner permutation class
        let mut cc = CubieCube::default();
        let mut c_sym = vec![0u16; N_CORNERS_CLASS];
        for i in 0..N_CORNERS_CLASS {
            let rep = sy.corner_rep[i];
            cc.set_corners(rep);
            for s in 0..N_SYM_D4H {
                let mut ss = sy.sc[s];
                ss.corner_multiply(cc); // s * cc
                ss.corner_multiply(sy.sc[sy.inv_idx[s] as usize]); // s * cc * s^-1
                if ss.get_corners() == rep {
                    c_sym[i] |= 1 << s;
                }
            }
        }

        let c_classidx = 0; // value for solved phase 2
        let ud_edge = 0;
        self.set_corners_ud_edges_depth3(N_UD_EDGES * c_classidx + ud_edge, 0);
        let mut done = 1;
        let mut depth = 0u32;
        println!("depth: {} done: {}/{}", depth, done, total);

        while depth < 10 {
            // fill the table only to depth 9 + 1
            let depth3 = depth % 3;
            let mut idx = 0;
            for c_classidx in 0..N_CORNERS_CLASS {
                let mut ud_edge = 0;
                while ud_edge < N_UD_EDGES {
                    // skip completely empty words
                    if idx % 16 == 0
                        && self.corners_ud_edges_depth3[idx / 16] == 0xffffffff
                        && ud_edge < N_UD_EDGES - 16
                    {
                        ud_edge += 16;
                        idx += 16;
                        continue;
                    }

                    if self.get_corners_ud_edges_depth3(idx) == depth3 {
                        let corner = sy.corner_rep[c_classidx] as usize;
                        for m in PHASE2_MOVES {
                            let ud_edge1 = mv.ud_edges_move[N_MOVE * ud_edge + m as usize] as usize;
                            let corner1 = mv.corners_move[N_MOVE * corner + m as usize] as usize;
                            let c1_classidx = sy.corner_classidx[corner1] as usize;
                            let c1_sym = sy.corner_sym[corner1] as usize;
                            let ud_edge1 = sy.ud_edges_conj[(ud_edge1 << 4) + c1_sym] as usize;
                            let idx1 = N_UD_EDGES * c1_classidx + ud_edge1;
                            if self.get_corners_ud_edges_depth3(idx1) == 3 {
                                // entry not yet filled
                                self.set_corners_ud_edges_depth3(idx1, (depth + 1) % 3);
                                done += 1;
                                // a symmetric class has more than one representation
                                let mut sym = c_sym[c1_classidx];
                                if sym != 1 {
                                    for k in 1..N_SYM_D4H {
                                        sym >>= 1;
                                        if sym % 2 == 1 {
                                            let ud_edge2 =
                                                sy.ud_edges_conj[(ud_edge1 << 4) + k] as usize;
                                            // c1_classidx does not change
                                            let idx2 = N_UD_EDGES * c1_classidx + ud_edge2;
                                            if self.get_corners_ud_edges_depth3(idx2) == 3 {
                                                self.set_corners_ud_edges_depth3(
                                                    idx2,
                                                    (depth + 1) % 3,
                                                );
                                                done += 1;
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    ud_edge += 1;
                    idx += 1; // idx = N_UD_EDGES * c_classidx + ud_edge
                }
            }
            depth += 1;
            println!("depth: {} done: {}/{}", depth, done, total);
        }
        println!("remaining unfilled entries have depth >= 11");
        write_table(&fname, &self.corners_ud_edges_depth3)?;
        Ok(())
    }

    /// Create/load the cornslice_depth pruning table for phase 2.
    ///
    /// The exact distance of (corners, slice_sorted) from solved within the
    /// phase 2 moves; used as a fast precheck at the beginning of phase 2 and
    /// as a second admissible bound during the phase 2 search.
    pub fn create_phase2_cornsliceprun_table(
        &mut self,
        mv: &MoveTables,
        dir: &Path,
    ) -> Result<(), Error> {
        let fname = dir.join("phase2_cornsliceprun");
        let table = std::fs::read(&fname).unwrap_or_default();

        if !table.is_empty() {
            self.cornslice_depth = decode_table(&table)?;
            return Ok(());
        }

        println!("Creating phase2_cornsliceprun table...");
        let corners = 0; // values for solved phase 2
        let slice_ = 0;
        self.cornslice_depth[N_PERM_4 * corners + slice_] = 0;
        let mut done = 1;
        let mut depth = 0;
        while done != N_CORNERS * N_PERM_4 {
            for corners in 0..N_CORNERS {
                for slice_ in 0..N_PERM_4 {
                    if self.cornslice_depth[N_PERM_4 * corners + slice_] == depth {
                        for m in PHASE2_MOVES {
                            let corners1 = mv.corners_move[N_MOVE * corners + m as usize] as usize;
                            let slice_1 =
                                mv.slice_sorted_move[N_MOVE * slice_ + m as usize] as usize;
                            let idx1 = N_PERM_4 * corners1 + slice_1;
                            if self.cornslice_depth[idx1] == 65535 {
                                // entry not yet filled
                                self.cornslice_depth[idx1] = depth + 1;
                                done += 1;
                            }
                        }
                    }
                }
            }
            depth += 1;
        }
        write_table(&fname, &self.cornslice_depth)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::pruning::*;

    #[test]
    fn test_distance_decode() {
        let pr = PruningTables::default();
        // at depth 0 a neighbour with mod3 = 1 is at depth 1
        assert_eq!(pr.distance[3 * 0 + 1], 1);
        // going down: depth 7, neighbour mod3 = 0 -> depth 6
        assert_eq!(pr.distance[3 * 7 + 0], 6);
        // going up: depth 8, neighbour mod3 = 0 -> depth 9
        assert_eq!(pr.distance[3 * 8 + 0], 9);
        for d in 1..19usize {
            // a neighbour differs by at most one move
            for j in 0..3usize {
                let nd = pr.distance[3 * d + j] as i32;
                assert!((nd - d as i32).abs() <= 1);
            }
        }
    }

    #[test]
    fn test_bitpacking() {
        let mut pr = PruningTables::default();
        assert_eq!(pr.get_flipslice_twist_depth3(137), 3);
        pr.set_flipslice_twist_depth3(137, 2);
        assert_eq!(pr.get_flipslice_twist_depth3(137), 2);
        assert_eq!(pr.get_flipslice_twist_depth3(136), 3);
        assert_eq!(pr.get_flipslice_twist_depth3(138), 3);
        pr.set_flipslice_twist_depth3(137, 0);
        assert_eq!(pr.get_flipslice_twist_depth3(137), 0);

        pr.set_corners_ud_edges_depth3(0, 1);
        assert_eq!(pr.get_corners_ud_edges_depth3(0), 1);
        assert_eq!(pr.get_corners_ud_edges_depth3(1), 3);
    }

    #[test]
    fn test_cornslice_depth() {
        use crate::moves::MoveTables;
        use std::path::Path;
        let mv = MoveTables::new(Path::new("tables")).unwrap();
        let mut pr = PruningTables::default();
        pr.create_phase2_cornsliceprun_table(&mv, Path::new("tables"))
            .unwrap();
        assert_eq!(pr.cornslice_depth.len(), 967680);
        // solved state has depth 0, everything is filled
        assert_eq!(pr.cornslice_depth[0], 0);
        assert!(pr.cornslice_depth.iter().all(|&d| d != 65535));
        // applying a phase 2 move changes the depth by at most one
        for corners in (0..N_CORNERS).step_by(997) {
            for slice_ in 0..N_PERM_4 {
                let d = pr.cornslice_depth[N_PERM_4 * corners + slice_] as i32;
                for m in PHASE2_MOVES {
                    let corners1 = mv.corners_move[N_MOVE * corners + m as usize] as usize;
                    let slice_1 = mv.slice_sorted_move[N_MOVE * slice_ + m as usize] as usize;
                    let d1 = pr.cornslice_depth[N_PERM_4 * corners1 + slice_1] as i32;
                    assert!((d - d1).abs() <= 1);
                }
            }
        }
    }
}

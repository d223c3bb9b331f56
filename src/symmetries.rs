use std::path::Path;

use crate::constants::*;
use crate::cubie::{Corner::*, CubieCube, Edge::*};
use crate::error::Error;
use crate::{decode_table, write_table};

/// 120° rotation around the long diagonal through the URF and DBL corners.
pub const ROT_URF3: CubieCube = CubieCube {
    cp: [URF, DFR, DLF, UFL, UBR, DRB, DBL, ULB],
    co: [1, 2, 1, 2, 2, 1, 2, 1],
    ep: [UF, FR, DF, FL, UB, BR, DB, BL, UR, DR, DL, UL],
    eo: [1, 0, 1, 0, 1, 0, 1, 0, 1, 1, 1, 1],
};

/// 180° rotation around the axis through the F and B face centers.
pub const ROT_F2: CubieCube = CubieCube {
    cp: [DLF, DFR, DRB, DBL, UFL, URF, UBR, ULB],
    co: [0, 0, 0, 0, 0, 0, 0, 0],
    ep: [DL, DF, DR, DB, UL, UF, UR, UB, FL, FR, BR, BL],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// 90° rotation around the axis through the U and D face centers.
pub const ROT_U4: CubieCube = CubieCube {
    cp: [UBR, URF, UFL, ULB, DRB, DFR, DLF, DBL],
    co: [0, 0, 0, 0, 0, 0, 0, 0],
    ep: [UB, UR, UF, UL, DB, DR, DF, DL, BR, FR, FL, BL],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1],
};

/// Reflection at the plane through the U, D, F and B face centers.
///
/// The corner orientations of a reflected cube are the mirrored values 3..5,
/// which is why the corner product carries the extended orientation rule.
pub const MIRR_LR2: CubieCube = CubieCube {
    cp: [UFL, URF, UBR, ULB, DLF, DFR, DRB, DBL],
    co: [3, 3, 3, 3, 3, 3, 3, 3],
    ep: [UL, UF, UR, UB, DL, DF, DR, DB, FL, FR, BR, BL],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// The 48 cube symmetries as cubie cubes.
///
/// The iteration order of the nested product fixes the index of each symmetry
/// and must not change: the D4h subgroup used for coordinate conjugation is
/// exactly the indices 0..16.
pub fn sym_cubes() -> [CubieCube; 48] {
    let mut sc = [CubieCube::default(); 48];
    let mut cc = CubieCube::default();
    let mut idx = 0;
    for _urf3 in 0..3 {
        for _f2 in 0..2 {
            for _u4 in 0..4 {
                for _lr2 in 0..2 {
                    sc[idx] = cc;
                    idx += 1;
                    cc.multiply(MIRR_LR2);
                }
                cc.multiply(ROT_U4);
            }
            cc.multiply(ROT_F2);
        }
        cc.multiply(ROT_URF3);
    }
    sc
}

/// For each symmetry index s the index s' with S_s * S_s' = identity.
pub fn inverse_sym_idx(sc: &[CubieCube; 48]) -> [u16; 48] {
    let mut inv_idx = [0; 48];
    for j in 0..N_SYM {
        for i in 0..N_SYM {
            let mut cc = sc[j];
            cc.multiply(sc[i]);
            if cc == CubieCube::default() {
                inv_idx[j] = i as u16;
                break;
            }
        }
    }
    inv_idx
}

/// All tables of the symmetry layer: the 48 symmetry cubes, the inverse
/// index, the move and coordinate conjugation tables and the two
/// symmetry-reduced equivalence-class tables.
///
/// Everything here must be built before any move or pruning table that
/// depends on it.
pub struct SymmetriesTables {
    pub sc: [CubieCube; 48],
    pub inv_idx: [u16; 48],
    /// conj_move[N_MOVE * s + m] is the move m' with S_s * M_m * S_s^-1 = M_m'.
    pub conj_move: Vec<u16>,
    /// twist_conj[(t << 4) + s] is the twist of S_s * C_t * S_s^-1, s in D4h.
    pub twist_conj: Vec<u16>,
    /// ud_edges_conj[(t << 4) + s] is the ud_edges of S_s * C_t * S_s^-1, s in D4h.
    pub ud_edges_conj: Vec<u16>,
    pub flipslice_classidx: Vec<u16>,
    pub flipslice_sym: Vec<u8>,
    pub flipslice_rep: Vec<u32>,
    pub corner_classidx: Vec<u16>,
    pub corner_sym: Vec<u8>,
    pub corner_rep: Vec<u16>,
}

impl SymmetriesTables {
    pub fn new(dir: &Path) -> Result<Self, Error> {
        let sc = sym_cubes();
        let inv_idx = inverse_sym_idx(&sc);
        let conj_move = create_conj_move(&sc, &inv_idx, dir)?;
        let twist_conj = create_conj_twist(&sc, &inv_idx, dir)?;
        let ud_edges_conj = create_conj_ud_edges(&sc, &inv_idx, dir)?;
        let (flipslice_classidx, flipslice_sym, flipslice_rep) =
            create_flipslice_classes(&sc, &inv_idx, dir)?;
        let (corner_classidx, corner_sym, corner_rep) = create_corner_classes(&sc, &inv_idx, dir)?;
        Ok(Self {
            sc,
            inv_idx,
            conj_move,
            twist_conj,
            ud_edges_conj,
            flipslice_classidx,
            flipslice_sym,
            flipslice_rep,
            corner_classidx,
            corner_sym,
            corner_rep,
        })
    }

    /// The symmetries and antisymmetries of cc, as indices 0..96.
    ///
    /// Index j < 48 means S_j * cc * S_j^-1 = cc, index j >= 48 means
    /// S_(j-48) * cc * S_(j-48)^-1 is the inverse of cc. The solver uses
    /// these to drop redundant search directions.
    pub fn symmetries(&self, cc: &CubieCube) -> Vec<usize> {
        let mut s = vec![];
        let d = cc.inverse_cubie_cube();
        for j in 0..N_SYM {
            let mut c = self.sc[j];
            c.multiply(*cc);
            c.multiply(self.sc[self.inv_idx[j] as usize]);
            if *cc == c {
                s.push(j);
            }
            if d == c {
                s.push(j + N_SYM);
            }
        }
        s
    }
}

/// Conjugation table for the 18 moves by the 48 symmetries.
fn create_conj_move(
    sc: &[CubieCube; 48],
    inv_idx: &[u16; 48],
    dir: &Path,
) -> Result<Vec<u16>, Error> {
    let fname = dir.join("conj_move");
    let table = std::fs::read(&fname).unwrap_or_default();
    let mut conj_move = vec![0; N_MOVE * N_SYM];
    if table.is_empty() {
        println!("Creating conj_move table...");
        let mc: Vec<CubieCube> = ALL_MOVES
            .iter()
            .map(|&m| CubieCube::default().apply_move(m))
            .collect();
        for s in 0..N_SYM {
            for (m, mcube) in mc.iter().enumerate() {
                let mut ss = sc[s];
                ss.multiply(*mcube); // s * m
                ss.multiply(sc[inv_idx[s] as usize]); // s * m * s^-1
                for (m2, mcube2) in mc.iter().enumerate() {
                    if ss == *mcube2 {
                        conj_move[N_MOVE * s + m] = m2 as u16;
                        break;
                    }
                }
            }
        }
        write_table(&fname, &conj_move)?;
    } else {
        conj_move = decode_table(&table)?;
    }
    Ok(conj_move)
}

/// Conjugation table for the twist coordinate by the 16 D4h symmetries.
fn create_conj_twist(
    sc: &[CubieCube; 48],
    inv_idx: &[u16; 48],
    dir: &Path,
) -> Result<Vec<u16>, Error> {
    let fname = dir.join("conj_twist");
    let table = std::fs::read(&fname).unwrap_or_default();
    let mut twist_conj = vec![0; N_TWIST * N_SYM_D4H];
    if table.is_empty() {
        println!("Creating conj_twist table...");
        let mut cc = CubieCube::default();
        for t in 0..N_TWIST {
            cc.set_twist(t as u16);
            for s in 0..N_SYM_D4H {
                let mut ss = sc[s];
                ss.corner_multiply(cc); // s * t
                ss.corner_multiply(sc[inv_idx[s] as usize]); // s * t * s^-1
                twist_conj[(t << 4) + s] = ss.get_twist();
            }
        }
        write_table(&fname, &twist_conj)?;
    } else {
        twist_conj = decode_table(&table)?;
    }
    Ok(twist_conj)
}

/// Conjugation table for the ud_edges coordinate by the 16 D4h symmetries.
fn create_conj_ud_edges(
    sc: &[CubieCube; 48],
    inv_idx: &[u16; 48],
    dir: &Path,
) -> Result<Vec<u16>, Error> {
    let fname = dir.join("conj_ud_edges");
    let table = std::fs::read(&fname).unwrap_or_default();
    let mut ud_edges_conj = vec![0; N_UD_EDGES * N_SYM_D4H];
    if table.is_empty() {
        println!("Creating conj_ud_edges table...");
        let mut cc = CubieCube::default();
        for t in 0..N_UD_EDGES {
            cc.set_ud_edges(t);
            for s in 0..N_SYM_D4H {
                let mut ss = sc[s];
                ss.edge_multiply(cc); // s * t
                ss.edge_multiply(sc[inv_idx[s] as usize]); // s * t * s^-1
                ud_edges_conj[(t << 4) + s] = ss.get_ud_edges();
            }
        }
        write_table(&fname, &ud_edges_conj)?;
    } else {
        ud_edges_conj = decode_table(&table)?;
    }
    Ok(ud_edges_conj)
}

type ClassTables<R> = (Vec<u16>, Vec<u8>, Vec<R>);

/// The equivalence classes of the combined flip+slice coordinate under D4h.
///
/// For every raw index in natural order a not yet assigned index opens a new
/// class and becomes its representative; the 16 conjugates S_s^-1 * c * S_s
/// are then assigned the same class with symmetry s.
fn create_flipslice_classes(
    sc: &[CubieCube; 48],
    inv_idx: &[u16; 48],
    dir: &Path,
) -> Result<ClassTables<u32>, Error> {
    let f_classidx = dir.join("fs_classidx");
    let f_sym = dir.join("fs_sym");
    let f_rep = dir.join("fs_rep");
    let t_classidx = std::fs::read(&f_classidx).unwrap_or_default();
    let t_sym = std::fs::read(&f_sym).unwrap_or_default();
    let t_rep = std::fs::read(&f_rep).unwrap_or_default();

    if !t_classidx.is_empty() && !t_sym.is_empty() && !t_rep.is_empty() {
        let classidx: Vec<u16> = decode_table(&t_classidx)?;
        let sym: Vec<u8> = decode_table(&t_sym)?;
        let rep: Vec<u32> = decode_table(&t_rep)?;
        if rep.len() != N_FLIPSLICE_CLASS || classidx.len() != N_FLIP * N_SLICE {
            return Err(Error::ClassCountMismatch {
                table: "fs_rep",
                expected: N_FLIPSLICE_CLASS,
                found: rep.len(),
            });
        }
        return Ok((classidx, sym, rep));
    }

    println!("Creating flipslice symmetry class tables...");
    let mut classidx = vec![u16::MAX; N_FLIP * N_SLICE];
    let mut sym = vec![0; N_FLIP * N_SLICE];
    let mut rep = vec![0; N_FLIPSLICE_CLASS];

    let mut cidx = 0;
    let mut cc = CubieCube::default();
    for slc in 0..N_SLICE {
        cc.set_slice(slc as u16);
        for flip in 0..N_FLIP {
            cc.set_flip(flip as u16);
            let idx = N_FLIP * slc + flip;
            if classidx[idx] != u16::MAX {
                continue;
            }
            if cidx >= N_FLIPSLICE_CLASS {
                return Err(Error::ClassCountMismatch {
                    table: "fs_classidx",
                    expected: N_FLIPSLICE_CLASS,
                    found: cidx + 1,
                });
            }
            classidx[idx] = cidx as u16;
            sym[idx] = 0;
            rep[cidx] = idx as u32;
            for s in 0..N_SYM_D4H {
                let mut ss = sc[inv_idx[s] as usize];
                ss.edge_multiply(cc); // s^-1 * cc
                ss.edge_multiply(sc[s]); // s^-1 * cc * s
                let idx_new = N_FLIP * ss.get_slice() as usize + ss.get_flip() as usize;
                if classidx[idx_new] == u16::MAX {
                    classidx[idx_new] = cidx as u16;
                    sym[idx_new] = s as u8;
                }
            }
            cidx += 1;
        }
    }
    if cidx != N_FLIPSLICE_CLASS {
        return Err(Error::ClassCountMismatch {
            table: "fs_classidx",
            expected: N_FLIPSLICE_CLASS,
            found: cidx,
        });
    }

    write_table(&f_classidx, &classidx)?;
    write_table(&f_sym, &sym)?;
    write_table(&f_rep, &rep)?;
    Ok((classidx, sym, rep))
}

/// The equivalence classes of the corner permutation coordinate under D4h.
fn create_corner_classes(
    sc: &[CubieCube; 48],
    inv_idx: &[u16; 48],
    dir: &Path,
) -> Result<ClassTables<u16>, Error> {
    let f_classidx = dir.join("co_classidx");
    let f_sym = dir.join("co_sym");
    let f_rep = dir.join("co_rep");
    let t_classidx = std::fs::read(&f_classidx).unwrap_or_default();
    let t_sym = std::fs::read(&f_sym).unwrap_or_default();
    let t_rep = std::fs::read(&f_rep).unwrap_or_default();

    if !t_classidx.is_empty() && !t_sym.is_empty() && !t_rep.is_empty() {
        let classidx: Vec<u16> = decode_table(&t_classidx)?;
        let sym: Vec<u8> = decode_table(&t_sym)?;
        let rep: Vec<u16> = decode_table(&t_rep)?;
        if rep.len() != N_CORNERS_CLASS || classidx.len() != N_CORNERS {
            return Err(Error::ClassCountMismatch {
                table: "co_rep",
                expected: N_CORNERS_CLASS,
                found: rep.len(),
            });
        }
        return Ok((classidx, sym, rep));
    }

    println!("Creating corner symmetry class tables...");
    let mut classidx = vec![u16::MAX; N_CORNERS];
    let mut sym = vec![0; N_CORNERS];
    let mut rep = vec![0; N_CORNERS_CLASS];

    let mut cidx = 0;
    let mut cc = CubieCube::default();
    for cp in 0..N_CORNERS {
        cc.set_corners(cp as u16);
        if classidx[cp] != u16::MAX {
            continue;
        }
        if cidx >= N_CORNERS_CLASS {
            return Err(Error::ClassCountMismatch {
                table: "co_classidx",
                expected: N_CORNERS_CLASS,
                found: cidx + 1,
            });
        }
        classidx[cp] = cidx as u16;
        sym[cp] = 0;
        rep[cidx] = cp as u16;
        for s in 0..N_SYM_D4H {
            let mut ss = sc[inv_idx[s] as usize];
            ss.corner_multiply(cc); // s^-1 * cc
            ss.corner_multiply(sc[s]); // s^-1 * cc * s
            let cp_new = ss.get_corners() as usize;
            if classidx[cp_new] == u16::MAX {
                classidx[cp_new] = cidx as u16;
                sym[cp_new] = s as u8;
            }
        }
        cidx += 1;
    }
    if cidx != N_CORNERS_CLASS {
        return Err(Error::ClassCountMismatch {
            table: "co_classidx",
            expected: N_CORNERS_CLASS,
            found: cidx,
        });
    }

    write_table(&f_classidx, &classidx)?;
    write_table(&f_sym, &sym)?;
    write_table(&f_rep, &rep)?;
    Ok((classidx, sym, rep))
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use crate::symmetries::*;

    #[test]
    fn test_sym_cubes_are_distinct() {
        let sc = sym_cubes();
        for i in 0..N_SYM {
            for j in (i + 1)..N_SYM {
                assert_ne!(sc[i], sc[j]);
            }
        }
    }

    #[test]
    fn test_inverse_sym_idx() {
        let sc = sym_cubes();
        let inv_idx = inverse_sym_idx(&sc);
        for j in 0..N_SYM {
            let mut cc = sc[j];
            cc.multiply(sc[inv_idx[j] as usize]);
            assert_eq!(cc, CubieCube::default());
        }
    }

    #[test]
    fn test_d4h_preserves_ud_slice() {
        // exactly the 16 D4h symmetries keep the E-slice edges in the E-slice
        let sc = sym_cubes();
        let fixed = (0..N_SYM).filter(|&s| sc[s].get_slice() == 0).count();
        assert_eq!(fixed, N_SYM_D4H);
        for s in 0..N_SYM_D4H {
            assert_eq!(sc[s].get_slice(), 0);
        }
    }

    #[test]
    fn test_basic_sym_orders() {
        let id = CubieCube::default();
        let mut cc = id;
        for _ in 0..3 {
            cc.multiply(ROT_URF3);
        }
        assert_eq!(cc, id);
        let mut cc = id;
        for _ in 0..2 {
            cc.multiply(ROT_F2);
        }
        assert_eq!(cc, id);
        let mut cc = id;
        for _ in 0..4 {
            cc.multiply(ROT_U4);
        }
        assert_eq!(cc, id);
        let mut cc = id;
        for _ in 0..2 {
            cc.multiply(MIRR_LR2);
        }
        assert_eq!(cc, id);
    }

    #[test]
    fn test_symmetries_of_solved_cube() {
        let sy = SymmetriesTables::new(Path::new("tables")).unwrap();
        // the solved cube is fixed by all 48 symmetries and all 48 antisymmetries
        let syms = sy.symmetries(&CubieCube::default());
        assert_eq!(syms.len(), 96);
    }

    #[test]
    fn test_conj_tables_identity_symmetry() {
        let sy = SymmetriesTables::new(Path::new("tables")).unwrap();
        for m in 0..N_MOVE {
            assert_eq!(sy.conj_move[m] as usize, m);
        }
        for t in [0usize, 1, 1000, 2186] {
            assert_eq!(sy.twist_conj[t << 4] as usize, t);
        }
        for t in [0usize, 1, 20000, 40319] {
            assert_eq!(sy.ud_edges_conj[t << 4] as usize, t);
        }
    }

    #[test]
    fn test_class_counts() {
        let sy = SymmetriesTables::new(Path::new("tables")).unwrap();
        assert_eq!(sy.flipslice_rep.len(), N_FLIPSLICE_CLASS);
        assert_eq!(sy.corner_rep.len(), N_CORNERS_CLASS);
        // every raw index is assigned to a class
        assert!(sy.flipslice_classidx.iter().all(|&c| c != u16::MAX));
        assert!(sy.corner_classidx.iter().all(|&c| c != u16::MAX));
        // representatives map back to their own class
        for (c, &rep) in sy.flipslice_rep.iter().enumerate().step_by(1000) {
            assert_eq!(sy.flipslice_classidx[rep as usize] as usize, c);
            assert_eq!(sy.flipslice_sym[rep as usize], 0);
        }
        for (c, &rep) in sy.corner_rep.iter().enumerate().step_by(100) {
            assert_eq!(sy.corner_classidx[rep as usize] as usize, c);
            assert_eq!(sy.corner_sym[rep as usize], 0);
        }
    }
}

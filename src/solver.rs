use std::cmp::min;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::coord::{CoordCube, EdgeMergeTables};
use crate::cubie::CubieCube;
use crate::error::Error;
use crate::facelet::FaceCube;
use crate::moves::{Move, MoveTables};
use crate::pruning::PruningTables;
use crate::symmetries::SymmetriesTables;

/// All precomputed tables the search needs, built once in dependency order:
/// symmetries first, then the move tables, then the pruning tables.
pub struct SolverTables {
    pub sy: SymmetriesTables,
    pub mv: MoveTables,
    pub pr: PruningTables,
    pub em: EdgeMergeTables,
}

impl SolverTables {
    pub fn new(dir: &Path) -> Result<Self, Error> {
        fs::create_dir_all(dir)?;
        let sy = SymmetriesTables::new(dir)?;
        let mv = MoveTables::new(dir)?;
        let mut pr = PruningTables::default();
        pr.create_phase1_prun_table(&sy, &mv, dir)?;
        pr.create_phase2_prun_table(&sy, &mv, dir)?;
        pr.create_phase2_cornsliceprun_table(&mv, dir)?;
        let em = EdgeMergeTables::new(dir)?;
        Ok(Self { sy, mv, pr, em })
    }
}

/// A solution found by the two phase algorithm.
///
/// Displays as a whitespace separated move string, e.g. `R2 U F3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionResult {
    pub solution: Vec<Move>,
}

impl SolutionResult {
    pub fn len(&self) -> usize {
        self.solution.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solution.is_empty()
    }
}

impl fmt::Display for SolutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .solution
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{s}")
    }
}

/// The per-user directory holding the precomputed table cache.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("twophase")
}

/// The two phase solver, owning all precomputed tables.
///
/// Building the first `Solver` on a machine generates the tables (a few
/// minutes); afterwards they are loaded from the cache directory.
pub struct Solver {
    tables: SolverTables,
}

impl Solver {
    /// Build or load the tables in the default per-user cache directory.
    pub fn new() -> Result<Self, Error> {
        Self::with_cache_dir(default_cache_dir())
    }

    /// Build or load the tables in the given cache directory.
    pub fn with_cache_dir<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        Ok(Self {
            tables: SolverTables::new(dir.as_ref())?,
        })
    }

    /// Solve a cube given by its facelet string.
    ///
    /// Returns a maneuver of length <= max_length, the empty maneuver for an
    /// already solved cube, or `Timeout` if no such maneuver was found before
    /// the timeout (in seconds) elapsed.
    pub fn solve(
        &self,
        cubestring: &str,
        max_length: usize,
        timeout: f64,
    ) -> Result<SolutionResult, Error> {
        let fc = FaceCube::try_from(cubestring)?;
        let cc = CubieCube::try_from(&fc)?;
        self.solve_state(&cc, max_length, timeout)
    }

    /// Solve a cube given on the cubie level.
    pub fn solve_state(
        &self,
        cc: &CubieCube,
        max_length: usize,
        timeout: f64,
    ) -> Result<SolutionResult, Error> {
        if cc.verify().is_err() {
            return Err(Error::Unsolvable);
        }

        let start_time = Instant::now();
        let deadline = start_time + Duration::from_secs_f64(timeout);

        let syms = self.tables.sy.symmetries(cc);
        let symsset: HashSet<usize> = HashSet::from_iter(syms);
        let v: HashSet<usize> = HashSet::from([16, 20, 24, 28]);
        let mut tr: Vec<usize> = match v.intersection(&symsset).count() > 0 {
            // rotational symmetry along a long diagonal: searching the other
            // two orientations is redundant
            true => vec![0, 3],
            // three URF-axis orientations, each also on the inverse cube
            false => (0..6).collect(),
        };
        let vv: HashSet<usize> = (48..96).collect();
        if vv.intersection(&symsset).count() > 0 {
            // antisymmetry: searching the inverse cube is redundant
            tr.retain(|x| *x < 3);
        }

        // shared by all workers; solutions only ever get shorter
        let solutions: Mutex<Vec<Vec<Move>>> = Mutex::new(vec![Vec::new()]);
        let terminated = AtomicBool::new(false);

        thread::scope(|s| {
            for i in tr {
                let mut sth = SolverThread::new(
                    i % 3,
                    i / 3,
                    max_length,
                    deadline,
                    &solutions,
                    &terminated,
                    &self.tables,
                );
                s.spawn(move || sth.run(cc));
            }
        });

        let solutions = solutions.into_inner().unwrap();
        if solutions.len() > 1 {
            let best = solutions.last().unwrap();
            if best.len() <= max_length {
                return Ok(SolutionResult {
                    solution: best.clone(),
                });
            }
        }
        Err(Error::Timeout)
    }
}

/// Solve a cube defined by its cube definition string.
///
/// Uses a process-wide `Solver` in the default cache directory; the tables
/// are built on first use and a table construction failure is fatal.
pub fn solve(cubestring: &str, max_length: usize, timeout: f64) -> Result<SolutionResult, Error> {
    lazy_static! {
        static ref SOLVER: Solver =
            Solver::new().expect("fatal: could not build the solver tables");
    }
    SOLVER.solve(cubestring, max_length, timeout)
}

/// One worker of the two phase search.
///
/// rot: conjugate the cube by 120° * rot around the URF long diagonal before
/// searching. inv: search the inverse cube instead. Running workers for all
/// combinations and taking the first hit is considerably faster on average
/// than a single search; the first worker reaching the target length sets the
/// shared stop flag, which every worker polls at the top of each node
/// expansion.
struct SolverThread<'a> {
    co_cube: CoordCube, // the rotated/inverted cube in coordinate representation
    rot: usize,
    inv: usize,
    sofar_phase1: Vec<Move>,
    sofar_phase2: Vec<Move>,
    phase2_done: bool,
    ret_length: usize,
    deadline: Instant,
    cornersave: usize,
    solutions: &'a Mutex<Vec<Vec<Move>>>,
    terminated: &'a AtomicBool,
    shortest_length: usize,
    tables: &'a SolverTables,
}

impl<'a> SolverThread<'a> {
    fn new(
        rot: usize,
        inv: usize,
        ret_length: usize,
        deadline: Instant,
        solutions: &'a Mutex<Vec<Vec<Move>>>,
        terminated: &'a AtomicBool,
        tables: &'a SolverTables,
    ) -> Self {
        Self {
            co_cube: CoordCube::default(),
            rot,
            inv,
            sofar_phase1: Vec::new(),
            sofar_phase2: Vec::new(),
            phase2_done: false,
            ret_length,
            deadline,
            cornersave: 0,
            solutions,
            terminated,
            shortest_length: 999,
            tables,
        }
    }

    /// Compute the distance to the cube subgroup H where flip = slice = twist = 0.
    ///
    /// The pruning table stores the distance mod 3; the absolute value is
    /// recovered by walking down to the subgroup, picking at each step a move
    /// that decreases the stored value.
    fn get_depth_phase1(&self) -> usize {
        let sy = &self.tables.sy;
        let mv = &self.tables.mv;
        let mut slice_ = self.co_cube.slice_sorted as usize / N_PERM_4;
        let mut flip = self.co_cube.flip as usize;
        let mut twist = self.co_cube.twist as usize;
        let flipslice = N_FLIP * slice_ + flip;
        let classidx = sy.flipslice_classidx[flipslice] as usize;
        let sym = sy.flipslice_sym[flipslice] as usize;
        let mut depth_mod3 = self.tables.pr.get_flipslice_twist_depth3(
            N_TWIST * classidx + sy.twist_conj[(twist << 4) + sym] as usize,
        );

        let mut depth = 0;
        while flip != 0 || slice_ != 0 || twist != 0 {
            if depth_mod3 == 0 {
                depth_mod3 = 3;
            }
            for m in ALL_MOVES {
                let twist1 = mv.twist_move[N_MOVE * twist + m as usize] as usize;
                let flip1 = mv.flip_move[N_MOVE * flip + m as usize] as usize;
                let slice1 = mv.slice_sorted_move[N_MOVE * N_PERM_4 * slice_ + m as usize]
                    as usize
                    / N_PERM_4;
                let flipslice1 = N_FLIP * slice1 + flip1;
                let classidx1 = sy.flipslice_classidx[flipslice1] as usize;
                let sym1 = sy.flipslice_sym[flipslice1] as usize;
                if self.tables.pr.get_flipslice_twist_depth3(
                    N_TWIST * classidx1 + sy.twist_conj[(twist1 << 4) + sym1] as usize,
                ) == depth_mod3 - 1
                {
                    depth += 1;
                    twist = twist1;
                    flip = flip1;
                    slice_ = slice1;
                    depth_mod3 -= 1;
                    break;
                }
            }
        }
        depth
    }

    /// Get the distance to the subgroup where only the UD-slice edges may be
    /// permuted in their slice. This is a lower bound for the number of moves
    /// to solve phase 2.
    fn get_depth_phase2(&self, corners: usize, ud_edges: usize) -> usize {
        let sy = &self.tables.sy;
        let mv = &self.tables.mv;
        let mut corners = corners;
        let mut ud_edges = ud_edges;
        let classidx = sy.corner_classidx[corners] as usize;
        let sym = sy.corner_sym[corners] as usize;
        let mut depth_mod3 = self.tables.pr.get_corners_ud_edges_depth3(
            N_UD_EDGES * classidx + sy.ud_edges_conj[(ud_edges << 4) + sym] as usize,
        );
        if depth_mod3 == 3 {
            // unfilled entry, depth >= 11
            return 11;
        }
        let mut depth = 0;
        while corners != 0 || ud_edges != 0 {
            if depth_mod3 == 0 {
                depth_mod3 = 3;
            }
            for m in PHASE2_MOVES {
                let corners1 = mv.corners_move[N_MOVE * corners + m as usize] as usize;
                let ud_edges1 = mv.ud_edges_move[N_MOVE * ud_edges + m as usize] as usize;
                let classidx1 = sy.corner_classidx[corners1] as usize;
                let sym1 = sy.corner_sym[corners1] as usize;
                if self.tables.pr.get_corners_ud_edges_depth3(
                    N_UD_EDGES * classidx1 + sy.ud_edges_conj[(ud_edges1 << 4) + sym1] as usize,
                ) == depth_mod3 - 1
                {
                    depth += 1;
                    corners = corners1;
                    ud_edges = ud_edges1;
                    depth_mod3 -= 1;
                    break;
                }
            }
        }
        depth
    }

    fn search_phase2(
        &mut self,
        corners: usize,
        ud_edges: usize,
        slice_sorted: usize,
        dist: usize,
        togo_phase2: usize,
    ) {
        if self.terminated.load(Ordering::Relaxed) || self.phase2_done {
            return;
        }

        if togo_phase2 == 0 && slice_sorted == 0 {
            // phase 2 solved, store the solution
            let mut man = self.sofar_phase1.clone();
            man.extend_from_slice(&self.sofar_phase2);
            let mut solutions = self.solutions.lock().unwrap();
            if solutions.len() == 1 || solutions.last().unwrap().len() > man.len() {
                if self.inv == 1 {
                    // we solved the inverse cube
                    man.reverse();
                    man = man
                        .iter()
                        .map(|&m| ALL_MOVES[(m as usize / 3) * 3 + (2 - m as usize % 3)])
                        .collect(); // R -> R3, R2 -> R2, R3 -> R etc.
                }
                // transform the solution back from the rotated cube
                man = man
                    .iter()
                    .map(|&m| {
                        ALL_MOVES
                            [self.tables.sy.conj_move[N_MOVE * 16 * self.rot + m as usize] as usize]
                    })
                    .collect();
                self.shortest_length = man.len();
                solutions.push(man);
            }
            if self.shortest_length <= self.ret_length {
                // we reached the target length
                self.terminated.store(true, Ordering::Relaxed);
            }
            self.phase2_done = true;
        } else {
            for m in ALL_MOVES {
                if matches!(
                    m,
                    Move::R | Move::R3 | Move::F | Move::F3 | Move::L | Move::L3 | Move::B | Move::B3
                ) {
                    continue;
                }

                let last = self
                    .sofar_phase2
                    .last()
                    .or_else(|| self.sofar_phase1.last())
                    .copied();
                if let Some(last) = last {
                    let diff = last as i8 / 3 - m as i8 / 3;
                    if diff == 0 || diff == 3 {
                        // successive moves on the same face or on the same
                        // axis in the wrong order
                        continue;
                    }
                }

                let corners_new = self.tables.mv.corners_move[N_MOVE * corners + m as usize] as usize;
                let ud_edges_new =
                    self.tables.mv.ud_edges_move[N_MOVE * ud_edges + m as usize] as usize;
                let slice_sorted_new =
                    self.tables.mv.slice_sorted_move[N_MOVE * slice_sorted + m as usize] as usize;

                let classidx = self.tables.sy.corner_classidx[corners_new] as usize;
                let sym = self.tables.sy.corner_sym[corners_new] as usize;
                let dist_new_mod3 = self.tables.pr.get_corners_ud_edges_depth3(
                    N_UD_EDGES * classidx
                        + self.tables.sy.ud_edges_conj[(ud_edges_new << 4) + sym] as usize,
                );
                let dist_new = self.tables.pr.distance[3 * dist + dist_new_mod3 as usize] as usize;
                // both bounds are admissible, so their maximum is too
                if dist_new.max(
                    self.tables.pr.cornslice_depth[N_PERM_4 * corners_new + slice_sorted_new]
                        as usize,
                ) >= togo_phase2
                {
                    continue; // impossible to reach the solved cube in togo_phase2 - 1 moves
                }

                self.sofar_phase2.push(m);
                self.search_phase2(
                    corners_new,
                    ud_edges_new,
                    slice_sorted_new,
                    dist_new,
                    togo_phase2 - 1,
                );
                self.sofar_phase2.pop();
            }
        }
    }

    fn search(&mut self, flip: usize, twist: usize, slice_sorted: usize, dist: usize, togo_phase1: usize) {
        if self.terminated.load(Ordering::Relaxed) {
            return;
        }

        if togo_phase1 == 0 {
            // phase 1 solved
            if Instant::now() >= self.deadline {
                self.terminated.store(true, Ordering::Relaxed);
                return;
            }

            // compute the initial phase 2 coordinates
            let m = match self.sofar_phase1.last() {
                Some(&m) => m,
                None => Move::U, // value is irrelevant here, no phase 1 moves
            };

            let corners;
            if matches!(m, Move::R3 | Move::F3 | Move::L3 | Move::B3) {
                // phase 1 solutions come in pairs: the previous solution ended
                // with the quarter turn of the same face, so the corner
                // coordinate follows from the saved one with a half turn
                corners = self.tables.mv.corners_move
                    [N_MOVE * self.cornersave + m as usize - 1] as usize;
            } else {
                let mut c = self.co_cube.corners as usize;
                for m in &self.sofar_phase1 {
                    c = self.tables.mv.corners_move[N_MOVE * c + *m as usize] as usize;
                }
                corners = c;
                self.cornersave = corners;
            }

            // a new solution must be shorter, and phase 2 maneuvers have at
            // most 11 - 1 = 10 moves
            let togo2_limit = min(self.shortest_length.saturating_sub(self.sofar_phase1.len()), 11);
            if self.tables.pr.cornslice_depth[N_PERM_4 * corners + slice_sorted] as usize
                >= togo2_limit
            {
                // the precheck speeds up the computation considerably
                return;
            }

            let mut u_edges = self.co_cube.u_edges as usize;
            let mut d_edges = self.co_cube.d_edges as usize;
            for m in &self.sofar_phase1 {
                u_edges = self.tables.mv.u_edges_move[N_MOVE * u_edges + *m as usize] as usize;
                d_edges = self.tables.mv.d_edges_move[N_MOVE * d_edges + *m as usize] as usize;
            }
            let ud_edges =
                self.tables.em.upd_ud_edges[N_PERM_4 * u_edges + d_edges % N_PERM_4] as usize;

            let dist2 = self.get_depth_phase2(corners, ud_edges);
            for togo2 in dist2..togo2_limit {
                self.sofar_phase2.clear();
                self.phase2_done = false;
                self.search_phase2(corners, ud_edges, slice_sorted, dist2, togo2);
                if self.phase2_done {
                    // a solution of this total length was found
                    break;
                }
            }
        } else {
            for m in ALL_MOVES {
                // dist == 0 means we are already in the subgroup H. If less
                // than 5 moves are left they would all have to be phase 2
                // moves, so we generate those in phase 2 instead
                if dist == 0 && togo_phase1 < 5 && PHASE2_MOVES.contains(&m) {
                    continue;
                }

                if let Some(&last) = self.sofar_phase1.last() {
                    let diff = last as i8 / 3 - m as i8 / 3;
                    if diff == 0 || diff == 3 {
                        // successive moves on the same face or on the same
                        // axis in the wrong order
                        continue;
                    }
                }

                let flip_new = self.tables.mv.flip_move[N_MOVE * flip + m as usize] as usize;
                let twist_new = self.tables.mv.twist_move[N_MOVE * twist + m as usize] as usize;
                let slice_sorted_new =
                    self.tables.mv.slice_sorted_move[N_MOVE * slice_sorted + m as usize] as usize;

                let flipslice = N_FLIP * (slice_sorted_new / N_PERM_4) + flip_new;
                let classidx = self.tables.sy.flipslice_classidx[flipslice] as usize;
                let sym = self.tables.sy.flipslice_sym[flipslice] as usize;
                let dist_new_mod3 = self.tables.pr.get_flipslice_twist_depth3(
                    N_TWIST * classidx
                        + self.tables.sy.twist_conj[(twist_new << 4) + sym] as usize,
                );
                let dist_new = self.tables.pr.distance[3 * dist + dist_new_mod3 as usize] as usize;
                if dist_new >= togo_phase1 {
                    // impossible to reach the subgroup H in togo_phase1 - 1 moves
                    continue;
                }

                self.sofar_phase1.push(m);
                self.search(flip_new, twist_new, slice_sorted_new, dist_new, togo_phase1 - 1);
                self.sofar_phase1.pop();
            }
        }
    }

    fn run(&mut self, cb_cube: &CubieCube) {
        let sc = &self.tables.sy.sc;
        let mut cb = *cb_cube;
        if self.rot == 1 {
            // conjugation by the 120° rotation
            cb = sc[32];
            cb.multiply(*cb_cube);
            cb.multiply(sc[16]);
        } else if self.rot == 2 {
            // conjugation by the 240° rotation
            cb = sc[16];
            cb.multiply(*cb_cube);
            cb.multiply(sc[32]);
        }
        if self.inv == 1 {
            // search the inverse cube
            cb = cb.inverse_cubie_cube();
        }

        self.co_cube = match CoordCube::from_cubie(&cb, &self.tables.sy) {
            Ok(c) => c,
            // the caller verified the state; a rotated/inverted legal cube stays legal
            Err(_) => return,
        };

        let dist = self.get_depth_phase1();
        for togo1 in dist..20 {
            // iterative deepening, the solution has at least dist moves
            if self.terminated.load(Ordering::Relaxed) {
                break;
            }
            if Instant::now() >= self.deadline {
                self.terminated.store(true, Ordering::Relaxed);
                break;
            }
            self.sofar_phase1.clear();
            self.search(
                self.co_cube.flip as usize,
                self.co_cube.twist as usize,
                self.co_cube.slice_sorted as usize,
                dist,
                togo1,
            );
        }
    }
}

#[cfg(test)]
mod test {
    use crate::cubie::SOLVED_CUBIE_CUBE;
    use crate::scramble::scramble_from_str;
    use crate::solver::*;

    lazy_static! {
        static ref SOLVER: Solver = Solver::with_cache_dir("tables").unwrap();
    }

    const SOLVED_STRING: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";

    #[test]
    fn test_solved_cube_gives_empty_maneuver() {
        let res = SOLVER.solve(SOLVED_STRING, 20, 3.0).unwrap();
        assert!(res.is_empty());
        assert_eq!(res.to_string(), "");
    }

    #[test]
    fn test_solve_short_scramble() {
        let moves = scramble_from_str("U3 D2 R3 L2 F3").unwrap();
        let cc = CubieCube::from(&moves);
        let res = SOLVER.solve_state(&cc, 20, 10.0).unwrap();
        assert!(res.len() <= 20);
        assert_eq!(cc.apply_moves(&res.solution), SOLVED_CUBIE_CUBE);
    }

    #[test]
    fn test_solve_facelet_string() {
        let facelet = "RLLBUFUUUBDURRBBUBRLRRFDFDDLLLUDFLRRDDFRLFDBUBFFLBBDUF";
        let res = SOLVER.solve(facelet, 20, 10.0).unwrap();
        assert!(res.len() <= 20);
        let fc = FaceCube::try_from(facelet).unwrap();
        let cc = CubieCube::try_from(&fc).unwrap();
        assert_eq!(cc.apply_moves(&res.solution), SOLVED_CUBIE_CUBE);
    }

    #[test]
    fn test_solve_random_states() {
        let mut cc = CubieCube::default();
        for _ in 0..3 {
            cc.randomize();
            let res = SOLVER.solve_state(&cc, 20, 10.0).unwrap();
            assert!(res.len() <= 20);
            assert_eq!(cc.apply_moves(&res.solution), SOLVED_CUBIE_CUBE);
        }
    }

    #[test]
    fn test_superflip_needs_twenty_moves() {
        // all edges flipped in place, the canonical distance-20 state
        let mut cc = CubieCube::default();
        cc.eo = [1; 12];
        let res = SOLVER.solve_state(&cc, 20, 60.0).unwrap();
        assert_eq!(res.len(), 20);
        assert_eq!(cc.apply_moves(&res.solution), SOLVED_CUBIE_CUBE);
        // no 19 move maneuver exists
        let res = SOLVER.solve_state(&cc, 19, 3.0);
        assert!(matches!(res, Err(Error::Timeout)));
    }

    #[test]
    fn test_unsolvable_state() {
        let mut cc = CubieCube::default();
        cc.co[0] = 1; // single twisted corner
        assert!(matches!(
            SOLVER.solve_state(&cc, 20, 3.0),
            Err(Error::Unsolvable)
        ));
    }

    #[test]
    fn test_input_errors() {
        let bad = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBX";
        assert!(matches!(
            SOLVER.solve(bad, 20, 3.0),
            Err(Error::InvalidFacelet)
        ));
        // solved string with the three stickers of the URF corner rotated
        // cyclically (U9 -> F, R1 -> U, F3 -> R): a single twisted corner
        let twisted = "UUUUUUUUFURRRRRRRRFFRFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";
        assert!(matches!(
            SOLVER.solve(twisted, 20, 3.0),
            Err(Error::CornerOriSum)
        ));
    }
}

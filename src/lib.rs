//! # twophase
//! `twophase`: crate for manipulating and solving the 3x3 Rubik's cube with
//! [Kociemba's two phase algorithm](http://kociemba.org/cube.htm).

#[macro_use]
extern crate lazy_static;

/// Module containing functions for scrambling the cube.
pub mod scramble;

/// Error define.
pub mod error;

/// Module containing 3x3 cube constants.
pub mod constants;

/// Module for representing a cube on the coordinate level.
pub mod coord;

/// Module for representing a cube on the cubie level.
pub mod cubie;

/// Module for representing a cube on the facelet level.
pub mod facelet;

/// Module for creating/loading the symmetry tables.
pub mod symmetries;

/// Module for representing moves and creating/loading the move tables.
pub mod moves;

/// Module for creating/loading the pruning tables. The pruning tables cut the
/// search tree during the search.
pub mod pruning;

/// Module for the two phase solver.
pub mod solver;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::{fs, path::Path};

use bincode::{
    config::{self, Configuration},
    decode_from_slice, encode_to_vec,
    error::DecodeError,
    Decode, Encode,
};

use crate::error::Error;
pub use crate::cubie::CubieCube;
pub use crate::moves::Move;
pub use crate::solver::{solve, SolutionResult, Solver};

const CONFIG: Configuration = config::standard();

/// Write a table to its cache file.
///
/// The data goes to a temporary file first and is renamed into place, so a
/// concurrently starting process never observes a torn file.
fn write_table<P, T: Encode>(path: P, table: &T) -> Result<(), Error>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let encoded = encode_to_vec(table, CONFIG)?;
    // unique temp name: concurrent builders of the same table must not
    // interleave their writes
    static TMP_ID: AtomicUsize = AtomicUsize::new(0);
    let tmp = path.with_extension(format!(
        "{}-{}.tmp",
        std::process::id(),
        TMP_ID.fetch_add(1, Ordering::Relaxed)
    ));
    fs::write(&tmp, encoded)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn decode_table<T: Decode>(bytes: &[u8]) -> Result<T, Error> {
    let (decoded, written) = decode_from_slice(bytes, CONFIG)?;
    let additional = bytes.len() - written;

    if additional != 0 {
        return Err(DecodeError::UnexpectedEnd { additional })?;
    }
    Ok(decoded)
}

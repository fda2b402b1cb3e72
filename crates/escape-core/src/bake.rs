//! Save/load precomputed smooth normals.
//!
//! Uses bincode for a compact binary file. The file carries a format version;
//! a file written by another version is refused rather than misread.

use std::io::{Read, Write};

use escape_logic::smoothing::NormalBake;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bump when the bake layout changes.
const BAKE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct BakeFile {
    version: u32,
    bake: NormalBake,
}

#[derive(Debug, Error)]
pub enum BakeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("bake version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("bake has {keys} keys but {values} values")]
    Inconsistent { keys: usize, values: usize },
}

/// Write a bake to `writer`.
pub fn save_bake<W: Write>(writer: W, bake: &NormalBake) -> Result<(), BakeError> {
    let file = BakeFile {
        version: BAKE_VERSION,
        bake: bake.clone(),
    };
    bincode::serialize_into(writer, &file)?;
    Ok(())
}

/// Read a bake from `reader`.
pub fn load_bake<R: Read>(reader: R) -> Result<NormalBake, BakeError> {
    let file: BakeFile = bincode::deserialize_from(reader)?;
    if file.version != BAKE_VERSION {
        return Err(BakeError::VersionMismatch {
            expected: BAKE_VERSION,
            found: file.version,
        });
    }
    if !file.bake.is_consistent() {
        return Err(BakeError::Inconsistent {
            keys: file.bake.keys.len(),
            values: file.bake.values.len(),
        });
    }
    Ok(file.bake)
}

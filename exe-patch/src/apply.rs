//! Patch application engine
//!
//! Applies offset and pattern patches to a target executable through one
//! exclusively-held read/write file handle. Writes are direct in-place
//! overwrites: no backup copy is made, and there is no retry or partial-write
//! recovery. A patch that fails is reported as a failed [`PatchResult`] and
//! does not stop the remaining patches in the same run.
//!
//! Patches are consumed by application. [`apply_all`] takes its patch lists
//! by value, so the same buffers cannot be applied a second time; callers
//! clone the lists out of an immutable [`BuildRecord`](crate::BuildRecord)
//! when they need to keep the catalog around.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::patch::{OffsetPatch, PatchResult, PatternPatch};
use crate::scan::find_pattern;

/// Apply one offset patch to an open target file
///
/// Fails without touching the file when the write would run past the end of
/// the file. The patch is consumed either way.
pub fn apply_offset(file: &mut File, patch: OffsetPatch) -> PatchResult {
    let outcome = write_at_offset(file, patch.offset, &patch.payload);
    if let Err(err) = &outcome {
        log::warn!("Offset patch '{}' failed: {err}", patch.description);
    }
    PatchResult {
        description: patch.description,
        success: outcome.is_ok(),
    }
}

/// Apply one pattern patch to an open target file
///
/// Scans the current file contents for the patch's byte sequence and
/// overwrites the first occurrence. A pattern that is not found fails the
/// patch without writing anything. The patch is consumed either way.
pub fn apply_pattern(file: &mut File, patch: PatternPatch) -> PatchResult {
    let outcome = write_at_pattern(file, &patch.pattern, &patch.payload);
    if let Err(err) = &outcome {
        log::warn!("Pattern patch '{}' failed: {err}", patch.description);
    }
    PatchResult {
        description: patch.description,
        success: outcome.is_ok(),
    }
}

fn write_at_offset(file: &mut File, offset: u64, payload: &[u8]) -> Result<()> {
    let size = file.metadata()?.len();
    match offset.checked_add(payload.len() as u64) {
        Some(end) if end <= size => {}
        _ => {
            return Err(Error::OffsetOutOfBounds {
                offset,
                len: payload.len(),
                size,
            });
        }
    }
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(payload)?;
    Ok(())
}

fn write_at_pattern(file: &mut File, pattern: &[u8], payload: &[u8]) -> Result<()> {
    // Re-read on every call so patches applied earlier in the run are
    // visible to later pattern scans.
    let mut contents = Vec::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut contents)?;

    let pos = find_pattern(&contents, pattern).ok_or(Error::PatternNotFound)?;
    file.seek(SeekFrom::Start(pos as u64))?;
    file.write_all(payload)?;
    Ok(())
}

/// Apply every patch registered for a build to the target file
///
/// The file is opened once for the whole run. Pattern patches are applied
/// first, in list order, followed by offset patches in list order; the
/// returned results are in that same order, one per patch regardless of
/// individual success or failure. Only a target file that cannot be opened
/// at all aborts the run with an error.
pub fn apply_all<P: AsRef<Path>>(
    path: P,
    offset_patches: Vec<OffsetPatch>,
    pattern_patches: Vec<PatternPatch>,
) -> Result<Vec<PatchResult>> {
    let path = path.as_ref();
    let mut file = OpenOptions::new().read(true).write(true).open(path)?;
    log::debug!(
        "Applying {} pattern and {} offset patches to {}",
        pattern_patches.len(),
        offset_patches.len(),
        path.display()
    );

    let mut results = Vec::with_capacity(pattern_patches.len() + offset_patches.len());
    for patch in pattern_patches {
        results.push(apply_pattern(&mut file, patch));
    }
    for patch in offset_patches {
        results.push(apply_offset(&mut file, patch));
    }

    Ok(results)
}

//! Patch records and application results
//!
//! A patch is a single byte rewrite against one exact build of an executable.
//! Offset patches write at a fixed absolute file position; pattern patches
//! write at the location of a located byte sequence. Both carry a
//! human-readable description that doubles as the deduplication key within
//! one build's patch list.

/// A byte overwrite at a fixed absolute file position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPatch {
    /// Human-readable label, unique within one build's offset patch list
    pub description: String,
    /// Absolute byte position in the target file where the write starts
    pub offset: u64,
    /// Bytes written starting at `offset`
    pub payload: Vec<u8>,
}

/// A byte overwrite at the location of a located exact byte sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternPatch {
    /// Human-readable label, unique within one build's pattern patch list
    pub description: String,
    /// Byte sequence searched for verbatim; never empty
    pub pattern: Vec<u8>,
    /// Bytes written at the match start; same length as `pattern`
    pub payload: Vec<u8>,
}

/// Outcome of one patch application attempt
///
/// One result is produced per patch per run, in application order, so callers
/// can correlate results to patches by position as well as by description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult {
    /// Description copied from the source patch at application time
    pub description: String,
    /// Whether the underlying offset or pattern write succeeded
    pub success: bool,
}

//! Build registry and catalog loading
//!
//! A [`Catalog`] is the parsed form of a patch definitions file: a list of
//! [`BuildRecord`]s, each identified by a content fingerprint and owning the
//! patches attached to it during parsing. The catalog is populated once by
//! [`Catalog::load`] or [`Catalog::parse`] and is read-only afterwards.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::fingerprint;
use crate::parser;
use crate::patch::{OffsetPatch, PatternPatch};

/// One exactly-identified release of an executable and its registered patches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRecord {
    /// Identifier from the catalog definition line; only a grouping key
    pub id: String,
    /// Expected filename of the target binary (informational)
    pub executable_name: String,
    /// Content checksum string uniquely identifying this exact build
    pub fingerprint: String,
    /// Group tags this build belongs to
    pub group_ids: HashSet<String>,
    /// Offset patches in catalog definition order
    pub offset_patches: Vec<OffsetPatch>,
    /// Pattern patches in catalog definition order
    pub pattern_patches: Vec<PatternPatch>,
}

impl BuildRecord {
    /// True if this build has at least one patch of either kind
    pub fn has_patches(&self) -> bool {
        !self.offset_patches.is_empty() || !self.pattern_patches.is_empty()
    }
}

/// The full parsed set of build and patch records
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    builds: Vec<BuildRecord>,
}

impl Catalog {
    /// Load and parse a catalog definitions file
    ///
    /// An unreadable file is fatal: no builds are loaded and the error is
    /// returned to the caller. Malformed lines inside a readable file are
    /// skipped individually and never fail the load.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Parse catalog definitions from text
    ///
    /// Never fails: malformed lines are skipped, and a catalog with zero
    /// builds or zero patches is a valid (empty) result.
    pub fn parse(text: &str) -> Self {
        let builds = parser::parse_catalog(text);
        log::debug!("Loaded {} build records from catalog", builds.len());
        Self { builds }
    }

    /// All build records in registration order
    pub fn builds(&self) -> &[BuildRecord] {
        &self.builds
    }

    /// Look up a build by its content fingerprint
    ///
    /// Linear scan in registration order; the first match wins. An empty
    /// fingerprint never matches, even if a malformed build line registered
    /// an empty checksum field.
    pub fn find_build(&self, fingerprint: &str) -> Option<&BuildRecord> {
        if fingerprint.is_empty() {
            return None;
        }
        self.builds.iter().find(|b| b.fingerprint == fingerprint)
    }

    /// Resolve a concrete executable file to its build record
    ///
    /// Hashes the file contents and looks the digest up with
    /// [`find_build`](Self::find_build). An empty path, an unreadable file,
    /// or an unknown fingerprint all resolve to `None`.
    pub fn find_build_for_file<P: AsRef<Path>>(&self, path: P) -> Option<&BuildRecord> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return None;
        }
        match fingerprint::compute(path) {
            Ok(digest) => self.find_build(&digest),
            Err(err) => {
                log::debug!("Cannot fingerprint {}: {err}", path.display());
                None
            }
        }
    }

    /// True iff at least one build has a non-empty patch list
    pub fn any_patches_loaded(&self) -> bool {
        self.builds.iter().any(BuildRecord::has_patches)
    }
}

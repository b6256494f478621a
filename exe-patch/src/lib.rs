//! # exe_patch - Executable Patch Catalog Library
//!
//! Identifies a binary executable by content fingerprint, looks up the
//! patches registered for that exact build in a patch definitions catalog,
//! and rewrites byte ranges in the file in place - either at a fixed offset
//! or at the location of a located byte pattern - to alter program behavior
//! without recompilation.
//!
//! ## Catalog format
//!
//! Catalogs are line-oriented text. Builds are registered with their
//! executable name, checksum and group tags; patches target one or more
//! groups and attach to every registered build sharing one of them:
//!
//! ```text
//! # comment line
//! <build_id> = <exe_filename>:<md5_hex>:<group1>[,<group2>...]
//! patch = <description>:<offset|pattern>:<group1>[,...]:<hex_offset_or_hex_pattern>:<hex_payload>
//! ```
//!
//! Malformed lines are skipped; an unreadable catalog file is the only fatal
//! load error.
//!
//! ## Examples
//!
//! ```
//! use exe_patch::Catalog;
//!
//! let defs = "\
//! # nightly builds
//! steam = game.exe:1aa1:stable
//! patch = SkipIntro:offset:stable:1c:9090
//! ";
//!
//! let catalog = Catalog::parse(defs);
//! let build = catalog.find_build("1aa1").expect("known build");
//! assert_eq!(build.executable_name, "game.exe");
//! assert_eq!(build.offset_patches.len(), 1);
//! ```
//!
//! Applying the patches of a resolved build to a target file:
//!
//! ```no_run
//! use exe_patch::{Catalog, apply_all};
//!
//! # fn main() -> exe_patch::Result<()> {
//! let catalog = Catalog::load("patches.def")?;
//! let build = catalog
//!     .find_build_for_file("game.exe")
//!     .expect("recognized build");
//!
//! let results = apply_all(
//!     "game.exe",
//!     build.offset_patches.clone(),
//!     build.pattern_patches.clone(),
//! )?;
//! for result in &results {
//!     println!("{}: {}", result.description, result.success);
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod apply;
pub mod catalog;
pub mod error;
pub mod fingerprint;
pub mod parser;
pub mod patch;
pub mod scan;

// Re-export commonly used types
pub use apply::{apply_all, apply_offset, apply_pattern};
pub use catalog::{BuildRecord, Catalog};
pub use error::{Error, Result};
pub use parser::{Line, ParsedPatch, SkipReason, tokenize_line};
pub use patch::{OffsetPatch, PatchResult, PatternPatch};

//! Catalog definition parsing
//!
//! The catalog format is line-oriented text. Each line is either a comment,
//! a build record, or a patch record:
//!
//! ```text
//! # comment
//! <build_id> = <exe_filename>:<checksum>:<group>[,<group>...]
//! patch = <description>:<offset|pattern>:<group>[,<group>...]:<hex>:<hex_payload>
//! ```
//!
//! Parsing is defensively tolerant: a malformed line is skipped and parsing
//! continues with the next one. [`tokenize_line`] classifies a single line
//! into a tagged [`Line`] value, so every skip carries a typed
//! [`SkipReason`] instead of being silently dropped by ad hoc field-count
//! checks.

use std::collections::HashSet;

use crate::catalog::BuildRecord;
use crate::patch::{OffsetPatch, PatternPatch};

/// Why a malformed catalog line was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No `=` separator on the line
    MissingSeparator,
    /// Nothing after the `=` separator
    EmptyValue,
    /// Build line right-hand side did not have exactly three `:` fields
    BuildFieldCount,
    /// Patch line right-hand side did not have exactly five `:` fields
    PatchFieldCount,
    /// Payload hex field had odd length
    OddPayloadHex,
    /// Pattern hex field had odd length
    OddPatternHex,
    /// Patch kind was neither `offset` nor `pattern`
    UnknownKind,
    /// Empty target group list
    NoGroups,
    /// Payload or pattern hex contained non-hex characters
    BadHex,
    /// Offset field was not a hexadecimal integer
    BadOffset,
    /// Pattern hex decoded to zero bytes
    EmptyPattern,
    /// Pattern and payload decode to different byte lengths
    LengthMismatch,
    /// Empty patch description
    EmptyDescription,
}

/// A patch parsed from a catalog line, before group attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPatch {
    /// Patch at a fixed absolute file position
    Offset(OffsetPatch),
    /// Patch at the location of a located byte sequence
    Pattern(PatternPatch),
}

/// Classification of a single catalog line
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    /// Blank line or comment; carries no data
    Ignored,
    /// A new build record with empty patch lists
    Build(BuildRecord),
    /// A patch targeting one or more groups
    Patch {
        /// Group ids the patch is attached to, in written order
        groups: Vec<String>,
        /// The parsed patch record
        patch: ParsedPatch,
    },
    /// Malformed line, ignored with a reason
    Skipped(SkipReason),
}

/// Classify one catalog line
///
/// Leading and trailing whitespace is stripped before interpretation, and
/// each field is trimmed individually. Lines whose first character is `#`
/// are comments.
pub fn tokenize_line(raw: &str) -> Line {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Line::Ignored;
    }

    let Some((key, value)) = line.split_once('=') else {
        return Line::Skipped(SkipReason::MissingSeparator);
    };
    let key = key.trim();
    let value = value.trim();
    if value.is_empty() {
        return Line::Skipped(SkipReason::EmptyValue);
    }

    if key == "patch" {
        tokenize_patch(value)
    } else {
        tokenize_build(key, value)
    }
}

fn tokenize_build(id: &str, value: &str) -> Line {
    let fields: Vec<&str> = value.split(':').map(str::trim).collect();
    let [exe_filename, checksum, groups] = fields[..] else {
        return Line::Skipped(SkipReason::BuildFieldCount);
    };

    let group_ids: HashSet<String> = groups.split(',').map(|g| g.trim().to_string()).collect();

    Line::Build(BuildRecord {
        id: id.to_string(),
        executable_name: exe_filename.to_string(),
        fingerprint: checksum.to_string(),
        group_ids,
        offset_patches: Vec::new(),
        pattern_patches: Vec::new(),
    })
}

fn tokenize_patch(value: &str) -> Line {
    let fields: Vec<&str> = value.split(':').map(str::trim).collect();
    let [description, kind, groups, locator, payload_hex] = fields[..] else {
        return Line::Skipped(SkipReason::PatchFieldCount);
    };

    // Payload parity is checked before kind dispatch.
    if payload_hex.len() % 2 != 0 {
        return Line::Skipped(SkipReason::OddPayloadHex);
    }
    match kind {
        "offset" => {}
        "pattern" => {
            if locator.len() % 2 != 0 {
                return Line::Skipped(SkipReason::OddPatternHex);
            }
        }
        _ => return Line::Skipped(SkipReason::UnknownKind),
    }

    if groups.is_empty() {
        return Line::Skipped(SkipReason::NoGroups);
    }
    let groups: Vec<String> = groups.split(',').map(|g| g.trim().to_string()).collect();

    let Ok(payload) = hex::decode(payload_hex) else {
        return Line::Skipped(SkipReason::BadHex);
    };

    let patch = match kind {
        "offset" => {
            let Ok(offset) = u64::from_str_radix(locator, 16) else {
                return Line::Skipped(SkipReason::BadOffset);
            };
            ParsedPatch::Offset(OffsetPatch {
                description: description.to_string(),
                offset,
                payload,
            })
        }
        _ => {
            let Ok(pattern) = hex::decode(locator) else {
                return Line::Skipped(SkipReason::BadHex);
            };
            if pattern.is_empty() {
                return Line::Skipped(SkipReason::EmptyPattern);
            }
            if pattern.len() != payload.len() {
                return Line::Skipped(SkipReason::LengthMismatch);
            }
            ParsedPatch::Pattern(PatternPatch {
                description: description.to_string(),
                pattern,
                payload,
            })
        }
    };

    if description.is_empty() {
        return Line::Skipped(SkipReason::EmptyDescription);
    }

    Line::Patch { groups, patch }
}

/// Parse full catalog text into build records with attached patches
pub(crate) fn parse_catalog(text: &str) -> Vec<BuildRecord> {
    let mut builds = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        match tokenize_line(raw) {
            Line::Ignored => {}
            Line::Build(build) => builds.push(build),
            Line::Patch { groups, patch } => attach(&mut builds, &groups, &patch),
            Line::Skipped(reason) => {
                log::debug!("Skipping malformed catalog line {}: {reason:?}", idx + 1);
            }
        }
    }

    builds
}

/// Attach a parsed patch to the builds sharing one of its target groups,
/// deduplicating by description.
///
/// For each target group, builds are scanned in registration order. A build
/// that already holds a patch with the same description ends the scan for
/// that group id entirely; builds registered after it are not considered
/// under that group. Catalogs in the field depend on this attachment order,
/// so it must not change without coordinating a catalog migration.
fn attach(builds: &mut [BuildRecord], groups: &[String], patch: &ParsedPatch) {
    for group in groups {
        for build in builds.iter_mut() {
            if !build.group_ids.contains(group) {
                continue;
            }
            let duplicate = match patch {
                ParsedPatch::Offset(p) => build
                    .offset_patches
                    .iter()
                    .any(|q| q.description == p.description),
                ParsedPatch::Pattern(p) => build
                    .pattern_patches
                    .iter()
                    .any(|q| q.description == p.description),
            };
            if duplicate {
                break;
            }
            match patch {
                ParsedPatch::Offset(p) => build.offset_patches.push(p.clone()),
                ParsedPatch::Pattern(p) => build.pattern_patches.push(p.clone()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<BuildRecord> {
        parse_catalog(text)
    }

    #[test]
    fn test_comments_and_blanks_ignored() {
        assert_eq!(tokenize_line(""), Line::Ignored);
        assert_eq!(tokenize_line("   "), Line::Ignored);
        assert_eq!(tokenize_line("# patch = x:offset:g:10:aa"), Line::Ignored);
        assert_eq!(tokenize_line("  # indented comment"), Line::Ignored);
    }

    #[test]
    fn test_missing_separator_skipped() {
        assert_eq!(
            tokenize_line("just some text"),
            Line::Skipped(SkipReason::MissingSeparator)
        );
        assert_eq!(
            tokenize_line("build1 ="),
            Line::Skipped(SkipReason::EmptyValue)
        );
    }

    #[test]
    fn test_build_line_round_trip() {
        let line = tokenize_line("  steam =  game.exe : 1aa1 : stable , beta  ");
        let Line::Build(build) = line else {
            panic!("expected build line, got {line:?}");
        };
        assert_eq!(build.id, "steam");
        assert_eq!(build.executable_name, "game.exe");
        assert_eq!(build.fingerprint, "1aa1");
        assert!(build.group_ids.contains("stable"));
        assert!(build.group_ids.contains("beta"));
        assert_eq!(build.group_ids.len(), 2);
        assert!(build.offset_patches.is_empty());
        assert!(build.pattern_patches.is_empty());
    }

    #[test]
    fn test_build_line_field_count() {
        assert_eq!(
            tokenize_line("b = game.exe:1aa1"),
            Line::Skipped(SkipReason::BuildFieldCount)
        );
        assert_eq!(
            tokenize_line("b = game.exe:1aa1:g1:extra"),
            Line::Skipped(SkipReason::BuildFieldCount)
        );
    }

    #[test]
    fn test_offset_patch_line() {
        let line = tokenize_line("patch = SkipIntro:offset:stable:1c:9090");
        let Line::Patch { groups, patch } = line else {
            panic!("expected patch line, got {line:?}");
        };
        assert_eq!(groups, vec!["stable".to_string()]);
        assert_eq!(
            patch,
            ParsedPatch::Offset(OffsetPatch {
                description: "SkipIntro".to_string(),
                offset: 0x1c,
                payload: vec![0x90, 0x90],
            })
        );
    }

    #[test]
    fn test_pattern_patch_line() {
        let line = tokenize_line("patch = Swap:pattern:g1,g2:dead:beef");
        let Line::Patch { groups, patch } = line else {
            panic!("expected patch line, got {line:?}");
        };
        assert_eq!(groups, vec!["g1".to_string(), "g2".to_string()]);
        assert_eq!(
            patch,
            ParsedPatch::Pattern(PatternPatch {
                description: "Swap".to_string(),
                pattern: vec![0xde, 0xad],
                payload: vec![0xbe, 0xef],
            })
        );
    }

    #[test]
    fn test_patch_field_count() {
        assert_eq!(
            tokenize_line("patch = Fix:offset:g1:10"),
            Line::Skipped(SkipReason::PatchFieldCount)
        );
    }

    #[test]
    fn test_odd_payload_hex_skipped_for_either_kind() {
        assert_eq!(
            tokenize_line("patch = Fix:offset:g1:10:abc"),
            Line::Skipped(SkipReason::OddPayloadHex)
        );
        assert_eq!(
            tokenize_line("patch = Fix:pattern:g1:dead:abc"),
            Line::Skipped(SkipReason::OddPayloadHex)
        );
        // Payload parity is checked before the kind is even looked at.
        assert_eq!(
            tokenize_line("patch = Fix:bogus:g1:10:abc"),
            Line::Skipped(SkipReason::OddPayloadHex)
        );
    }

    #[test]
    fn test_odd_pattern_hex_skipped() {
        assert_eq!(
            tokenize_line("patch = Fix:pattern:g1:dea:beef"),
            Line::Skipped(SkipReason::OddPatternHex)
        );
    }

    #[test]
    fn test_unknown_kind_skipped() {
        assert_eq!(
            tokenize_line("patch = Fix:poke:g1:10:aa"),
            Line::Skipped(SkipReason::UnknownKind)
        );
    }

    #[test]
    fn test_empty_group_list_skipped() {
        assert_eq!(
            tokenize_line("patch = Fix:offset::10:aa"),
            Line::Skipped(SkipReason::NoGroups)
        );
    }

    #[test]
    fn test_bad_offset_hex_skipped() {
        assert_eq!(
            tokenize_line("patch = NoOp:offset:g1:ZZ:aa"),
            Line::Skipped(SkipReason::BadOffset)
        );
    }

    #[test]
    fn test_bad_payload_hex_skipped() {
        assert_eq!(
            tokenize_line("patch = Fix:offset:g1:10:gg"),
            Line::Skipped(SkipReason::BadHex)
        );
        assert_eq!(
            tokenize_line("patch = Fix:pattern:g1:zzzz:beef"),
            Line::Skipped(SkipReason::BadHex)
        );
    }

    #[test]
    fn test_empty_pattern_skipped() {
        assert_eq!(
            tokenize_line("patch = Fix:pattern:g1::aa"),
            Line::Skipped(SkipReason::EmptyPattern)
        );
    }

    #[test]
    fn test_pattern_payload_length_mismatch_skipped() {
        assert_eq!(
            tokenize_line("patch = Fix:pattern:g1:dead:be"),
            Line::Skipped(SkipReason::LengthMismatch)
        );
    }

    #[test]
    fn test_empty_description_skipped() {
        assert_eq!(
            tokenize_line("patch = :offset:g1:10:aa"),
            Line::Skipped(SkipReason::EmptyDescription)
        );
    }

    #[test]
    fn test_patch_attaches_to_matching_builds() {
        let builds = parse(
            "b1 = a.exe:01:g1\n\
             b2 = b.exe:02:g2\n\
             patch = Fix:offset:g1:10:aa\n",
        );
        assert_eq!(builds[0].offset_patches.len(), 1);
        assert_eq!(builds[0].offset_patches[0].description, "Fix");
        assert!(builds[1].offset_patches.is_empty());
    }

    #[test]
    fn test_duplicate_patch_line_not_re_added() {
        let builds = parse(
            "b1 = a.exe:01:g1\n\
             patch = Fix:offset:g1:10:aa\n\
             patch = Fix:offset:g1:20:bb\n",
        );
        assert_eq!(builds[0].offset_patches.len(), 1);
        assert_eq!(builds[0].offset_patches[0].offset, 0x10);
    }

    #[test]
    fn test_two_matching_groups_do_not_duplicate() {
        let builds = parse(
            "b1 = a.exe:01:g1,g2\n\
             patch = Fix:offset:g1,g2:10:aa\n",
        );
        assert_eq!(builds[0].offset_patches.len(), 1);
    }

    #[test]
    fn test_duplicate_description_ends_group_scan() {
        // b2 already holds "Fix" from the first patch line. The second line
        // attaches to b1, then hits the duplicate on b2 and stops scanning
        // g1 there, so b3 never receives it.
        let builds = parse(
            "b1 = a.exe:01:g1\n\
             b2 = b.exe:02:g1,g2\n\
             b3 = c.exe:03:g1\n\
             patch = Fix:offset:g2:10:aa\n\
             patch = Fix:offset:g1:10:bb\n",
        );
        assert_eq!(builds[0].offset_patches.len(), 1);
        assert_eq!(builds[0].offset_patches[0].payload, vec![0xbb]);
        assert_eq!(builds[1].offset_patches.len(), 1);
        assert_eq!(builds[1].offset_patches[0].payload, vec![0xaa]);
        assert!(builds[2].offset_patches.is_empty());
    }

    #[test]
    fn test_offset_and_pattern_lists_dedup_independently() {
        let builds = parse(
            "b1 = a.exe:01:g1\n\
             patch = Fix:offset:g1:10:aa\n\
             patch = Fix:pattern:g1:dead:beef\n",
        );
        assert_eq!(builds[0].offset_patches.len(), 1);
        assert_eq!(builds[0].pattern_patches.len(), 1);
    }

    #[test]
    fn test_patch_line_before_any_build_is_lost() {
        let builds = parse(
            "patch = Fix:offset:g1:10:aa\n\
             b1 = a.exe:01:g1\n",
        );
        assert!(builds[0].offset_patches.is_empty());
    }

    #[test]
    fn test_malformed_lines_do_not_stop_parsing() {
        let builds = parse(
            "garbage\n\
             b1 = a.exe:01\n\
             b2 = b.exe:02:g1\n\
             patch = Fix:offset:g1:ZZ:aa\n\
             patch = Fix2:offset:g1:10:aa\n",
        );
        assert_eq!(builds.len(), 1);
        assert_eq!(builds[0].id, "b2");
        assert_eq!(builds[0].offset_patches.len(), 1);
        assert_eq!(builds[0].offset_patches[0].description, "Fix2");
    }
}

//! Address cleanup and search-variant generation
//!
//! Donor-entered addresses are messy: house-number prefixes ("NO:12"),
//! doubled commas, stray whitespace. This module cleans them up and derives
//! the ordered list of search strings the resolver feeds to the provider,
//! from most to least specific.

use crate::geocode::RegionProfile;

/// Number of search variants generated for every address.
pub const VARIANT_COUNT: usize = 7;

/// Address cleanup and variant derivation utilities
pub struct AddressNormalizer;

impl AddressNormalizer {
    /// Clean a raw address string.
    ///
    /// Trims, strips a leading `NO:<digits>` house-number token
    /// (case-insensitive), and collapses repeated whitespace and commas.
    #[must_use]
    pub fn clean(raw: &str) -> String {
        let stripped = strip_house_number(raw.trim());
        let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Derive the ordered search variants for one address.
    ///
    /// Always returns exactly [`VARIANT_COUNT`] entries, most specific
    /// first. Duplicates are possible for short addresses and are kept —
    /// the resolver consumes the list in order and stops at the first hit.
    #[must_use]
    pub fn variants(raw: &str, region: &RegionProfile) -> Vec<String> {
        let cleaned = Self::clean(raw);
        let segments: Vec<&str> = cleaned
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();

        let first_segment = segments.first().map_or(cleaned.clone(), |s| String::from(*s));
        let first_two = if segments.len() >= 2 {
            format!("{}, {}", segments[0], segments[1])
        } else {
            cleaned.clone()
        };

        let primary = &region.primary_name;
        let alternate = &region.alternate_name;
        let qualifier = &region.admin_qualifier;
        let country = &region.country;

        vec![
            format!("{cleaned}, {primary}, {country}"),
            format!("{cleaned}, {alternate}, {country}"),
            format!("{cleaned}, {primary}, {qualifier}, {country}"),
            format!("{cleaned}, {alternate}, {qualifier}, {country}"),
            format!("{qualifier}, {country}"),
            format!("{first_two}, {primary}, {country}"),
            format!("{first_segment}, {primary}, {country}"),
        ]
    }
}

/// Strip a leading house-number token matching `NO:<digits>`.
///
/// Accepts optional spaces around the colon and swallows one trailing
/// comma/space run. Anything that does not complete the pattern is left
/// untouched ("North Street" survives).
fn strip_house_number(input: &str) -> &str {
    let bytes = input.as_bytes();
    if bytes.len() < 3
        || !bytes[0].eq_ignore_ascii_case(&b'n')
        || !bytes[1].eq_ignore_ascii_case(&b'o')
    {
        return input;
    }

    let mut idx = 2;
    while idx < bytes.len() && bytes[idx] == b' ' {
        idx += 1;
    }
    if idx >= bytes.len() || bytes[idx] != b':' {
        return input;
    }
    idx += 1;
    while idx < bytes.len() && bytes[idx] == b' ' {
        idx += 1;
    }

    let digit_start = idx;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == digit_start {
        return input;
    }

    while idx < bytes.len() && (bytes[idx] == b',' || bytes[idx] == b' ') {
        idx += 1;
    }
    &input[idx..]
}

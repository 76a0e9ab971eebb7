//! Positional pairing of request identifiers with response entries.
//!
//! The nth response entry belongs to the nth requested identifier. Pairing
//! them up front turns a length mismatch into an explicit [`Alignment`]
//! instead of an out-of-range lookup.

use serde_json::Value;

/// How the identifier list and the entry list line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Exact,
    /// More entries than identifiers; the trailing entries have no identifier.
    MissingIdentifiers { entries: usize, identifiers: usize },
    /// More identifiers than entries; the trailing identifiers are unused.
    SurplusIdentifiers { entries: usize, identifiers: usize },
}

impl Alignment {
    fn of(entries: usize, identifiers: usize) -> Self {
        if entries > identifiers {
            Alignment::MissingIdentifiers {
                entries,
                identifiers,
            }
        } else if identifiers > entries {
            Alignment::SurplusIdentifiers {
                entries,
                identifiers,
            }
        } else {
            Alignment::Exact
        }
    }
}

/// The identifier slot paired with one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    Identifier(&'a str),
    /// The request had a value at this position, but not a string.
    NotAString,
    /// The request had no value at this position.
    Missing,
}

#[derive(Debug)]
pub struct Pair<'a> {
    pub index: usize,
    pub slot: Slot<'a>,
    pub entry: &'a mut Value,
}

/// Pairs every entry with the identifier at the same index.
pub fn correlate<'a>(
    identifiers: &'a [Option<String>],
    entries: &'a mut [Value],
) -> (Alignment, Vec<Pair<'a>>) {
    let alignment = Alignment::of(entries.len(), identifiers.len());
    let pairs = entries
        .iter_mut()
        .enumerate()
        .map(|(index, entry)| {
            let slot = match identifiers.get(index) {
                Some(Some(id)) => Slot::Identifier(id.as_str()),
                Some(None) => Slot::NotAString,
                None => Slot::Missing,
            };
            Pair { index, slot, entry }
        })
        .collect();
    (alignment, pairs)
}

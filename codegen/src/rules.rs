//! Row filtering and rewriting.
//!
//! Every GID in `[0, 2^width)` is a candidate row. A candidate is dropped if
//! it is explicitly excluded or if it energises both relays of a conflict
//! pair; survivors have their dependent positions rewritten and are then
//! decimated by GID parity. Whatever is left is numbered densely in
//! enumeration order.

use std::collections::HashSet;
use std::ops::RangeInclusive;

use log::debug;

use crate::config::{Decimation, Dependency, TableConfig};
use crate::vector::{StateVector, MAX_WIDTH};

/// Why a candidate GID was not emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Listed in the exclusion list.
    Excluded,
    /// Both positions of the given conflict pair are set.
    Conflict([u32; 2]),
    /// Dropped by parity decimation.
    Decimated,
}

/// Outcome of evaluating one GID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Emit this (possibly rewritten) vector.
    Keep(StateVector),
    /// Do not emit the GID.
    Skip(Skip),
}

/// A retained table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// Dense index among retained rows.
    pub state: u32,
    /// Generator index the row was derived from.
    pub gid: u32,
    /// Row contents after dependent-bit rewriting.
    pub vector: StateVector,
}

impl Row {
    /// Returns `true` if a dependency changed the row away from its GID.
    pub fn is_rewritten(&self) -> bool {
        self.vector.to_gid() != self.gid
    }
}

/// Compiled row rules for one configuration.
#[derive(Debug, Clone)]
pub struct RowRules {
    width: u32,
    exclude: HashSet<u32>,
    conflicts: Vec<[u32; 2]>,
    dependencies: Vec<Dependency>,
    decimation: Decimation,
}

impl RowRules {
    /// Builds the rules from an already validated configuration.
    pub fn from_config(config: &TableConfig) -> Self {
        Self {
            width: config.width,
            exclude: config.exclude.iter().copied().collect(),
            conflicts: config.conflicts.clone(),
            dependencies: config.dependencies.clone(),
            decimation: config.decimation,
        }
    }

    /// Vector width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Decides whether `gid` is emitted and, if so, with which bits.
    pub fn evaluate(&self, gid: u32) -> Disposition {
        let disposition = self.classify(gid);
        if let Disposition::Skip(reason) = disposition {
            debug!("GID {gid} skipped: {reason:?}");
        }
        disposition
    }

    fn classify(&self, gid: u32) -> Disposition {
        if self.exclude.contains(&gid) {
            return Disposition::Skip(Skip::Excluded);
        }

        let mut vector = StateVector::from_gid(gid, self.width);
        if let Some(&pair) = self
            .conflicts
            .iter()
            .find(|[a, b]| vector.bit(*a) && vector.bit(*b))
        {
            return Disposition::Skip(Skip::Conflict(pair));
        }

        for dep in &self.dependencies {
            let value = vector.bit(dep.source);
            vector.set_bit(dep.target, value);
        }

        if self.decimation.drops(gid) {
            return Disposition::Skip(Skip::Decimated);
        }

        Disposition::Keep(vector)
    }

    /// Iterates every GID with its disposition, in enumeration order.
    pub fn dispositions(&self) -> impl Iterator<Item = (u32, Disposition)> + '_ {
        gids(self.width).map(move |gid| (gid, self.evaluate(gid)))
    }

    /// Iterates the retained rows, numbering them as they are produced.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            rules: self,
            gids: gids(self.width),
            next_state: 0,
        }
    }
}

/// Iterator over retained rows. See [`RowRules::rows`].
pub struct Rows<'a> {
    rules: &'a RowRules,
    gids: RangeInclusive<u32>,
    next_state: u32,
}

impl Iterator for Rows<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        for gid in self.gids.by_ref() {
            if let Disposition::Keep(vector) = self.rules.evaluate(gid) {
                let row = Row {
                    state: self.next_state,
                    gid,
                    vector,
                };
                self.next_state += 1;
                return Some(row);
            }
        }
        None
    }
}

/// All GIDs of a `width`-bit table, `width` in `1..=32`.
fn gids(width: u32) -> RangeInclusive<u32> {
    0..=u32::MAX >> (MAX_WIDTH - width)
}

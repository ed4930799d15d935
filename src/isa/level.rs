//! Cumulative capability levels.

use tracing::trace;

use super::ast::LevelFields;
use super::model::{LevelDef, SizeList};
use super::table::Table;

/// Folds partial level declarations into cumulative capability sets.
///
/// Every level records a snapshot of everything declared so far, so later levels are
/// supersets of earlier ones and `addr` never decreases.
#[derive(Debug, Default)]
pub struct LevelAccumulator {
    sizes: SizeList,
    types: Vec<String>,
    addr: u32,
}

impl LevelAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one level's declarations and returns the snapshot recorded for it.
    pub fn push(&mut self, name: &str, fields: &LevelFields) -> LevelDef {
        for &size in &fields.sizes {
            if !self.sizes.contains(&size) {
                self.sizes.push(size);
            }
        }
        for ty in &fields.types {
            if !self.types.contains(ty) {
                self.types.push(ty.clone());
            }
        }
        if let Some(addr) = fields.addr {
            self.addr = self.addr.max(addr);
        }
        trace!(
            id = name,
            sizes = self.sizes.len(),
            types = self.types.len(),
            addr = self.addr,
            "accumulated level"
        );
        LevelDef {
            name: name.to_string(),
            sizes: self.sizes.clone(),
            types: self.types.clone(),
            addr: self.addr,
        }
    }

    /// Accumulates an ordered level sequence into a level table.
    pub fn accumulate<'a, I>(levels: I) -> Table<LevelDef>
    where
        I: IntoIterator<Item = &'a (String, LevelFields)>,
    {
        let mut accumulator = Self::new();
        levels
            .into_iter()
            .map(|(name, fields)| accumulator.push(name, fields))
            .collect()
    }
}

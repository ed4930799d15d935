//! Definition document loading.

pub mod defs;

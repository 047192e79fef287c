//! Per-type field tables mapping external names to record fields.
//!
//! Each record type declares its fields once, in declaration order; the
//! table derived from those declarations is memoized for the process
//! lifetime keyed by [`TypeId`], so repeated navigation never re-derives
//! the name mapping.

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, Mutex, OnceLock},
};

use super::Record;

/// One field of a record type: its declared (Rust) name, its external
/// serialization name if it has one, and whether it is excluded from
/// serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub declared: &'static str,
    pub external: Option<&'static str>,
    pub skip: bool,
}

/// Immutable lookup table from addressable name to declared field name,
/// built once per record type.
///
/// Name resolution, per field in declaration order, first match wins:
/// a field with an external name is addressable by that name only; a
/// field without one is addressable by its declared name. A field
/// excluded from serialization is invisible to external-name matching
/// but still addressable by its declared name unless an earlier field
/// already claimed it.
#[derive(Debug, Default)]
pub struct FieldTable {
    by_name: HashMap<&'static str, &'static str>,
}

impl FieldTable {
    pub(crate) fn build(specs: &'static [FieldSpec]) -> Self {
        let mut by_name = HashMap::with_capacity(specs.len());
        for spec in specs {
            let name = match spec.external {
                Some(external) if !spec.skip => external,
                _ => spec.declared,
            };
            by_name.entry(name).or_insert(spec.declared);
        }
        FieldTable { by_name }
    }

    /// Resolve a path segment to the declared name of the field it
    /// addresses, if any.
    pub fn lookup(&self, segment: &str) -> Option<&'static str> {
        self.by_name.get(segment).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

static TABLES: OnceLock<Mutex<HashMap<TypeId, Arc<FieldTable>>>> = OnceLock::new();

/// Get the field table for a record type, building and publishing it on
/// first access.
///
/// The table is a pure function of the type, so it is built outside the
/// lock; if two callers race on the same type, the first published
/// table wins and the duplicate is discarded.
pub fn fields(record: &dyn Record) -> Arc<FieldTable> {
    let tables = TABLES.get_or_init(|| Mutex::new(HashMap::new()));
    if let Some(table) = tables.lock().unwrap().get(&record.type_key()) {
        return Arc::clone(table);
    }

    let built = Arc::new(FieldTable::build(record.field_specs()));
    let mut tables = tables.lock().unwrap();
    Arc::clone(tables.entry(record.type_key()).or_insert(built))
}

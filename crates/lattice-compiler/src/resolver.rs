//! Import and builtin package resolution.
//!
//! Lowering never loads packages itself. It asks an [`ImportResolver`] for
//! builtin packages and for external build units, and turns a failed lookup
//! into a diagnostic on the import spec.

use lattice_core::adt::Value;
use lattice_core::{Bottom, ErrorCode, UnitId};
use rustc_hash::FxHashMap;

/// Source of builtin packages and imported build units.
pub trait ImportResolver {
    /// The builtin package imported as `path`.
    fn lookup_builtin_package(&self, path: &str) -> Option<Value>;

    /// A builtin package referenced by its short name inside a selector
    /// chain, without an import.
    fn lookup_builtin_shorthand(&self, name: &str) -> Option<Value> {
        let _ = name;
        None
    }

    /// Locate the build unit imported as `path`.
    fn load_import(&self, path: &str) -> Option<UnitId>;

    /// The root value of a loaded build unit.
    fn evaluate_to_value(&self, unit: UnitId) -> Value;
}

/// A resolver that knows no packages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImports;

impl ImportResolver for NoImports {
    fn lookup_builtin_package(&self, _path: &str) -> Option<Value> {
        None
    }

    fn load_import(&self, _path: &str) -> Option<UnitId> {
        None
    }

    fn evaluate_to_value(&self, unit: UnitId) -> Value {
        unknown_unit(unit)
    }
}

/// A resolver backed by in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct PackageTable {
    builtins: FxHashMap<String, Value>,
    shorthands: FxHashMap<String, String>,
    units: Vec<Value>,
    unit_paths: FxHashMap<String, UnitId>,
}

impl PackageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a builtin package under its import path.
    pub fn add_builtin(&mut self, path: impl Into<String>, value: Value) -> &mut Self {
        self.builtins.insert(path.into(), value);
        self
    }

    /// Make the builtin package at `path` reachable as `name` inside
    /// selectors.
    pub fn add_shorthand(&mut self, name: impl Into<String>, path: impl Into<String>) -> &mut Self {
        self.shorthands.insert(name.into(), path.into());
        self
    }

    /// Register an external build unit whose root evaluates to `value`.
    pub fn add_unit(&mut self, path: impl Into<String>, value: Value) -> UnitId {
        let id = UnitId::new(self.units.len() as u32);
        self.units.push(value);
        self.unit_paths.insert(path.into(), id);
        id
    }
}

impl ImportResolver for PackageTable {
    fn lookup_builtin_package(&self, path: &str) -> Option<Value> {
        self.builtins.get(path).cloned()
    }

    fn lookup_builtin_shorthand(&self, name: &str) -> Option<Value> {
        let path = self.shorthands.get(name)?;
        self.lookup_builtin_package(path)
    }

    fn load_import(&self, path: &str) -> Option<UnitId> {
        self.unit_paths.get(path).copied()
    }

    fn evaluate_to_value(&self, unit: UnitId) -> Value {
        self.units
            .get(unit.index() as usize)
            .cloned()
            .unwrap_or_else(|| unknown_unit(unit))
    }
}

fn unknown_unit(unit: UnitId) -> Value {
    Bottom::new(ErrorCode::EvalError, format!("unknown build unit {unit}")).into()
}

//! Build-session state.
//!
//! One `WeaveSession` spans one build session: the sequential, host-ordered
//! presentation of every compiled unit of a rebuild. It owns the
//! configuration, the diagnostics collected so far, and the cross-unit type
//! resolver the hierarchy walker consumes. It deliberately is an explicit
//! object handed into every processing call rather than process-global
//! state; a full rebuild constructs a fresh session (and a fresh registry).
use std::{collections::BTreeMap, sync::Arc};

use axinstr::units::{MethodDef, TypeDef, TypeResolver, Unit, operand::TypeName};
use parking_lot::{Mutex, RwLock};

use crate::{
    config::WeaveConfig,
    diag::{Diagnostic, Severity},
};

pub struct WeaveSession {
    pub config: WeaveConfig,

    /// Diagnostics in discovery order.
    diagnostics: Mutex<Vec<Diagnostic>>,

    /// Every unit presented so far, in presentation order. Cross-unit base
    /// references resolve against these.
    units: RwLock<Vec<Arc<RwLock<Unit>>>>,

    /// Resolve results, cached by full name. The cache serves ancestor
    /// walking only; body rewrites go through the unit handles, never
    /// through cached descriptors.
    resolve_cache: RwLock<BTreeMap<TypeName, TypeDef>>,
}

impl WeaveSession {
    pub fn new(config: WeaveConfig) -> Arc<Self> {
        Arc::new(WeaveSession {
            config,
            diagnostics: Mutex::new(Vec::new()),
            units: RwLock::new(Vec::new()),
            resolve_cache: RwLock::new(BTreeMap::new()),
        })
    }

    /// Makes a unit visible to cross-unit resolution.
    pub fn register_unit(&self, unit: Arc<RwLock<Unit>>) {
        self.units.write().push(unit);
    }

    /// Records a diagnostic and forwards it through the `log` facade. Use
    /// the `ax*!` macros instead of calling this directly.
    pub fn record(&self, diagnostic: Diagnostic) {
        log::log!(
            diagnostic.severity.log_level(),
            "{}",
            diagnostic.message
        );
        self.diagnostics.lock().push(diagnostic);
    }

    /// Snapshot of the diagnostics collected so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .lock()
            .iter()
            .any(|d| d.severity >= Severity::Error)
    }
}

impl TypeResolver for WeaveSession {
    fn find_type(&self, name: &TypeName) -> Option<TypeDef> {
        if let Some(found) = self.resolve_cache.read().get(name) {
            return Some(found.clone());
        }

        // Recursive read: resolution runs while the caller already holds a
        // read guard on the unit being processed.
        let units = self.units.read();
        for unit in units.iter() {
            let guard = unit.read_recursive();
            if let Some(ty) = guard.type_by_full_name(name) {
                let ty = ty.clone();
                self.resolve_cache
                    .write()
                    .insert(name.clone(), ty.clone());
                return Some(ty);
            }
        }

        // Not an error: the defining unit may simply not have been
        // presented. Misses stay uncached so a later unit can supply the
        // type.
        None
    }

    fn has_marker(&self, method: &MethodDef) -> bool {
        method.has_attribute(&self.config.marker_attribute)
    }
}

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::AnnotationSet;
use crate::types::{DeclId, ModuleId};

/// Thread-safe per-run cache of extracted annotation sets.
///
/// Filled once by parallel extraction, read afterwards. A declaration whose
/// extraction failed has no entry.
#[derive(Default)]
pub struct AnnotationCache {
    declarations: RwLock<HashMap<DeclId, Arc<AnnotationSet>>>,
    modules: RwLock<HashMap<ModuleId, Arc<AnnotationSet>>>,
}

impl AnnotationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: DeclId, set: AnnotationSet) {
        let mut map = self.declarations.write();
        map.insert(id, Arc::new(set));
    }

    pub fn insert_module(&self, id: ModuleId, set: AnnotationSet) {
        let mut map = self.modules.write();
        map.insert(id, Arc::new(set));
    }

    pub fn get(&self, id: DeclId) -> Option<Arc<AnnotationSet>> {
        let map = self.declarations.read();
        map.get(&id).cloned()
    }

    pub fn get_module(&self, id: ModuleId) -> Option<Arc<AnnotationSet>> {
        let map = self.modules.read();
        map.get(&id).cloned()
    }

    /// Number of declarations with a cached set
    pub fn declaration_count(&self) -> usize {
        self.declarations.read().len()
    }
}

//! generator::handle
//!
//! Generator identity.
//!
//! # Design
//!
//! Generators are often configured through builders and may hold state set
//! up in `init`. Two generators with equal configuration are still distinct:
//! each must be initialized on its own. Identity is therefore an explicit
//! [`GeneratorId`] allocated from a process-wide counter when a
//! [`GeneratorHandle`] is created, and the [`InitializedSet`] is keyed on
//! that id rather than on generator contents.
//!
//! Cloning a handle shares the generator and keeps its id.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{GenerateError, Generator, GeneratorContext, Random};
use super::hints::Hints;
use crate::core::types::{TypeKey, Value};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable per-instance generator identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorId(u64);

impl GeneratorId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// A shared generator together with its identity.
#[derive(Clone)]
pub struct GeneratorHandle {
    id: GeneratorId,
    inner: Arc<dyn Generator>,
}

impl GeneratorHandle {
    /// Register a generator, allocating a fresh id.
    pub fn new(generator: impl Generator + 'static) -> Self {
        Self::from_arc(Arc::new(generator))
    }

    /// Register an already shared generator, allocating a fresh id.
    pub fn from_arc(inner: Arc<dyn Generator>) -> Self {
        Self {
            id: GeneratorId::next(),
            inner,
        }
    }

    pub fn id(&self) -> GeneratorId {
        self.id
    }

    pub fn generator(&self) -> &dyn Generator {
        self.inner.as_ref()
    }

    pub fn init(&self, context: &GeneratorContext) {
        self.inner.init(context);
    }

    pub fn generate(&self, random: &mut Random) -> Result<Value, GenerateError> {
        self.inner.generate(random)
    }

    pub fn hints(&self) -> Hints {
        self.inner.hints()
    }

    pub fn target_type(&self) -> Option<TypeKey> {
        self.inner.target_type()
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }
}

impl fmt::Debug for GeneratorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorHandle")
            .field("id", &self.id)
            .field("generator", &self.inner)
            .finish()
    }
}

impl fmt::Display for GeneratorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.id)
    }
}

/// Generator ids that already received their one-time `init` call.
///
/// Scoped to one session; not meant to be shared between threads.
#[derive(Debug, Default)]
pub struct InitializedSet {
    ids: HashSet<GeneratorId>,
}

impl InitializedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize `handle` unless it already was in this session.
    ///
    /// Returns `true` if `init` ran.
    pub fn ensure(&mut self, handle: &GeneratorHandle, context: &GeneratorContext) -> bool {
        if self.ids.contains(&handle.id()) {
            return false;
        }
        handle.init(context);
        self.ids.insert(handle.id());
        true
    }

    pub fn contains(&self, id: GeneratorId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, Default)]
    struct Counting {
        inits: AtomicUsize,
    }

    impl Generator for Counting {
        fn init(&self, _context: &GeneratorContext) {
            self.inits.fetch_add(1, Ordering::SeqCst);
        }

        fn generate(&self, _random: &mut Random) -> Result<Value, GenerateError> {
            Ok(Value::Int(1))
        }
    }

    #[test]
    fn ids_are_unique() {
        let a = GeneratorHandle::new(Counting::default());
        let b = GeneratorHandle::new(Counting::default());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn clone_keeps_identity() {
        let a = GeneratorHandle::new(Counting::default());
        let b = a.clone();
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn ensure_runs_init_once_per_handle() {
        let shared = Arc::new(Counting::default());
        let handle = GeneratorHandle::from_arc(shared.clone());
        let ctx = GeneratorContext::default();
        let mut set = InitializedSet::new();

        assert!(set.ensure(&handle, &ctx));
        assert!(!set.ensure(&handle, &ctx));
        assert!(!set.ensure(&handle.clone(), &ctx));
        assert_eq!(shared.inits.load(Ordering::SeqCst), 1);
        assert!(set.contains(handle.id()));
    }

    #[test]
    fn equal_configurations_initialize_independently() {
        let first = Arc::new(Counting::default());
        let second = Arc::new(Counting::default());
        let a = GeneratorHandle::from_arc(first.clone());
        let b = GeneratorHandle::from_arc(second.clone());
        let ctx = GeneratorContext::default();
        let mut set = InitializedSet::new();

        set.ensure(&a, &ctx);
        set.ensure(&b, &ctx);
        assert_eq!(first.inits.load(Ordering::SeqCst), 1);
        assert_eq!(second.inits.load(Ordering::SeqCst), 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn new_session_reinitializes() {
        let shared = Arc::new(Counting::default());
        let handle = GeneratorHandle::from_arc(shared.clone());
        let ctx = GeneratorContext::default();

        InitializedSet::new().ensure(&handle, &ctx);
        InitializedSet::new().ensure(&handle, &ctx);
        assert_eq!(shared.inits.load(Ordering::SeqCst), 2);
    }
}

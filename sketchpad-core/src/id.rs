//! # IDs
//! Unique IDs are needed for layers and other runtime resources. `RuntimeID<T>`
//! generates IDs namespaced by the marker type T, unique within this execution
//! of the program. Order of IDs is not guaranteed.
//!
//! To acquire one, use `RuntimeID<YourNamespaceTy>`'s `Default` impl.

// Next available ID per namespace. RWLock'd map from typeID to counter -
// namespaces are few and registered once, so reads vastly dominate.
static ID_SERVER: parking_lot::RwLock<
    std::collections::BTreeMap<std::any::TypeId, std::sync::atomic::AtomicU64>,
> = parking_lot::const_rwlock(std::collections::BTreeMap::new());

/// ID guaranteed unique within this execution of the program.
/// IDs with different namespace types may share a value but should not be
/// considered equal.
pub struct RuntimeID<T: std::any::Any> {
    id: std::num::NonZeroU64,
    // Namespace marker
    _phantom: std::marker::PhantomData<T>,
}
impl<T: std::any::Any> Clone for RuntimeID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for RuntimeID<T> {}
impl<T: std::any::Any> std::cmp::PartialEq<RuntimeID<T>> for RuntimeID<T> {
    fn eq(&self, other: &RuntimeID<T>) -> bool {
        // Namespace already checked at compile time - Self::T == Other::T of course!
        self.id == other.id
    }
}
impl<T: std::any::Any> std::cmp::Eq for RuntimeID<T> {}

// Safety - the stored data is just a u64. We need these because if T is !Send
// or !Sync that is carried over to the ID, even though we don't actually store
// a T and thus shouldn't be bound by this.
unsafe impl<T: std::any::Any> Send for RuntimeID<T> {}
unsafe impl<T: std::any::Any> Sync for RuntimeID<T> {}

impl<T: std::any::Any> std::hash::Hash for RuntimeID<T> {
    /// A note on hashes - this relies on the internal representation of `TypeID`,
    /// which is unstable between compilations. Do NOT serialize or otherwise rely
    /// on comparisons between hashes from different executions of the program.
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::any::TypeId::of::<T>().hash(state);
        self.id.hash(state);
    }
}

impl<T: std::any::Any> RuntimeID<T> {
    /// Get the raw numeric value of this ID.
    /// IDs from differing namespaces may share the same numeric ID!
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id.get()
    }
    fn next() -> Self {
        // ID of zero is invalid, counters start at one and go up.
        let id = {
            let read = ID_SERVER.upgradable_read();
            let ty = std::any::TypeId::of::<T>();
            if let Some(atomic) = read.get(&ty) {
                // We don't care about the order things happen in, the value
                // just needs to be unique.
                atomic.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            } else {
                // Namespace not seen before - transition to exclusive access.
                // Happens once per namespace over the program's entire life.
                let mut write = parking_lot::RwLockUpgradableReadGuard::upgrade(read);
                write.insert(ty, 2.into());
                1
            }
        };

        Self {
            // Only fails after all u64::MAX - 1 IDs are exhausted, which no
            // realistic session reaches one allocation at a time.
            id: std::num::NonZeroU64::new(id).expect("ID namespace exhausted"),
            _phantom: std::marker::PhantomData,
        }
    }
}
impl<T: std::any::Any> Default for RuntimeID<T> {
    fn default() -> Self {
        Self::next()
    }
}
impl<T: std::any::Any> std::fmt::Display for RuntimeID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Unwraps here are safe - the splits always return at least one
        // element, even for empty strings. Generic arguments of the namespace
        // type don't participate, they'd only be noise in logs.
        let name = std::any::type_name::<T>().rsplit("::").next().unwrap();
        write!(f, "{}#{}", name.split('<').next().unwrap(), self.id)
    }
}

impl<T: std::any::Any> std::fmt::Debug for RuntimeID<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <RuntimeID<T> as std::fmt::Display>::fmt(self, f)
    }
}

//! Artifact registries - snapshot maps shared between loaders and readers

use arc_swap::ArcSwap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::{Command, Event, RouteFn};

/// Immutable view of a registry at one point in time
pub type Snapshot<T> = Arc<HashMap<String, Arc<T>>>;

/// Identifier to artifact map.
///
/// Writers build a new map and swap it in; readers holding a snapshot never
/// see a half-applied merge.
pub struct Registry<T: ?Sized> {
    kind: &'static str,
    entries: ArcSwap<HashMap<String, Arc<T>>>,
}

impl<T: ?Sized> Registry<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Insert or replace one entry, returning the replaced value
    pub fn upsert(&self, key: impl Into<String>, value: Arc<T>) -> Option<Arc<T>> {
        let key = key.into();
        let previous = self.entries.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.insert(key.clone(), Arc::clone(&value));
            next
        });
        previous.get(&key).cloned()
    }

    pub fn remove(&self, key: &str) -> Option<Arc<T>> {
        let previous = self.entries.rcu(|current| {
            let mut next = HashMap::clone(current);
            next.remove(key);
            next
        });
        previous.get(key).cloned()
    }

    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.entries.load().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.load().contains_key(key)
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.entries.load_full()
    }

    /// Sorted keys
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.load().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy every entry of `other` into this registry in one swap.
    ///
    /// Later writes win. Keys that already held a different value are
    /// reported as collisions and returned.
    pub fn merge_from(&self, other: &Registry<T>, origin: &str) -> Vec<String> {
        let incoming = other.snapshot();
        if incoming.is_empty() {
            return Vec::new();
        }

        let mut collisions = Vec::new();
        self.entries.rcu(|current| {
            collisions.clear();
            let mut next = HashMap::clone(current);
            for (key, value) in incoming.iter() {
                if let Some(existing) = next.insert(key.clone(), Arc::clone(value)) {
                    if !Arc::ptr_eq(&existing, value) {
                        collisions.push(key.clone());
                    }
                }
            }
            next
        });

        collisions.sort();
        for key in &collisions {
            tracing::warn!(
                registry = self.kind,
                key = %key,
                module = origin,
                "Registry collision, overriding previous entry"
            );
        }
        collisions
    }
}

/// The four artifact registries a module fills and the host merges
pub struct Registries {
    pub commands: Arc<Registry<dyn Command>>,
    pub events: Arc<Registry<dyn Event>>,
    pub models: Arc<Registry<Value>>,
    pub routes: Arc<Registry<RouteFn>>,
}

impl Registries {
    pub fn new() -> Self {
        Self {
            commands: Arc::new(Registry::new("commands")),
            events: Arc::new(Registry::new("events")),
            models: Arc::new(Registry::new("models")),
            routes: Arc::new(Registry::new("routes")),
        }
    }

    /// Merge all four registries of `other`, returning the number of collisions
    pub fn merge_from(&self, other: &Registries, origin: &str) -> usize {
        self.commands.merge_from(&other.commands, origin).len()
            + self.events.merge_from(&other.events, origin).len()
            + self.models.merge_from(&other.models, origin).len()
            + self.routes.merge_from(&other.routes, origin).len()
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

use std::{collections::{HashMap, HashSet}, hash::Hash};

use parking_lot::Mutex;

/// Fixed capacity map from a key to a set of values. When full, adding a new
/// key evicts the key that was inserted first, regardless of how often it was
/// read since.
pub struct LinkedResponseCache<K, V> {
    inner: Mutex<Slots<K, V>>,
}

struct Slots<K, V> {
    keys: Vec<Option<K>>,
    next: usize,
    map: HashMap<K, HashSet<V>>,
}

impl<K, V> Slots<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash,
{
    fn entry(&mut self, key: K) -> &mut HashSet<V> {
        if !self.map.contains_key(&key) {
            if let Some(oldest) = self.keys[self.next].take() {
                self.map.remove(&oldest);
            }
            self.keys[self.next] = Some(key.clone());
            self.next = (self.next + 1) % self.keys.len();
        }
        self.map.entry(key).or_default()
    }
}

impl<K, V> LinkedResponseCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(Slots {
                keys: (0..capacity).map(|_| None).collect(),
                next: 0,
                map: HashMap::with_capacity(capacity),
            }),
        }
    }

    pub fn put(&self, key: K) {
        self.inner.lock().entry(key);
    }

    pub fn add_value(&self, key: K, value: V) {
        self.inner.lock().entry(key).insert(value);
    }

    pub fn get(&self, key: &K) -> HashSet<V> {
        self.inner.lock().map.get(key).cloned().unwrap_or_default()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().keys.len()
    }
}

//! Immutable maps keyed by string hashes
//!
//! A map stores the FNV-1a hash of each key next to its value. Lookups scan
//! the key array linearly; maps are expected to stay small.

use std::rc::Rc;

use crate::value::Value;

pub type Hash = u64;

const FNV_OFFSET: Hash = 14695981039346656037;
const FNV_PRIME: Hash = 1099511628211;

/// 64-bit FNV-1a hash of a key
pub fn hash_key(key: &str) -> Hash {
    key.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ byte as Hash).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, Default)]
pub struct Map {
    keys: Vec<Hash>,
    values: Vec<Value>,
}

impl Map {
    pub fn empty() -> Rc<Map> {
        Rc::new(Map::default())
    }

    /// Build a map from parallel key and value arrays
    pub fn create(keys: Vec<Hash>, values: Vec<Value>) -> Rc<Map> {
        debug_assert_eq!(keys.len(), values.len());
        Rc::new(Map { keys, values })
    }

    /// All entries of `a`, overridden and extended by the entries of `b`
    pub fn concat(a: &Map, b: &Map) -> Rc<Map> {
        let mut keys = a.keys.clone();
        let mut values = a.values.clone();

        for (key, value) in b.entries() {
            match a.index(key) {
                Some(i) => values[i] = value.clone(),
                None => {
                    keys.push(key);
                    values.push(value.clone());
                }
            }
        }

        Map::create(keys, values)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: Hash) -> bool {
        self.index(key).is_some()
    }

    /// Value stored under `key`, or void
    pub fn get(&self, key: Hash) -> Value {
        self.index(key)
            .map(|i| self.values[i].clone())
            .unwrap_or(Value::Void)
    }

    pub fn get_str(&self, key: &str) -> Value {
        self.get(hash_key(key))
    }

    pub fn entries(&self) -> impl Iterator<Item = (Hash, &Value)> + '_ {
        self.keys.iter().copied().zip(self.values.iter())
    }

    fn index(&self, key: Hash) -> Option<usize> {
        self.keys.iter().position(|k| *k == key)
    }
}

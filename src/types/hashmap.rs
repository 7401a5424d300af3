// ABOUTME: Open-addressed, linear-probed hashmap object keyed by Symbol/Keyword/String

use super::lstring::LString;
use super::value::Value;

const INITIAL_CAPACITY: usize = 8;
const LOAD_FACTOR_NUM: usize = 3;
const LOAD_FACTOR_DEN: usize = 4;

/// A hashmap key. Only Symbol/Keyword/String values are hashable - a
/// hashmap key's tag is always one of these three.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Symbol(LString),
    Keyword(LString),
    String(LString),
}

impl HashKey {
    /// Attempt to derive a key from a value; `None` for any other tag, which
    /// callers turn into a catchable exception rather than a host error.
    pub fn from_value(value: &Value) -> Option<HashKey> {
        match value {
            Value::Symbol(s) => Some(HashKey::Symbol(s.clone())),
            Value::Keyword(s) => Some(HashKey::Keyword(s.clone())),
            Value::String(s) => Some(HashKey::String(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            HashKey::Symbol(s) => Value::Symbol(s.clone()),
            HashKey::Keyword(s) => Value::Keyword(s.clone()),
            HashKey::String(s) => Value::String(s.clone()),
        }
    }

    fn probe_hash(&self) -> u64 {
        let (tag, s): (u64, &LString) = match self {
            HashKey::Symbol(s) => (0, s),
            HashKey::Keyword(s) => (1, s),
            HashKey::String(s) => (2, s),
        };
        s.hash_value().wrapping_mul(3).wrapping_add(tag)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    key: HashKey,
    value: Value,
}

/// Open-addressing hashmap: empty slots are `None`, growth doubles capacity
/// once `len > 0.75 * capacity`, starting from capacity 8.
#[derive(Debug, Clone)]
pub struct MalMap {
    slots: Vec<Option<Slot>>,
    len: usize,
}

impl MalMap {
    pub fn new() -> Self {
        MalMap {
            slots: vec![None; INITIAL_CAPACITY],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn probe_index(slots: &[Option<Slot>], key: &HashKey) -> usize {
        let capacity = slots.len();
        let mut idx = (key.probe_hash() as usize) % capacity;
        loop {
            match &slots[idx] {
                None => return idx,
                Some(slot) if &slot.key == key => return idx,
                Some(_) => idx = (idx + 1) % capacity,
            }
        }
    }

    pub fn get(&self, key: &HashKey) -> Option<&Value> {
        let idx = Self::probe_index(&self.slots, key);
        self.slots[idx].as_ref().map(|slot| &slot.value)
    }

    pub fn contains_key(&self, key: &HashKey) -> bool {
        self.get(key).is_some()
    }

    pub fn insert(&mut self, key: HashKey, value: Value) {
        if (self.len + 1) * LOAD_FACTOR_DEN > self.capacity() * LOAD_FACTOR_NUM {
            self.grow();
        }
        let idx = Self::probe_index(&self.slots, &key);
        if self.slots[idx].is_none() {
            self.len += 1;
        }
        self.slots[idx] = Some(Slot { key, value });
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity() * 2;
        let mut new_slots: Vec<Option<Slot>> = vec![None; new_capacity];
        for slot in self.slots.drain(..).flatten() {
            let idx = Self::probe_index(&new_slots, &slot.key);
            new_slots[idx] = Some(slot);
        }
        self.slots = new_slots;
    }

    /// Build a new map containing every entry of `self` except `key` -
    /// `dissoc` is a copy-except, not an in-place removal.
    pub fn without(&self, key: &HashKey) -> MalMap {
        let mut copy = MalMap::new();
        for (k, v) in self.iter() {
            if k != key {
                copy.insert(k.clone(), v.clone());
            }
        }
        copy
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HashKey, &Value)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref().map(|s| (&s.key, &s.value)))
    }
}

impl Default for MalMap {
    fn default() -> Self {
        MalMap::new()
    }
}

impl PartialEq for MalMap {
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl FromIterator<(HashKey, Value)> for MalMap {
    fn from_iter<T: IntoIterator<Item = (HashKey, Value)>>(iter: T) -> Self {
        let mut map = MalMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> HashKey {
        HashKey::Keyword(LString::new(s))
    }

    #[test]
    fn insert_then_get_roundtrips() {
        let mut map = MalMap::new();
        map.insert(key("a"), Value::Number(1.0));
        assert_eq!(map.get(&key("a")), Some(&Value::Number(1.0)));
        assert_eq!(map.get(&key("b")), None);
    }

    #[test]
    fn grows_past_load_factor() {
        let mut map = MalMap::new();
        for i in 0..100 {
            map.insert(HashKey::Symbol(LString::new(format!("k{i}"))), Value::Number(i as f64));
        }
        assert_eq!(map.len(), 100);
        for i in 0..100 {
            assert_eq!(
                map.get(&HashKey::Symbol(LString::new(format!("k{i}")))),
                Some(&Value::Number(i as f64))
            );
        }
    }

    #[test]
    fn without_drops_only_named_key() {
        let mut map = MalMap::new();
        map.insert(key("a"), Value::Number(1.0));
        map.insert(key("b"), Value::Number(2.0));
        let reduced = map.without(&key("a"));
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced.get(&key("b")), Some(&Value::Number(2.0)));
        assert_eq!(reduced.get(&key("a")), None);
    }

    #[test]
    fn symbol_and_keyword_keys_with_same_text_are_distinct() {
        let mut map = MalMap::new();
        map.insert(HashKey::Symbol(LString::new("x")), Value::Number(1.0));
        map.insert(HashKey::Keyword(LString::new("x")), Value::Number(2.0));
        assert_eq!(map.len(), 2);
    }
}

use tracing::debug;

use crate::value::Value;

pub const VARIABLE_COUNT: usize = 26;

/// Position of a variable in the store. Only built from a valid name, so
/// every slot indexes the store directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot(usize);

impl Slot {
    pub fn new(letter: char) -> Option<Self> {
        VariableStore::is_variable_name(letter).then(|| Slot(usize::from(letter as u8 - b'A')))
    }

    pub fn letter(self) -> char {
        char::from(b'A' + self.0 as u8)
    }
}

/// The 26 single-letter variable slots `A`..`Z`.
///
/// Slots without a preset start out as the Double `0`, the zeroed state of
/// an untouched slot.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableStore {
    slots: [Value; VARIABLE_COUNT],
}

impl VariableStore {
    pub fn new() -> Self {
        let mut store = Self {
            slots: std::array::from_fn(|_| Value::Double(0.0)),
        };
        for (offset, letter) in ('A'..='F').enumerate() {
            store.define(letter, Value::Long(10 + offset as i64));
        }
        store.define('N', Value::Char('\n'));
        store.define('S', Value::Char(' '));
        store.define('X', Value::Long(0));
        store.define('Y', Value::Long(1));
        store.define('Z', Value::Long(2));
        store
    }

    pub fn is_variable_name(letter: char) -> bool {
        letter.is_ascii_uppercase()
    }

    /// Returns a duplicate of the slot, ready to be pushed.
    pub fn read(&self, slot: Slot) -> Value {
        self.slots[slot.0].duplicate()
    }

    pub fn get(&self, letter: char) -> Option<&Value> {
        Slot::new(letter).map(|slot| &self.slots[slot.0])
    }

    pub fn assign(&mut self, slot: Slot, value: Value) {
        debug!(variable = %slot.letter(), value = ?value, "assigning variable");
        self.slots[slot.0] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &Value)> {
        ('A'..='Z').zip(self.slots.iter())
    }

    fn define(&mut self, letter: char, value: Value) {
        if let Some(slot) = Slot::new(letter) {
            self.slots[slot.0] = value;
        }
    }
}

impl Default for VariableStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_language_defaults() {
        let store = VariableStore::new();
        assert_eq!(store.get('A'), Some(&Value::Long(10)));
        assert_eq!(store.get('F'), Some(&Value::Long(15)));
        assert_eq!(store.get('N'), Some(&Value::Char('\n')));
        assert_eq!(store.get('S'), Some(&Value::Char(' ')));
        assert_eq!(store.get('X'), Some(&Value::Long(0)));
        assert_eq!(store.get('Y'), Some(&Value::Long(1)));
        assert_eq!(store.get('Z'), Some(&Value::Long(2)));
        assert_eq!(store.get('G'), Some(&Value::Double(0.0)));
    }

    #[test]
    fn lowercase_letters_are_not_variables() {
        assert_eq!(Slot::new('a'), None);
        assert_eq!(VariableStore::new().get('a'), None);
        assert_eq!(Slot::new('Q').map(Slot::letter), Some('Q'));
    }

    #[test]
    fn read_returns_independent_copy() {
        let mut store = VariableStore::new();
        let slot = Slot::new('Q').unwrap();
        store.assign(slot, Value::string("abc"));
        let mut copy = store.read(slot);
        if let Value::String(text) = &mut copy {
            text.clear();
        }
        assert_eq!(store.get('Q'), Some(&Value::string("abc")));
    }
}

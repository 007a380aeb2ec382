//! A heap where the keys range over `[0, ..., n - 1]` and the values are totally ordered. The heap
//! can be queried for the key with the minimum value, and keys can be (temporarily)
//! removed/readded as necessary without losing their value.
//!
//! The propagation queue keeps every variable in this heap at all times; enqueueing a variable
//! restores its key and dequeueing deletes it again.
use super::KeyedVec;
use super::StorageKey;
use crate::ripple_assert_extreme;
use crate::ripple_assert_moderate;

/// A [min-heap](https://en.wikipedia.org/wiki/Binary_heap) which allows for generalised `Key`s
/// (required to implement [`StorageKey`]) and `Value`s (which are required to be totally ordered).
#[derive(Debug, Clone)]
pub struct KeyValueHeap<Key, Value> {
    /// Contains the values stored as a heap; the value of key `i` is at index
    /// [`KeyValueHeap::map_key_to_position\[i\]`][KeyValueHeap::map_key_to_position]
    values: Vec<Value>,
    /// `map_key_to_position[i]` is the index of the value of the key `i` in
    /// [`KeyValueHeap::values`]
    map_key_to_position: KeyedVec<Key, usize>,
    /// `map_position_to_key[i]` is the key which is associated with `i` in
    /// [`KeyValueHeap::values`]
    map_position_to_key: Vec<Key>,
    /// Positions `[0, end_position)` hold the keys which are currently in the heap; the
    /// remaining positions hold the removed keys
    end_position: usize,
}

impl<Key, Value> Default for KeyValueHeap<Key, Value> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            map_key_to_position: KeyedVec::new(),
            map_position_to_key: Vec::new(),
            end_position: 0,
        }
    }
}

impl<Key, Value> KeyValueHeap<Key, Value>
where
    Key: StorageKey + Copy,
    Value: Ord + Copy,
{
    /// Return the key with minimum value from the heap, or None if the heap is empty. Note that
    /// this does not delete the key (see [`KeyValueHeap::pop_min`] to get and delete).
    ///
    /// The time-complexity of this operation is O(1)
    pub fn peek_min(&self) -> Option<(Key, Value)> {
        if self.is_empty() {
            None
        } else {
            Some((self.map_position_to_key[0], self.values[0]))
        }
    }

    pub fn get_value(&self, key: Key) -> Value {
        ripple_assert_moderate!(
            key.index() < self.map_key_to_position.len(),
            "Attempted to get key with index {} for a map with length {}",
            key.index(),
            self.map_key_to_position.len()
        );
        self.values[self.map_key_to_position[key]]
    }

    /// Deletes the key with minimum value from the heap and returns it, or None if the heap is
    /// empty.
    ///
    /// The time-complexity of this operation is O(log n).
    pub fn pop_min(&mut self) -> Option<Key> {
        if self.is_empty() {
            return None;
        }

        let best_key = self.map_position_to_key[0];
        ripple_assert_moderate!(0 == self.map_key_to_position[best_key]);
        self.delete_key(best_key);
        Some(best_key)
    }

    /// Replaces the value associated with `key`. If the key is currently in the heap, the heap
    /// property is restored; otherwise the new value is used once the key is restored.
    pub fn update_value(&mut self, key: Key, value: Value) {
        let position = self.map_key_to_position[key];
        self.values[position] = value;

        if self.is_key_present(key) {
            self.sift_up(position);
            let position = self.map_key_to_position[key];
            self.sift_down(position);
        }
    }

    /// Restores the entry with key `key` to the heap if the key is not present, otherwise does
    /// nothing. Its value is the value it had before [`KeyValueHeap::delete_key`] was called (or
    /// the one set with [`KeyValueHeap::update_value`] since).
    ///
    /// The run-time complexity of this operation is O(log n)
    pub fn restore_key(&mut self, key: Key) {
        if !self.is_key_present(key) {
            // The key is somewhere in the range [end_position, len); place it at the end of the
            // heap and sift up
            let position = self.map_key_to_position[key];
            ripple_assert_moderate!(position >= self.end_position);
            self.swap_positions(position, self.end_position);
            self.end_position += 1;
            self.sift_up(self.end_position - 1);
        }
    }

    /// Removes the entry with key `key` (temporarily) from the heap if the key is present,
    /// otherwise does nothing. Its value remains recorded internally and is available upon
    /// calling [`KeyValueHeap::restore_key`].
    ///
    /// The run-time complexity of this operation is O(log n)
    pub fn delete_key(&mut self, key: Key) {
        if self.is_key_present(key) {
            let position = self.map_key_to_position[key];
            self.swap_positions(position, self.end_position - 1);
            self.end_position -= 1;
            if position < self.end_position {
                let moved_key = self.map_position_to_key[position];
                self.sift_up(position);
                self.sift_down(self.map_key_to_position[moved_key]);
            }
        }
    }

    /// Removes every key from the heap while keeping their values.
    pub fn delete_all(&mut self) {
        self.end_position = 0;
    }

    /// Returns how many keys the heap knows about (including the removed ones)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn num_nonremoved_elements(&self) -> usize {
        self.end_position
    }

    /// Returns whether there are no keys left in the heap (excluding the removed ones)
    pub fn is_empty(&self) -> bool {
        self.end_position == 0
    }

    /// Returns whether the key is currently in the heap
    pub fn is_key_present(&self, key: Key) -> bool {
        key.index() < self.map_key_to_position.len()
            && self.map_key_to_position[key] < self.end_position
    }

    /// Registers `key` with the given value. The key starts out removed from the heap.
    pub fn grow(&mut self, key: Key, value: Value) {
        let last_index = self.values.len();
        ripple_assert_moderate!(key.index() == last_index, "keys are grown in order");

        self.values.push(value);
        let _ = self.map_key_to_position.push(last_index);
        self.map_position_to_key.push(key);
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.map_key_to_position.clear();
        self.map_position_to_key.clear();
        self.end_position = 0;
    }

    fn swap_positions(&mut self, a: usize, b: usize) {
        let key_a = self.map_position_to_key[a];
        let key_b = self.map_position_to_key[b];

        self.values.swap(a, b);
        self.map_position_to_key.swap(a, b);
        self.map_key_to_position[key_a] = b;
        self.map_key_to_position[key_b] = a;

        ripple_assert_extreme!(self
            .map_position_to_key
            .iter()
            .enumerate()
            .all(|(position, key)| self.map_key_to_position[*key] == position));
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent_position = (position - 1) / 2;
            if self.values[parent_position] <= self.values[position] {
                break;
            }
            self.swap_positions(parent_position, position);
            position = parent_position;
        }
    }

    fn sift_down(&mut self, mut position: usize) {
        loop {
            let left_child_position = 2 * position + 1;
            if left_child_position >= self.end_position {
                break;
            }

            let right_child_position = left_child_position + 1;
            let smallest_child_position = if right_child_position < self.end_position
                && self.values[right_child_position] < self.values[left_child_position]
            {
                right_child_position
            } else {
                left_child_position
            };

            if self.values[position] <= self.values[smallest_child_position] {
                break;
            }
            self.swap_positions(smallest_child_position, position);
            position = smallest_child_position;
        }
    }
}

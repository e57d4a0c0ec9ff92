use mingle_notify_domain::{Entity, ID};
use std::sync::Mutex;

/// Helpers shared by the in-memory repositories. Every repository keeps its
/// rows in a `Mutex<Vec<T>>`, which also gives each operation one atomic
/// critical section.

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    collection.push(val.clone());
}

pub fn save<T: Clone + Entity>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    for existing in collection.iter_mut() {
        if existing.id() == val.id() {
            *existing = val.clone();
        }
    }
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = collection.lock().unwrap();
    collection.iter().find(|v| v.id() == val_id).cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    mut compare: F,
) -> Vec<T> {
    let collection = collection.lock().unwrap();
    collection.iter().filter(|v| compare(v)).cloned().collect()
}

/// Applies `update` to every row matching `compare` and returns the updated
/// rows, all inside one critical section.
pub fn update_where<T: Clone, F: Fn(&T) -> bool, U: Fn(&mut T)>(
    collection: &Mutex<Vec<T>>,
    compare: F,
    update: U,
) -> Vec<T> {
    let mut collection = collection.lock().unwrap();
    let mut updated = Vec::new();
    for row in collection.iter_mut() {
        if compare(row) {
            update(row);
            updated.push(row.clone());
        }
    }
    updated
}

/*!
 * List Tests
 * Round trips through a list backed by a shared pool
 */

use poolmem::limits::NODE_SIZE;
use poolmem::{ListError, MemoryError, PoolAllocator, PoolList};
use pretty_assertions::assert_eq;

#[test]
fn test_round_trip() {
    let list = PoolList::with_capacity(1024).unwrap();
    for value in [1, 2, 3] {
        list.insert(value).unwrap();
    }
    assert_eq!(list.to_string(), "[1, 2, 3]");

    list.delete(2).unwrap();
    assert_eq!(list.to_string(), "[1, 3]");
    assert_eq!(list.search(2).unwrap(), None);
    assert_eq!(list.count().unwrap(), 2);
}

#[test]
fn test_search_returns_first_match() {
    let list = PoolList::with_capacity(1024).unwrap();
    let first = list.insert(4).unwrap();
    list.insert(4).unwrap();

    assert_eq!(list.search(4).unwrap(), Some(first));
    assert_eq!(list.value(first).unwrap(), 4);
}

#[test]
fn test_nodes_come_from_the_pool() {
    let pool = PoolAllocator::with_capacity(1024).unwrap();
    let list = PoolList::new(pool.clone());

    let node = list.insert(10).unwrap();
    assert_eq!(pool.usable_size(node.ptr()).unwrap(), NODE_SIZE);
    assert_eq!(pool.stats().unwrap().occupied_blocks, 1);

    list.delete(10).unwrap();
    assert_eq!(pool.stats().unwrap().occupied_blocks, 0);
    assert!(list.is_empty());
}

#[test]
fn test_insert_surfaces_pool_exhaustion() {
    // room for exactly two nodes
    let list = PoolList::with_capacity(2 * NODE_SIZE + 24).unwrap();
    list.insert(1).unwrap();
    list.insert(2).unwrap();

    assert!(matches!(
        list.insert(3),
        Err(ListError::Memory(MemoryError::OutOfSpace { .. }))
    ));
    assert_eq!(list.to_string(), "[1, 2]");

    list.delete(1).unwrap();
    list.insert(3).unwrap();
    assert_eq!(list.to_string(), "[2, 3]");
}

#[test]
fn test_cleanup_empties_list_and_pool() {
    let pool = PoolAllocator::with_capacity(1024).unwrap();
    let list = PoolList::new(pool.clone());
    for value in 0..10 {
        list.insert(value).unwrap();
    }

    assert_eq!(list.cleanup().unwrap(), 10);
    assert_eq!(list.to_string(), "[]");
    assert_eq!(pool.stats().unwrap().occupied_blocks, 0);
    pool.validate().unwrap();

    list.insert(7).unwrap();
    assert_eq!(list.values().unwrap(), vec![7]);
}

#[test]
fn test_two_lists_share_one_pool() {
    let pool = PoolAllocator::with_capacity(1024).unwrap();
    let evens = PoolList::new(pool.clone());
    let odds = PoolList::new(pool.clone());

    for value in 0..6 {
        if value % 2 == 0 {
            evens.insert(value).unwrap();
        } else {
            odds.insert(value).unwrap();
        }
    }

    assert_eq!(evens.to_string(), "[0, 2, 4]");
    assert_eq!(odds.to_string(), "[1, 3, 5]");
    drop(evens);
    assert_eq!(pool.stats().unwrap().occupied_blocks, 3);
    assert_eq!(odds.count().unwrap(), 3);
}

#[test]
fn test_error_serializes_with_tag() {
    let json = serde_json::to_value(ListError::ValueNotFound(9)).unwrap();
    assert_eq!(json["error_type"], "value_not_found");
    assert_eq!(json["details"], 9);
}

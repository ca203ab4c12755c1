/*!
 * Positional Insert Tests
 * insert_after, insert_before and display_range
 */

use poolmem::{ListError, PoolAllocator, PoolList};
use pretty_assertions::assert_eq;

#[test]
fn test_insert_after_middle_and_tail() {
    let list = PoolList::with_capacity(1024).unwrap();
    let one = list.insert(1).unwrap();
    let three = list.insert(3).unwrap();

    list.insert_after(one, 2).unwrap();
    list.insert_after(three, 4).unwrap();
    assert_eq!(list.to_string(), "[1, 2, 3, 4]");
}

#[test]
fn test_insert_before_head_becomes_head() {
    let list = PoolList::with_capacity(1024).unwrap();
    let two = list.insert(2).unwrap();
    let three = list.insert(3).unwrap();

    list.insert_before(two, 1).unwrap();
    list.insert_before(three, 9).unwrap();
    assert_eq!(list.to_string(), "[1, 2, 9, 3]");
}

#[test]
fn test_insert_before_missing_anchor_leaks_nothing() {
    let pool = PoolAllocator::with_capacity(1024).unwrap();
    let list = PoolList::new(pool.clone());
    list.insert(1).unwrap();
    let gone = list.insert(2).unwrap();
    list.delete(2).unwrap();

    let occupied = pool.stats().unwrap().occupied_blocks;
    assert_eq!(list.insert_before(gone, 5), Err(ListError::NotFound));
    assert_eq!(pool.stats().unwrap().occupied_blocks, occupied);
    assert_eq!(list.to_string(), "[1]");
}

#[test]
fn test_insert_after_missing_anchor() {
    let pool = PoolAllocator::with_capacity(1024).unwrap();
    let other = PoolList::new(pool.clone());
    let foreign = other.insert(8).unwrap();

    let list = PoolList::new(pool.clone());
    list.insert(1).unwrap();

    let occupied = pool.stats().unwrap().occupied_blocks;
    assert_eq!(list.insert_after(foreign, 5), Err(ListError::NotFound));
    assert_eq!(pool.stats().unwrap().occupied_blocks, occupied);
}

#[test]
fn test_insert_before_on_empty_list() {
    let pool = PoolAllocator::with_capacity(1024).unwrap();
    let other = PoolList::new(pool.clone());
    let foreign = other.insert(8).unwrap();

    let list = PoolList::new(pool);
    assert_eq!(list.insert_before(foreign, 1), Err(ListError::NotFound));
    assert!(list.is_empty());
}

#[test]
fn test_display_range() {
    let list = PoolList::with_capacity(1024).unwrap();
    let nodes: Vec<_> = (1..=5).map(|v| list.insert(v).unwrap()).collect();

    assert_eq!(list.display_range(None, None).unwrap(), "[1, 2, 3, 4, 5]");
    assert_eq!(
        list.display_range(Some(nodes[1]), Some(nodes[3])).unwrap(),
        "[2, 3, 4]"
    );
    assert_eq!(list.display_range(None, Some(nodes[0])).unwrap(), "[1]");
    assert_eq!(list.display_range(Some(nodes[3]), None).unwrap(), "[4, 5]");
}

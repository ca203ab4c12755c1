/*!
 * Resize Tests
 * In-place, grow-into-neighbour and relocating resizes
 */

use poolmem::{MemoryError, PoolAllocator, PoolPtr};
use pretty_assertions::assert_eq;

fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 3) as u8).collect()
}

#[test]
fn test_shrink_stays_in_place() {
    let pool = PoolAllocator::with_capacity(512).unwrap();
    let ptr = pool.alloc(128).unwrap();
    pool.write_bytes(ptr, 0, &pattern(128)).unwrap();

    let resized = pool.resize(ptr, 32).unwrap();
    assert_eq!(resized, ptr);
    assert_eq!(pool.read_bytes(resized, 0, 32).unwrap(), pattern(32));
}

#[test]
fn test_grow_into_free_neighbour() {
    let pool = PoolAllocator::with_capacity(512).unwrap();
    let a = pool.alloc(64).unwrap();
    let b = pool.alloc(64).unwrap();
    let _c = pool.alloc(64).unwrap();
    pool.write_bytes(a, 0, &pattern(64)).unwrap();
    pool.free(b).unwrap();

    let grown = pool.resize(a, 120).unwrap();
    assert_eq!(grown, a);
    assert!(pool.usable_size(grown).unwrap() >= 120);
    assert_eq!(pool.read_bytes(grown, 0, 64).unwrap(), pattern(64));
    pool.validate().unwrap();
}

#[test]
fn test_relocation_preserves_contents() {
    let pool = PoolAllocator::with_capacity(1024).unwrap();
    let a = pool.alloc(64).unwrap();
    let _fence = pool.alloc(16).unwrap();
    pool.write_bytes(a, 0, &pattern(64)).unwrap();

    let moved = pool.resize(a, 256).unwrap();
    assert_ne!(moved, a);
    assert!(!pool.is_live(a));
    assert_eq!(pool.read_bytes(moved, 0, 64).unwrap(), pattern(64));
    assert_eq!(pool.stats().unwrap().resizes, 1);
    pool.validate().unwrap();
}

#[test]
fn test_failed_resize_leaves_original_intact() {
    let pool = PoolAllocator::with_capacity(256).unwrap();
    let a = pool.alloc(64).unwrap();
    let _b = pool.alloc(64).unwrap();
    pool.write_bytes(a, 0, &pattern(64)).unwrap();
    let before = pool.blocks().unwrap();

    let err = pool.resize(a, 200).unwrap_err();
    assert!(matches!(err, MemoryError::OutOfSpace { requested: 200, .. }));
    assert_eq!(pool.blocks().unwrap(), before);
    assert_eq!(pool.read_bytes(a, 0, 64).unwrap(), pattern(64));
}

#[test]
fn test_resize_of_empty_sentinel_allocates() {
    let pool = PoolAllocator::with_capacity(128).unwrap();
    let ptr = pool.resize(PoolPtr::EMPTY, 24).unwrap();
    assert!(pool.is_live(ptr));
}

#[test]
fn test_resize_of_freed_pointer_is_rejected() {
    let pool = PoolAllocator::with_capacity(128).unwrap();
    let ptr = pool.alloc(16).unwrap();
    pool.free(ptr).unwrap();
    assert_eq!(
        pool.resize(ptr, 32),
        Err(MemoryError::InvalidPointer(ptr.offset()))
    );
}

/*!
 * Concurrency Tests
 * Many threads sharing one pool through cloned handles
 */

use poolmem::{PoolAllocator, PoolPtr};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;

#[test]
fn test_concurrent_alloc_free_keeps_chain_valid() {
    let pool = PoolAllocator::with_capacity(64 * 1024).unwrap();

    let handles: Vec<_> = (0..8u64)
        .map(|seed| {
            let pool = pool.clone();
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut live: Vec<(PoolPtr, u8)> = Vec::new();

                for _ in 0..500 {
                    if live.is_empty() || rng.gen_bool(0.6) {
                        let size = rng.gen_range(1..256);
                        if let Ok(ptr) = pool.alloc(size) {
                            let tag = rng.gen::<u8>();
                            pool.fill(ptr, tag).unwrap();
                            live.push((ptr, tag));
                        }
                    } else {
                        let (ptr, tag) = live.swap_remove(rng.gen_range(0..live.len()));
                        // nobody else touched this region
                        assert_eq!(pool.read_bytes(ptr, 0, 1).unwrap(), vec![tag]);
                        pool.free(ptr).unwrap();
                    }
                }

                for (ptr, _) in live {
                    pool.free(ptr).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    pool.validate().unwrap();
    let stats = pool.stats().unwrap();
    assert_eq!(stats.occupied_blocks, 0);
    assert_eq!(stats.free_blocks, 1);
    assert_eq!(stats.allocations, stats.frees);
}

#[test]
fn test_concurrent_allocations_are_unique() {
    let pool = PoolAllocator::with_capacity(32 * 1024).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let pool = pool.clone();
            thread::spawn(move || (0..50).map(|_| pool.alloc(32).unwrap()).collect::<Vec<_>>())
        })
        .collect();

    let mut all: Vec<PoolPtr> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    let total = all.len();
    all.sort();
    all.dedup();

    assert_eq!(all.len(), total);
    assert_eq!(pool.stats().unwrap().occupied_blocks, total);
}

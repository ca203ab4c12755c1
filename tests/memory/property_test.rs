/*!
 * Property Tests
 * Random operation sequences keep the chain tiled, coalesced and disjoint
 */

use poolmem::limits::HEADER_SIZE;
use poolmem::{PoolAllocator, PoolPtr};
use proptest::prelude::*;

const CAPACITY: usize = 4096;

#[derive(Debug, Clone)]
enum Op {
    Alloc(usize),
    Free(usize),
    Resize(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1usize..600).prop_map(Op::Alloc),
        2 => any::<usize>().prop_map(Op::Free),
        1 => (any::<usize>(), 0usize..900).prop_map(|(i, n)| Op::Resize(i, n)),
    ]
}

fn check_layout(pool: &PoolAllocator) -> Result<(), TestCaseError> {
    pool.validate()
        .map_err(|e| TestCaseError::fail(format!("validate: {}", e)))?;

    let blocks = pool.blocks().unwrap();
    prop_assert_eq!(blocks[0].header, 0);
    for pair in blocks.windows(2) {
        prop_assert_eq!(pair[0].end(), pair[1].header);
        prop_assert!(!(pair[0].is_free && pair[1].is_free));
    }
    let last = blocks[blocks.len() - 1];
    prop_assert_eq!(last.end(), CAPACITY + HEADER_SIZE);

    let stats = pool.stats().unwrap();
    prop_assert_eq!(
        stats.used_memory + stats.available_memory + stats.overhead,
        CAPACITY
    );
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_chain_stays_consistent(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let pool = PoolAllocator::with_capacity(CAPACITY).unwrap();
        let mut live: Vec<PoolPtr> = Vec::new();

        for op in ops {
            match op {
                Op::Alloc(size) => {
                    if let Ok(ptr) = pool.alloc(size) {
                        prop_assert!(!live.contains(&ptr));
                        live.push(ptr);
                    }
                }
                Op::Free(i) if !live.is_empty() => {
                    let ptr = live.swap_remove(i % live.len());
                    prop_assert!(pool.free(ptr).is_ok());
                    prop_assert!(pool.free(ptr).is_err());
                }
                Op::Resize(i, size) if !live.is_empty() => {
                    let index = i % live.len();
                    let old = live[index];
                    let keep = pool.usable_size(old).unwrap().min(size);
                    pool.fill(old, 0x5A).unwrap();

                    match pool.resize(old, size) {
                        Ok(ptr) if ptr.is_empty() => {
                            live.swap_remove(index);
                        }
                        Ok(ptr) => {
                            live[index] = ptr;
                            let bytes = pool.read_bytes(ptr, 0, keep).unwrap();
                            prop_assert_eq!(bytes, vec![0x5Au8; keep]);
                        }
                        Err(_) => prop_assert!(pool.is_live(old)),
                    }
                }
                _ => {}
            }
            check_layout(&pool)?;
        }

        prop_assert_eq!(pool.stats().unwrap().occupied_blocks, live.len());
        for ptr in live {
            pool.free(ptr).unwrap();
        }
        let blocks = pool.blocks().unwrap();
        prop_assert_eq!(blocks.len(), 1);
        prop_assert_eq!(blocks[0].size, CAPACITY);
    }
}

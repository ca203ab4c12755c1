/*!
 * Block Descriptor Chain
 *
 * The pool buffer carries its own bookkeeping: every region starts with a
 * fixed-size header holding the usable size, the offset of the next header
 * and a state tag. Headers form an address-ordered chain that tiles the
 * whole buffer.
 *
 * ```text
 *   0        24           24+s0    48+s0
 *   ┌────────┬────────────┬────────┬──────────────┬─── ...
 *   │ header │  s0 bytes  │ header │   s1 bytes   │
 *   │ size=s0│  (usable)  │ size=s1│   (usable)   │
 *   │ next ──┼────────────┼──►     │              │
 *   └────────┴────────────┴────────┴──────────────┴─── ...
 * ```
 */

use super::super::types::{BlockInfo, MemoryError, MemoryResult};
use crate::core::limits::{ALIGNMENT, HEADER_SIZE, WORD_SIZE};
use crate::core::types::{Address, Size};

/// Marks the end of the chain in the `next` field
const NIL: u64 = u64::MAX;

const TAG_FREE: u64 = 0x4652_4545_424c_4b21; // "FREEBLK!"
const TAG_USED: u64 = 0x5553_4544_424c_4b21; // "USEDBLK!"

const SIZE_FIELD: usize = 0;
const NEXT_FIELD: usize = WORD_SIZE;
const TAG_FIELD: usize = 2 * WORD_SIZE;

/// Decoded block header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Header {
    pub size: Size,
    pub next: Option<Address>,
    pub free: bool,
}

/// Result of carving an allocation out of a free block
#[derive(Debug, Clone, Copy)]
pub(super) struct Carve {
    pub header: Address,
    pub size: Size,
    /// Header of the free remainder when the block was split
    pub remainder: Option<Address>,
}

/// Address-ordered chain of in-band block descriptors over one buffer
#[derive(Debug)]
pub(super) struct BlockChain {
    buffer: Vec<u8>,
    capacity: Size,
}

impl BlockChain {
    /// Reserve `capacity` usable bytes plus one header and install a single
    /// free block covering all of it
    pub fn new(capacity: Size) -> MemoryResult<Self> {
        let total = capacity
            .checked_add(HEADER_SIZE)
            .ok_or(MemoryError::PoolAllocationFailed(capacity))?;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(total)
            .map_err(|_| MemoryError::PoolAllocationFailed(total))?;
        buffer.resize(total, 0);

        let mut chain = Self { buffer, capacity };
        chain.write_header(
            0,
            Header {
                size: capacity,
                next: None,
                free: true,
            },
        );
        Ok(chain)
    }

    #[inline]
    pub fn capacity(&self) -> Size {
        self.capacity
    }

    fn read_word(&self, at: Address) -> u64 {
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(&self.buffer[at..at + WORD_SIZE]);
        u64::from_le_bytes(word)
    }

    fn write_word(&mut self, at: Address, value: u64) {
        self.buffer[at..at + WORD_SIZE].copy_from_slice(&value.to_le_bytes());
    }

    pub fn read_header(&self, at: Address) -> Header {
        let next = self.read_word(at + NEXT_FIELD);
        Header {
            size: self.read_word(at + SIZE_FIELD) as Size,
            next: (next != NIL).then_some(next as Address),
            free: self.read_word(at + TAG_FIELD) == TAG_FREE,
        }
    }

    pub fn write_header(&mut self, at: Address, header: Header) {
        self.write_word(at + SIZE_FIELD, header.size as u64);
        self.write_word(at + NEXT_FIELD, header.next.map_or(NIL, |n| n as u64));
        self.write_word(at + TAG_FIELD, if header.free { TAG_FREE } else { TAG_USED });
    }

    fn set_free(&mut self, at: Address, free: bool) {
        self.write_word(at + TAG_FIELD, if free { TAG_FREE } else { TAG_USED });
    }

    /// Walk the chain in address order
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks {
            chain: self,
            cursor: Some(0),
        }
    }

    /// First free block with at least `size` usable bytes
    pub fn first_fit(&self, size: Size) -> Option<Address> {
        self.blocks()
            .find(|(_, header)| header.free && header.size >= size)
            .map(|(at, _)| at)
    }

    /// Shrink the block at `at` to `size` bytes when the excess can hold a
    /// header plus at least one alignment unit; the excess becomes a free block
    fn split(&mut self, at: Address, size: Size) -> Option<Address> {
        let mut header = self.read_header(at);
        let excess = header.size - size;
        if excess <= HEADER_SIZE {
            return None;
        }

        let remainder_at = at + HEADER_SIZE + size;
        self.write_header(
            remainder_at,
            Header {
                size: excess - HEADER_SIZE,
                next: header.next,
                free: true,
            },
        );

        header.size = size;
        header.next = Some(remainder_at);
        self.write_header(at, header);
        Some(remainder_at)
    }

    /// First-fit search, split and mark occupied. `size` must be aligned.
    pub fn take(&mut self, size: Size) -> Option<Carve> {
        let at = self.first_fit(size)?;
        let remainder = self.split(at, size);
        self.set_free(at, false);

        Some(Carve {
            header: at,
            size: self.read_header(at).size,
            remainder,
        })
    }

    /// Header of the occupied block whose usable region starts at `usable`
    pub fn find_occupied(&self, usable: Address) -> Option<(Address, Header)> {
        let at = usable.checked_sub(HEADER_SIZE)?;
        self.blocks()
            .take_while(|(offset, _)| *offset <= at)
            .find(|(offset, header)| *offset == at && !header.free)
    }

    /// Mark the block at `at` free without merging
    pub fn release(&mut self, at: Address) {
        self.set_free(at, true);
    }

    /// Merge every run of consecutive free blocks, left to right
    ///
    /// Returns the number of headers absorbed.
    pub fn coalesce(&mut self) -> usize {
        let mut merged = 0;
        let mut cursor = Some(0);

        while let Some(at) = cursor {
            let mut header = self.read_header(at);
            if header.free {
                let mut absorbed = false;
                while let Some(next_at) = header.next {
                    let next = self.read_header(next_at);
                    if !next.free {
                        break;
                    }
                    header.size += HEADER_SIZE + next.size;
                    header.next = next.next;
                    merged += 1;
                    absorbed = true;
                }
                if absorbed {
                    self.write_header(at, header);
                }
            }
            cursor = header.next;
        }

        merged
    }

    /// Extend the occupied block at `at` into its free right neighbour so it
    /// holds at least `size` bytes. `size` must be aligned.
    pub fn grow_in_place(&mut self, at: Address, size: Size) -> bool {
        let header = self.read_header(at);
        let Some(next_at) = header.next else {
            return false;
        };
        let next = self.read_header(next_at);
        let combined = header.size + HEADER_SIZE + next.size;
        if !next.free || combined < size {
            return false;
        }

        self.write_header(
            at,
            Header {
                size: combined,
                next: next.next,
                free: false,
            },
        );
        self.split(at, size);
        true
    }

    /// Usable bytes of the block at `at`
    pub fn region(&self, at: Address, size: Size) -> &[u8] {
        let start = at + HEADER_SIZE;
        &self.buffer[start..start + size]
    }

    pub fn region_mut(&mut self, at: Address, size: Size) -> &mut [u8] {
        let start = at + HEADER_SIZE;
        &mut self.buffer[start..start + size]
    }

    /// Copy `len` usable bytes from the block at `from` to the block at `to`
    pub fn copy_region(&mut self, from: Address, to: Address, len: Size) {
        let src = from + HEADER_SIZE;
        self.buffer.copy_within(src..src + len, to + HEADER_SIZE);
    }

    pub fn block_infos(&self) -> Vec<BlockInfo> {
        self.blocks()
            .map(|(at, header)| BlockInfo {
                header: at,
                size: header.size,
                is_free: header.free,
            })
            .collect()
    }

    /// Check tiling, tags, alignment and the no-adjacent-free rule
    pub fn validate(&self) -> MemoryResult<()> {
        let corrupt = |offset: Address, reason: String| MemoryError::CorruptionDetected {
            offset,
            reason,
        };

        let len = self.buffer.len();
        let max_blocks = len / HEADER_SIZE;
        let mut expected = 0;
        let mut previous_free = false;

        for visited in 0.. {
            if visited > max_blocks {
                return Err(corrupt(expected, "chain does not terminate".to_string()));
            }
            if expected + HEADER_SIZE > len {
                return Err(corrupt(expected, "header runs past end of pool".to_string()));
            }

            let tag = self.read_word(expected + TAG_FIELD);
            if tag != TAG_FREE && tag != TAG_USED {
                return Err(corrupt(expected, format!("unknown state tag 0x{tag:x}")));
            }

            let header = self.read_header(expected);
            if header.size % ALIGNMENT != 0 {
                return Err(corrupt(expected, format!("unaligned size {}", header.size)));
            }
            if header.size > self.capacity {
                return Err(corrupt(
                    expected,
                    format!("size {} exceeds capacity {}", header.size, self.capacity),
                ));
            }
            if header.free && previous_free {
                return Err(corrupt(expected, "adjacent free blocks".to_string()));
            }

            let end = expected + HEADER_SIZE + header.size;
            if end > len {
                return Err(corrupt(expected, format!("block ends at {end}, past pool end {len}")));
            }

            match header.next {
                Some(next) if next == end => {
                    previous_free = header.free;
                    expected = next;
                }
                Some(next) => {
                    return Err(corrupt(
                        expected,
                        format!("next header at {next}, expected {end}"),
                    ));
                }
                None if end == len => return Ok(()),
                None => {
                    return Err(corrupt(
                        expected,
                        format!("chain ends at {end}, pool ends at {len}"),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Address-ordered iterator over `(header offset, header)`
///
/// Stops early instead of looping if a `next` link ever points backwards
/// or past the buffer.
pub(super) struct Blocks<'a> {
    chain: &'a BlockChain,
    cursor: Option<Address>,
}

impl Iterator for Blocks<'_> {
    type Item = (Address, Header);

    fn next(&mut self) -> Option<Self::Item> {
        let at = self.cursor?;
        let header = self.chain.read_header(at);
        let len = self.chain.buffer.len();
        self.cursor = header.next.filter(|&next| {
            next > at && next.checked_add(HEADER_SIZE).is_some_and(|end| end <= len)
        });
        Some((at, header))
    }
}

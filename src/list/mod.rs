/*!
 * Pool List
 * Singly linked list of u16 values whose nodes are pool allocations
 */

mod linked_list;
mod node;
mod types;

pub use linked_list::PoolList;
pub use types::{ListError, ListResult, NodeRef};

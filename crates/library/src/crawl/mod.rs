//! Recursive tree walking and cataloguing.
//!
//! [`walk`] is the pure traversal: depth-first, strictly sequential,
//! paginating through each container, producing an aggregate leaf count and
//! the ordered sequence of [`FileRecord`](skiff_cache::FileRecord)s found
//! under the subtree. Nothing is rendered or persisted while walking;
//! consumers of the produced sequence decide what to do with it.
//!
//! [`crawl`] is the operation built on top: walk, then persist all records
//! in one transaction. A traversal failure therefore persists nothing.

pub(crate) mod error;
mod stream;
pub(crate) mod walker;

pub use self::stream::{CrawlEvent, crawl};
pub use self::walker::{TraversalResult, walk};

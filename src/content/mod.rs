//! Content module - post models, listing aggregation and read time

pub mod listing;
mod post;
pub mod read_time;

pub use listing::{ListingState, PostsPage};
pub use post::{ContentBlock, PostDetail, PostSummary};
pub use read_time::ReadTime;

pub mod summary;

pub use summary::member_summary_get;
pub use summary::member_summaries_get;

pub mod member_summary;

pub use member_summary::{summarize, summarize_all, MemberSummary, MemberSummaryService, SummaryError};

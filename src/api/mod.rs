pub mod dto;

pub use dto::{MemberDto, MemberLocationDto, MemberStatusDto, MemberSummaryDto};

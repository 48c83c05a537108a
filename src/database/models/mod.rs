pub mod member;
pub mod member_location;
pub mod member_status;
pub mod tenant;

pub use member::Member;
pub use member_location::MemberLocation;
pub use member_status::MemberStatus;
pub use tenant::Tenant;

pub mod whoami;

pub use whoami::whoami as session_whoami;

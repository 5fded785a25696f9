pub mod dates;
pub mod protocol;
pub mod types;

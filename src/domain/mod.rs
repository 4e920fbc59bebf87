pub mod allow_list;
pub mod message;
pub mod user;

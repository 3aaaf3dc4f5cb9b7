pub mod news;
pub mod search;
pub mod text;

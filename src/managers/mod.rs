pub mod collection;
pub mod content;
pub mod resource;
pub mod revision;
pub mod tags;

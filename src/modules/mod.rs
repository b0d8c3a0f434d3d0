pub mod events;
pub mod publisher;

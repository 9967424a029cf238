pub mod booking;
pub mod events;

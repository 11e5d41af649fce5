//! Stateful services: player identities and rooms.

pub mod identity;
pub mod rooms;

//! Typed records shared by the db and http layers.

pub mod application;
pub mod attachment;
pub mod response;

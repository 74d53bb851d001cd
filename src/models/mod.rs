//! Modelos de dominio

pub mod booking;
pub mod user;
pub mod vehicle;

//! Route handlers, one module per controller

pub mod authorization;
pub mod health;
pub mod protected;
pub mod token;

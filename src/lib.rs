//! Banneret - turn-planning AI decision engine for hero-and-town strategy games

pub mod battle;
pub mod core;
pub mod driver;
pub mod engine;
pub mod knowledge;
pub mod objective;
pub mod snapshot;

//! Room game engine: pure, synchronous rules over a `Room`.

pub mod bot;
pub mod collector;
pub mod night;
pub mod role_assignment;
pub mod voting;
pub mod winning_judgement;

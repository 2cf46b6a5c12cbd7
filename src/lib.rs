pub mod benchmark;
pub mod game;
pub mod games;
pub mod round;

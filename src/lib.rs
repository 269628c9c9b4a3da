//! Grid snake with power-ups: a deterministic, tick-driven game engine plus
//! the terminal front-end that plays it.

pub mod clock;
pub mod config;
pub mod effects;
pub mod food;
pub mod game;
pub mod input;
pub mod logging;
pub mod power_up;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;

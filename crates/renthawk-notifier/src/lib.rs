pub mod cli;
pub mod commands;
pub mod delivery;
pub mod transport;

//! HTTP API types shared by the server and the game client

pub mod types;

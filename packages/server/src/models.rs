pub mod action;
pub mod chat;
pub mod config;
pub mod event;
pub mod player;
pub mod role;
pub mod room;

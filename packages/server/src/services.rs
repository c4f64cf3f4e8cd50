pub mod game_service;
pub mod notifier;
pub mod room_service;
pub mod scheduler;
pub mod store;

pub mod ids;
pub mod test_setup;
pub mod websocket;

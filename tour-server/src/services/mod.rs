//! 背景服務模組

pub mod message_bus;

pub use message_bus::MessageBusService;

//! State management module
//!
//! This module handles USSD session state and its persistence

pub mod locks;
pub mod session;
pub mod storage;

// Re-export commonly used state components
pub use locks::SessionLocks;
pub use session::UssdSession;
pub use storage::{MemorySessionStore, RedisSessionStore, SessionStore};

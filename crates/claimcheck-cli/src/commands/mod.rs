//! Command implementations.

pub mod health;
pub mod reset;
pub mod seed;
pub mod verify;

pub use self::health::execute_health;
pub use self::reset::execute_reset;
pub use self::seed::execute_seed;
pub use self::verify::execute_verify;

//! Combat systems (battle resolution logic)

pub mod actions;
pub mod lifecycle;
pub mod parry;
pub mod qte;
pub mod status;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod actions_tests;
#[cfg(test)]
mod lifecycle_tests;

// Re-export all systems
pub use actions::*;
pub use lifecycle::*;
pub use parry::*;
pub use qte::*;
pub use status::*;

//! Combat components

pub mod action;
pub mod parry;
pub mod qte;
pub mod status;

// Re-export all components
pub use action::*;
pub use parry::*;
pub use qte::*;
pub use status::*;

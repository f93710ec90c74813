//! Data loading, validation and persistence for the slot machine.

pub mod history;
pub mod load;
pub mod persistence;
pub mod schema;

pub use history::*;
pub use load::*;
pub use persistence::*;
pub use schema::*;

//! # Domain Module
//!
//! Cards, the card book, workflow values and errors for Card Reconciliation.

pub mod book;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use book::CardBook;
pub use entities::*;
pub use errors::*;
pub use value_objects::*;

//! Dynatrace API model types.

mod common;
mod entity;
mod entity_type;

pub use common::*;
pub use entity::*;
pub use entity_type::*;

mod command;
mod coord;
mod entity;
mod ids;
mod kind;
pub mod wire;

pub use crate::command::*;
pub use crate::coord::*;
pub use crate::entity::*;
pub use crate::ids::*;
pub use crate::kind::*;
pub use crate::wire::{GameInit, TurnInput, WireError};

//! Components - pure data attached to entities.

mod common;
mod ghost;
mod player;
mod props;

pub use common::*;
pub use ghost::*;
pub use player::*;
pub use props::*;

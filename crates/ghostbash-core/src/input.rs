//! Player input intents, pre-normalized by the boundary layer.

use serde::{Deserialize, Serialize};

use crate::components::Vec2;

/// One frame of player movement intent.
///
/// The boundary layer translates raw keyboard/pointer state into these
/// before the tick: keyboard becomes a direction vector (normalized when
/// diagonal), taps become a target point already clamped into room space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Move along a direction this tick (magnitude <= 1). Takes priority
    /// over any pending seek target and clears it.
    Direction(Vec2),
    /// Walk toward a fixed point until arrival.
    Seek(Vec2),
}

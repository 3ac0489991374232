//! The API of timm-core.

mod configuration;
mod description;
mod geometry;
mod heap;
mod map;
mod platform;

pub use configuration::{FixedGeometry, Properties};
pub use description::{BlockSize, BlockStatus, ConfigError};
pub use geometry::Geometry;
pub use heap::BlockHeap;
pub use map::StatusMap;
pub use platform::Platform;

//! Placement of longitudes into zodiac signs and houses
//!
//! Both classifiers expect longitudes already reduced to [0, 360) by
//! `utils::angle::normalize`; neither re-normalizes its input.

pub mod house;
pub mod sign;

pub use house::{locate, locate_checked, HouseCuspSet};
pub use sign::{classify, SignPlacement};

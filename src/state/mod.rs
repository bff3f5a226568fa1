//! Client-side state tracking.
//!
//! The [`Tracker`] owns every [`Nick`] and [`Channel`] seen on the current
//! connection. Nicks and channels refer to each other only through the
//! [`NickId`]/[`ChanId`] handles, and the privileges of a membership live in
//! one place inside the tracker.

mod channel;
mod modes;
mod nick;
mod tracker;

pub use channel::{ChanId, Channel};
pub use modes::{ChanModes, ChanPrivs, NickModes};
pub use nick::{Nick, NickId};
pub use tracker::Tracker;

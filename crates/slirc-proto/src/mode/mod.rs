//! IRC user and channel mode types.

mod parse;
mod types;

pub use self::parse::ModeChanges;
pub use self::types::{ArgRule, ChannelMode, Mode, ModeType, UserMode};

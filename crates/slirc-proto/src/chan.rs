//! Telling channel names apart from nicks.
//!
//! MODE, 352 and console targets can be either; the first character decides.

/// Characters a channel name may start with.
pub const CHANNEL_PREFIXES: [char; 4] = ['#', '&', '+', '!'];

/// Extension trait for telling channel names apart from nicknames.
pub trait ChannelExt {
    /// True for a prefixed name with no space, comma or control character.
    ///
    /// Length is not checked; servers advertise their own `CHANNELLEN`.
    fn is_channel_name(&self) -> bool;
}

impl<T: AsRef<str> + ?Sized> ChannelExt for T {
    fn is_channel_name(&self) -> bool {
        let name = self.as_ref();
        name.starts_with(CHANNEL_PREFIXES)
            && !name.contains(|c: char| c == ' ' || c == ',' || c.is_control())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes() {
        for name in ["#test1", "&local", "+modeless", "!ABCDEsafe"] {
            assert!(name.is_channel_name(), "{name}");
        }
        assert!(String::from("#rust").is_channel_name());
        assert!(!"user1".is_channel_name());
        assert!(!"".is_channel_name());
    }

    #[test]
    fn forbidden_characters() {
        assert!(!"#two words".is_channel_name());
        assert!(!"#a,#b".is_channel_name());
        assert!(!"#bell\x07".is_channel_name());
    }

    #[test]
    fn long_names_are_still_channels() {
        let name = format!("#{}", "a".repeat(199));
        assert!(name.is_channel_name());
    }
}

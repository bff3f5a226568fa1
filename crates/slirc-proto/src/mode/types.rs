//! Mode flags for users and channels, and a single parsed change.

use std::fmt;

/// Whether a mode flag consumes a value token from the argument list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgRule {
    /// Never takes a value.
    None,
    /// Takes a value if one remains, otherwise none.
    Optional,
    /// Must take a value; running out is an error.
    Required,
}

/// A family of mode letters: [`UserMode`] or [`ChannelMode`].
pub trait ModeType: fmt::Debug + Clone + PartialEq {
    /// Typed flag for a letter; unlisted letters become `Unknown`.
    fn from_char(c: char) -> Self;

    /// The letter on the wire.
    fn as_char(&self) -> char;

    /// Value rule for this flag when set (`adding`) or cleared.
    fn arg_rule(&self, adding: bool) -> ArgRule;
}

/// Declares a mode enum from `Variant = 'c'` pairs, plus the two lookups
/// between variants and letters. Letters not listed become `Unknown`.
macro_rules! mode_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $letter:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A flag the client does not track.
            Unknown(char),
        }

        impl $name {
            fn lookup(c: char) -> Self {
                match c {
                    $( $letter => Self::$variant, )+
                    other => Self::Unknown(other),
                }
            }

            fn letter(&self) -> char {
                match self {
                    $( Self::$variant => $letter, )+
                    Self::Unknown(c) => *c,
                }
            }
        }
    };
}

mode_enum! {
    /// User modes tracked by the client.
    UserMode {
        /// Hidden from WHO and NAMES of strangers.
        Invisible = 'i',
        /// Receives WALLOPS.
        Wallops = 'w',
        /// Host is cloaked.
        MaskedHost = 'x',
        /// IRC operator.
        Oper = 'o',
        /// Connected over TLS.
        Secure = 'z',
        /// Identified to services.
        Registered = 'r',
        /// Marked as a bot.
        Bot = 'B',
    }
}

impl ModeType for UserMode {
    fn from_char(c: char) -> Self {
        Self::lookup(c)
    }

    fn as_char(&self) -> char {
        self.letter()
    }

    fn arg_rule(&self, _adding: bool) -> ArgRule {
        ArgRule::None
    }
}

mode_enum! {
    /// Channel modes tracked by the client.
    ChannelMode {
        /// Ban mask list.
        Ban = 'b',
        /// Ban exception list.
        Exception = 'e',
        /// Invite exception list.
        InviteException = 'I',
        /// Join key.
        Key = 'k',
        /// Member limit.
        Limit = 'l',
        /// Hidden from LIST and WHOIS.
        Secret = 's',
        /// Older form of secret.
        Private = 'p',
        /// Only voiced members and above may speak.
        Moderated = 'm',
        /// Joining needs an invite.
        InviteOnly = 'i',
        /// Only members may message the channel.
        NoExternalMessages = 'n',
        /// Only operators may change the topic.
        ProtectedTopic = 't',
        /// Only identified users may join.
        RegisteredOnly = 'r',
        /// Only IRC operators may join.
        OperOnly = 'O',
        /// Only TLS users may join.
        TlsOnly = 'z',
        /// Owner privilege (`~`).
        Founder = 'q',
        /// Admin privilege (`&`).
        Admin = 'a',
        /// Operator privilege (`@`).
        Oper = 'o',
        /// Half-operator privilege (`%`).
        Halfop = 'h',
        /// Voice privilege (`+`).
        Voice = 'v',
    }
}

impl ChannelMode {
    /// True for flags whose value names a channel member.
    pub fn is_privilege(&self) -> bool {
        matches!(
            self,
            Self::Founder | Self::Admin | Self::Oper | Self::Halfop | Self::Voice
        )
    }

    /// True for mask list flags (`b`, `e`, `I`).
    pub fn is_list_mode(&self) -> bool {
        matches!(self, Self::Ban | Self::Exception | Self::InviteException)
    }
}

impl ModeType for ChannelMode {
    fn from_char(c: char) -> Self {
        Self::lookup(c)
    }

    fn as_char(&self) -> char {
        self.letter()
    }

    fn arg_rule(&self, adding: bool) -> ArgRule {
        match self {
            Self::Key if adding => ArgRule::Required,
            // servers echo the old key (or `*`) on removal, but not always
            Self::Key => ArgRule::Optional,
            Self::Limit if adding => ArgRule::Required,
            Self::Limit => ArgRule::None,
            m if m.is_list_mode() => ArgRule::Optional,
            m if m.is_privilege() => ArgRule::Required,
            _ => ArgRule::None,
        }
    }
}

/// A single mode change: the flag plus its value, if it took one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode<T>
where
    T: ModeType,
{
    /// Mode being set.
    Plus(T, Option<String>),
    /// Mode being cleared.
    Minus(T, Option<String>),
}

impl<T> Mode<T>
where
    T: ModeType,
{
    /// The flag being changed.
    pub fn mode(&self) -> &T {
        match self {
            Self::Plus(m, _) | Self::Minus(m, _) => m,
        }
    }

    /// The value token, if the flag consumed one.
    pub fn arg(&self) -> Option<&str> {
        match self {
            Self::Plus(_, a) | Self::Minus(_, a) => a.as_deref(),
        }
    }

    /// True if the flag is being set.
    pub fn is_plus(&self) -> bool {
        matches!(self, Self::Plus(..))
    }
}

impl<T> fmt::Display for Mode<T>
where
    T: ModeType,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_plus() { '+' } else { '-' };
        write!(f, "{}{}", sign, self.mode().as_char())?;
        if let Some(arg) = self.arg() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

use std::fmt::{self, Display, Formatter};

use super::types::Message;

impl Message {
    fn needs_colon(&self, last: &str) -> bool {
        self.trailing || last.is_empty() || last.contains(' ') || last.starts_with(':')
    }
}

/// Writes the wire form without the `\r\n` terminator; the line codec adds it.
impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(ref origin) = self.origin {
            write!(f, ":{} ", origin)?;
        }

        f.write_str(&self.command)?;

        if let Some((last, middle)) = self.args.split_last() {
            for arg in middle {
                write!(f, " {}", arg)?;
            }
            if self.needs_colon(last) {
                write!(f, " :{}", last)?;
            } else {
                write!(f, " {}", last)?;
            }
        }

        Ok(())
    }
}

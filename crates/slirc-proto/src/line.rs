//! Line-based codec for tokio.
//!
//! Reads and writes `\n`-terminated lines. Decoded lines have their
//! terminator stripped; encoded lines get `\r\n` appended.
//!
//! Decoding yields `Result<String, ProtocolError>` items. A bad line (too long,
//! or invalid UTF-8 in strict mode) comes out as an `Err` item and the stream
//! carries on with the next one; only I/O failures end it.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};
use crate::message::Message;

/// Default maximum line length: the IRCv3 tag budget plus the classic 512.
pub const DEFAULT_MAX_LINE_LEN: usize = 8191 + 512;

/// Line-based codec that handles newline-terminated messages.
#[derive(Debug, Clone)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Reject invalid UTF-8 instead of replacing it
    strict: bool,
    /// Bytes dropped so far from an over-long line whose end has not arrived
    discarding: Option<usize>,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Create a codec with the default limit and lossy UTF-8 decoding.
    pub fn new() -> Self {
        Self {
            next_index: 0,
            max_len: DEFAULT_MAX_LINE_LEN,
            strict: false,
            discarding: None,
        }
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            max_len,
            ..Self::new()
        }
    }

    /// Report undecodable lines as [`ProtocolError::InvalidUtf8`] instead of
    /// substituting U+FFFD.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    fn decode_line(&self, line: &[u8]) -> error::Result<String> {
        if self.strict {
            std::str::from_utf8(line)
                .map(str::to_owned)
                .map_err(|e| ProtocolError::InvalidUtf8 {
                    valid_up_to: e.valid_up_to(),
                })
        } else {
            Ok(String::from_utf8_lossy(line).into_owned())
        }
    }

    fn too_long(&self, actual: usize) -> ProtocolError {
        ProtocolError::MessageTooLong {
            actual,
            limit: self.max_len,
        }
    }
}

impl Decoder for LineCodec {
    type Item = error::Result<String>;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Self::Item>> {
        let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
            // No complete line yet. Past the limit the partial line is
            // thrown away rather than buffered.
            if let Some(dropped) = self.discarding.as_mut() {
                *dropped += src.len();
            } else if src.len() > self.max_len {
                self.discarding = Some(src.len());
            } else {
                self.next_index = src.len();
                return Ok(None);
            }
            src.clear();
            self.next_index = 0;
            return Ok(None);
        };

        let line = src.split_to(self.next_index + offset + 1);
        self.next_index = 0;

        if let Some(dropped) = self.discarding.take() {
            return Ok(Some(Err(self.too_long(dropped + line.len()))));
        }
        if line.len() > self.max_len {
            return Ok(Some(Err(self.too_long(line.len()))));
        }

        let mut body = &line[..line.len() - 1];
        if let [rest @ .., b'\r'] = body {
            body = rest;
        }
        Ok(Some(self.decode_line(body)))
    }
}

impl Encoder<&str> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: &str, dst: &mut BytesMut) -> error::Result<()> {
        // an embedded terminator would smuggle a second command onto the wire
        if let Some(c) = line.chars().find(|c| matches!(c, '\r' | '\n' | '\0')) {
            return Err(ProtocolError::IllegalChar(c));
        }
        dst.reserve(line.len() + 2);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> error::Result<()> {
        Encoder::<&str>::encode(self, line.as_str(), dst)
    }
}

impl Encoder<Message> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, msg: Message, dst: &mut BytesMut) -> error::Result<()> {
        Encoder::<&str>::encode(self, msg.to_string().as_str(), dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Decode one item, panicking on stream-level errors.
    fn next(codec: &mut LineCodec, buf: &mut BytesMut) -> Option<error::Result<String>> {
        codec.decode(buf).unwrap()
    }

    fn next_line(codec: &mut LineCodec, buf: &mut BytesMut) -> Option<String> {
        next(codec, buf).map(|line| line.unwrap())
    }

    #[test]
    fn test_decode_complete_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :test\r\n");

        assert_eq!(next_line(&mut codec, &mut buf), Some("PING :test".to_string()));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_bare_newline() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :a\nPING :b\n");
        assert_eq!(next_line(&mut codec, &mut buf), Some("PING :a".into()));
        assert_eq!(next_line(&mut codec, &mut buf), Some("PING :b".into()));
        assert!(next(&mut codec, &mut buf).is_none());
    }

    #[test]
    fn test_decode_partial_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :");
        assert!(next(&mut codec, &mut buf).is_none());

        buf.extend_from_slice(b"later\r\n");
        assert_eq!(next_line(&mut codec, &mut buf), Some("PING :later".into()));
    }

    #[test]
    fn test_too_long_line_is_skipped() {
        let mut codec = LineCodec::with_max_len(10);
        let mut buf = BytesMut::from("this is way too long\nPING :ok\n");

        let err = next(&mut codec, &mut buf).unwrap().unwrap_err();
        assert!(matches!(err, ProtocolError::MessageTooLong { actual: 21, limit: 10 }));
        assert!(err.is_line_local());
        assert_eq!(next_line(&mut codec, &mut buf), Some("PING :ok".into()));
    }

    #[test]
    fn test_too_long_partial_line_is_not_buffered() {
        let mut codec = LineCodec::with_max_len(10);
        let mut buf = BytesMut::from("0123456789abcdef");
        assert!(next(&mut codec, &mut buf).is_none());
        assert!(buf.is_empty());

        buf.extend_from_slice(b"more");
        assert!(next(&mut codec, &mut buf).is_none());
        assert!(buf.is_empty());

        buf.extend_from_slice(b"\r\nPING :ok\r\n");
        let err = next(&mut codec, &mut buf).unwrap().unwrap_err();
        assert!(matches!(err, ProtocolError::MessageTooLong { actual: 22, .. }));
        assert_eq!(next_line(&mut codec, &mut buf), Some("PING :ok".into()));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut buf = BytesMut::from(&b"PRIVMSG #c :caf\xe9\r\n"[..]);
        let line = next_line(&mut LineCodec::new(), &mut buf).unwrap();
        assert_eq!(line, "PRIVMSG #c :caf\u{fffd}");

        let mut codec = LineCodec::new().strict();
        let mut buf = BytesMut::from(&b"PRIVMSG #c :caf\xe9\r\nPING :x\r\n"[..]);
        assert!(matches!(
            next(&mut codec, &mut buf),
            Some(Err(ProtocolError::InvalidUtf8 { valid_up_to: 15 }))
        ));
        assert_eq!(next_line(&mut codec, &mut buf), Some("PING :x".into()));
    }

    #[test]
    fn test_encode_appends_crlf() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec.encode(Message::pong("test"), &mut buf).unwrap();
        assert_eq!(&buf[..], b"PONG :test\r\n");
    }

    #[test]
    fn test_encode_rejects_embedded_newline() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        let result = codec.encode("PRIVMSG #c :a\r\nQUIT", &mut buf);
        assert!(matches!(result, Err(ProtocolError::IllegalChar('\r'))));
        assert!(buf.is_empty());
    }
}

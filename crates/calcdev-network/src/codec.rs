//! Line protocol codec.
//!
//! Each request and each response is one `\n`-terminated line:
//!
//! | Request | Responses |
//! |---------|-----------|
//! | `WRITE <endpoint> <payload>` | `OK <n>`, `TRUNCATED <n> <requested>`, `UNSUPPORTED` |
//! | `READ <endpoint> [len]` | `DATA <escaped bytes>`, `EMPTY spent`, `EMPTY unsupported`, `ERR <kind> <message>` |
//! | `RESET` | `OK reset` |
//! | `STATE` | `STATE <json>` |
//!
//! The payload of `WRITE` is everything after the endpoint and one space,
//! so it may be empty or contain spaces. Result bytes in `DATA` are ASCII
//! escaped (`42\n` is sent as `DATA 42\n` with a literal backslash).
//!
//! A line that is not a valid request decodes to `Err(RequestError)` as an
//! item, so the session can answer `ERR` and continue. Only I/O failures and
//! over-long lines are codec errors, and those end the session.

use bytes::{BufMut, BytesMut};
use calcdev_core::Endpoint;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, Decoder, Encoder};

/// Default maximum request line length in bytes.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024;

/// Bytes requested by a `READ` without an explicit length.
pub const DEFAULT_READ_LEN: usize = 64;

/// A client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Write { endpoint: Endpoint, payload: Vec<u8> },
    Read { endpoint: Endpoint, len: usize },
    Reset,
    State,
}

impl Request {
    /// Parse one request line (without its terminator).
    ///
    /// `WRITE` payloads are taken byte for byte; they need not be UTF-8.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] describing why the line is not a request.
    ///
    /// # Examples
    ///
    /// ```
    /// use calcdev_core::Endpoint;
    /// use calcdev_network::Request;
    ///
    /// let request = Request::parse(b"WRITE first 12").unwrap();
    /// assert_eq!(
    ///     request,
    ///     Request::Write { endpoint: Endpoint::First, payload: b"12".to_vec() }
    /// );
    /// assert!(Request::parse(b"PUSH 1").is_err());
    /// ```
    pub fn parse(line: &[u8]) -> Result<Self, RequestError> {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let (command, rest) = split_word(line);
        let command = String::from_utf8_lossy(command);

        if command.eq_ignore_ascii_case("WRITE") {
            let (endpoint, payload) = split_word(rest);
            return Ok(Request::Write {
                endpoint: parse_endpoint(&String::from_utf8_lossy(endpoint))?,
                payload: payload.to_vec(),
            });
        }

        let rest = String::from_utf8_lossy(rest);
        match command.to_ascii_uppercase().as_str() {
            "" => Err(RequestError::Empty),
            "READ" => {
                let mut args = rest.split_whitespace();
                let endpoint = parse_endpoint(args.next().unwrap_or(""))?;
                let len = match args.next() {
                    Some(len) => len
                        .parse()
                        .map_err(|_| RequestError::InvalidLength(len.to_string()))?,
                    None => DEFAULT_READ_LEN,
                };
                if let Some(extra) = args.next() {
                    return Err(RequestError::UnexpectedArgument(extra.to_string()));
                }
                Ok(Request::Read { endpoint, len })
            }
            "RESET" | "STATE" if !rest.trim().is_empty() => {
                Err(RequestError::UnexpectedArgument(rest.trim().to_string()))
            }
            "RESET" => Ok(Request::Reset),
            "STATE" => Ok(Request::State),
            _ => Err(RequestError::UnknownCommand(command.to_string())),
        }
    }
}

fn split_word(bytes: &[u8]) -> (&[u8], &[u8]) {
    match bytes.iter().position(|&b| b == b' ') {
        Some(at) => (&bytes[..at], &bytes[at + 1..]),
        None => (bytes, &[]),
    }
}

fn parse_endpoint(name: &str) -> Result<Endpoint, RequestError> {
    if name.is_empty() {
        return Err(RequestError::MissingEndpoint);
    }
    name.parse()
        .map_err(|_| RequestError::UnknownEndpoint(name.to_string()))
}

/// Why a line is not a valid request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("empty request")]
    Empty,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("missing endpoint")]
    MissingEndpoint,

    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("invalid length: {0}")]
    InvalidLength(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

/// A server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Write stored `consumed` bytes.
    Written { consumed: usize },

    /// Write was clamped to the field capacity.
    Truncated { consumed: usize, requested: usize },

    /// Operation not supported on the endpoint.
    Unsupported,

    /// Bytes read from the endpoint.
    Data(Vec<u8>),

    /// Read produced no bytes; the reason is `spent` or `unsupported`.
    Empty(&'static str),

    /// State was reset.
    ResetDone,

    /// JSON state snapshot.
    State(String),

    /// Request or computation failed.
    Error { kind: String, message: String },
}

impl Response {
    pub fn error(kind: impl Into<String>, message: impl ToString) -> Self {
        Response::Error {
            kind: kind.into(),
            message: message.to_string(),
        }
    }

    /// Render the response line without its terminator.
    pub fn to_line(&self) -> String {
        match self {
            Response::Written { consumed } => format!("OK {consumed}"),
            Response::Truncated {
                consumed,
                requested,
            } => format!("TRUNCATED {consumed} {requested}"),
            Response::Unsupported => "UNSUPPORTED".to_string(),
            Response::Data(bytes) => format!("DATA {}", bytes.escape_ascii()),
            Response::Empty(reason) => format!("EMPTY {reason}"),
            Response::ResetDone => "OK reset".to_string(),
            Response::State(json) => format!("STATE {json}"),
            Response::Error { kind, message } => format!("ERR {kind} {message}"),
        }
    }
}

/// Errors that end a protocol session.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("line exceeds {max} bytes")]
    LineTooLong { max: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Tokio codec for the calculator line protocol.
///
/// Frames are split on `\n` without any text decoding, so a stray
/// non-UTF-8 byte only affects the request it appears in.
///
/// # Example
///
/// ```rust,no_run
/// use tokio::net::TcpStream;
/// use tokio_util::codec::Framed;
/// use calcdev_network::CalcCodec;
/// use futures::StreamExt;
///
/// # async fn example() -> std::io::Result<()> {
/// let stream = TcpStream::connect("127.0.0.1:9191").await?;
/// let mut framed = Framed::new(stream, CalcCodec::new());
///
/// while let Some(Ok(request)) = framed.next().await {
///     println!("Request: {:?}", request);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CalcCodec {
    lines: AnyDelimiterCodec,
    max_line_length: usize,
}

impl CalcCodec {
    /// Create a codec with the default maximum line length.
    pub fn new() -> Self {
        Self::with_max_line_length(DEFAULT_MAX_LINE_LENGTH)
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self {
            lines: AnyDelimiterCodec::new_with_max_length(
                vec![b'\n'],
                vec![b'\n'],
                max_line_length,
            ),
            max_line_length,
        }
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    fn map_error(&self, error: AnyDelimiterCodecError) -> CodecError {
        match error {
            AnyDelimiterCodecError::MaxChunkLengthExceeded => CodecError::LineTooLong {
                max: self.max_line_length,
            },
            AnyDelimiterCodecError::Io(e) => CodecError::Io(e),
        }
    }
}

impl Default for CalcCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for CalcCodec {
    type Item = Result<Request, RequestError>;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.lines.decode(src) {
            Ok(line) => Ok(line.map(|line| Request::parse(&line))),
            Err(e) => Err(self.map_error(e)),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.lines.decode_eof(src) {
            Ok(line) => Ok(line.map(|line| Request::parse(&line))),
            Err(e) => Err(self.map_error(e)),
        }
    }
}

impl Encoder<Response> for CalcCodec {
    type Error = CodecError;

    fn encode(&mut self, response: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = response.to_line();
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

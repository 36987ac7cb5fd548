use crate::keys::normalize_args;

/// A decoded control message: an address plus its arguments as strings.
///
/// The listener produces one of these per OSC message after converting every
/// argument to text and splitting space-joined chords into separate tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub address: String,
    pub args: Vec<String>,
}

impl InboundMessage {
    pub fn new(address: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            address: address.into(),
            args,
        }
    }

    /// Builds a message from raw argument strings, normalizing them with
    /// [`normalize_args`].
    pub fn from_raw<S: AsRef<str>>(address: impl Into<String>, raw_args: &[S]) -> Self {
        Self::new(address, normalize_args(raw_args))
    }
}

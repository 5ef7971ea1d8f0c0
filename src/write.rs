//! Formatting control message entries into a flat ancillary buffer.

use crate::entry::ControlMessage;
use crate::layout;

/// The error type returned when an entry sequence can not be formatted.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
	/// An entry payload is too long for the platform header length field.
	EntryTooLarge {
		/// Index of the offending entry in the input sequence.
		index: usize,

		/// Length of the offending payload in bytes.
		payload_length: usize,
	},
}

impl std::fmt::Display for FormatError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::EntryTooLarge { index, payload_length } => {
				write!(f, "payload of entry {index} is {payload_length} bytes, which the platform header length field can not represent")
			},
		}
	}
}

impl std::error::Error for FormatError {}

/// Serialize a sequence of control message entries into a flat ancillary buffer.
///
/// Entries are written in order, each as a platform header followed by the
/// payload bytes. Every entry but the last is followed by alignment padding,
/// so the buffer length is the sum of [`space_length`][crate::space_length]
/// over all entries except the last, plus
/// [`required_length`][crate::required_length] of the last.
///
/// An empty entry sequence is valid and yields an empty buffer.
///
/// # Example
/// ```
/// use unix_ancillary::{format, parse, rights_payload, ControlMessage};
///
/// let payload = rights_payload(&[7]);
/// let entry = ControlMessage::new(libc::SOL_SOCKET, libc::SCM_RIGHTS, &payload);
///
/// let buffer = format(&[entry])?;
/// assert_eq!(parse(&buffer)?, [entry]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn format(entries: &[ControlMessage<'_>]) -> Result<Vec<u8>, FormatError> {
	let mut buffer = Vec::new();
	let mut unpadded_end = 0;
	for (index, entry) in entries.iter().enumerate() {
		let payload_length = entry.payload().len();
		let too_large = FormatError::EntryTooLarge { index, payload_length };
		let required = layout::required_length(payload_length).ok_or(too_large)?;
		let padded = layout::space_length(payload_length).ok_or(too_large)?;
		let offset = buffer.len();
		buffer.resize(offset.checked_add(padded).ok_or(too_large)?, 0);
		write_entry(&mut buffer, offset, required, entry);
		unpadded_end = offset + required;
	}
	// No trailing padding is needed after the final entry.
	buffer.truncate(unpadded_end);
	Ok(buffer)
}

/// Write one entry at `offset`.
///
/// The buffer must hold at least `space_length` of the payload beyond `offset`,
/// and `required` must be `required_length` of the payload.
#[allow(clippy::unnecessary_cast)]
fn write_entry(buffer: &mut [u8], offset: usize, required: usize, entry: &ControlMessage<'_>) {
	let payload = entry.payload();
	// SAFETY: cmsghdr is a plain C record. Zero-initialize it so platform
	// private padding fields stay zero, and write it unaligned since a byte
	// buffer carries no alignment guarantee. The bounds are checked by the
	// caller: a header never exceeds the space of its own entry.
	unsafe {
		let mut header: libc::cmsghdr = std::mem::zeroed();
		header.cmsg_len = required as _;
		header.cmsg_level = entry.level();
		header.cmsg_type = entry.kind();
		std::ptr::write_unaligned(buffer.as_mut_ptr().add(offset).cast(), header);
	}
	let data_offset = offset + layout::header_length();
	buffer[data_offset..data_offset + payload.len()].copy_from_slice(payload);
}

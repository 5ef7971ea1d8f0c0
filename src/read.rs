//! Parsing a flat ancillary buffer back into control message entries.

use crate::entry::ControlMessage;
use crate::layout;

/// The error type returned when an ancillary buffer fails validation.
///
/// Each variant carries the byte offset at which validation failed.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
	/// Fewer bytes remain in the buffer than a full header requires.
	TruncatedHeader {
		/// Offset of the incomplete header.
		offset: usize,

		/// Bytes remaining in the buffer at that offset.
		available: usize,
	},

	/// A header declares a total length that runs past the buffer end.
	TruncatedPayload {
		/// Offset of the offending header.
		offset: usize,

		/// Total length (header + payload) declared by the header.
		declared: usize,

		/// Bytes remaining in the buffer at that offset.
		available: usize,
	},

	/// A header is inconsistent with the platform alignment rule.
	///
	/// Reported for declared lengths smaller than a header, for lengths the
	/// platform length field can not represent, and for computed next-entry
	/// offsets that miss the alignment boundary.
	MisalignedEntry {
		/// Offset of the inconsistency.
		offset: usize,
	},
}

impl std::fmt::Display for ParseError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::TruncatedHeader { offset, available } => {
				write!(f, "truncated control message header at offset {offset}: only {available} bytes remain")
			},
			Self::TruncatedPayload { offset, declared, available } => {
				write!(f, "control message at offset {offset} declares {declared} bytes but only {available} remain")
			},
			Self::MisalignedEntry { offset } => {
				write!(f, "control message at offset {offset} violates the platform alignment rule")
			},
		}
	}
}

impl std::error::Error for ParseError {}

/// Iterator over the entries of an ancillary buffer.
///
/// Yields one `Result` per entry and fuses after the first error, so the
/// entries that precede a corrupted one are still handed to the caller.
#[derive(Debug, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ControlMessages<'a> {
	buffer: &'a [u8],
	offset: usize,
	failed: bool,
}

/// Iterate over the entries of an ancillary buffer.
///
/// Unlike [`parse`], entries decoded before a validation error are yielded
/// normally; the error follows as the final item.
pub fn messages(buffer: &[u8]) -> ControlMessages<'_> {
	ControlMessages { buffer, offset: 0, failed: false }
}

/// Parse an ancillary buffer into its sequence of control message entries.
///
/// The buffer is walked from [`first_entry_offset`][crate::first_entry_offset],
/// validating every header and advancing by the platform alignment rule.
/// Parsing is all-or-nothing: a validation error discards the entries decoded
/// before it. Use [`messages`] to recover them instead.
///
/// An empty buffer parses as an empty sequence.
pub fn parse(buffer: &[u8]) -> Result<Vec<ControlMessage<'_>>, ParseError> {
	messages(buffer).collect()
}

impl<'a> Iterator for ControlMessages<'a> {
	type Item = Result<ControlMessage<'a>, ParseError>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed || self.offset >= self.buffer.len() {
			return None;
		}
		match read_entry(self.buffer, self.offset) {
			Ok((entry, next)) => {
				self.offset = next;
				Some(Ok(entry))
			},
			Err(error) => {
				self.failed = true;
				Some(Err(error))
			},
		}
	}
}

impl std::iter::FusedIterator for ControlMessages<'_> {}

/// Read and validate the entry at `offset`, returning it with the offset of
/// the next entry.
#[allow(clippy::unnecessary_cast)]
fn read_entry(buffer: &[u8], offset: usize) -> Result<(ControlMessage<'_>, usize), ParseError> {
	let header_length = layout::header_length();
	let available = buffer.len() - offset;
	if available < header_length {
		return Err(ParseError::TruncatedHeader { offset, available });
	}

	// SAFETY: the bounds check above guarantees a full header is in range,
	// header_length() is at least the size of cmsghdr. Read unaligned since
	// a byte buffer carries no alignment guarantee.
	let header: libc::cmsghdr = unsafe { std::ptr::read_unaligned(buffer.as_ptr().add(offset).cast()) };

	let declared = header.cmsg_len as usize;
	if declared < header_length {
		return Err(ParseError::MisalignedEntry { offset });
	}
	if declared > available {
		return Err(ParseError::TruncatedPayload { offset, declared, available });
	}

	let payload = &buffer[offset + header_length..offset + declared];
	let entry = ControlMessage::new(header.cmsg_level, header.cmsg_type, payload);

	let padded = layout::space_length(payload.len()).ok_or(ParseError::MisalignedEntry { offset })?;
	let next = offset + padded;
	if next < buffer.len() && next % layout::ENTRY_ALIGNMENT != 0 {
		return Err(ParseError::MisalignedEntry { offset: next });
	}
	Ok((entry, next))
}

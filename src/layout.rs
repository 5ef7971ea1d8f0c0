//! Platform sizing and alignment rules for control message entries.
//!
//! The header size and alignment stride of ancillary data differ per operating system.
//! Everything platform-sensitive is concentrated here: [`format`][crate::format] and
//! [`parse`][crate::parse] derive every offset through these functions and never apply
//! a padding formula of their own.

/// Alignment boundary on which every control message header must start.
pub(crate) const ENTRY_ALIGNMENT: usize = std::mem::align_of::<libc::cmsghdr>();

/// Get the total space occupied by one entry with the given payload length,
/// excluding trailing alignment padding.
///
/// This is the value the entry's header length field holds, and the minimum
/// buffer size needed to receive such an entry.
///
/// Returns `None` if the platform header length field cannot represent a
/// payload of this length.
///
/// # Example
/// ```
/// use unix_ancillary::{required_length, space_length};
///
/// let required = required_length(4).unwrap();
/// assert!(required >= 4);
/// assert!(space_length(4).unwrap() >= required);
/// ```
#[allow(clippy::unnecessary_cast)]
pub fn required_length(payload_length: usize) -> Option<usize> {
	let length = u32::try_from(payload_length).ok()?;
	// SAFETY: CMSG_LEN only performs arithmetic on its argument.
	let total = unsafe { libc::CMSG_LEN(length) } as usize;
	if total < payload_length {
		// The platform computation wrapped around.
		None
	} else {
		Some(total)
	}
}

/// Get the total space occupied by one entry with the given payload length,
/// including the trailing padding that aligns the next entry's header.
///
/// Always at least [`required_length`] of the same payload length.
/// Returns `None` if the platform header length field cannot represent a
/// payload of this length.
#[allow(clippy::unnecessary_cast)]
pub fn space_length(payload_length: usize) -> Option<usize> {
	let length = u32::try_from(payload_length).ok()?;
	// SAFETY: CMSG_SPACE only performs arithmetic on its argument.
	let total = unsafe { libc::CMSG_SPACE(length) } as usize;
	if total < payload_length {
		None
	} else {
		Some(total)
	}
}

/// Get the length of a control message header.
///
/// This is also the offset of the payload within an entry.
#[allow(clippy::unnecessary_cast)]
pub fn header_length() -> usize {
	// SAFETY: CMSG_LEN only performs arithmetic on its argument.
	unsafe { libc::CMSG_LEN(0) as usize }
}

/// Get the byte offset of the first entry header within an ancillary buffer.
///
/// Returns `None` if the buffer is too short to contain a single header.
/// This mirrors the platform's "first control message header" lookup used to
/// begin iteration.
pub fn first_entry_offset(buffer: &[u8]) -> Option<usize> {
	if buffer.len() >= header_length() {
		Some(0)
	} else {
		None
	}
}

//! The control message entry type and typed payload views.

use std::os::fd::RawFd;

#[cfg(any(target_os = "linux", target_os = "android"))]
use crate::SocketCred;

const FD_SIZE: usize = std::mem::size_of::<RawFd>();

#[cfg(any(target_os = "linux", target_os = "android"))]
const CREDS_SIZE: usize = std::mem::size_of::<SocketCred>();

/// A single ancillary data entry: a protocol `level`, a message `kind` within
/// that level, and an opaque payload.
///
/// The codec only sizes and copies the payload; interpreting it is the
/// caller's concern. For the two common kinds,
/// [`file_descriptors()`][Self::file_descriptors] and
/// [`credentials()`][Self::credentials] give a typed view of the bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ControlMessage<'a> {
	level: i32,
	kind: i32,
	payload: &'a [u8],
}

impl<'a> ControlMessage<'a> {
	/// Create a control message entry.
	///
	/// The header length field is computed from the payload length when the
	/// entry is formatted, it can not be supplied here.
	pub fn new(level: i32, kind: i32, payload: &'a [u8]) -> Self {
		Self { level, kind, payload }
	}

	/// The `cmsg_level` of the entry.
	pub fn level(&self) -> i32 {
		self.level
	}

	/// The `cmsg_type` of the entry.
	pub fn kind(&self) -> i32 {
		self.kind
	}

	/// The payload bytes of the entry.
	pub fn payload(&self) -> &'a [u8] {
		self.payload
	}

	/// View the payload as a list of file descriptors.
	///
	/// Returns `None` unless the entry is a `SOL_SOCKET` / `SCM_RIGHTS` message.
	/// The descriptor values are not validated in any way.
	pub fn file_descriptors(&self) -> Option<FileDescriptors<'a>> {
		if self.level == libc::SOL_SOCKET && self.kind == libc::SCM_RIGHTS {
			Some(FileDescriptors { data: self.payload })
		} else {
			None
		}
	}

	/// View the payload as a list of unix credentials.
	///
	/// Returns `None` unless the entry is a `SOL_SOCKET` / `SCM_CREDENTIALS` message.
	#[cfg(any(target_os = "linux", target_os = "android"))]
	pub fn credentials(&self) -> Option<Credentials<'a>> {
		if self.level == libc::SOL_SOCKET && self.kind == libc::SCM_CREDENTIALS {
			Some(Credentials { data: self.payload })
		} else {
			None
		}
	}
}

/// Encode a list of file descriptors as an `SCM_RIGHTS` payload.
///
/// # Example
/// ```
/// use unix_ancillary::{rights_payload, ControlMessage};
///
/// let payload = rights_payload(&[7]);
/// let entry = ControlMessage::new(libc::SOL_SOCKET, libc::SCM_RIGHTS, &payload);
/// ```
pub fn rights_payload(fds: &[RawFd]) -> Vec<u8> {
	let mut payload = Vec::with_capacity(fds.len() * FD_SIZE);
	for fd in fds {
		payload.extend_from_slice(&fd.to_ne_bytes());
	}
	payload
}

/// Encode a list of credential records as an `SCM_CREDENTIALS` payload.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub fn credentials_payload(creds: &[SocketCred]) -> Vec<u8> {
	// SAFETY: SocketCred is repr(transparent) over a plain C record,
	// so a slice of them is valid as raw bytes.
	let bytes = unsafe { std::slice::from_raw_parts(creds.as_ptr().cast::<u8>(), creds.len() * CREDS_SIZE) };
	bytes.to_vec()
}

/// Iterator over the file descriptors in an `SCM_RIGHTS` payload.
#[derive(Debug, Copy, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct FileDescriptors<'a> {
	data: &'a [u8],
}

impl<'a> FileDescriptors<'a> {
	/// Get the number of file descriptors in the payload.
	pub fn len(&self) -> usize {
		self.data.len() / FD_SIZE
	}

	/// Check if the payload holds no file descriptors.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Get the file descriptor at a given index.
	///
	/// Returns `None` if the index is out of bounds.
	pub fn get(&self, index: usize) -> Option<RawFd> {
		let bytes = self.data.get(index * FD_SIZE..(index + 1) * FD_SIZE)?;
		let mut raw = [0u8; FD_SIZE];
		raw.copy_from_slice(bytes);
		Some(RawFd::from_ne_bytes(raw))
	}
}

impl<'a> Iterator for FileDescriptors<'a> {
	type Item = RawFd;

	fn next(&mut self) -> Option<Self::Item> {
		let fd = self.get(0)?;
		self.data = &self.data[FD_SIZE..];
		Some(fd)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.len(), Some(self.len()))
	}
}

impl std::iter::ExactSizeIterator for FileDescriptors<'_> {
	fn len(&self) -> usize {
		self.len()
	}
}

/// Iterator over the credential records in an `SCM_CREDENTIALS` payload.
#[cfg(any(target_os = "linux", target_os = "android"))]
#[derive(Debug, Copy, Clone)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Credentials<'a> {
	data: &'a [u8],
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl<'a> Credentials<'a> {
	/// Get the number of credential records in the payload.
	pub fn len(&self) -> usize {
		self.data.len() / CREDS_SIZE
	}

	/// Check if the payload holds no credential records.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Get the credential record at a given index.
	///
	/// Returns `None` if the index is out of bounds.
	pub fn get(&self, index: usize) -> Option<SocketCred> {
		let bytes = self.data.get(index * CREDS_SIZE..(index + 1) * CREDS_SIZE)?;
		// SAFETY: SocketCred is a plain data record for which any bit pattern
		// is valid. Read unaligned, payload bytes carry no alignment guarantee.
		unsafe { Some(std::ptr::read_unaligned(bytes.as_ptr().cast())) }
	}
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl<'a> Iterator for Credentials<'a> {
	type Item = SocketCred;

	fn next(&mut self) -> Option<Self::Item> {
		let creds = self.get(0)?;
		self.data = &self.data[CREDS_SIZE..];
		Some(creds)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.len(), Some(self.len()))
	}
}

#[cfg(any(target_os = "linux", target_os = "android"))]
impl std::iter::ExactSizeIterator for Credentials<'_> {
	fn len(&self) -> usize {
		self.len()
	}
}

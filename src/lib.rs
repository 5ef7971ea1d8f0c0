//! Construction and parsing of ancillary data (control messages) for Unix domain sockets.
//!
//! Ancillary data is out-of-band metadata attached to a socket message. On
//! Unix domain sockets it is mainly used to pass open file descriptors
//! (`SCM_RIGHTS`) or process credentials to the peer. The kernel expects the
//! data as a flat buffer of length-prefixed entries whose header size and
//! alignment padding differ per platform, which makes hand-rolling the layout
//! an easy way to corrupt a message.
//!
//! This crate is only that buffer layer: [`format`] turns a sequence of
//! [`ControlMessage`] entries into a buffer ready to attach to an outbound
//! `sendmsg` call, [`parse`] validates and decodes a received buffer, and the
//! sizing functions [`required_length`] and [`space_length`] tell a transport
//! how large a receive buffer must be. Sending and receiving the buffer is
//! the caller's job; the crate performs no I/O and keeps no state, so it can
//! be used freely from multiple threads.
//!
//! # Example
//! ```
//! use unix_ancillary::{format, parse, rights_payload, ControlMessage};
//!
//! let payload = rights_payload(&[7]);
//! let entry = ControlMessage::new(libc::SOL_SOCKET, libc::SCM_RIGHTS, &payload);
//!
//! let buffer = format(&[entry])?;
//! for entry in parse(&buffer)? {
//!     if let Some(fds) = entry.file_descriptors() {
//!         for fd in fds {
//!             println!("file descriptor: {fd}");
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

mod entry;
mod layout;
mod read;
mod write;

#[cfg(any(target_os = "linux", target_os = "android"))]
mod socket_cred;

pub use entry::{rights_payload, ControlMessage, FileDescriptors};
pub use layout::{first_entry_offset, header_length, required_length, space_length};
pub use read::{messages, parse, ControlMessages, ParseError};
pub use write::{format, FormatError};

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use entry::{credentials_payload, Credentials};

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use socket_cred::SocketCred;

/// Unix credentials of a process, as carried by an `SCM_CREDENTIALS` message.
///
/// The in-memory layout matches the platform `ucred` record, so a slice of
/// these can be encoded directly with
/// [`credentials_payload`][crate::credentials_payload].
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct SocketCred(libc::ucred);

impl SocketCred {
	/// Create a credentials record from explicit values.
	pub fn new(pid: libc::pid_t, uid: libc::uid_t, gid: libc::gid_t) -> Self {
		Self(libc::ucred { pid, uid, gid })
	}

	/// Get the credentials of the calling process.
	pub fn current() -> Self {
		// SAFETY: getpid, getuid and getgid can not fail.
		unsafe { Self::new(libc::getpid(), libc::getuid(), libc::getgid()) }
	}

	/// The process ID.
	pub fn pid(&self) -> libc::pid_t {
		self.0.pid
	}

	/// The user ID.
	pub fn uid(&self) -> libc::uid_t {
		self.0.uid
	}

	/// The group ID.
	pub fn gid(&self) -> libc::gid_t {
		self.0.gid
	}
}

impl std::fmt::Debug for SocketCred {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SocketCred")
			.field("pid", &self.0.pid)
			.field("uid", &self.0.uid)
			.field("gid", &self.0.gid)
			.finish()
	}
}

impl PartialEq for SocketCred {
	fn eq(&self, other: &Self) -> bool {
		self.0.pid == other.0.pid && self.0.uid == other.0.uid && self.0.gid == other.0.gid
	}
}

impl Eq for SocketCred {}

use assert2::{assert, let_assert};
use unix_ancillary::{format, header_length, messages, parse, rights_payload, space_length, ControlMessage, ParseError};

/// Overwrite the length field of the header at `offset`.
#[allow(clippy::unnecessary_cast)]
fn patch_cmsg_len(buffer: &mut [u8], offset: usize, value: usize) {
	// SAFETY: callers pass an offset at which format() wrote a full header.
	unsafe {
		let ptr = buffer.as_mut_ptr().add(offset) as *mut libc::cmsghdr;
		let mut header = std::ptr::read_unaligned(ptr);
		header.cmsg_len = value as _;
		std::ptr::write_unaligned(ptr, header);
	}
}

#[test]
fn every_truncation_of_a_single_entry_is_detected() {
	let payload = rights_payload(&[7]);
	let entry = ControlMessage::new(libc::SOL_SOCKET, libc::SCM_RIGHTS, &payload);
	let_assert!(Ok(buffer) = format(&[entry]));

	// Truncating to zero bytes yields the empty sequence by the empty-input
	// policy, every other truncation must be reported.
	for keep in 1..buffer.len() {
		let_assert!(Err(error) = parse(&buffer[..keep]), "truncated to {} bytes", keep);
		match error {
			ParseError::TruncatedHeader { offset, available } => {
				assert!(keep < header_length());
				assert!(offset == 0);
				assert!(available == keep);
			},
			ParseError::TruncatedPayload { offset, declared, available } => {
				assert!(keep >= header_length());
				assert!(offset == 0);
				assert!(declared == buffer.len());
				assert!(available == keep);
			},
			other => panic!("unexpected error for truncation to {keep} bytes: {other:?}"),
		}
	}
}

#[test]
fn short_garbage_buffer_is_a_truncated_header() {
	let buffer = [0xff; 3];
	assert!(let Err(ParseError::TruncatedHeader { offset: 0, available: 3 }) = parse(&buffer));
}

#[test]
fn declared_length_below_header_size_is_misaligned() {
	let payload = rights_payload(&[7]);
	let entry = ControlMessage::new(libc::SOL_SOCKET, libc::SCM_RIGHTS, &payload);
	let_assert!(Ok(mut buffer) = format(&[entry]));

	patch_cmsg_len(&mut buffer, 0, header_length() - 1);
	assert!(let Err(ParseError::MisalignedEntry { offset: 0 }) = parse(&buffer));
}

#[test]
fn declared_length_past_buffer_end_is_a_truncated_payload() {
	let payload = rights_payload(&[7]);
	let entry = ControlMessage::new(libc::SOL_SOCKET, libc::SCM_RIGHTS, &payload);
	let_assert!(Ok(mut buffer) = format(&[entry]));

	let bad_length = buffer.len() + 1;
	patch_cmsg_len(&mut buffer, 0, bad_length);

	let_assert!(Err(ParseError::TruncatedPayload { offset, declared, available }) = parse(&buffer));
	assert!(offset == 0);
	assert!(declared == bad_length);
	assert!(available == buffer.len());
}

#[test]
fn iterator_yields_entries_before_a_corrupted_one() {
	let first_payload = rights_payload(&[5]);
	let second_payload = rights_payload(&[6]);
	let first = ControlMessage::new(libc::SOL_SOCKET, libc::SCM_RIGHTS, &first_payload);
	let second = ControlMessage::new(libc::SOL_SOCKET, libc::SCM_RIGHTS, &second_payload);
	let_assert!(Ok(mut buffer) = format(&[first, second]));

	// Make the second header claim to run past the buffer end.
	let second_offset = space_length(first_payload.len()).unwrap();
	let bad_length = buffer.len();
	patch_cmsg_len(&mut buffer, second_offset, bad_length);

	let mut entries = messages(&buffer);
	let_assert!(Some(Ok(entry)) = entries.next());
	assert!(entry == first);
	assert!(let Some(Err(ParseError::TruncatedPayload { .. })) = entries.next());
	assert!(let None = entries.next());

	// parse() over the same buffer is all-or-nothing.
	assert!(let Err(ParseError::TruncatedPayload { .. }) = parse(&buffer));
}

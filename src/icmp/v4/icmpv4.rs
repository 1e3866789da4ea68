use crate::icmp::v4::SequenceNumber;
use crate::ping_error::{ErrorKind, PingError};
use pnet_packet::icmp::{
    echo_reply::EchoReplyPacket,
    echo_request::{EchoRequestPacket, MutableEchoRequestPacket},
    IcmpCode, IcmpTypes,
};
use pnet_packet::ipv4::Ipv4Packet;
use pnet_packet::Packet;

pub const ICMP_ECHO_REQUEST: u8 = 8;
pub const ICMP_ECHO_REPLY: u8 = 0;

pub const ICMP_HEADER_SIZE: usize = 8;
pub const MAX_PAYLOAD_SIZE: usize = 256;

/// Decoded view of the fixed ICMP echo header and the bytes that follow it.
#[derive(Debug, PartialEq, Eq)]
pub struct EchoReply<'a> {
    pub icmp_type: u8,
    pub icmp_code: u8,
    pub checksum: u16,
    pub identifier: u16,
    pub sequence_number: SequenceNumber,
    pub payload: &'a [u8],
}

/// Lays out an ICMP Echo Request (type 8, code 0) followed by `payload` and
/// fills in the checksum.
pub fn build_echo_request(
    identifier: u16,
    sequence_number: SequenceNumber,
    payload: &[u8],
) -> Result<Vec<u8>, PingError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(PingError::new(
            ErrorKind::PayloadTooLarge,
            format!(
                "payload of {} bytes exceeds the maximum of {MAX_PAYLOAD_SIZE} bytes",
                payload.len()
            ),
        ));
    }

    let mut buf = vec![0u8; EchoRequestPacket::minimum_packet_size() + payload.len()];
    let mut package = MutableEchoRequestPacket::new(&mut buf)
        .ok_or_else(|| PingError::new(ErrorKind::Malformed, "could not create ICMP package"))?;
    package.set_icmp_type(IcmpTypes::EchoRequest);
    package.set_icmp_code(IcmpCode::new(0));
    package.set_identifier(identifier);
    package.set_sequence_number(sequence_number.into());
    package.set_payload(payload);

    package.set_checksum(0_u16);
    let checksum = compute_checksum(package.packet());
    package.set_checksum(checksum);

    Ok(buf)
}

/// RFC 1071 internet checksum over `buffer`, read as big-endian 16-bit words.
/// A trailing odd byte is padded with a zero byte.
pub fn compute_checksum(buffer: &[u8]) -> u16 {
    !ones_complement_sum(buffer)
}

/// True when the one's-complement sum over the whole packet, checksum field
/// included, is `0xFFFF`.
pub fn verify_checksum(buffer: &[u8]) -> bool {
    ones_complement_sum(buffer) == 0xFFFF
}

#[allow(clippy::cast_possible_truncation)]
fn ones_complement_sum(buffer: &[u8]) -> u16 {
    let mut sum: u64 = 0;
    let mut words = buffer.chunks_exact(2);
    for word in &mut words {
        sum += u64::from(u16::from_be_bytes([word[0], word[1]]));
    }
    if let [last] = words.remainder() {
        sum += u64::from(u16::from_be_bytes([*last, 0]));
    }
    while sum > 0xFFFF {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}

/// Reads the 8-byte echo header. The checksum is not validated here.
pub fn parse_echo_reply(buffer: &[u8]) -> Result<EchoReply<'_>, PingError> {
    let package = EchoReplyPacket::new(buffer).ok_or_else(|| {
        PingError::new(
            ErrorKind::Malformed,
            format!("{} bytes too short for an ICMP echo header", buffer.len()),
        )
    })?;
    Ok(EchoReply {
        icmp_type: package.get_icmp_type().0,
        icmp_code: package.get_icmp_code().0,
        checksum: package.get_checksum(),
        identifier: package.get_identifier(),
        sequence_number: package.get_sequence_number().into(),
        payload: &buffer[ICMP_HEADER_SIZE..],
    })
}

/// Destination unreachable, source quench, redirect, time exceeded and
/// parameter problem quote the datagram that caused them.
pub fn is_error_message(icmp_type: u8) -> bool {
    matches!(icmp_type, 3 | 4 | 5 | 11 | 12)
}

/// Echo request header quoted in the body of an ICMP error message: the
/// offending IPv4 header followed by at least 8 bytes of its payload.
pub fn parse_quoted_echo_request(error_body: &[u8]) -> Option<EchoReply<'_>> {
    let ipv4_packet = Ipv4Packet::new(error_body)?;
    let header_length = usize::from(ipv4_packet.get_header_length()) * 4;
    let quoted = parse_echo_reply(error_body.get(header_length..)?).ok()?;
    (quoted.icmp_type == ICMP_ECHO_REQUEST).then_some(quoted)
}

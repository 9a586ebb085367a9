//! StrKey encoding of account ids and secret seeds.
//!
//! Format: base32(version_byte || payload(32) || crc16(version_byte || payload))
//!
//! - version byte `6 << 3` renders as a leading `G` (account id / public key)
//! - version byte `18 << 3` renders as a leading `S` (secret seed)
//! - checksum is CRC16-XModem of the first 33 bytes, little-endian
//! - base32 is the RFC 4648 alphabet without padding; 35 bytes → 56 characters

use pocket_types::{AccountAddress, PrivateKey, PublicKey};
use zeroize::Zeroize;

/// RFC 4648 base32 alphabet.
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const BASE32_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let alpha = BASE32_ALPHABET;
    let mut i = 0;
    while i < 32 {
        table[alpha[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Version byte for account ids (`G…`).
const VERSION_ACCOUNT_ID: u8 = 6 << 3;
/// Version byte for secret seeds (`S…`).
const VERSION_SEED: u8 = 18 << 3;

/// Raw length: 1 version byte + 32 payload bytes + 2 checksum bytes.
const RAW_LEN: usize = 35;
/// Encoded length: 35 bytes × 8 / 5.
const ENCODED_LEN: usize = 56;

/// CRC16-XModem (poly 0x1021, init 0, no reflection).
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Encode a byte slice as unpadded RFC 4648 base32.
fn encode_base32(bytes: &[u8]) -> String {
    let total_bits = bytes.len() * 8;
    let num_chars = total_bits.div_ceil(5);
    let mut result = String::with_capacity(num_chars);

    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;

    for &byte in bytes {
        buffer = (buffer << 8) | byte as u64;
        bits_in_buffer += 8;
        while bits_in_buffer >= 5 {
            bits_in_buffer -= 5;
            let idx = ((buffer >> bits_in_buffer) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
    }
    if bits_in_buffer > 0 {
        let idx = ((buffer << (5 - bits_in_buffer)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

/// Decode unpadded base32 into a fixed-size array. `None` on invalid
/// characters or a length that does not fill exactly `N` bytes.
fn decode_base32_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let mut buffer: u64 = 0;
    let mut bits_in_buffer = 0;
    let mut result = [0u8; N];
    let mut pos = 0;

    for c in s.bytes() {
        if c >= 128 {
            return None;
        }
        let val = BASE32_DECODE[c as usize];
        if val == 0xFF {
            return None;
        }
        buffer = (buffer << 5) | val as u64;
        bits_in_buffer += 5;
        if bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            if pos >= N {
                return None;
            }
            result[pos] = (buffer >> bits_in_buffer) as u8;
            pos += 1;
        }
    }

    if pos != N {
        return None;
    }
    Some(result)
}

fn encode_check(version: u8, payload: &[u8; 32]) -> String {
    let mut raw = [0u8; RAW_LEN];
    raw[0] = version;
    raw[1..33].copy_from_slice(payload);
    let checksum = crc16_xmodem(&raw[..33]);
    raw[33..].copy_from_slice(&checksum.to_le_bytes());
    let encoded = encode_base32(&raw);
    raw.zeroize();
    encoded
}

fn decode_check(version: u8, encoded: &str) -> Option<[u8; 32]> {
    if encoded.len() != ENCODED_LEN {
        return None;
    }
    let mut raw: [u8; RAW_LEN] = decode_base32_fixed(encoded)?;
    let expected = crc16_xmodem(&raw[..33]).to_le_bytes();
    let valid = raw[0] == version && raw[33..] == expected;

    let mut payload = [0u8; 32];
    payload.copy_from_slice(&raw[1..33]);
    raw.zeroize();

    if valid {
        Some(payload)
    } else {
        payload.zeroize();
        None
    }
}

/// Derive the `G…` account address for a public key.
pub fn derive_address(public_key: &PublicKey) -> AccountAddress {
    AccountAddress::new(encode_check(VERSION_ACCOUNT_ID, public_key.as_bytes()))
}

/// Extract the public key bytes from a `G…` address.
///
/// Returns `None` if the address is malformed or has an invalid checksum.
pub fn decode_address(address: &str) -> Option<[u8; 32]> {
    decode_check(VERSION_ACCOUNT_ID, address)
}

/// Validate that an address string is a well-formed account id.
///
/// Format-only: says nothing about whether the account exists on the network.
pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_some()
}

/// Encode a private key as an `S…` secret seed.
pub fn encode_secret(private_key: &PrivateKey) -> String {
    encode_check(VERSION_SEED, private_key.as_bytes())
}

/// Decode an `S…` secret seed.
pub fn decode_secret(secret: &str) -> Option<PrivateKey> {
    decode_check(VERSION_SEED, secret).map(PrivateKey)
}

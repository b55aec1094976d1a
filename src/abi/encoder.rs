//! ABI argument encoding
//!
//! Encodes typed argument values as a Solidity ABI tuple, without a function
//! selector. Only the elementary types the manifest can emit are supported.

use alloy_primitives::{hex, Address, U256};
use thiserror::Error;

pub type Word = [u8; 32];

const WORD: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("unsupported ABI type `{0}`")]
    UnsupportedType(String),

    #[error("invalid {ty} value `{value}`")]
    InvalidValue { ty: String, value: String },

    #[error("value `{value}` does not fit in {ty}")]
    OutOfRange { ty: String, value: String },

    #[error("expected {expected} values, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
}

fn invalid(ty: &str, value: &str) -> EncodeError {
    EncodeError::InvalidValue {
        ty: ty.to_string(),
        value: value.to_string(),
    }
}

fn out_of_range(ty: &str, value: &str) -> EncodeError {
    EncodeError::OutOfRange {
        ty: ty.to_string(),
        value: value.to_string(),
    }
}

// Solidity types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Uint(U256),
    /// Two's complement word
    Int(U256),
    Address(Address),
    Bool(bool),
    /// `bytes1` ..= `bytes32`
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
}

impl Token {
    /// Parse a textual value as the given Solidity type.
    pub fn parse(ty: &str, raw: &str) -> Result<Self, EncodeError> {
        let ty = ty.trim();

        match ty {
            "string" => return Ok(Token::String(raw.to_string())),
            "address" => {
                return raw
                    .trim()
                    .parse::<Address>()
                    .map(Token::Address)
                    .map_err(|_| invalid(ty, raw))
            }
            "bool" => {
                return match raw.trim() {
                    "true" | "1" => Ok(Token::Bool(true)),
                    "false" | "0" => Ok(Token::Bool(false)),
                    _ => Err(invalid(ty, raw)),
                }
            }
            "bytes" => {
                return hex::decode(raw.trim())
                    .map(Token::Bytes)
                    .map_err(|_| invalid(ty, raw))
            }
            _ => {}
        }

        if let Some(width) = ty.strip_prefix("uint") {
            return parse_uint(ty, int_width(ty, width)?, raw.trim());
        }
        if let Some(width) = ty.strip_prefix("int") {
            return parse_int(ty, int_width(ty, width)?, raw.trim());
        }
        if let Some(size) = ty.strip_prefix("bytes") {
            let size: usize = size
                .parse()
                .ok()
                .filter(|n| (1..=WORD).contains(n))
                .ok_or_else(|| EncodeError::UnsupportedType(ty.to_string()))?;
            let data = hex::decode(raw.trim()).map_err(|_| invalid(ty, raw))?;
            if data.len() != size {
                return Err(invalid(ty, raw));
            }
            return Ok(Token::FixedBytes(data));
        }

        Err(EncodeError::UnsupportedType(ty.to_string()))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Token::Bytes(_) | Token::String(_))
    }
}

/// Bit width of `uintN` / `intN`; a bare `uint` is 256 bits.
fn int_width(ty: &str, suffix: &str) -> Result<usize, EncodeError> {
    if suffix.is_empty() {
        return Ok(256);
    }
    suffix
        .parse::<usize>()
        .ok()
        .filter(|bits| (8..=256).contains(bits) && bits % 8 == 0)
        .ok_or_else(|| EncodeError::UnsupportedType(ty.to_string()))
}

fn parse_decimal(ty: &str, digits: &str) -> Result<U256, EncodeError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(ty, digits));
    }
    U256::from_str_radix(digits, 10).map_err(|_| out_of_range(ty, digits))
}

fn parse_uint(ty: &str, bits: usize, raw: &str) -> Result<Token, EncodeError> {
    let value = parse_decimal(ty, raw)?;
    if bits < 256 && value >= U256::from(1u8) << bits {
        return Err(out_of_range(ty, raw));
    }
    Ok(Token::Uint(value))
}

fn parse_int(ty: &str, bits: usize, raw: &str) -> Result<Token, EncodeError> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, raw),
    };
    let magnitude = parse_decimal(ty, digits)?;
    let limit = U256::from(1u8) << (bits - 1);

    if negative {
        if magnitude > limit {
            return Err(out_of_range(ty, raw));
        }
        Ok(Token::Int(U256::ZERO.wrapping_sub(magnitude)))
    } else {
        if magnitude >= limit {
            return Err(out_of_range(ty, raw));
        }
        Ok(Token::Int(magnitude))
    }
}

/// Head/tail ABI encoder
#[derive(Debug, Default)]
pub struct AbiEncoder {
    head: Vec<u8>,
    tail: Vec<u8>,
}

impl AbiEncoder {
    /// Encode a tuple of tokens.
    pub fn encode(tokens: &[Token]) -> Vec<u8> {
        let head_size = tokens.len() * WORD;
        let mut encoder = AbiEncoder::default();

        for token in tokens {
            if token.is_dynamic() {
                let offset = head_size + encoder.tail.len();
                encoder.head.extend(uint_word(U256::from(offset)));
                encoder.push_tail(token);
            } else {
                encoder.head.extend(static_word(token));
            }
        }

        encoder.head.extend(encoder.tail);
        encoder.head
    }

    fn push_tail(&mut self, token: &Token) {
        let data: &[u8] = match token {
            Token::Bytes(bytes) => bytes,
            Token::String(s) => s.as_bytes(),
            _ => return,
        };
        self.tail.extend(uint_word(U256::from(data.len())));
        self.tail.extend(pad_right(data));
    }
}

fn uint_word(value: U256) -> Word {
    value.to_be_bytes::<32>()
}

fn static_word(token: &Token) -> Word {
    match token {
        Token::Uint(value) | Token::Int(value) => uint_word(*value),
        Token::Bool(flag) => uint_word(U256::from(u8::from(*flag))),
        Token::Address(address) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(address.as_slice());
            word
        }
        Token::FixedBytes(data) => {
            let mut word = [0u8; 32];
            let len = data.len().min(WORD);
            word[..len].copy_from_slice(&data[..len]);
            word
        }
        // dynamic tokens are written through the tail
        Token::Bytes(_) | Token::String(_) => [0u8; 32],
    }
}

/// Right-pad to a whole number of words.
fn pad_right(data: &[u8]) -> Vec<u8> {
    let padded_len = data.len().div_ceil(WORD) * WORD;
    let mut out = data.to_vec();
    out.resize(padded_len, 0);
    out
}

/// Parse each value as its declared type and encode the tuple.
pub fn encode_args<T, V>(types: &[T], values: &[V]) -> Result<Vec<u8>, EncodeError>
where
    T: AsRef<str>,
    V: AsRef<str>,
{
    if types.len() != values.len() {
        return Err(EncodeError::ArityMismatch {
            expected: types.len(),
            actual: values.len(),
        });
    }

    let tokens = types
        .iter()
        .zip(values)
        .map(|(ty, value)| Token::parse(ty.as_ref(), value.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AbiEncoder::encode(&tokens))
}

/// [`encode_args`] rendered as `0x`-prefixed hex.
pub fn encode_args_hex<T, V>(types: &[T], values: &[V]) -> Result<String, EncodeError>
where
    T: AsRef<str>,
    V: AsRef<str>,
{
    encode_args(types, values).map(hex::encode_prefixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_uint() {
        let encoded = encode_args(&["uint256"], &["42"]).unwrap();
        assert_eq!(encoded.len(), 32);
        assert_eq!(encoded[31], 42);
        assert!(encoded[..31].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_uint_and_string() {
        let hex = encode_args_hex(&["uint256", "string"], &["1", "hi"]).unwrap();
        let expected = concat!(
            "0x",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000040",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "6869000000000000000000000000000000000000000000000000000000000000",
        );
        assert_eq!(hex, expected);
    }

    #[test]
    fn test_address_and_bool() {
        let encoded = encode_args(
            &["address", "bool"],
            &["0x000000000000000000000000000000000000dEaD", "true"],
        )
        .unwrap();
        assert_eq!(encoded.len(), 64);
        assert_eq!(&encoded[30..32], &[0xde, 0xad]);
        assert_eq!(encoded[63], 1);
    }

    #[test]
    fn test_negative_int() {
        let encoded = encode_args(&["int8"], &["-1"]).unwrap();
        assert!(encoded.iter().all(|b| *b == 0xff));
        assert!(matches!(
            Token::parse("int8", "128"),
            Err(EncodeError::OutOfRange { .. })
        ));
        assert!(Token::parse("int8", "-128").is_ok());
    }

    #[test]
    fn test_range_checks() {
        assert!(Token::parse("uint8", "255").is_ok());
        assert!(matches!(
            Token::parse("uint8", "256"),
            Err(EncodeError::OutOfRange { .. })
        ));
        assert!(matches!(
            Token::parse("uint7", "1"),
            Err(EncodeError::UnsupportedType(_))
        ));
        assert_eq!(Token::parse("uint", "7").unwrap(), Token::Uint(U256::from(7u8)));
    }

    #[test]
    fn test_invalid_values() {
        assert!(Token::parse("address", "42").is_err());
        assert!(Token::parse("bool", "yes").is_err());
        assert!(Token::parse("bytes4", "0x0102").is_err());
        assert!(Token::parse("uint256", "12ab").is_err());
        assert!(Token::parse("tuple", "1").is_err());
    }

    #[test]
    fn test_fixed_bytes_left_aligned() {
        let encoded = encode_args(&["bytes2"], &["0xabcd"]).unwrap();
        assert_eq!(&encoded[..2], &[0xab, 0xcd]);
        assert!(encoded[2..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_arity_mismatch() {
        assert_eq!(
            encode_args(&["uint256"], &["1", "2"]),
            Err(EncodeError::ArityMismatch {
                expected: 1,
                actual: 2
            })
        );
    }
}

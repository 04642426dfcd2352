// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Hash related utils.
//!
//! Every digest function takes the input as a string plus the [`Encoding`]
//! used to turn it into bytes, and returns lowercase hex.

use crate::{Error, Result};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::Digest;
use sha2::Sha256;
use sha2::Sha512;
use std::fmt;
use std::str::FromStr;
use whirlpool::Whirlpool;

/// Size of the random seed hashed by [`generate_token`].
const TOKEN_SEED_SIZE: usize = 512;

/// Encoding of a string input before it gets hashed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// UTF-8 bytes of the string.
    #[default]
    Utf8,
    /// Hex encoded bytes.
    Hex,
    /// Standard base64 encoded bytes.
    Base64,
    /// One byte per char, chars must be in `U+0000..=U+00FF`.
    Binary,
}

impl Encoding {
    /// Decode `data` into the bytes it represents under this encoding.
    pub fn decode(self, data: &str) -> Result<Vec<u8>> {
        match self {
            Encoding::Utf8 => Ok(data.as_bytes().to_vec()),
            Encoding::Hex => hex::decode(data).map_err(|e| {
                Error::invalid_input_encoding("input is not valid hex").with_source(e)
            }),
            Encoding::Base64 => BASE64_STANDARD.decode(data).map_err(|e| {
                Error::invalid_input_encoding("input is not valid base64").with_source(e)
            }),
            Encoding::Binary => data
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        Error::invalid_input_encoding(format!(
                            "char {c:?} can't be represented as binary"
                        ))
                    })
                })
                .collect(),
        }
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "hex" => Ok(Encoding::Hex),
            "base64" => Ok(Encoding::Base64),
            "binary" | "latin1" => Ok(Encoding::Binary),
            v => Err(Error::invalid_input_encoding(format!(
                "unknown encoding: {v}"
            ))),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => f.write_str("utf8"),
            Encoding::Hex => f.write_str("hex"),
            Encoding::Base64 => f.write_str("base64"),
            Encoding::Binary => f.write_str("binary"),
        }
    }
}

/// Base64 encode
pub fn base64_encode(content: &[u8]) -> String {
    BASE64_STANDARD.encode(content)
}

#[inline]
fn hex_digest<D: Digest>(content: &[u8]) -> String {
    hex::encode(D::digest(content).as_slice())
}

/// Hex encoded SHA256 hash of raw bytes.
///
/// Use this function instead of `hex::encode(sha256(content))` can reduce
/// extra copy.
pub fn hex_sha256(content: &[u8]) -> String {
    hex_digest::<Sha256>(content)
}

/// Hex encoded RIPEMD-160 hash of raw bytes.
pub fn hex_rmd160(content: &[u8]) -> String {
    hex_digest::<Ripemd160>(content)
}

/// Hex encoded RIPEMD-160 of the raw SHA256 digest of raw bytes.
pub fn hex_rmd160sha256(content: &[u8]) -> String {
    hex_rmd160(&Sha256::digest(content))
}

/// Hex encoded SHA1 hash.
pub fn sha1(data: &str, encoding: Encoding) -> Result<String> {
    Ok(hex_digest::<Sha1>(&encoding.decode(data)?))
}

/// Hex encoded SHA256 hash.
pub fn sha256(data: &str, encoding: Encoding) -> Result<String> {
    Ok(hex_digest::<Sha256>(&encoding.decode(data)?))
}

/// Hex encoded SHA512 hash.
pub fn sha512(data: &str, encoding: Encoding) -> Result<String> {
    Ok(hex_digest::<Sha512>(&encoding.decode(data)?))
}

/// Hex encoded RIPEMD-160 hash.
pub fn rmd160(data: &str, encoding: Encoding) -> Result<String> {
    Ok(hex_digest::<Ripemd160>(&encoding.decode(data)?))
}

/// Hex encoded Whirlpool hash.
pub fn whirlpool(data: &str, encoding: Encoding) -> Result<String> {
    Ok(hex_digest::<Whirlpool>(&encoding.decode(data)?))
}

/// RIPEMD-160 over the raw SHA256 digest of the input.
///
/// Equal to `rmd160(&sha256(data, encoding)?, Encoding::Hex)`. This is the
/// double hash used to derive compact identifiers.
pub fn rmd160sha256(data: &str, encoding: Encoding) -> Result<String> {
    Ok(hex_rmd160sha256(&encoding.decode(data)?))
}

/// SHA1 over the raw Whirlpool digest of the input.
pub fn sha1whirlpool(data: &str, encoding: Encoding) -> Result<String> {
    let digest = Whirlpool::digest(encoding.decode(data)?);
    Ok(hex_digest::<Sha1>(&digest))
}

/// Generate a random 160 bit token.
///
/// The token is `rmd160sha256` of 512 bytes read from the OS random source.
pub fn generate_token() -> String {
    let mut seed = [0u8; TOKEN_SEED_SIZE];
    OsRng.fill_bytes(&mut seed);

    hex_rmd160sha256(&seed)
}

/// Check whether `value` is a non-empty string of hex digits.
pub fn is_hexa_string(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Smallest power of two that is greater than or equal to `n`.
///
/// Computed as `2^ceil(log2(n))`, so fractional inputs yield fractional
/// powers (`0.3` gives `0.5`).
pub fn get_next_power_of_two(n: f64) -> Result<f64> {
    if !n.is_finite() || n <= 0.0 {
        return Err(Error::invalid_argument(format!(
            "next power of two requires a positive finite number, got {n}"
        )));
    }

    let power = 2f64.powf(n.log2().ceil());
    if !power.is_finite() {
        return Err(Error::invalid_argument(format!(
            "next power of two of {n} is not representable"
        )));
    }

    Ok(power)
}

use http::HeaderName;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

/// Env var holding the Bridge base URI.
pub const BRIDGE_URL_ENV: &str = "STORJ_BRIDGE";
/// Bridge used when nothing else is configured.
pub const DEFAULT_BRIDGE_URL: &str = "https://api.storj.io";

// Headers
/// Hex encoded public key of the signer.
pub const X_PUBKEY: HeaderName = HeaderName::from_static("x-pubkey");
/// Hex encoded DER signature of the request contract.
pub const X_SIGNATURE: HeaderName = HeaderName::from_static("x-signature");

/// Path segments built from caller input keep only RFC 3986 unreserved chars.
pub const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

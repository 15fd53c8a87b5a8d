// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use alloy::primitives::Address;
use std::str::FromStr;

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

pub fn parse_address_hex(s: &str) -> Option<Address> {
    Address::from_str(strip_0x(s.trim())).ok()
}

/// `0x` followed by exactly 64 hex digits (66 characters in total).
pub fn is_prefixed_private_key(s: &str) -> bool {
    s.len() == 66
        && s.starts_with("0x")
        && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_parser_accepts_optional_prefix() {
        let a = parse_address_hex("0x3541423f25A1Ca5C98fdBCf478405d3f0aaD1164");
        let b = parse_address_hex("3541423f25a1ca5c98fdbcf478405d3f0aad1164");
        assert!(a.is_some());
        assert_eq!(a, b);
        assert_eq!(parse_address_hex("0xYourZenithRouterAddressHere"), None);
    }

    #[test]
    fn private_key_shape_is_strict() {
        let good = format!("0x{}", "ab".repeat(32));
        assert!(is_prefixed_private_key(&good));
        assert!(!is_prefixed_private_key(&good[2..]));
        assert!(!is_prefixed_private_key(&format!("0x{}", "ab".repeat(31))));
        assert!(!is_prefixed_private_key(&format!("0x{}zz", "ab".repeat(31))));
    }
}

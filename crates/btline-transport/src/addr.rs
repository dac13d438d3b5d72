use std::fmt;
use std::str::FromStr;

use crate::error::TransportError;

/// A Bluetooth device address, consisting of 6 octets.
///
/// Octets are stored in display order: `BtAddr([0x34, 0x98, ..])` prints
/// as `34:98:..`. The kernel's reversed `bdaddr_t` order is produced only
/// at the socket boundary.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BtAddr(pub [u8; 6]);

impl BtAddr {
    /// The address octets in display order.
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for BtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl fmt::Debug for BtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BtAddr({self})")
    }
}

impl FromStr for BtAddr {
    type Err = TransportError;

    /// Parse the colon-separated hex form, e.g. `34:98:7A:6A:A9:AC`.
    ///
    /// Each octet must be exactly two hex digits; case is accepted either
    /// way.
    fn from_str(s: &str) -> Result<Self, TransportError> {
        let invalid = |reason: String| TransportError::InvalidAddress {
            input: s.to_string(),
            reason,
        };

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(invalid(format!(
                "expected 6 colon-separated octets, got {}",
                parts.len()
            )));
        }

        let mut octets = [0u8; 6];
        for (slot, part) in octets.iter_mut().zip(&parts) {
            // from_str_radix alone would accept a leading sign.
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid(format!("octet {part:?} is not two hex digits")));
            }
            *slot = u8::from_str_radix(part, 16)
                .map_err(|_| invalid(format!("octet {part:?} is not valid hex")))?;
        }

        Ok(BtAddr(octets))
    }
}

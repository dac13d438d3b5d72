use std::fmt;

use crate::addr::BtAddr;

/// Where to connect: a device address plus an RFCOMM channel number.
///
/// Immutable for the process lifetime; supplied once at startup.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub addr: BtAddr,
    pub channel: u8,
}

impl Endpoint {
    pub fn new(addr: BtAddr, channel: u8) -> Self {
        Self { addr, channel }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.channel)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Endpoint({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_channel() {
        let endpoint = Endpoint::new("34:98:7A:6A:A9:AC".parse().unwrap(), 1);
        assert_eq!(endpoint.to_string(), "34:98:7A:6A:A9:AC/1");
    }

    #[test]
    fn channel_zero_is_valid() {
        let endpoint = Endpoint::new("E4:65:B8:6F:4B:B6".parse().unwrap(), 0);
        assert_eq!(endpoint.channel, 0);
        assert_eq!(endpoint.to_string(), "E4:65:B8:6F:4B:B6/0");
    }
}

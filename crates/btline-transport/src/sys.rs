//! BlueZ socket ABI definitions that `libc` does not export.

#![allow(non_camel_case_types)]

use crate::addr::BtAddr;
use crate::endpoint::Endpoint;

/// RFCOMM protocol number for `AF_BLUETOOTH` sockets.
pub const BTPROTO_RFCOMM: libc::c_int = 3;

/// Kernel Bluetooth device address.
///
/// Octets are stored least significant first — reversed from the
/// human-readable form.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct bdaddr_t {
    pub b: [u8; 6],
}

/// Socket address for RFCOMM sockets (`struct sockaddr_rc`).
#[repr(C)]
#[derive(Clone, Copy)]
pub struct sockaddr_rc {
    pub rc_family: libc::sa_family_t,
    pub rc_bdaddr: bdaddr_t,
    pub rc_channel: u8,
}

pub fn bdaddr_from_addr(addr: &BtAddr) -> bdaddr_t {
    let o = addr.octets();
    bdaddr_t {
        b: [o[5], o[4], o[3], o[2], o[1], o[0]],
    }
}

pub fn addr_from_bdaddr(bdaddr: &bdaddr_t) -> BtAddr {
    let b = bdaddr.b;
    BtAddr([b[5], b[4], b[3], b[2], b[1], b[0]])
}

pub fn sockaddr_from_endpoint(endpoint: &Endpoint) -> sockaddr_rc {
    sockaddr_rc {
        rc_family: libc::AF_BLUETOOTH as libc::sa_family_t,
        rc_bdaddr: bdaddr_from_addr(&endpoint.addr),
        rc_channel: endpoint.channel,
    }
}

pub fn endpoint_from_sockaddr(sa: &sockaddr_rc) -> Endpoint {
    Endpoint::new(addr_from_bdaddr(&sa.rc_bdaddr), sa.rc_channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bdaddr_reverses_octet_order() {
        let addr: BtAddr = "34:98:7A:6A:A9:AC".parse().unwrap();
        let bdaddr = bdaddr_from_addr(&addr);
        assert_eq!(bdaddr.b, [0xAC, 0xA9, 0x6A, 0x7A, 0x98, 0x34]);
    }

    #[test]
    fn bdaddr_conversion_round_trips() {
        let addr: BtAddr = "E4:65:B8:6F:4B:B6".parse().unwrap();
        assert_eq!(addr_from_bdaddr(&bdaddr_from_addr(&addr)), addr);
    }

    #[test]
    fn sockaddr_carries_family_and_channel() {
        let endpoint = Endpoint::new("34:98:7A:6A:A9:AC".parse().unwrap(), 1);
        let sa = sockaddr_from_endpoint(&endpoint);
        assert_eq!(sa.rc_family, libc::AF_BLUETOOTH as libc::sa_family_t);
        assert_eq!(sa.rc_channel, 1);
        assert_eq!(endpoint_from_sockaddr(&sa), endpoint);
    }
}

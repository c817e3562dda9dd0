//! Tests for IPv4 parsing and range expansion.

use super::*;

mod parse {
    use super::*;

    #[test]
    fn accepts_valid_addresses() {
        assert_eq!(parse_ipv4("192.168.0.1"), Some(Ipv4Addr::new(192, 168, 0, 1)));
        assert_eq!(parse_ipv4("0.0.0.0"), Some(Ipv4Addr::UNSPECIFIED));
        assert_eq!(parse_ipv4("255.255.255.255"), Some(Ipv4Addr::BROADCAST));
    }

    #[test]
    fn rejects_non_numeric_parts() {
        assert_eq!(parse_ipv4("a.b.c.d"), None);
    }

    #[test]
    fn rejects_wrong_part_count() {
        assert_eq!(parse_ipv4("1.1.1"), None);
        assert_eq!(parse_ipv4("1.1.1.1.1"), None);
    }

    #[test]
    fn rejects_trailing_dot() {
        assert_eq!(parse_ipv4("1.1.1."), None);
        assert_eq!(parse_ipv4("1.1.1.1."), None);
    }

    #[test]
    fn rejects_out_of_range_octet() {
        assert_eq!(parse_ipv4("1.256.1.10"), None);
    }

    #[test]
    fn rejects_signs_and_whitespace() {
        assert_eq!(parse_ipv4("+1.1.1.1"), None);
        assert_eq!(parse_ipv4(" 1.1.1.1"), None);
        assert_eq!(parse_ipv4(""), None);
    }
}

mod address_range {
    use super::*;

    fn range(start: &str, end: &str) -> AddressRange {
        AddressRange::parse(start, end).unwrap()
    }

    #[test]
    fn equal_bounds_form_single_host_range() {
        let r = range("0.0.0.0", "0.0.0.0");
        assert_eq!(r.host_count(), 1);
        assert_eq!(r, AddressRange::single(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn reversed_bounds_are_rejected() {
        assert!(AddressRange::parse("192.168.2.5", "192.168.1.255").is_none());
    }

    #[test]
    fn ordering_is_numeric_across_octets() {
        let r = range("192.168.1.250", "192.168.2.3");
        assert_eq!(r.host_count(), 10);
    }

    #[test]
    fn lengths_match_bounds() {
        assert_eq!(range("192.168.1.5", "192.168.1.13").host_count(), 9);
        assert_eq!(range("192.168.1.0", "192.168.1.255").host_count(), 256);
        assert_eq!(range("0.0.0.0", "255.255.255.255").host_count(), 1 << 32);
    }

    #[test]
    fn overlap_detection() {
        let existing = range("10.10.10.1", "10.10.10.22");

        assert!(!range("10.10.10.23", "10.10.10.40").overlaps(&existing));
        assert!(range("10.10.10.22", "10.10.10.40").overlaps(&existing));
        assert!(range("10.10.10.5", "10.10.10.6").overlaps(&existing));
    }

    #[test]
    fn containment() {
        let outer = range("10.15.10.1", "10.16.10.55");
        assert!(outer.contains_range(&range("10.15.200.1", "10.15.200.9")));
        assert!(!outer.contains_range(&range("10.15.10.0", "10.15.10.9")));
        assert!(outer.contains(Ipv4Addr::new(10, 16, 0, 0)));
    }

    #[test]
    fn display_collapses_single_host() {
        assert_eq!(range("10.0.0.1", "10.0.0.1").to_string(), "10.0.0.1");
        assert_eq!(range("10.0.0.1", "10.0.0.9").to_string(), "10.0.0.1-10.0.0.9");
    }
}

mod expand {
    use super::*;

    #[test]
    fn yields_ascending_addresses() {
        let hosts = expand_range("192.168.1.1", "192.168.1.3");
        assert_eq!(
            hosts,
            vec![
                Ipv4Addr::new(192, 168, 1, 1),
                Ipv4Addr::new(192, 168, 1, 2),
                Ipv4Addr::new(192, 168, 1, 3),
            ]
        );
    }

    #[test]
    fn crosses_octet_boundaries() {
        let hosts = expand_range("10.0.0.254", "10.0.1.1");
        assert_eq!(hosts.len(), 4);
        assert_eq!(hosts[2], Ipv4Addr::new(10, 0, 1, 0));
    }

    #[test]
    fn malformed_bounds_yield_empty() {
        assert!(expand_range("not-an-ip", "192.168.1.3").is_empty());
        assert!(expand_range("192.168.1.1", "192.168.1").is_empty());
    }

    #[test]
    fn range_expand_matches_iter() {
        let range = AddressRange::parse("172.16.0.10", "172.16.0.12").unwrap();
        assert_eq!(range.expand(), range.iter().collect::<Vec<_>>());
        assert_eq!(range.expand().len(), 3);
    }

    #[test]
    fn reversed_bounds_yield_empty() {
        assert!(expand_range("192.168.1.3", "192.168.1.1").is_empty());
    }
}

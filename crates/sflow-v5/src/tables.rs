//! Code-to-name tables from the sFlow v5 structure definitions.

use sflow_decoder::Table;

/// Agent and next-hop address types.
pub const ADDRESS_TYPES: Table = &[(1, "IPV4"), (2, "IPV6")];

/// `header_protocol` values of the sampled header flow record.
pub const HEADER_PROTOCOLS: Table = &[
    (1, "ETHERNET-ISO88023"),
    (2, "ISO88024-TOKENBUS"),
    (3, "ISO88025-TOKENRING"),
    (4, "FDDI"),
    (5, "FRAME-RELAY"),
    (6, "X25"),
    (7, "PPP"),
    (8, "SMDS"),
    (9, "AAL5"),
    (10, "AAL5-IP"),
    (11, "IPv4"),
    (12, "IPv6"),
    (13, "MPLS"),
    (14, "POS"),
];

/// Flow record formats.
pub const FLOW_FORMATS: Table = &[
    (1, "rawPacketHeaderFlowData"),
    (2, "ethFrameFlowData"),
    (3, "packetIPV4FlowData"),
    (4, "packetIPV6FlowData"),
    (1001, "extendedSwitchFlowData"),
    (1002, "extendedRouterFlowData"),
    (1003, "extendedGatewayFlowData"),
    (1004, "extendedUserFlowData"),
    (1005, "extendedURLFlowData"),
    (1006, "extendedMPLSFlowData"),
    (1007, "extendedNATFlowData"),
    (1008, "extendedMPLSTunnelFlowData"),
    (1009, "extendedMPLSVCFlowData"),
    (1010, "extendedMPLSFECFlowData"),
    (1011, "extendedMPLSLDPFECFlowData"),
    (1012, "extendedVlanTunnelFlowData"),
];

/// Ethernet types named in the `ether_type` tag.
pub const ETHER_TYPES: Table = &[(0x0800, "IPv4"), (0x86dd, "IPv6")];

pub const ETHERTYPE_VLAN: u16 = 0x8100;
pub const ETHERTYPE_IPV4: u16 = 0x0800;
pub const ETHERTYPE_IPV6: u16 = 0x86dd;

pub const IPPROTO_TCP: u16 = 6;
pub const IPPROTO_UDP: u16 = 17;

pub const SAMPLE_FLOW: u32 = 1;
pub const SAMPLE_COUNTERS: u32 = 2;
pub const SAMPLE_FLOW_EXPANDED: u32 = 3;
pub const SAMPLE_COUNTERS_EXPANDED: u32 = 4;

pub const FLOW_RAW_PACKET_HEADER: u32 = 1;
pub const HEADER_ETHERNET: u32 = 1;

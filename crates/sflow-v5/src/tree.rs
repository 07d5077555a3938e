//! Attribute-tree grammar: records every decoded sFlow v5 structure under
//! its structure name, without producing metrics.

use crate::options::V5FormatOptions;
use crate::tables::*;
use sflow_decoder::{
    alt, asgn, asrt_max, case, default_case, i32, iter, nest, ops, read_bin, read_u16, read_u32,
    seq, sub, sub_bounded, u16, u32, u64, warn_and_break, warn_and_break_on, Directive, Ops,
    Value,
};
use sflow_types::MacAddress;

/// Builds the sFlow v5 attribute-tree grammar.
pub fn v5_format(options: &V5FormatOptions) -> Directive {
    options.log_if_not_default();

    seq![
        u32("version"),
        u32("addressType").with(ops().lookup(ADDRESS_TYPES).record("addressType")),
        alt(
            "addressType",
            vec![
                case("IPV4", address("agentAddress", 4)),
                case("IPV6", address("agentAddress", 16)),
            ]
        ),
        u32("subAgentId"),
        u32("sequenceNumber"),
        u32("uptime"),
        u32("samples.length"),
        iter(
            "samples",
            "samples.length",
            options.max_samples_per_packet,
            sample_record(options)
        ),
    ]
}

fn address(key: &str, len: usize) -> Directive {
    read_bin(len).with(ops().format_ip().record(key)).into()
}

fn mac_as_u64(key: &str) -> Directive {
    read_bin(6)
        .with(
            ops()
                .map_bytes(|b| Ok(Value::U64(MacAddress::from_slice(b)?.to_u64())))
                .record(key),
        )
        .into()
}

fn u32_fields(names: &[&str]) -> Directive {
    seq(names.iter().map(|name| u32(name).into()).collect())
}

/// Splits a data source word into type (top byte) and index.
fn source_id() -> Ops {
    ops()
        .tee(ops().map_u32(|v| v >> 24).record("sourceIdType"))
        .map_u32(|v| v & 0x00ff_ffff)
        .record("sourceIdValue")
}

/// Splits an interface word into format (top two bits) and value.
fn interface(format_key: &str, value_key: &str) -> Ops {
    ops()
        .tee(ops().map_u32(|v| v >> 30).record(format_key))
        .map_u32(|v| v & 0x3fff_ffff)
        .record(value_key)
}

fn sample_record(options: &V5FormatOptions) -> Directive {
    seq![
        u32("sampleType"),
        u32("sampleData.length"),
        sub_bounded(
            "sampleData.length",
            options.max_sample_length,
            alt(
                "sampleType",
                vec![
                    case(SAMPLE_FLOW, flow_sample(options)),
                    case(SAMPLE_COUNTERS, counters_sample(options)),
                    case(SAMPLE_FLOW_EXPANDED, flow_sample_expanded(options)),
                    case(SAMPLE_COUNTERS_EXPANDED, counters_sample_expanded(options)),
                    default_case(warn_and_break_on("unsupported sample type", "sampleType")),
                ]
            )
        ),
    ]
}

fn flow_records(options: &V5FormatOptions) -> Directive {
    seq![
        u32("flowRecords.length"),
        asrt_max(
            "flowRecords.length",
            u64::from(options.max_flows_per_sample),
            true
        ),
        iter(
            "flowRecords",
            "flowRecords.length",
            u32::MAX,
            flow_record(options)
        ),
    ]
}

fn flow_sample(options: &V5FormatOptions) -> Directive {
    seq![
        u32("sequenceNumber"),
        read_u32().with(source_id()),
        u32("samplingRate"),
        u32("samplePool"),
        u32("drops"),
        read_u32().with(interface("inputFormat", "inputValue")),
        read_u32().with(interface("outputFormat", "outputValue")),
        flow_records(options),
    ]
}

fn flow_sample_expanded(options: &V5FormatOptions) -> Directive {
    seq![
        u32("sequenceNumber"),
        u32("sourceIdType"),
        u32("sourceIdValue"),
        u32("samplingRate"),
        u32("samplePool"),
        u32("drops"),
        u32("inputFormat"),
        u32("inputValue"),
        u32("outputFormat"),
        u32("outputValue"),
        flow_records(options),
    ]
}

fn flow_record(options: &V5FormatOptions) -> Directive {
    seq![
        u32("flowFormat").with(ops().lookup(FLOW_FORMATS).record("flowFormat")),
        u32("flowData.length"),
        sub_bounded(
            "flowData.length",
            options.max_flow_header_length,
            flow_data(options)
        ),
    ]
}

fn flow_data(options: &V5FormatOptions) -> Directive {
    let mut cases = vec![
        case("rawPacketHeaderFlowData", raw_packet_header(options)),
        case(
            "ethFrameFlowData",
            seq![
                u32("length"),
                mac_as_u64("srcMac"),
                mac_as_u64("dstMac"),
                u32("type"),
            ],
        ),
        case(
            "packetIPV4FlowData",
            seq![
                u32("length"),
                u32("protocol"),
                address("srcIP", 4),
                address("dstIP", 4),
                u32_fields(&["srcPort", "dstPort", "tcpFlags", "tos"]),
            ],
        ),
        case(
            "packetIPV6FlowData",
            seq![
                u32("length"),
                u32("protocol"),
                address("srcIP", 16),
                address("dstIP", 16),
                u32_fields(&["srcPort", "dstPort", "tcpFlags", "priority"]),
            ],
        ),
        case(
            "extendedSwitchFlowData",
            u32_fields(&["srcVlan", "srcPriority", "dstVlan", "dstPriority"]),
        ),
        case(
            "extendedRouterFlowData",
            seq![next_hop(), u32("srcMaskLen"), u32("dstMaskLen")],
        ),
        case("extendedGatewayFlowData", extended_gateway()),
    ];
    for name in [
        "extendedUserFlowData",
        "extendedURLFlowData",
        "extendedMPLSFlowData",
        "extendedNATFlowData",
        "extendedMPLSTunnelFlowData",
        "extendedMPLSVCFlowData",
        "extendedMPLSFECFlowData",
        "extendedMPLSLDPFECFlowData",
        "extendedVlanTunnelFlowData",
    ] {
        cases.push(case(
            name,
            warn_and_break(&format!("unimplemented support for {}", name)),
        ));
    }
    cases.push(default_case(warn_and_break_on(
        "unsupported flow format",
        "flowFormat",
    )));
    alt("flowFormat", cases)
}

fn next_hop() -> Directive {
    seq![
        u32("nextHop.addressType").with(ops().lookup(ADDRESS_TYPES).record("nextHop.addressType")),
        alt(
            "nextHop.addressType",
            vec![
                case("IPV4", address("nextHop.address", 4)),
                case("IPV6", address("nextHop.address", 16)),
                default_case(warn_and_break_on(
                    "unsupported next hop address type",
                    "nextHop.addressType"
                )),
            ]
        ),
    ]
}

fn extended_gateway() -> Directive {
    seq![
        next_hop(),
        u32("as"),
        u32("srcAs"),
        u32("srcPeerAs"),
        u32("dstAsPath.length"),
        iter(
            "dstAsPath",
            "dstAsPath.length",
            u32::MAX,
            seq![
                u32("segmentType"),
                u32("segment.length"),
                iter("segment", "segment.length", u32::MAX, u32("as")),
            ]
        ),
        u32("communities.length"),
        iter(
            "communities",
            "communities.length",
            u32::MAX,
            u32("community")
        ),
        u32("localpref"),
    ]
}

fn raw_packet_header(options: &V5FormatOptions) -> Directive {
    let header = if options.include_headers {
        sub(
            "header.length",
            alt(
                "protocol",
                vec![
                    case("ETHERNET-ISO88023", nest("header", eth_header())),
                    default_case(warn_and_break_on(
                        "unsupported header protocol",
                        "protocol"
                    )),
                ],
            ),
        )
    } else {
        sub("header.length", seq![])
    };

    seq![
        u32("protocol").with(ops().lookup(HEADER_PROTOCOLS).record("protocol")),
        u32("frameLength"),
        u32("stripped"),
        u32("header.length"),
        asrt_max(
            "header.length",
            u64::from(options.max_flow_header_length),
            false
        ),
        header,
    ]
}

fn eth_header() -> Directive {
    seq![
        mac_as_u64("dstMac"),
        mac_as_u64("srcMac"),
        u16("tagOrEType"),
        alt(
            "tagOrEType",
            vec![
                case(
                    ETHERTYPE_VLAN,
                    seq![
                        read_u16().with(ops().map_u16(|v| v & 0x0fff).record("vlanID")),
                        u16("etype"),
                    ]
                ),
                default_case(asgn("tagOrEType", "etype")),
            ]
        ),
        alt(
            "etype",
            vec![
                case(ETHERTYPE_IPV4, ipv4_header()),
                case(ETHERTYPE_IPV6, ipv6_header()),
                default_case(warn_and_break_on("unsupported ether type", "etype")),
            ]
        ),
    ]
}

fn ipv4_header() -> Directive {
    seq![
        read_u16().with(
            ops()
                .tee(ops().map_u16(|v| v >> 12).record("IPversion"))
                .tee(
                    ops()
                        .map_u16(|v| ((v >> 8) & 0x0f).saturating_sub(5) * 4)
                        .record("options.length")
                )
                .tee(ops().map_u16(|v| (v & 0xfc) >> 2).record("dscp"))
                .map_u16(|v| v & 0x03)
                .record("ecn")
        ),
        u16("total_length"),
        u16("fragmentId"),
        read_u16().with(
            ops()
                .tee(ops().map_u16(|v| (v & 0xe000) >> 13).record("flags"))
                .map_u16(|v| v & 0x1fff)
                .record("fragmentOffset")
        ),
        read_u16().with(
            ops()
                .tee(ops().map_u16(|v| v >> 8).record("IPTTL"))
                .map_u16(|v| v & 0xff)
                .record("proto")
        ),
        read_u16(),
        address("srcIP", 4),
        address("dstIP", 4),
        sub("options.length", seq![]),
        transport_header("proto"),
    ]
}

fn ipv6_header() -> Directive {
    seq![
        read_u32().with(
            ops()
                .tee(ops().map_u32(|v| v >> 28).record("IPversion"))
                .tee(ops().map_u32(|v| (v >> 22) & 0x3f).record("dscp"))
                .tee(ops().map_u32(|v| (v >> 20) & 0x03).record("ecn"))
                .map_u32(|v| v & 0x000f_ffff)
                .record("IPv6FlowLabel")
        ),
        u16("payloadLength"),
        read_u16().with(
            ops()
                .tee(ops().map_u16(|v| v >> 8).record("nextHeader"))
                .map_u16(|v| v & 0xff)
                .record("hopLimit")
        ),
        address("srcIP", 16),
        address("dstIP", 16),
        transport_header("nextHeader"),
    ]
}

fn transport_header(protocol_key: &str) -> Directive {
    alt(
        protocol_key,
        vec![
            case(
                IPPROTO_TCP,
                seq![
                    u16("srcPort"),
                    u16("dstPort"),
                    u32("sequence"),
                    u32("ack_number"),
                    read_u16().with(ops().map_u16(|v| (v >> 12) * 4).record("tcp_header_length")),
                    u16("tcp_window_size"),
                    u16("checksum"),
                    u16("urgent_pointer"),
                ],
            ),
            case(
                IPPROTO_UDP,
                seq![u16("srcPort"), u16("dstPort"), u16("udp_length")],
            ),
            default_case(warn_and_break_on("unsupported IP protocol", protocol_key)),
        ],
    )
}

fn counter_record(options: &V5FormatOptions) -> Directive {
    seq![
        u32("counterFormat"),
        u32("counterData.length"),
        sub_bounded(
            "counterData.length",
            options.max_counter_header_length,
            alt(
                "counterFormat",
                vec![
                    case(1u32, if_counters()),
                    case(
                        2u32,
                        u32_fields(&[
                            "dot3StatsAlignmentErrors",
                            "dot3StatsFCSErrors",
                            "dot3StatsSingleCollisionFrames",
                            "dot3StatsMultipleCollisionFrames",
                            "dot3StatsSQETestErrors",
                            "dot3StatsDeferredTransmissions",
                            "dot3StatsLateCollisions",
                            "dot3StatsExcessiveCollisions",
                            "dot3StatsInternalMacTransmitErrors",
                            "dot3StatsCarrierSenseErrors",
                            "dot3StatsFrameTooLongs",
                            "dot3StatsInternalMacReceiveErrors",
                            "dot3StatsSymbolErrors",
                        ])
                    ),
                    case(
                        3u32,
                        u32_fields(&[
                            "dot5StatsLineErrors",
                            "dot5StatsBurstErrors",
                            "dot5StatsACErrors",
                            "dot5StatsAbortTransErrors",
                            "dot5StatsInternalErrors",
                            "dot5StatsLostFrameErrors",
                            "dot5StatsReceiveCongestions",
                            "dot5StatsFrameCopiedErrors",
                            "dot5StatsTokenErrors",
                            "dot5StatsSoftErrors",
                            "dot5StatsHardErrors",
                            "dot5StatsSignalLoss",
                            "dot5StatsTransmitBeacons",
                            "dot5StatsRecoverys",
                            "dot5StatsLobeWires",
                            "dot5StatsRemoves",
                            "dot5StatsSingles",
                            "dot5StatsFreqErrors",
                        ])
                    ),
                    case(4u32, vg_counters()),
                    case(
                        5u32,
                        seq![
                            u32("vlan_id"),
                            u64("octets"),
                            u32_fields(&["ucastPkts", "multicastPkts", "broadcastPkts", "discards"]),
                        ]
                    ),
                    case(
                        1001u32,
                        seq![
                            i32("5s_cpu"),
                            i32("1m_cpu"),
                            i32("5m_cpu"),
                            u64("total_memory"),
                            u64("free_memory"),
                        ]
                    ),
                    default_case(warn_and_break_on(
                        "unsupported counter format",
                        "counterFormat"
                    )),
                ]
            )
        ),
    ]
}

fn if_counters() -> Directive {
    seq![
        u32("ifIndex"),
        u32("ifType"),
        u64("ifSpeed"),
        u32("ifDirection"),
        u32("ifStatus"),
        u64("ifInOctets"),
        u32_fields(&[
            "ifInUcastPkts",
            "ifInMulticastPkts",
            "ifInBroadcastPkts",
            "ifInDiscards",
            "ifInErrors",
            "ifInUnknownProtos",
        ]),
        u64("ifOutOctets"),
        u32_fields(&[
            "ifOutUcastPkts",
            "ifOutMulticastPkts",
            "ifOutBroadcastPkts",
            "ifOutDiscards",
            "ifOutErrors",
            "ifPromiscuousMode",
        ]),
    ]
}

fn vg_counters() -> Directive {
    seq![
        u32("dot12InHighPriorityFrames"),
        u64("dot12InHighPriorityOctets"),
        u32("dot12InNormPriorityFrames"),
        u64("dot12InNormPriorityOctets"),
        u32_fields(&[
            "dot12InIPMErrors",
            "dot12InOversizeFrameErrors",
            "dot12InDataErrors",
            "dot12InNullAddressedFrames",
            "dot12OutHighPriorityFrames",
        ]),
        u64("dot12OutHighPriorityOctets"),
        u32("dot12TransitionIntoTrainings"),
        u64("dot12HCInHighPriorityOctets"),
        u64("dot12HCInNormPriorityOctets"),
        u64("dot12HCOutHighPriorityOctets"),
    ]
}

fn counters_sample(options: &V5FormatOptions) -> Directive {
    seq![
        u32("sequenceNumber"),
        read_u32().with(source_id()),
        counter_records(options),
    ]
}

fn counters_sample_expanded(options: &V5FormatOptions) -> Directive {
    seq![
        u32("sequenceNumber"),
        u32("sourceIdType"),
        u32("sourceIdValue"),
        counter_records(options),
    ]
}

fn counter_records(options: &V5FormatOptions) -> Directive {
    seq![
        u32("counters.length"),
        asrt_max(
            "counters.length",
            u64::from(options.max_counters_per_sample),
            true
        ),
        iter("counters", "counters.length", u32::MAX, counter_record(options)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sflow_decoder::Plan;

    #[test]
    fn test_builds_with_and_without_headers() {
        let mut options = V5FormatOptions::default();
        v5_format(&options);
        options.include_headers = false;
        v5_format(&options);
    }

    #[test]
    fn test_mac_as_u64() {
        let mut plan = Plan::new(mac_as_u64("mac"));
        let decoded = plan.decode(&[0x00, 0x0c, 0x29, 0x36, 0xd3, 0xd6]).unwrap();
        assert_eq!(decoded.attributes.value("mac"), Some(&Value::U64(52231066582)));
    }

    #[test]
    fn test_ipv4_options_are_skipped() {
        // IHL 6: one word of options before the UDP header
        let mut header = vec![
            0x46, 0x00, 0x00, 0x20, 0x00, 0x01, 0x40, 0x00, 0x40, 0x11, 0x00, 0x00, 10, 0, 0, 1, 10,
            0, 0, 2,
        ];
        header.extend_from_slice(&[1, 1, 1, 1]);
        header.extend_from_slice(&[0x00, 0x35, 0x30, 0x39, 0x00, 0x08]);
        let mut plan = Plan::new(ipv4_header());
        let attrs = plan.decode(&header).unwrap().attributes;
        assert_eq!(attrs.value("options.length"), Some(&Value::U16(4)));
        assert_eq!(attrs.value("srcPort"), Some(&Value::U16(53)));
        assert_eq!(attrs.value("dstPort"), Some(&Value::U16(12345)));
    }

    #[test]
    fn test_interface_split() {
        let mut plan = Plan::new(read_u32().with(interface("format", "value")));
        let attrs = plan.decode(&[0x80, 0x00, 0x00, 0x07]).unwrap().attributes;
        assert_eq!(attrs.value("format"), Some(&Value::U32(2)));
        assert_eq!(attrs.value("value"), Some(&Value::U32(7)));
    }
}

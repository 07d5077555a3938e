//! Metric grammar: one `sflow` metric per sampled raw packet header.
//!
//! Datagram and sample level values are emitted as pending tags and fields
//! before the metric is opened, so every metric produced inside a sample
//! carries them.

use crate::options::V5FormatOptions;
use crate::tables::*;
use sflow_decoder::{
    alt, apply, asgn, asrt_max, case, close_metric, default_case, iter, open_metric, ops,
    read_bin, read_u16, read_u32, seq, sub, sub_bounded, u16, u32, warn_and_break_on, Directive,
    ValueKind,
};

/// Name of every metric produced by [`v5_metrics`].
pub const METRIC_NAME: &str = "sflow";

/// Builds the sFlow v5 metric grammar.
pub fn v5_metrics(options: &V5FormatOptions) -> Directive {
    options.log_if_not_default();

    seq![
        u32("version"),
        u32("addressType"),
        alt(
            "addressType",
            vec![
                case(1u32, read_bin(4).with(ops().format_ip().tag("agent_address"))),
                case(2u32, read_bin(16).with(ops().format_ip().tag("agent_address"))),
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
            sample(options)
        ),
    ]
}

fn sample(options: &V5FormatOptions) -> Directive {
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
                    case(SAMPLE_FLOW_EXPANDED, flow_sample_expanded(options)),
                    case(SAMPLE_COUNTERS, seq![]),
                    case(SAMPLE_COUNTERS_EXPANDED, seq![]),
                    default_case(warn_and_break_on("unsupported sample type", "sampleType")),
                ]
            )
        ),
    ]
}

fn flow_sample(options: &V5FormatOptions) -> Directive {
    seq![
        read_u32(),
        read_u32().with(
            ops()
                .tee(ops().map_u32(|v| v >> 24).tag("source_id_type"))
                .map_u32(|v| v & 0x00ff_ffff)
                .record("sourceIdValue")
                .tag("source_id_index")
        ),
        sampling(),
        interfaces(),
        flow_records(options),
    ]
}

fn flow_sample_expanded(options: &V5FormatOptions) -> Directive {
    seq![
        read_u32(),
        read_u32().with(ops().tag("source_id_type")),
        u32("sourceIdValue").with(ops().tag("source_id_index")),
        sampling(),
        read_u32(),
        interface_index("input_ifindex", true),
        read_u32(),
        interface_index("output_ifindex", false),
        flow_records(options),
    ]
}

fn sampling() -> Directive {
    seq![
        u32("samplingRate").with(ops().field("sampling_rate")),
        read_u32(),
        read_u32().with(ops().field("drops")),
    ]
}

/// Compact input and output words: format in the top two bits.
fn interfaces() -> Directive {
    seq![
        interface_index("input_ifindex", true),
        interface_index("output_ifindex", false),
    ]
}

fn interface_index(tag: &str, direction: bool) -> Directive {
    let index = ops().map_u32(|v| v & 0x3fff_ffff).tag(tag);
    let index = if direction {
        index
            .same_as("sourceIdValue", "ingress", "egress")
            .tag("sample_direction")
    } else {
        index
    };
    read_u32().with(index).into()
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
            seq![
                u32("flowFormat"),
                u32("flowData.length"),
                sub_bounded(
                    "flowData.length",
                    options.max_flow_header_length,
                    alt(
                        "flowFormat",
                        vec![
                            case(FLOW_RAW_PACKET_HEADER, raw_packet_header(options)),
                            default_case(seq![]),
                        ]
                    )
                ),
            ]
        ),
    ]
}

fn raw_packet_header(options: &V5FormatOptions) -> Directive {
    let header = if options.include_headers {
        sub(
            "header.length",
            alt(
                "protocol",
                vec![
                    case(HEADER_ETHERNET, eth_header()),
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
        open_metric(METRIC_NAME),
        u32("protocol").with(ops().lookup(HEADER_PROTOCOLS).tag("header_protocol")),
        read_u32().with(
            ops()
                .field("frame_length")
                .scale_by("samplingRate")
                .field("bytes")
        ),
        read_u32(),
        u32("header.length").with(ops().field("header_length")),
        asrt_max(
            "header.length",
            u64::from(options.max_flow_header_length),
            false
        ),
        header,
        close_metric(),
    ]
}

fn eth_header() -> Directive {
    seq![
        read_bin(6).with(ops().format_mac().tag("dst_mac")),
        read_bin(6).with(ops().format_mac().tag("src_mac")),
        u16("tagOrEType"),
        alt(
            "tagOrEType",
            vec![
                case(ETHERTYPE_VLAN, seq![read_u16(), u16("etype")]),
                default_case(asgn("tagOrEType", "etype")),
            ]
        ),
        apply(
            "etype",
            ValueKind::U16,
            ops().lookup(ETHER_TYPES).tag("ether_type")
        ),
        alt(
            "etype",
            vec![
                case(ETHERTYPE_IPV4, ipv4_header()),
                case(ETHERTYPE_IPV6, ipv6_header()),
                // header fields stop at layer 2
                default_case(seq![]),
            ]
        ),
    ]
}

fn ipv4_header() -> Directive {
    seq![
        read_u16().with(
            ops()
                .tee(
                    ops()
                        .map_u16(|v| ((v >> 8) & 0x0f).saturating_sub(5) * 4)
                        .record("ip.options.length")
                )
                .tee(ops().map_u16(|v| (v & 0xfc) >> 2).to_text().field("ip_dscp"))
                .map_u16(|v| v & 0x03)
                .to_text()
                .field("ip_ecn")
        ),
        read_u16().with(ops().field("ip_total_length")),
        read_u16(),
        read_u16().with(
            ops()
                .tee(ops().map_u16(|v| (v & 0xe000) >> 13).field("ip_flags"))
                .map_u16(|v| v & 0x1fff)
                .field("ip_fragment_offset")
        ),
        read_u16().with(
            ops()
                .tee(ops().map_u16(|v| v >> 8).field("ip_ttl"))
                .map_u16(|v| v & 0xff)
                .record("ip.protocol")
        ),
        read_u16(),
        read_bin(4).with(ops().format_ip().tag("src_ip")),
        read_bin(4).with(ops().format_ip().tag("dst_ip")),
        sub("ip.options.length", seq![]),
        transport_header("ip.protocol"),
    ]
}

fn ipv6_header() -> Directive {
    seq![
        read_u32().with(
            ops()
                .tee(ops().map_u32(|v| (v >> 22) & 0x3f).to_text().field("ip_dscp"))
                .map_u32(|v| (v >> 20) & 0x03)
                .to_text()
                .field("ip_ecn")
        ),
        read_u16().with(ops().field("payload_length")),
        read_u16().with(ops().map_u16(|v| v >> 8).record("ip.protocol")),
        read_bin(16).with(ops().format_ip().tag("src_ip")),
        read_bin(16).with(ops().format_ip().tag("dst_ip")),
        transport_header("ip.protocol"),
    ]
}

fn transport_header(protocol_key: &str) -> Directive {
    alt(
        protocol_key,
        vec![
            case(
                IPPROTO_TCP,
                seq![
                    read_u16().with(ops().tag("src_port")),
                    read_u16().with(ops().tag("dst_port")),
                    read_u32(),
                    read_u32(),
                    read_u16().with(ops().map_u16(|v| (v >> 12) * 4).field("tcp_header_length")),
                    read_u16().with(ops().field("tcp_window_size")),
                    read_u16(),
                    read_u16().with(ops().field("tcp_urgent_pointer")),
                ],
            ),
            case(
                IPPROTO_UDP,
                seq![
                    read_u16().with(ops().tag("src_port")),
                    read_u16().with(ops().tag("dst_port")),
                    read_u16().with(ops().field("udp_length")),
                ],
            ),
            default_case(seq![]),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use sflow_decoder::Plan;
    use sflow_types::FieldValue;

    #[test]
    fn test_builds_with_limits() {
        let options = V5FormatOptions {
            max_flows_per_sample: 8,
            include_headers: false,
            ..Default::default()
        };
        v5_metrics(&options);
    }

    #[test]
    fn test_udp_ports_and_length() {
        let mut plan = Plan::new(seq![
            open_metric(METRIC_NAME),
            u16("ip.protocol"),
            transport_header("ip.protocol"),
            close_metric(),
        ]);
        let decoded = plan
            .decode_at(
                &[0x00, 0x11, 0x00, 0x35, 0xd4, 0x31, 0x00, 0x2c],
                DateTime::<Utc>::UNIX_EPOCH,
            )
            .unwrap();
        let metric = &decoded.metrics[0];
        assert_eq!(metric.tag("src_port"), Some("53"));
        assert_eq!(metric.tag("dst_port"), Some("54321"));
        assert_eq!(metric.field("udp_length"), Some(&FieldValue::UInt(44)));
    }

    #[test]
    fn test_unknown_protocol_keeps_ip_fields() {
        let mut plan = Plan::new(seq![
            u32("len"),
            open_metric(METRIC_NAME),
            sub(
                "len",
                seq![
                    read_u16().with(ops().field("ip_total_length")),
                    u16("ip.protocol"),
                    transport_header("ip.protocol")
                ]
            ),
            close_metric(),
        ]);
        let decoded = plan
            .decode(&[0, 0, 0, 8, 0x00, 0x54, 0x00, 0x32, 0xff, 0xff, 0xff, 0xff])
            .unwrap();
        assert_eq!(decoded.metrics.len(), 1);
        let metric = &decoded.metrics[0];
        assert!(metric.tags.is_empty());
        assert_eq!(metric.field("ip_total_length"), Some(&FieldValue::UInt(84)));
    }

    #[test]
    fn test_unknown_header_protocol_keeps_frame_fields() {
        let options = V5FormatOptions::default();
        let mut plan = Plan::new(seq![u32("samplingRate"), raw_packet_header(&options)]);
        let decoded = plan
            .decode(&[
                0, 0, 0, 2, // sampling rate
                0, 0, 0, 7, // header protocol
                0, 0, 0, 100, // frame length
                0, 0, 0, 0, // stripped
                0, 0, 0, 4, // header length
                0xde, 0xad, 0xbe, 0xef,
            ])
            .unwrap();
        let metric = &decoded.metrics[0];
        assert_eq!(metric.field("bytes"), Some(&FieldValue::UInt(200)));
        assert_eq!(metric.field("header_length"), Some(&FieldValue::UInt(4)));
        assert_eq!(metric.tag("dst_mac"), None);
    }
}

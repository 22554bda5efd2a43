//! Plain-text rendering of a `GsoStats` snapshot

use std::io::{self, Write};
use crate::stats::{GsoProtoStats, GsoStats};
use crate::utils::{fmt_guarded, fmt_mean};

static HEADER: &str = "GSO statistics ";

/// Section title, counted unit, and counters for each traffic class, in print order
fn sections(s: &GsoStats) -> [(&'static str, &'static str, &GsoProtoStats); 3] {
    [
        ("TCP (IPv4/IPv6) packets", "segment", &s.tcp),
        ("IPv4 packets (that need IP fragmentation)", "fragment", &s.ipv4_frag),
        ("IPv6 packets (that need IP fragmentation)", "fragment", &s.ipv6_frag),
    ]
}

fn line<W: Write>(out: &mut W, value: &str, label: &str) -> io::Result<()> {
    writeln!(out, "\t\t{} \t{}", value, label)
}

/// Writes the ten lines describing one traffic class.
/// `unit` is "segment" or "fragment".
pub fn write_proto<W: Write>(out: &mut W, p: &GsoProtoStats, unit: &str) -> io::Result<()> {
    let valid = p.has_samples();
    line(out, &p.segmented.to_string(), &format!("total packets {}ed", unit))?;
    line(out, &p.output_segments.to_string(), &format!("output {}s created", unit))?;
    line(out, &fmt_mean(p.mean_segments_per_packet()), &format!("mean {}s per packet", unit))?;
    line(out, &p.max_segmented.to_string(), "max size of packets")?;
    line(out, &fmt_guarded(p.min_segmented, valid), "min size of packets")?;
    line(out, &p.total_bytes_segmented.to_string(), "total size of packets")?;
    line(out, &fmt_mean(p.mean_packet_size()), "mean size of packets")?;
    line(out, &fmt_mean(p.mean_segment_size()), &format!("mean size of {}s", unit))?;
    line(out, &p.max_mss.to_string(), "max mss")?;
    line(out, &fmt_guarded(p.min_mss, valid), "min mss")
}

pub fn write_report<W: Write>(out: &mut W, stats: &GsoStats) -> io::Result<()> {
    writeln!(out, "{}", HEADER)?;
    for (title, unit, proto) in sections(stats).iter() {
        writeln!(out, "\t {}", title)?;
        write_proto(out, proto, unit)?;
    }
    Ok(())
}

pub fn format_report(stats: &GsoStats) -> String {
    let mut buf: Vec<u8> = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_report(&mut buf, stats);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
use crate::stats::sample_stats;

#[test]
fn test_report_framing() {
    let report = format_report(&sample_stats());
    let lines: Vec<&str> = report.lines().collect();
    // header + 3 * (title + 10 fields)
    assert_eq!(lines.len(), 1 + 3 * 11);
    assert_eq!(lines[0], "GSO statistics ");
    assert_eq!(lines[1], "\t TCP (IPv4/IPv6) packets");
    assert_eq!(lines[12], "\t IPv4 packets (that need IP fragmentation)");
    assert_eq!(lines[23], "\t IPv6 packets (that need IP fragmentation)");
    let labels: Vec<&str> = lines[2..12].iter()
        .map(|l| l.rsplit('\t').next().unwrap_or(""))
        .collect();
    assert_eq!(labels, vec![
        "total packets segmented",
        "output segments created",
        "mean segments per packet",
        "max size of packets",
        "min size of packets",
        "total size of packets",
        "mean size of packets",
        "mean size of segments",
        "max mss",
        "min mss",
    ]);
    assert_eq!(lines[13], "\t\t3 \ttotal packets fragmented");
    assert_eq!(lines[19], "\t\t2666.666667 \tmean size of packets");
    assert_eq!(lines[20], "\t\t1142.857143 \tmean size of fragments");
}

#[test]
fn test_report_values() {
    let report = format_report(&sample_stats());
    let expected_tcp = "\
\t\t10 \ttotal packets segmented
\t\t25 \toutput segments created
\t\t2.500000 \tmean segments per packet
\t\t2896 \tmax size of packets
\t\t1448 \tmin size of packets
\t\t15000 \ttotal size of packets
\t\t1500.000000 \tmean size of packets
\t\t600.000000 \tmean size of segments
\t\t1448 \tmax mss
\t\t536 \tmin mss
";
    assert!(report.contains(expected_tcp));
}

#[test]
fn test_report_empty_class_placeholders() {
    let report = format_report(&sample_stats());
    let ipv6: Vec<&str> = report.lines().skip(24).collect();
    assert_eq!(ipv6, vec![
        "\t\t0 \ttotal packets fragmented",
        "\t\t0 \toutput fragments created",
        "\t\t-- \tmean fragments per packet",
        "\t\t0 \tmax size of packets",
        "\t\t-- \tmin size of packets",
        "\t\t0 \ttotal size of packets",
        "\t\t-- \tmean size of packets",
        "\t\t-- \tmean size of fragments",
        "\t\t0 \tmax mss",
        "\t\t-- \tmin mss",
    ]);
}

#[test]
fn test_report_is_pure() {
    let stats = sample_stats();
    assert_eq!(format_report(&stats), format_report(&stats));
}

#[test]
fn test_report_segment_size_guarded_on_output_count() {
    let p = GsoProtoStats {
        segmented: 4,
        output_segments: 0,
        max_segmented: 1200,
        min_segmented: 800,
        total_bytes_segmented: 4000,
        max_mss: 1448,
        min_mss: 1448,
    };
    let mut buf: Vec<u8> = Vec::new();
    write_proto(&mut buf, &p, "segment").unwrap();
    let out = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[2], "\t\t0.000000 \tmean segments per packet");
    assert_eq!(lines[4], "\t\t800 \tmin size of packets");
    assert_eq!(lines[6], "\t\t1000.000000 \tmean size of packets");
    assert_eq!(lines[7], "\t\t-- \tmean size of segments");
    assert_eq!(lines[9], "\t\t1448 \tmin mss");
}

#[test]
fn test_report_large_counters_exact() {
    let mut stats = GsoStats::default();
    stats.tcp.segmented = 3;
    stats.tcp.output_segments = u64::MAX;
    let report = format_report(&stats);
    assert!(report.contains("\t\t6148914691236517205.000000 \tmean segments per packet\n"));
}

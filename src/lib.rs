//! Display the kernel's Generic Segmentation Offload statistics
//!
//! The counters live in the kernel and are read through the
//! `net.gso.stats` sysctl node. This package prints them per traffic
//! class (TCP segmentation, IPv4 and IPv6 fragmentation) and can reset
//! them afterwards.

pub mod utils;
pub mod error;
pub mod stats;
pub mod channel;
pub mod fetch;
pub mod report;
pub mod logger;

extern crate getopts;

use std::io::Write;
use getopts::{Matches, Options};
use crate::channel::StatsChannel;
use crate::error::GsoError;
use crate::fetch::{fetch_stats, reset_stats};
use crate::report::write_report;


#[derive(Default, Debug, PartialEq)]
pub struct GsoOpts {
    pub reset_flag: bool,
}


fn print_usage(program: &str, opts: &Options) {
    let brief = format!("Usage:\n{} arguments", program);
    eprint!("{}", opts.usage(&brief));
}

/// Parses the command line. Returns `None` when usage was printed
/// instead, which is not a failure.
pub fn init_opts(args: &[String]) -> Option<GsoOpts> {
    if args.len() == 0 {
        return None;
    }
    let program = args[0].clone();
    let mut gsoopts = GsoOpts::default();
    let mut opts = Options::new();
    opts.optflagmulti("r", "reset", "reset GSO statistics");
    opts.optflag("h", "help", "print this help menu");
    let matches: Matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("{}", f.to_string());
            print_usage(&program, &opts);
            return None;
        }
    };
    if matches.opt_present("h") {
        print_usage(&program, &opts);
        return None;
    }
    gsoopts.reset_flag = matches.opt_present("r");
    Some(gsoopts)
}

/// Fetches the counters, prints them to `out` and resets them if asked.
/// Nothing is printed when the fetch fails.
pub fn run_gso_stats<W: Write>(opts: &GsoOpts, chan: &mut dyn StatsChannel,
                               out: &mut W) -> Result<(), GsoError> {
    let stats = fetch_stats(chan)?;
    write_report(out, &stats)?;
    if opts.reset_flag {
        out.flush()?;
        reset_stats(chan, stats)?;
        writeln!(out, "\nGSO statistics cleared")?;
    }
    Ok(())
}

#[cfg(test)]
fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_init_opts() {
    // Empty args
    assert!(init_opts(&[]).is_none());
    assert_eq!(init_opts(&args(&["gso-stats"])), Some(GsoOpts { reset_flag: false }));
    assert_eq!(init_opts(&args(&["gso-stats", "-r"])), Some(GsoOpts { reset_flag: true }));
    assert_eq!(init_opts(&args(&["gso-stats", "-r", "-r"])), Some(GsoOpts { reset_flag: true }));
    // Help option should return None
    assert!(init_opts(&args(&["gso-stats", "-h"])).is_none());
    // Unmapped option, with or without -r
    assert!(init_opts(&args(&["gso-stats", "-Z"])).is_none());
    assert!(init_opts(&args(&["gso-stats", "-r", "-Z"])).is_none());
    assert!(init_opts(&args(&["gso-stats", "-Z", "-r"])).is_none());
}

#[cfg(test)]
use crate::channel::fake::FakeChannel;
#[cfg(test)]
use crate::stats::{sample_stats, GsoStats};

#[cfg(test)]
fn run_fake(reset: bool, chan: &mut FakeChannel) -> (Result<(), GsoError>, String) {
    let mut out: Vec<u8> = Vec::new();
    let res = run_gso_stats(&GsoOpts { reset_flag: reset }, chan, &mut out);
    (res, String::from_utf8(out).unwrap())
}

#[test]
fn test_run_fetch_failure_prints_nothing() {
    let mut chan = FakeChannel::with_data(sample_stats().to_bytes());
    chan.fail_read = true;
    let (res, out) = run_fake(true, &mut chan);
    assert!(matches!(res, Err(GsoError::Fetch(_))));
    assert_eq!(res.unwrap_err().exit_code(), 1);
    assert!(out.is_empty());
    assert!(chan.writes.is_empty());
}

#[test]
fn test_run_without_reset() {
    let mut chan = FakeChannel::with_data(sample_stats().to_bytes());
    let (res, out) = run_fake(false, &mut chan);
    assert!(res.is_ok());
    assert_eq!(out, report::format_report(&sample_stats()));
    assert!(!out.contains("GSO statistics cleared"));
    assert!(chan.writes.is_empty());
}

#[test]
fn test_run_with_reset() {
    let mut chan = FakeChannel::with_data(sample_stats().to_bytes());
    let (res, out) = run_fake(true, &mut chan);
    assert!(res.is_ok());
    assert_eq!(out.matches("GSO statistics cleared").count(), 1);
    assert!(out.starts_with(&report::format_report(&sample_stats())));
    assert!(out.ends_with("\nGSO statistics cleared\n"));
    assert_eq!(chan.writes.len(), 1);
    assert!(chan.writes[0].1.iter().all(|b| *b == 0));
    assert_eq!(chan.data, GsoStats::default().to_bytes());
}

#[test]
fn test_run_reset_failure() {
    let mut chan = FakeChannel::with_data(sample_stats().to_bytes());
    chan.fail_write = true;
    let (res, out) = run_fake(true, &mut chan);
    assert!(matches!(res, Err(GsoError::Reset(_))));
    // statistics were already printed, the confirmation was not
    assert!(out.contains("\t TCP (IPv4/IPv6) packets"));
    assert!(!out.contains("GSO statistics cleared"));
}

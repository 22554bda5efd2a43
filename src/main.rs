use std::env;
use std::error::Error;
use std::io::{self, Write};
use log::error;
use gso_stats::*;
use gso_stats::channel::SysctlChannel;


fn main() {
    logger::init();
    let args: Vec<String> = env::args().collect();
    let opts = match init_opts(&args) {
        Some(opts) => opts,
        None => std::process::exit(0)
    };

    let mut chan = SysctlChannel::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run_gso_stats(&opts, &mut chan, &mut out) {
        if let Some(source) = e.source() {
            error!("{}", source);
        }
        let _ = writeln!(out, "{}", e);
        let _ = out.flush();
        std::process::exit(e.exit_code());
    }
}

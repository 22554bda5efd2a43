use std::io::Write;
use log::LevelFilter;

/// Sets up stderr logging, `RUST_LOG` overrides the default `warn` filter
pub fn init() {
    let _ = env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .parse_default_env()
        .format(|buf, record| {
            let l = &record.level().as_str()[..1];
            writeln!(buf, "[{}] {}", l, record.args())
        })
        .try_init();
}

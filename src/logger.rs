use chrono::Local;
use env_logger::Builder;
use log::{Level, Record};
use std::io::{self, Write};

/// 各级别的终端颜色
fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[31m\x1b[1m", // 红色
        Level::Warn => "\x1b[33m\x1b[1m",  // 黄色
        Level::Info => "\x1b[32m\x1b[1m",  // 绿色
        Level::Debug => "\x1b[36m\x1b[1m", // 青色
        Level::Trace => "\x1b[90m\x1b[1m", // 灰色
    }
}

/// One log line: time, level, module target without the crate prefix, then file:line.
fn write_record<W: Write>(out: &mut W, time: &str, record: &Record) -> io::Result<()> {
    let target = record.target();
    let module = target
        .strip_prefix("inclinometer4x4::")
        .unwrap_or(target);

    writeln!(
        out,
        "{}{} {:<5}\x1b[0m {:<28} [{}:{}] {}",
        time,
        level_color(record.level()),
        record.level(),
        module,
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args(),
    )
}

/// 初始化日志，`RUST_LOG` 优先于配置里的默认级别
pub fn init_logger(default_level: &str) {
    let result = Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let time = Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();
            write_record(buf, &time, record)
        })
        .try_init();

    if let Err(e) = result {
        eprintln!("Logger already initialized: {}", e);
    }
}

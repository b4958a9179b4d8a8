use std::fmt::Display;

use colored::*;
use siprtt_common::metrics::CycleMetrics;
use siprtt_common::network::transport::Transport;
use tracing::info;

use crate::terminal::colors;

pub const PRINT_TARGET: &str = "siprtt::print";
pub const TOTAL_WIDTH: usize = 64;
const KEY_WIDTH: usize = 18;

/// Writes `msg` verbatim, bypassing the level symbol.
pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, "{msg}");
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn aligned_line<V: Display>(key: &str, value: V) {
    let dots: String = ".".repeat((KEY_WIDTH + 1).saturating_sub(key.chars().count()));
    let colon: String = format!(
        "{}{}",
        dots.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    );
    print_status(format!("{}{} {}", key.color(colors::PRIMARY), colon, value));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    let message: String = format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT));
    print(&message);
}

pub fn results(metrics: &CycleMetrics) {
    for (target, result) in metrics {
        let protocol: ColoredString = match result.protocol {
            Transport::Tcp => result.protocol.as_str().color(colors::TCP),
            Transport::Udp => result.protocol.as_str().color(colors::UDP),
        };
        let rtt: ColoredString = format!("{:.2} ms", result.rtt_ms).bold().yellow();
        aligned_line(target, format!("{rtt} via {protocol}"));
    }
}

pub fn end_of_program() {
    print(&format!(
        "{}",
        "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR)
    ));
}

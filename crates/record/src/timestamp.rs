use chrono::{Datelike, Local, Timelike};

/// Human-readable local timestamp, `YYYY-M-D H:M:S.mmm`.
///
/// Components are not zero-padded, matching the wire format consumed by
/// existing collectors (`2026-8-3 9:5:7.42`, not `2026-08-03 09:05:07.042`).
pub fn now() -> String {
    render(&Local::now())
}

fn render<T: Datelike + Timelike>(t: &T) -> String {
    format!(
        "{}-{}-{} {}:{}:{}.{}",
        t.year(),
        t.month(),
        t.day(),
        t.hour(),
        t.minute(),
        t.second(),
        t.nanosecond() / 1_000_000,
    )
}

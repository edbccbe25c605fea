mod style;
mod summary;

pub use style::{bold, command, configure, failure, info, muted, number, success, warning};
pub use summary::print_summary;

pub fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.2}s")
}

//! Response summary formatting shared by every view

/// Coarse status bucket used for colouring the status badge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Redirect,
    ClientError,
    ServerError,
}

impl StatusClass {
    /// Anything outside 2xx-4xx, including informational codes, is a server error
    pub fn from_status(status: u16) -> Self {
        match status {
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirect,
            400..=499 => StatusClass::ClientError,
            _ => StatusClass::ServerError,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClass::Success => "success",
            StatusClass::Redirect => "redirect",
            StatusClass::ClientError => "client-error",
            StatusClass::ServerError => "server-error",
        }
    }
}

/// Round half away from zero at `decimals` places before fixed formatting
fn round_half_up(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Elapsed time: whole milliseconds below one second, seconds with two decimals above
pub fn format_time(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{} ms", ms.round() as i64)
    } else {
        format!("{:.2} s", round_half_up(ms / 1000.0, 2))
    }
}

/// Body size in B, KB or MB
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", round_half_up(bytes as f64 / KB as f64, 1))
    } else {
        format!("{:.1} MB", round_half_up(bytes as f64 / MB as f64, 1))
    }
}

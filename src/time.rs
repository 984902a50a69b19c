use crate::game::Timestamp;
use chrono::prelude::{DateTime, Utc};

pub fn iso8601(dt: DateTime<Utc>) -> String {
    dt.format("%+").to_string()
}

/// Milliseconds since the unix epoch, clamped so that it never goes backwards relative to `last`.
pub fn now_millis(last: Timestamp) -> Timestamp {
    let now = Utc::now().timestamp_millis().max(0) as Timestamp;
    now.max(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_never_goes_backwards() {
        let future = now_millis(0) + 60_000;
        assert_eq!(now_millis(future), future);
    }
}

use chrono::{DateTime, Datelike, Duration, Weekday};

use crate::types::BarInterval;

const SECONDS_PER_HOUR: i64 = 3_600;

/// Timestamps for up to `count` forecast points after `last_time`.
///
/// Daily data steps through weekdays only, keeping the last bar's time of
/// day. Intraday data steps forward one hour per point. Fewer than `count`
/// times come back when the calendar runs out.
pub fn future_times(last_time: i64, interval: BarInterval, count: usize) -> Vec<i64> {
    match interval {
        BarInterval::Intraday => (1..=count as i64)
            .map_while(|k| {
                k.checked_mul(SECONDS_PER_HOUR)
                    .and_then(|offset| last_time.checked_add(offset))
            })
            .collect(),
        BarInterval::Daily => {
            let Some(mut current) = DateTime::from_timestamp(last_time, 0) else {
                return Vec::new();
            };
            let mut times = Vec::with_capacity(count);
            while times.len() < count {
                let Some(next) = current.checked_add_signed(Duration::days(1)) else {
                    break;
                };
                current = next;
                if !is_weekend(current.weekday()) {
                    times.push(current.timestamp());
                }
            }
            times
        }
    }
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    // 2024-01-12 00:00:00 UTC, a Friday
    const FRIDAY: i64 = 1_705_017_600;

    #[test]
    fn test_daily_skips_weekend() {
        let times = future_times(FRIDAY, BarInterval::Daily, 3);
        let labels: Vec<String> = times
            .iter()
            .map(|t| BarInterval::Daily.format_time(*t))
            .collect();
        assert_eq!(labels, vec!["2024-01-15", "2024-01-16", "2024-01-17"]);
    }

    #[test]
    fn test_daily_from_saturday() {
        let saturday = FRIDAY + 86_400;
        let times = future_times(saturday, BarInterval::Daily, 1);
        assert_eq!(BarInterval::Daily.format_time(times[0]), "2024-01-15");
    }

    #[test]
    fn test_intraday_steps_hourly() {
        let times = future_times(FRIDAY, BarInterval::Intraday, 3);
        assert_eq!(times, vec![FRIDAY + 3_600, FRIDAY + 7_200, FRIDAY + 10_800]);
    }

    #[test]
    fn test_zero_count() {
        assert!(future_times(FRIDAY, BarInterval::Daily, 0).is_empty());
    }

    #[test]
    fn test_daily_stops_at_calendar_limit() {
        let last = DateTime::<Utc>::MAX_UTC.timestamp();
        assert!(future_times(last, BarInterval::Daily, 5).is_empty());

        let times = future_times(last - 3 * 86_400, BarInterval::Daily, 5);
        assert!(times.len() < 5);
        assert!(times.iter().all(|t| *t <= last));
    }

    #[test]
    fn test_intraday_stops_at_i64_limit() {
        let times = future_times(i64::MAX - 5_000, BarInterval::Intraday, 3);
        assert_eq!(times, vec![i64::MAX - 1_400]);
    }
}

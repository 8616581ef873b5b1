//! Running traffic and visitor statistics for one access log.
//!
//! [`Statistics`] folds entries in one at a time and only keeps what the
//! metrics need: counters, time bounds, page sets, frequency tables and the
//! set of human visitor addresses. Derived metrics are computed on demand.

use crate::access::{BotKind, BrowserFamily, LogEntry, OsFamily};
use chrono::{DateTime, FixedOffset};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Aggregated statistics for a single log file.
#[derive(Debug, Default, Clone)]
pub struct Statistics {
    total_traffic: u64,
    entry_count: usize,
    min_time: Option<DateTime<FixedOffset>>,
    max_time: Option<DateTime<FixedOffset>>,
    existing_pages: BTreeSet<String>,
    non_existent_pages: BTreeSet<String>,
    browser_frequency: BTreeMap<BrowserFamily, usize>,
    os_frequency: BTreeMap<OsFamily, usize>,
    error_request_count: usize,
    non_bot_visits: usize,
    non_bot_addresses: HashSet<String>,
    bot_counts: BTreeMap<BotKind, usize>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one entry into the running totals.
    pub fn add_entry(&mut self, entry: &LogEntry) {
        self.total_traffic = self.total_traffic.saturating_add(entry.response_size());
        self.entry_count += 1;

        let time = entry.timestamp();
        if self.min_time.map_or(true, |min| time < min) {
            self.min_time = Some(time);
        }
        if self.max_time.map_or(true, |max| time > max) {
            self.max_time = Some(time);
        }

        match entry.status_code() {
            200 => {
                self.existing_pages.insert(entry.path().to_string());
            }
            404 => {
                self.non_existent_pages.insert(entry.path().to_string());
            }
            _ => {}
        }
        if entry.is_error() {
            self.error_request_count += 1;
        }

        let agent = entry.agent();
        *self.browser_frequency.entry(agent.browser()).or_insert(0) += 1;
        *self.os_frequency.entry(agent.os()).or_insert(0) += 1;

        match agent.bot() {
            Some(kind) => *self.bot_counts.entry(kind).or_insert(0) += 1,
            None => {
                self.non_bot_visits += 1;
                if !self.non_bot_addresses.contains(entry.client_address()) {
                    self.non_bot_addresses
                        .insert(entry.client_address().to_string());
                }
            }
        }
    }

    pub const fn total_traffic(&self) -> u64 {
        self.total_traffic
    }

    pub const fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub const fn min_time(&self) -> Option<DateTime<FixedOffset>> {
        self.min_time
    }

    pub const fn max_time(&self) -> Option<DateTime<FixedOffset>> {
        self.max_time
    }

    pub const fn error_request_count(&self) -> usize {
        self.error_request_count
    }

    pub const fn non_bot_visits(&self) -> usize {
        self.non_bot_visits
    }

    pub fn unique_visitors(&self) -> usize {
        self.non_bot_addresses.len()
    }

    /// Requests attributed to a given crawler.
    pub fn bot_count(&self, kind: BotKind) -> usize {
        self.bot_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Share of all lines read from the log made by a given crawler, in
    /// percent. `total_lines` includes lines that were skipped.
    pub fn bot_share(&self, kind: BotKind, total_lines: usize) -> f64 {
        if total_lines == 0 {
            return 0.0;
        }
        self.bot_count(kind) as f64 / total_lines as f64 * 100.0
    }

    /// Whole hours between the earliest and latest entry, truncated.
    ///
    /// `None` until an entry has been added.
    pub fn span_hours(&self) -> Option<i64> {
        let (min, max) = self.min_time.zip(self.max_time)?;
        Some(max.signed_duration_since(min).num_hours())
    }

    /// Divisor for the per-hour metrics: whole hours, never below one.
    fn rate_hours(&self) -> f64 {
        self.span_hours().unwrap_or(0).max(1) as f64
    }

    /// Bytes per hour across the observed time range.
    ///
    /// Zero unless at least two distinct timestamps were seen. A span shorter
    /// than an hour counts as one hour, so short bursts report the raw total.
    pub fn traffic_rate(&self) -> f64 {
        match (self.min_time, self.max_time) {
            (Some(min), Some(max)) if min != max => self.total_traffic as f64 / self.rate_hours(),
            _ => 0.0,
        }
    }

    /// Non-bot requests per hour.
    pub fn average_visits_per_hour(&self) -> f64 {
        self.non_bot_visits as f64 / self.rate_hours()
    }

    /// 4xx/5xx responses per hour.
    pub fn average_error_requests_per_hour(&self) -> f64 {
        if self.error_request_count == 0 {
            return 0.0;
        }
        self.error_request_count as f64 / self.rate_hours()
    }

    /// Non-bot requests per distinct non-bot client address.
    pub fn average_visits_per_user(&self) -> f64 {
        if self.non_bot_addresses.is_empty() {
            return 0.0;
        }
        self.non_bot_visits as f64 / self.non_bot_addresses.len() as f64
    }

    /// Browser families as proportions of all entries.
    pub fn browser_statistics(&self) -> BTreeMap<BrowserFamily, f64> {
        proportions(&self.browser_frequency)
    }

    /// Operating system families as proportions of all entries.
    pub fn os_statistics(&self) -> BTreeMap<OsFamily, f64> {
        proportions(&self.os_frequency)
    }

    pub fn browser_frequency(&self) -> &BTreeMap<BrowserFamily, usize> {
        &self.browser_frequency
    }

    pub fn os_frequency(&self) -> &BTreeMap<OsFamily, usize> {
        &self.os_frequency
    }

    /// Paths answered with 200.
    pub fn existing_pages(&self) -> BTreeSet<String> {
        self.existing_pages.clone()
    }

    /// Paths answered with 404.
    pub fn non_existent_pages(&self) -> BTreeSet<String> {
        self.non_existent_pages.clone()
    }
}

fn proportions<K: Ord + Copy>(counts: &BTreeMap<K, usize>) -> BTreeMap<K, f64> {
    let total: usize = counts.values().sum();
    if total == 0 {
        return BTreeMap::new();
    }
    counts
        .iter()
        .map(|(key, count)| (*key, *count as f64 / total as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clock() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
            .unwrap()
    }

    fn line(addr: &str, time: &str, path: &str, status: u16, size: u64, agent: &str) -> String {
        format!(
            r#"{addr} - - [{time}] "GET {path} HTTP/1.1" {status} {size} "-" "{agent}""#
        )
    }

    fn entry(addr: &str, time: &str, path: &str, status: u16, size: u64, agent: &str) -> LogEntry {
        LogEntry::parse_with_fallback(&line(addr, time, path, status, size, agent), clock())
    }

    const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/119.0";
    const CHROME: &str = "Mozilla/5.0 (Windows NT 10.0) Chrome/118.0";
    const GOOGLEBOT: &str =
        "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

    #[test]
    fn test_empty_statistics() {
        let stats = Statistics::new();
        assert_eq!(stats.entry_count(), 0);
        assert_eq!(stats.total_traffic(), 0);
        assert!(stats.min_time().is_none());
        assert!(stats.max_time().is_none());
        assert_eq!(stats.traffic_rate(), 0.0);
        assert_eq!(stats.average_visits_per_hour(), 0.0);
        assert_eq!(stats.average_error_requests_per_hour(), 0.0);
        assert_eq!(stats.average_visits_per_user(), 0.0);
        assert!(stats.browser_statistics().is_empty());
        assert!(stats.os_statistics().is_empty());
    }

    #[test]
    fn test_single_entry() {
        let mut stats = Statistics::new();
        stats.add_entry(&entry(
            "10.0.0.1",
            "10/Oct/2023:13:55:36 +0000",
            "/index.html",
            200,
            512,
            CHROME,
        ));

        assert_eq!(stats.entry_count(), 1);
        assert_eq!(stats.total_traffic(), 512);
        assert_eq!(stats.min_time(), stats.max_time());
        assert_eq!(stats.traffic_rate(), 0.0);
        assert!(stats.existing_pages().contains("/index.html"));
        assert_eq!(stats.existing_pages().len(), 1);
    }

    #[test]
    fn test_traffic_rate_under_one_hour_is_total() {
        let mut stats = Statistics::new();
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:13:00:00 +0000", "/a", 200, 300, CHROME));
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:13:59:59 +0000", "/b", 200, 700, CHROME));
        assert_eq!(stats.span_hours(), Some(0));
        assert_eq!(stats.traffic_rate(), 1000.0);
    }

    #[test]
    fn test_traffic_rate_truncates_hours() {
        let mut stats = Statistics::new();
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:10:00:00 +0000", "/a", 200, 1000, CHROME));
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:12:59:00 +0000", "/b", 200, 1000, CHROME));
        assert_eq!(stats.span_hours(), Some(2));
        assert_eq!(stats.traffic_rate(), 1000.0);
    }

    #[test]
    fn test_time_bounds_are_order_independent() {
        let times = [
            "10/Oct/2023:12:00:00 +0000",
            "10/Oct/2023:09:00:00 +0000",
            "10/Oct/2023:15:00:00 +0000",
        ];
        let mut forward = Statistics::new();
        let mut backward = Statistics::new();
        for t in times {
            forward.add_entry(&entry("1.1.1.1", t, "/", 200, 1, CHROME));
        }
        for t in times.iter().rev() {
            backward.add_entry(&entry("1.1.1.1", t, "/", 200, 1, CHROME));
        }
        assert_eq!(forward.min_time(), backward.min_time());
        assert_eq!(forward.max_time(), backward.max_time());
        assert_eq!(forward.span_hours(), Some(6));
    }

    #[test]
    fn test_offsets_compare_by_instant() {
        let mut stats = Statistics::new();
        // 12:00 +0300 is 09:00 UTC, earlier than 10:00 +0000
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:10:00:00 +0000", "/", 200, 1, CHROME));
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:12:00:00 +0300", "/", 200, 1, CHROME));
        assert_eq!(
            stats.min_time().unwrap().to_rfc3339(),
            "2023-10-10T12:00:00+03:00"
        );
    }

    #[test]
    fn test_page_sets_allow_both_status_classes() {
        let mut stats = Statistics::new();
        stats.add_entry(&entry(
            "1.1.1.1",
            "10/Oct/2023:10:00:00 +0000",
            "/missing",
            404,
            0,
            CHROME,
        ));
        stats.add_entry(&entry(
            "1.1.1.1",
            "10/Oct/2023:10:00:01 +0000",
            "/missing",
            200,
            10,
            CHROME,
        ));
        assert!(stats.existing_pages().contains("/missing"));
        assert!(stats.non_existent_pages().contains("/missing"));
    }

    #[test]
    fn test_page_sets_are_copies() {
        let mut stats = Statistics::new();
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:10:00:00 +0000", "/a", 200, 0, CHROME));
        let snapshot = stats.existing_pages();
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:10:00:01 +0000", "/b", 200, 0, CHROME));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(stats.existing_pages().len(), 2);
    }

    #[test]
    fn test_error_requests_use_numeric_range() {
        let mut stats = Statistics::new();
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:10:00:00 +0000", "/400", 399, 0, CHROME));
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:10:00:00 +0000", "/a", 400, 0, CHROME));
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:11:00:00 +0000", "/b", 503, 0, CHROME));
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:12:00:00 +0000", "/c", 599, 0, CHROME));
        assert_eq!(stats.error_request_count(), 3);
        assert_eq!(stats.span_hours(), Some(2));
        assert_eq!(stats.average_error_requests_per_hour(), 1.5);
    }

    #[test]
    fn test_visit_metrics_exclude_bots() {
        let mut stats = Statistics::new();
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:10:00:00 +0000", "/", 200, 0, CHROME));
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:10:30:00 +0000", "/", 200, 0, FIREFOX));
        stats.add_entry(&entry("2.2.2.2", "10/Oct/2023:11:00:00 +0000", "/", 200, 0, CHROME));
        stats.add_entry(&entry("3.3.3.3", "10/Oct/2023:12:00:00 +0000", "/", 200, 0, GOOGLEBOT));

        assert_eq!(stats.non_bot_visits(), 3);
        assert_eq!(stats.unique_visitors(), 2);
        assert_eq!(stats.average_visits_per_user(), 1.5);
        assert_eq!(stats.average_visits_per_hour(), 1.5);
        assert_eq!(stats.bot_count(BotKind::Googlebot), 1);
        assert_eq!(stats.bot_count(BotKind::YandexBot), 0);
        assert_eq!(stats.bot_share(BotKind::Googlebot, 4), 25.0);
        assert_eq!(stats.bot_share(BotKind::Googlebot, 5), 20.0);
        assert_eq!(stats.bot_share(BotKind::Googlebot, 0), 0.0);
    }

    #[test]
    fn test_only_bots_gives_zero_visits_per_user() {
        let mut stats = Statistics::new();
        stats.add_entry(&entry("3.3.3.3", "10/Oct/2023:12:00:00 +0000", "/", 200, 0, GOOGLEBOT));
        assert_eq!(stats.average_visits_per_user(), 0.0);
        assert_eq!(stats.average_visits_per_hour(), 0.0);
    }

    #[test]
    fn test_proportions_sum_to_one() {
        let mut stats = Statistics::new();
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:10:00:00 +0000", "/", 200, 0, CHROME));
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:10:00:00 +0000", "/", 200, 0, CHROME));
        stats.add_entry(&entry("1.1.1.1", "10/Oct/2023:10:00:00 +0000", "/", 200, 0, FIREFOX));

        let browsers = stats.browser_statistics();
        let sum: f64 = browsers.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((browsers[&BrowserFamily::Chrome] - 2.0 / 3.0).abs() < 1e-9);

        let os = stats.os_statistics();
        let sum: f64 = os.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((os[&OsFamily::Windows] - 2.0 / 3.0).abs() < 1e-9);
        assert!((os[&OsFamily::Linux] - 1.0 / 3.0).abs() < 1e-9);
    }
}

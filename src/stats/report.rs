//! Final per-file report.
//!
//! A [`Report`] is a plain snapshot of a finished [`Statistics`] so it can be
//! printed or serialized without holding on to the aggregator.

use super::statistics::Statistics;
use crate::access::{BotKind, BrowserFamily, OsFamily};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Request count and share for one crawler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BotReport {
    pub bot: BotKind,
    pub requests: usize,
    /// Percentage of all lines read, skipped ones included
    pub share_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub entry_count: usize,
    pub total_traffic: u64,
    pub min_time: Option<DateTime<FixedOffset>>,
    pub max_time: Option<DateTime<FixedOffset>>,
    /// Bytes per hour
    pub traffic_rate: f64,
    pub existing_pages: BTreeSet<String>,
    pub non_existent_pages: BTreeSet<String>,
    pub browser_statistics: BTreeMap<BrowserFamily, f64>,
    pub os_statistics: BTreeMap<OsFamily, f64>,
    pub error_request_count: usize,
    pub average_visits_per_hour: f64,
    pub average_error_requests_per_hour: f64,
    pub average_visits_per_user: f64,
    pub bots: Vec<BotReport>,
}

impl Report {
    /// Snapshot `stats` for a log of `total_lines` lines. Crawler shares are
    /// taken against the line count, not the accepted entries.
    pub fn from_statistics(stats: &Statistics, total_lines: usize) -> Self {
        let bots = BotKind::ALL
            .iter()
            .map(|&bot| BotReport {
                bot,
                requests: stats.bot_count(bot),
                share_percent: stats.bot_share(bot, total_lines),
            })
            .collect();

        Self {
            entry_count: stats.entry_count(),
            total_traffic: stats.total_traffic(),
            min_time: stats.min_time(),
            max_time: stats.max_time(),
            traffic_rate: stats.traffic_rate(),
            existing_pages: stats.existing_pages(),
            non_existent_pages: stats.non_existent_pages(),
            browser_statistics: stats.browser_statistics(),
            os_statistics: stats.os_statistics(),
            error_request_count: stats.error_request_count(),
            average_visits_per_hour: stats.average_visits_per_hour(),
            average_error_requests_per_hour: stats.average_error_requests_per_hour(),
            average_visits_per_user: stats.average_visits_per_user(),
            bots,
        }
    }
}

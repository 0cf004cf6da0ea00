//! Aggregates shown in stat cards and chart datasets. Pure functions over
//! the decoded payloads.

use crate::models::{Decision, Device, MlMetric, StripeStatus, Transaction};

pub fn count_status(transactions: &[Transaction], status: StripeStatus) -> usize {
    transactions
        .iter()
        .filter(|t| t.stripe_status == status)
        .count()
}

pub fn count_decision(transactions: &[Transaction], decision: Decision) -> usize {
    transactions
        .iter()
        .filter(|t| t.processing_decision == Some(decision))
        .count()
}

fn rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Percentage of succeeded payments, 0 for an empty list.
pub fn success_rate(transactions: &[Transaction]) -> f64 {
    rate(
        count_status(transactions, StripeStatus::Succeeded),
        transactions.len(),
    )
}

pub fn edge_rate(transactions: &[Transaction]) -> f64 {
    rate(count_decision(transactions, Decision::Edge), transactions.len())
}

pub fn total_volume(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(|t| t.amount).sum()
}

/// Mean over rows that report a latency. Rows without one are ignored.
pub fn average_latency<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> f64 {
    let (sum, n) = transactions
        .into_iter()
        .filter_map(|t| t.latency)
        .fold((0.0, 0usize), |(sum, n), l| (sum + l, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceSummary {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub avg_load: f64,
}

pub fn device_summary(devices: &[Device]) -> DeviceSummary {
    let total = devices.len();
    let online = devices.iter().filter(|d| d.status.is_online()).count();
    let avg_load = if total == 0 {
        0.0
    } else {
        devices.iter().map(|d| d.load).sum::<f64>() / total as f64
    };
    DeviceSummary {
        total,
        online,
        offline: total - online,
        avg_load,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadLevel {
    Low,
    Medium,
    High,
}

impl LoadLevel {
    pub fn from_load(load: f64) -> Self {
        if load > 80.0 {
            LoadLevel::High
        } else if load > 50.0 {
            LoadLevel::Medium
        } else {
            LoadLevel::Low
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            LoadLevel::High => "#ef4444",
            LoadLevel::Medium => "#f59e0b",
            LoadLevel::Low => "#10b981",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            LoadLevel::High => "high",
            LoadLevel::Medium => "medium",
            LoadLevel::Low => "low",
        }
    }
}

/// Container height in px for the horizontal load chart.
pub fn load_chart_height(device_count: usize) -> u32 {
    (device_count as u32 * 40 + 50).max(300)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionBreakdown {
    pub edge: usize,
    pub cloud: usize,
    pub flagged: usize,
}

impl PredictionBreakdown {
    /// Denominator for percentages. Never zero.
    pub fn total(&self) -> usize {
        (self.edge + self.cloud + self.flagged).max(1)
    }

    /// Whole-number share of `count` in the breakdown.
    pub fn percent(&self, count: usize) -> u32 {
        (count as f64 / self.total() as f64 * 100.0).round() as u32
    }

    pub fn counts(&self) -> [usize; 3] {
        [self.edge, self.cloud, self.flagged]
    }
}

pub fn prediction_breakdown(transactions: &[Transaction]) -> PredictionBreakdown {
    PredictionBreakdown {
        edge: count_decision(transactions, Decision::Edge),
        cloud: count_decision(transactions, Decision::Cloud),
        flagged: count_decision(transactions, Decision::Flagged),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySplit {
    pub edge_count: usize,
    pub cloud_count: usize,
    pub edge_avg: f64,
    pub cloud_avg: f64,
}

pub fn latency_split(transactions: &[Transaction]) -> LatencySplit {
    let side = |d: Decision| transactions.iter().filter(move |t| t.processing_decision == Some(d));
    LatencySplit {
        edge_count: side(Decision::Edge).count(),
        cloud_count: side(Decision::Cloud).count(),
        edge_avg: average_latency(side(Decision::Edge)),
        cloud_avg: average_latency(side(Decision::Cloud)),
    }
}

/// Counts for the initiated → validated → processed → successful strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pipeline {
    pub initiated: usize,
    pub validated: usize,
    pub processed: usize,
    pub successful: usize,
}

pub fn pipeline(transactions: &[Transaction]) -> Pipeline {
    Pipeline {
        initiated: transactions.len(),
        validated: transactions
            .iter()
            .filter(|t| t.processing_decision.is_some())
            .count(),
        processed: transactions
            .iter()
            .filter(|t| t.stripe_status != StripeStatus::Processing)
            .count(),
        successful: count_status(transactions, StripeStatus::Succeeded),
    }
}

/// Most recent snapshot, or zeros when the model has not reported yet.
pub fn latest_metric(metrics: &[MlMetric]) -> MlMetric {
    metrics.last().cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::format_percent;
    use crate::models::DeviceStatus;

    fn txn(status: StripeStatus, decision: Option<Decision>, latency: Option<f64>) -> Transaction {
        Transaction {
            id: "t".to_string(),
            amount: 100.0,
            stripe_status: status,
            processing_decision: decision,
            latency,
            ..Default::default()
        }
    }

    fn device(status: DeviceStatus, load: f64) -> Device {
        Device {
            id: "edge-1".to_string(),
            name: "Edge Node".to_string(),
            location: "KL".to_string(),
            region: None,
            status,
            load,
            latency: 10.0,
            transactions_per_sec: None,
            last_sync: None,
            sync_status: String::new(),
        }
    }

    #[test]
    fn test_success_rate_one_decimal() {
        let txns = vec![
            txn(StripeStatus::Succeeded, Some(Decision::Edge), Some(10.0)),
            txn(StripeStatus::Succeeded, Some(Decision::Cloud), Some(30.0)),
            txn(StripeStatus::Failed, Some(Decision::Flagged), None),
        ];
        assert_eq!(format_percent(success_rate(&txns), 1), "66.7%");
        assert_eq!(format_percent(edge_rate(&txns), 0), "33%");
    }

    #[test]
    fn test_rates_on_empty_list() {
        assert_eq!(success_rate(&[]), 0.0);
        assert_eq!(edge_rate(&[]), 0.0);
        assert_eq!(average_latency(&Vec::<Transaction>::new()), 0.0);
    }

    #[test]
    fn test_average_latency_skips_missing_values() {
        let txns = vec![
            txn(StripeStatus::Succeeded, None, Some(10.0)),
            txn(StripeStatus::Succeeded, None, None),
            txn(StripeStatus::Succeeded, None, Some(20.0)),
        ];
        assert_eq!(average_latency(&txns), 15.0);
    }

    #[test]
    fn test_rates_round_halves_up() {
        let mut txns = vec![txn(StripeStatus::Succeeded, Some(Decision::Edge), None)];
        txns.extend((0..15).map(|_| txn(StripeStatus::Failed, Some(Decision::Cloud), None)));
        assert_eq!(format_percent(success_rate(&txns), 1), "6.3%");

        let mut txns: Vec<_> = (0..7).map(|_| txn(StripeStatus::Succeeded, Some(Decision::Cloud), None)).collect();
        txns.push(txn(StripeStatus::Succeeded, Some(Decision::Edge), None));
        assert_eq!(format_percent(edge_rate(&txns), 0), "13%");
    }

    #[test]
    fn test_zero_devices_average_load() {
        let summary = device_summary(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(format_percent(summary.avg_load, 1), "0.0%");
    }

    #[test]
    fn test_device_summary_counts() {
        let devices = vec![
            device(DeviceStatus::Online, 40.0),
            device(DeviceStatus::Offline, 0.0),
            device(DeviceStatus::Online, 95.0),
        ];
        let summary = device_summary(&devices);
        assert_eq!(summary.online, 2);
        assert_eq!(summary.offline, 1);
        assert_eq!(format_percent(summary.avg_load, 1), "45.0%");
    }

    #[test]
    fn test_load_level_thresholds() {
        assert_eq!(LoadLevel::from_load(80.1).color(), "#ef4444");
        assert_eq!(LoadLevel::from_load(80.0).color(), "#f59e0b");
        assert_eq!(LoadLevel::from_load(50.1), LoadLevel::Medium);
        assert_eq!(LoadLevel::from_load(50.0).color(), "#10b981");
    }

    #[test]
    fn test_load_chart_height() {
        assert_eq!(load_chart_height(0), 300);
        assert_eq!(load_chart_height(6), 300);
        assert_eq!(load_chart_height(10), 450);
    }

    #[test]
    fn test_prediction_breakdown_floors_total() {
        let empty = prediction_breakdown(&[]);
        assert_eq!(empty.total(), 1);
        assert_eq!(empty.percent(empty.edge), 0);

        let txns = vec![
            txn(StripeStatus::Pending, Some(Decision::Edge), None),
            txn(StripeStatus::Pending, Some(Decision::Edge), None),
            txn(StripeStatus::Pending, Some(Decision::Cloud), None),
        ];
        let b = prediction_breakdown(&txns);
        assert_eq!(b.counts(), [2, 1, 0]);
        assert_eq!(b.percent(b.edge), 67);
        assert_eq!(b.percent(b.cloud), 33);
    }

    #[test]
    fn test_latency_split_uses_processing_decision() {
        let txns = vec![
            txn(StripeStatus::Succeeded, Some(Decision::Edge), Some(8.0)),
            txn(StripeStatus::Succeeded, Some(Decision::Edge), Some(12.0)),
            txn(StripeStatus::Succeeded, Some(Decision::Cloud), Some(120.0)),
            txn(StripeStatus::Succeeded, Some(Decision::Flagged), Some(500.0)),
        ];
        let split = latency_split(&txns);
        assert_eq!(split.edge_count, 2);
        assert_eq!(split.cloud_count, 1);
        assert_eq!(split.edge_avg, 10.0);
        assert_eq!(split.cloud_avg, 120.0);
    }

    #[test]
    fn test_pipeline_counts() {
        let txns = vec![
            txn(StripeStatus::Succeeded, Some(Decision::Edge), None),
            txn(StripeStatus::Processing, None, None),
            txn(StripeStatus::Failed, Some(Decision::Flagged), None),
        ];
        assert_eq!(
            pipeline(&txns),
            Pipeline {
                initiated: 3,
                validated: 2,
                processed: 2,
                successful: 1
            }
        );
    }

    #[test]
    fn test_latest_metric_defaults_to_zero() {
        assert_eq!(latest_metric(&[]).accuracy, 0.0);
        let metrics = vec![
            MlMetric { accuracy: 0.9, ..Default::default() },
            MlMetric { accuracy: 0.95, ..Default::default() },
        ];
        assert_eq!(latest_metric(&metrics).accuracy, 0.95);
    }
}

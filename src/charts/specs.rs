//! Chart configurations for each page.

use serde_json::json;

use super::{ChartData, ChartKind, ChartSpec, Dataset};
use crate::format::format_time;
use crate::models::{Device, LatencySample, StripeStatus, Transaction};
use crate::stats::{count_status, LatencySplit, LoadLevel, PredictionBreakdown};

pub const EDGE_GREEN: &str = "#10b981";
pub const CLOUD_BLUE: &str = "#3b82f6";
pub const ALERT_RED: &str = "#ef4444";
pub const WARN_ORANGE: &str = "#f59e0b";

const GRID_COLOR: &str = "rgba(255, 255, 255, 0.1)";

fn colors(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| c.to_string()).collect()
}

fn legend_bottom() -> serde_json::Value {
    json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": { "legend": { "position": "bottom" } }
    })
}

fn line(label: &str, data: Vec<f64>, color: &str) -> Dataset {
    Dataset {
        label: Some(label.to_string()),
        data,
        border_color: Some(color.to_string()),
        tension: Some(0.4),
        ..Default::default()
    }
}

/// Edge, hybrid and cloud latency over time.
pub fn latency_chart(samples: &[LatencySample]) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        data: ChartData {
            labels: samples.iter().map(|s| format_time(&s.timestamp)).collect(),
            datasets: vec![
                line("Edge Latency", samples.iter().map(|s| s.edge).collect(), EDGE_GREEN),
                line("Hybrid Latency", samples.iter().map(|s| s.hybrid).collect(), WARN_ORANGE),
                line("Cloud Latency", samples.iter().map(|s| s.cloud).collect(), CLOUD_BLUE),
            ],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "scales": {
                "y": { "beginAtZero": true, "grid": { "color": GRID_COLOR } },
                "x": { "grid": { "display": false } }
            },
            "plugins": { "legend": { "position": "top" } }
        }),
    }
}

/// Horizontal CPU load bars, coloured by threshold.
pub fn load_chart(devices: &[Device]) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: devices.iter().map(|d| d.name.clone()).collect(),
            datasets: vec![Dataset {
                label: Some("CPU Load (%)".to_string()),
                data: devices.iter().map(|d| d.load).collect(),
                background_color: devices
                    .iter()
                    .map(|d| LoadLevel::from_load(d.load).color().to_string())
                    .collect(),
                border_radius: Some(4),
                bar_thickness: Some(20),
                ..Default::default()
            }],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "indexAxis": "y",
            "scales": {
                "x": { "beginAtZero": true, "max": 100, "grid": { "color": GRID_COLOR } },
                "y": { "grid": { "display": false } }
            },
            "plugins": { "legend": { "display": false } }
        }),
    }
}

pub fn prediction_chart(breakdown: &PredictionBreakdown) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Doughnut,
        data: ChartData {
            labels: vec!["Edge".into(), "Cloud".into(), "Flagged".into()],
            datasets: vec![Dataset {
                data: breakdown.counts().iter().map(|&c| c as f64).collect(),
                background_color: colors(&[EDGE_GREEN, CLOUD_BLUE, ALERT_RED]),
                border_width: Some(0),
                ..Default::default()
            }],
        },
        options: legend_bottom(),
    }
}

/// Edge vs cloud processed counts.
pub fn location_chart(split: &LatencySplit) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Pie,
        data: ChartData {
            labels: vec!["Edge Processed".into(), "Cloud Processed".into()],
            datasets: vec![Dataset {
                data: vec![split.edge_count as f64, split.cloud_count as f64],
                background_color: colors(&[EDGE_GREEN, CLOUD_BLUE]),
                border_width: Some(0),
                ..Default::default()
            }],
        },
        options: legend_bottom(),
    }
}

pub fn status_chart(transactions: &[Transaction]) -> ChartSpec {
    let data = [
        StripeStatus::Succeeded,
        StripeStatus::Failed,
        StripeStatus::Processing,
    ]
    .iter()
    .map(|s| count_status(transactions, *s) as f64)
    .collect();

    ChartSpec {
        kind: ChartKind::Pie,
        data: ChartData {
            labels: vec!["Succeeded".into(), "Failed".into(), "Processing".into()],
            datasets: vec![Dataset {
                data,
                background_color: colors(&[EDGE_GREEN, ALERT_RED, WARN_ORANGE]),
                border_width: Some(0),
                ..Default::default()
            }],
        },
        options: legend_bottom(),
    }
}

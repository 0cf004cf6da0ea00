//! Chart instances keyed by canvas id.
//!
//! The first render for a canvas creates the chart. Later renders mutate the
//! existing instance's labels and datasets and redraw it, so a poll tick
//! never stacks a second chart on the same canvas.

pub mod chartjs;
pub mod specs;

use std::cell::RefCell;
use std::collections::HashMap;

use leptos::prelude::*;
use serde::Serialize;
use thiserror::Error;

use chartjs::ChartJs;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("Canvas #{0} not found")]
    CanvasNotFound(String),

    #[error("Chart config could not be converted: {0}")]
    Config(String),

    #[error("Chart.js error: {0}")]
    Js(String),
}

impl From<ChartError> for String {
    fn from(err: ChartError) -> Self {
        err.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
    Pie,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub background_color: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_thickness: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Chart.js configuration object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: serde_json::Value,
}

/// Drawing surface. The browser build uses Chart.js; tests use a recorder.
pub trait ChartBackend {
    type Chart;

    fn create(&self, canvas_id: &str, spec: &ChartSpec) -> Result<Self::Chart, ChartError>;

    /// Replace labels and dataset values in place, then redraw.
    fn update(&self, chart: &Self::Chart, data: &ChartData) -> Result<(), ChartError>;

    fn destroy(&self, chart: Self::Chart);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Created,
    Updated,
}

pub struct ChartRegistry<B: ChartBackend> {
    backend: B,
    charts: RefCell<HashMap<String, B::Chart>>,
}

impl<B: ChartBackend> ChartRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            charts: RefCell::new(HashMap::new()),
        }
    }

    pub fn render(&self, canvas_id: &str, spec: &ChartSpec) -> Result<RenderOutcome, ChartError> {
        if let Some(chart) = self.charts.borrow().get(canvas_id) {
            self.backend.update(chart, &spec.data)?;
            return Ok(RenderOutcome::Updated);
        }

        let chart = self.backend.create(canvas_id, spec)?;
        self.charts.borrow_mut().insert(canvas_id.to_string(), chart);
        log::debug!("Created chart on #{}", canvas_id);
        Ok(RenderOutcome::Created)
    }

    /// Render and log failures. Chart problems never take the page down.
    pub fn render_or_log(&self, canvas_id: &str, spec: &ChartSpec) {
        if let Err(e) = self.render(canvas_id, spec) {
            log::warn!("Chart #{} not rendered: {}", canvas_id, e);
        }
    }

    #[cfg(test)]
    fn contains(&self, canvas_id: &str) -> bool {
        self.charts.borrow().contains_key(canvas_id)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.charts.borrow().len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn destroy_all(&self) {
        let charts: Vec<B::Chart> = self.charts.borrow_mut().drain().map(|(_, c)| c).collect();
        for chart in charts {
            self.backend.destroy(chart);
        }
    }
}

/// Chart registry owned by the calling page. Every chart it created is
/// destroyed when the page unmounts.
pub fn use_charts() -> StoredValue<ChartRegistry<ChartJs>, LocalStorage> {
    let registry = StoredValue::new_local(ChartRegistry::new(ChartJs));
    on_cleanup(move || {
        let _ = registry.try_with_value(|r| r.destroy_all());
    });
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counters {
        created: Cell<usize>,
        updated: Cell<usize>,
        destroyed: Cell<usize>,
    }

    /// Records calls and keeps the last data pushed into each chart.
    #[derive(Default, Clone)]
    struct FakeBackend {
        counters: Rc<Counters>,
        fail_create: bool,
    }

    struct FakeChart {
        data: RefCell<ChartData>,
    }

    impl ChartBackend for FakeBackend {
        type Chart = FakeChart;

        fn create(&self, canvas_id: &str, spec: &ChartSpec) -> Result<FakeChart, ChartError> {
            if self.fail_create {
                return Err(ChartError::CanvasNotFound(canvas_id.to_string()));
            }
            self.counters.created.set(self.counters.created.get() + 1);
            Ok(FakeChart {
                data: RefCell::new(spec.data.clone()),
            })
        }

        fn update(&self, chart: &FakeChart, data: &ChartData) -> Result<(), ChartError> {
            self.counters.updated.set(self.counters.updated.get() + 1);
            *chart.data.borrow_mut() = data.clone();
            Ok(())
        }

        fn destroy(&self, _chart: FakeChart) {
            self.counters.destroyed.set(self.counters.destroyed.get() + 1);
        }
    }

    fn spec(values: Vec<f64>) -> ChartSpec {
        ChartSpec {
            kind: ChartKind::Bar,
            data: ChartData {
                labels: values.iter().map(|v| v.to_string()).collect(),
                datasets: vec![Dataset {
                    data: values,
                    ..Default::default()
                }],
            },
            options: serde_json::json!({}),
        }
    }

    #[test]
    fn test_second_render_updates_existing_chart() {
        let backend = FakeBackend::default();
        let counters = backend.counters.clone();
        let registry = ChartRegistry::new(backend);

        assert_eq!(registry.render("load-chart", &spec(vec![1.0])), Ok(RenderOutcome::Created));
        assert_eq!(
            registry.render("load-chart", &spec(vec![2.0, 3.0])),
            Ok(RenderOutcome::Updated)
        );

        assert_eq!(counters.created.get(), 1);
        assert_eq!(counters.updated.get(), 1);
        assert_eq!(registry.len(), 1);

        let charts = registry.charts.borrow();
        let data = charts["load-chart"].data.borrow();
        assert_eq!(data.datasets[0].data, vec![2.0, 3.0]);
        assert_eq!(data.labels, vec!["2", "3"]);
    }

    #[test]
    fn test_charts_are_keyed_by_canvas() {
        let registry = ChartRegistry::new(FakeBackend::default());
        registry.render("a", &spec(vec![1.0])).unwrap();
        registry.render("b", &spec(vec![1.0])).unwrap();
        assert!(registry.contains("a"));
        assert!(registry.contains("b"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_failed_create_is_not_memoized() {
        let registry = ChartRegistry::new(FakeBackend {
            fail_create: true,
            ..Default::default()
        });
        assert_eq!(
            registry.render("missing", &spec(vec![1.0])),
            Err(ChartError::CanvasNotFound("missing".to_string()))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_destroy_all_then_render_creates_again() {
        let backend = FakeBackend::default();
        let counters = backend.counters.clone();
        let registry = ChartRegistry::new(backend);

        registry.render("a", &spec(vec![1.0])).unwrap();
        registry.render("b", &spec(vec![1.0])).unwrap();
        registry.destroy_all();
        assert_eq!(counters.destroyed.get(), 2);
        assert!(registry.is_empty());

        assert_eq!(registry.render("a", &spec(vec![1.0])), Ok(RenderOutcome::Created));
        assert_eq!(counters.created.get(), 3);
    }

    #[test]
    fn test_spec_serializes_to_chartjs_shape() {
        let json = serde_json::to_value(spec(vec![5.0])).unwrap();
        assert_eq!(json["type"], "bar");
        assert_eq!(json["data"]["datasets"][0]["data"][0], 5.0);
        assert!(json["data"]["datasets"][0].get("backgroundColor").is_none());
    }
}

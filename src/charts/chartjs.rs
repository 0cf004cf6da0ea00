//! Bindings to the global `Chart` constructor loaded from the Chart.js CDN.

use js_sys::{Array, Reflect};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::{ChartBackend, ChartData, ChartError, ChartSpec};

#[wasm_bindgen]
extern "C" {
    pub type Chart;

    #[wasm_bindgen(constructor, catch)]
    fn new(canvas: &web_sys::HtmlCanvasElement, config: &JsValue) -> Result<Chart, JsValue>;

    #[wasm_bindgen(method, getter)]
    fn data(this: &Chart) -> JsValue;

    #[wasm_bindgen(method)]
    fn update(this: &Chart);

    #[wasm_bindgen(method)]
    fn destroy(this: &Chart);
}

fn js_error(e: JsValue) -> ChartError {
    ChartError::Js(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Plain JS objects, not `Map`s, which is what Chart.js expects.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, ChartError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| ChartError::Config(e.to_string()))
}

fn set(target: &JsValue, key: &str, value: &JsValue) -> Result<(), ChartError> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(js_error)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChartJs;

impl ChartBackend for ChartJs {
    type Chart = Chart;

    fn create(&self, canvas_id: &str, spec: &ChartSpec) -> Result<Chart, ChartError> {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(canvas_id))
            .and_then(|el| el.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            .ok_or_else(|| ChartError::CanvasNotFound(canvas_id.to_string()))?;

        Chart::new(&canvas, &to_js(spec)?).map_err(js_error)
    }

    fn update(&self, chart: &Chart, data: &ChartData) -> Result<(), ChartError> {
        let current = chart.data();
        set(&current, "labels", &to_js(&data.labels)?)?;

        let datasets: Array = Reflect::get(&current, &JsValue::from_str("datasets"))
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;

        for (index, dataset) in data.datasets.iter().enumerate() {
            let target = datasets.get(index as u32);
            if target.is_undefined() {
                datasets.push(&to_js(dataset)?);
                continue;
            }
            set(&target, "data", &to_js(&dataset.data)?)?;
            if !dataset.background_color.is_empty() {
                set(&target, "backgroundColor", &to_js(&dataset.background_color)?)?;
            }
        }

        chart.update();
        Ok(())
    }

    fn destroy(&self, chart: Chart) {
        chart.destroy();
    }
}

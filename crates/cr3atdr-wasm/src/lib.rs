//! WASM bindings for the cr3atdr slicer.

use cr3atdr_gcode::{GcodeGenerator, GcodeOutput, PrintSettings};
use cr3atdr_slicer::{SliceAxis, TriangleMesh};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

/// Print settings for WASM.
#[derive(Debug, Clone, Default)]
#[wasm_bindgen]
pub struct WasmPrintSettings {
    inner: PrintSettings,
}

#[wasm_bindgen]
impl WasmPrintSettings {
    /// Create default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from JSON. Missing keys keep their defaults.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<WasmPrintSettings, JsError> {
        let inner = settings_from_json(json).map_err(js_err)?;
        Ok(Self { inner })
    }

    /// Convert to JSON.
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.inner).map_err(js_err)
    }

    /// Layer height (mm).
    #[wasm_bindgen(getter, js_name = layerHeight)]
    pub fn layer_height(&self) -> f64 {
        self.inner.layer_height
    }

    #[wasm_bindgen(setter, js_name = layerHeight)]
    pub fn set_layer_height(&mut self, value: f64) {
        self.inner.layer_height = value;
    }

    /// Nozzle temperature (°C).
    #[wasm_bindgen(getter, js_name = nozzleTemp)]
    pub fn nozzle_temp(&self) -> u32 {
        self.inner.nozzle_temp
    }

    #[wasm_bindgen(setter, js_name = nozzleTemp)]
    pub fn set_nozzle_temp(&mut self, value: u32) {
        self.inner.nozzle_temp = value;
    }

    /// Bed temperature (°C).
    #[wasm_bindgen(getter, js_name = bedTemp)]
    pub fn bed_temp(&self) -> u32 {
        self.inner.bed_temp
    }

    #[wasm_bindgen(setter, js_name = bedTemp)]
    pub fn set_bed_temp(&mut self, value: u32) {
        self.inner.bed_temp = value;
    }

    /// Slicing axis as `"x"`, `"y"` or `"z"`.
    #[wasm_bindgen(getter, js_name = sliceAxis)]
    pub fn slice_axis(&self) -> String {
        match self.inner.slice_axis {
            SliceAxis::X => "x",
            SliceAxis::Y => "y",
            SliceAxis::Z => "z",
        }
        .to_string()
    }

    /// Set the slicing axis. Browser scenes are Y-up, so they usually pass `"y"`.
    #[wasm_bindgen(js_name = setSliceAxis)]
    pub fn set_slice_axis(&mut self, axis: &str) -> Result<(), JsError> {
        self.inner.slice_axis = axis.parse().map_err(|e: String| JsError::new(&e))?;
        Ok(())
    }
}

/// G-code generation result for WASM.
#[wasm_bindgen]
pub struct WasmGcodeResult {
    inner: GcodeOutput,
}

#[wasm_bindgen]
impl WasmGcodeResult {
    /// The complete program.
    #[wasm_bindgen(getter)]
    pub fn gcode(&self) -> String {
        self.inner.gcode.clone()
    }

    /// Get number of layers.
    #[wasm_bindgen(getter, js_name = layerCount)]
    pub fn layer_count(&self) -> usize {
        self.inner.stats.layer_count
    }

    /// Get estimated print time in seconds.
    #[wasm_bindgen(getter, js_name = printTimeSeconds)]
    pub fn print_time_seconds(&self) -> f64 {
        self.inner.stats.print_time_seconds
    }

    /// Get filament usage in mm.
    #[wasm_bindgen(getter, js_name = filamentMm)]
    pub fn filament_mm(&self) -> f64 {
        self.inner.stats.filament_mm
    }

    /// Get filament weight in grams.
    #[wasm_bindgen(getter, js_name = filamentGrams)]
    pub fn filament_grams(&self) -> f64 {
        self.inner.stats.filament_grams
    }

    /// Get stats as JSON.
    #[wasm_bindgen(js_name = statsJson)]
    pub fn stats_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.inner.stats).map_err(js_err)
    }

    /// Slice plane heights, one per layer.
    #[wasm_bindgen(js_name = layerHeights)]
    pub fn layer_heights(&self) -> js_sys::Float64Array {
        let heights: Vec<f64> = self.inner.layers.iter().map(|l| l.z).collect();
        js_sys::Float64Array::from(heights.as_slice())
    }

    /// Get layer contours for preview.
    #[wasm_bindgen(js_name = getLayerPreview)]
    pub fn get_layer_preview(&self, layer_index: usize) -> Result<JsValue, JsError> {
        let preview = self
            .layer_preview(layer_index)
            .ok_or_else(|| JsError::new("layer index out of bounds"))?;
        serde_wasm_bindgen::to_value(&preview).map_err(js_err)
    }
}

impl WasmGcodeResult {
    fn layer_preview(&self, layer_index: usize) -> Option<LayerPreview> {
        let layer = self.inner.layers.get(layer_index)?;
        Some(LayerPreview {
            z: layer.z,
            index: layer.index,
            contours: layer
                .contours
                .iter()
                .map(|c| c.points.iter().map(|pt| [pt.x, pt.y]).collect())
                .collect(),
        })
    }
}

#[derive(Debug, Serialize)]
struct LayerPreview {
    z: f64,
    index: usize,
    contours: Vec<Vec<[f64; 2]>>,
}

fn settings_from_json(json: &str) -> Result<PrintSettings, String> {
    let settings: PrintSettings = serde_json::from_str(json).map_err(|e| e.to_string())?;
    settings.validate().map_err(|e| e.to_string())?;
    Ok(settings)
}

fn run(
    vertices: &[f32],
    indices: &[u32],
    settings: &PrintSettings,
) -> cr3atdr_gcode::Result<GcodeOutput> {
    let indices = (!indices.is_empty()).then(|| indices.to_vec());
    let mesh = TriangleMesh::from_parts(vertices.to_vec(), indices)?;
    GcodeGenerator::new(settings.clone())?.generate(&mesh)
}

/// Slice a mesh and generate G-code.
///
/// An empty `indices` array means every three consecutive vertices form a triangle.
#[wasm_bindgen(js_name = generateGcode)]
pub fn generate_gcode(
    vertices: &[f32],
    indices: &[u32],
    settings: &WasmPrintSettings,
) -> Result<WasmGcodeResult, JsError> {
    let inner = run(vertices, indices, &settings.inner).map_err(js_err)?;
    Ok(WasmGcodeResult { inner })
}

/// Default settings as JSON, for populating a settings form.
#[wasm_bindgen(js_name = defaultSettingsJson)]
pub fn default_settings_json() -> Result<String, JsError> {
    WasmPrintSettings::new().to_json()
}

//! Solver-ready seepage model document.
//!
//! This crate defines the declarative input document for a 2D groundwater
//! flow solver: soil polygons, hydraulic soil types, fixed-head boundary
//! conditions, an erosion pipe trajectory and mesh sizing. It also parses
//! solver results back. Running the solver itself is out of scope; the
//! document is exchanged as JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors for model validation and I/O.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Model without any soil polygon.
    #[error("model '{0}' has no soil layers")]
    NoLayers(String),

    /// Model without a pipe trajectory.
    #[error("model '{0}' has no pipe trajectory")]
    NoPipe(String),

    /// Model without a calculation mode.
    #[error("model '{0}' has no calculation mode")]
    NoCalculationMode(String),

    /// A layer polygon referencing a soil code that was never added.
    #[error("layer '{layer}' references unknown soil type '{code}'")]
    UnknownSoilCode {
        /// Label of the offending layer.
        layer: String,
        /// The missing soil code.
        code: String,
    },

    /// A layer polygon with fewer than three vertices.
    #[error("layer '{0}' has fewer than three vertices")]
    DegenerateLayer(String),

    /// JSON (de)serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// File I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// A vertex in the model plane. `x` is horizontal (m), `z` elevation (m).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPoint {
    /// Horizontal position (m).
    pub x: f64,
    /// Elevation (m).
    pub z: f64,
}

impl ModelPoint {
    /// Create a model vertex.
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// A hydraulic soil type entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilType {
    /// Short soil code, e.g. `"Kla"`.
    pub code: String,
    /// Horizontal hydraulic conductivity (m/day).
    pub k_hor: f64,
    /// Vertical hydraulic conductivity (m/day).
    pub k_ver: f64,
    /// Display color as `#rrggbb`.
    pub color: String,
}

/// One closed soil polygon, assigned a soil type by code.
///
/// The ring is stored without a closing duplicate vertex, wound clockwise,
/// starting at the top-left vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelLayer {
    /// Human-readable layer label.
    pub label: String,
    /// Code of the soil type this polygon is made of.
    pub soil_code: String,
    /// Polygon vertices.
    pub ring: Vec<ModelPoint>,
}

/// A fixed-head boundary condition along a polyline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCondition {
    /// Human-readable label, e.g. `"phi_ws"`.
    pub label: String,
    /// Prescribed hydraulic head (m).
    pub head: f64,
    /// The polyline the head applies to.
    pub points: Vec<ModelPoint>,
}

/// Direction the erosion pipe grows along its trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipeDirection {
    /// From the landward start toward the seaward end.
    RightToLeft,
    /// From the seaward start toward the landward end.
    LeftToRight,
}

/// The erosion pipe trajectory along the aquifer top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeTrajectory {
    /// Where erosion starts (ditch side).
    pub start: ModelPoint,
    /// Where the trajectory ends (entry-point side).
    pub end: ModelPoint,
    /// Representative grain size of the aquifer sand (µm).
    pub d70_um: f64,
    /// Growth direction.
    pub direction: PipeDirection,
    /// Mesh element size along the pipe (m).
    pub element_size: f64,
}

/// What the solver is asked to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationMode {
    /// Grow the pipe at the given heads and report its final length.
    PipeLength,
    /// Find the river head at which the pipe grows unboundedly.
    CriticalHead,
}

/// Finite-element mesh sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshProperties {
    /// Minimum element size (m).
    pub min_element_size: f64,
}

impl Default for MeshProperties {
    fn default() -> Self {
        Self {
            min_element_size: 2.0,
        }
    }
}

/// The assembled solver input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeepageModel {
    /// Scenario name the model was built for.
    pub name: String,
    /// Hydraulic soil types, in insertion order.
    pub soil_types: Vec<SoilType>,
    /// Soil polygons, top layer first.
    pub layers: Vec<ModelLayer>,
    /// Fixed-head boundary conditions.
    pub boundary_conditions: Vec<BoundaryCondition>,
    /// Erosion pipe trajectory.
    pub pipe: Option<PipeTrajectory>,
    /// Mesh sizing.
    pub mesh: MeshProperties,
    /// Requested calculation.
    pub calculation_mode: Option<CalculationMode>,
}

impl SeepageModel {
    /// Create an empty model for the named scenario.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            soil_types: Vec::new(),
            layers: Vec::new(),
            boundary_conditions: Vec::new(),
            pipe: None,
            mesh: MeshProperties::default(),
            calculation_mode: None,
        }
    }

    /// Add a hydraulic soil type.
    pub fn add_soil_type(&mut self, soil: SoilType) {
        self.soil_types.push(soil);
    }

    /// Whether a soil type with this code was added.
    pub fn has_soil_type(&self, code: &str) -> bool {
        self.soil_types.iter().any(|s| s.code == code)
    }

    /// Add a soil polygon.
    pub fn add_layer(&mut self, layer: ModelLayer) {
        self.layers.push(layer);
    }

    /// Add a fixed-head boundary condition.
    pub fn add_boundary_condition(&mut self, bc: BoundaryCondition) {
        self.boundary_conditions.push(bc);
    }

    /// Set the erosion pipe trajectory.
    pub fn set_pipe_trajectory(&mut self, pipe: PipeTrajectory) {
        self.pipe = Some(pipe);
    }

    /// Set the mesh sizing.
    pub fn set_mesh_properties(&mut self, mesh: MeshProperties) {
        self.mesh = mesh;
    }

    /// Set the requested calculation.
    pub fn set_calculation_mode(&mut self, mode: CalculationMode) {
        self.calculation_mode = Some(mode);
    }

    /// Number of soil types added.
    pub fn soil_type_count(&self) -> usize {
        self.soil_types.len()
    }

    /// Number of soil polygons added.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of boundary conditions added.
    pub fn boundary_count(&self) -> usize {
        self.boundary_conditions.len()
    }

    /// Check the document is complete and internally consistent: at least
    /// one layer, every layer a proper polygon with a known soil code, a
    /// pipe trajectory and a calculation mode.
    pub fn validate(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(ModelError::NoLayers(self.name.clone()));
        }
        for layer in &self.layers {
            if layer.ring.len() < 3 {
                return Err(ModelError::DegenerateLayer(layer.label.clone()));
            }
            if !self.has_soil_type(&layer.soil_code) {
                return Err(ModelError::UnknownSoilCode {
                    layer: layer.label.clone(),
                    code: layer.soil_code.clone(),
                });
            }
        }
        if self.pipe.is_none() {
            return Err(ModelError::NoPipe(self.name.clone()));
        }
        if self.calculation_mode.is_none() {
            return Err(ModelError::NoCalculationMode(self.name.clone()));
        }
        Ok(())
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Write the document to a JSON file.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a document from a JSON file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}

/// Parsed results of an external solver run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOutput {
    /// Name of the scenario the result belongs to, when the solver echoes it.
    #[serde(default)]
    pub scenario: Option<String>,
    /// Final erosion pipe length (m), the primary assessment output.
    pub pipe_length: f64,
}

impl SolverOutput {
    /// Parse a solver result from its JSON representation.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read a solver result file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&json)?)
    }
}

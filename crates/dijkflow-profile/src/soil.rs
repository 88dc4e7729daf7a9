//! Borehole soil profiles.
//!
//! A soil profile is a contiguous stack of layers ordered top-down. Layer
//! soil names come from the borehole log as `CODE_description` strings; the
//! code before the first underscore keys the hydraulic parameter table.

use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, Result};

/// One soil layer in a borehole profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    /// Full soil name from the borehole log, e.g. `"Kla_zware klei"`.
    pub soil_name: String,
    /// Top elevation (m).
    pub top: f64,
    /// Bottom elevation (m).
    pub bottom: f64,
    /// Aquifer flag; the layer is the designated aquifer of a profile when
    /// this equals the profile's aquifer number.
    pub is_aquifer: i32,
}

impl SoilLayer {
    /// Creates a layer, rejecting an inverted elevation range.
    pub fn new(soil_name: impl Into<String>, top: f64, bottom: f64, is_aquifer: i32) -> Result<Self> {
        let soil_name = soil_name.into();
        if top < bottom {
            return Err(ProfileError::InvertedLayer {
                name: soil_name,
                top,
                bottom,
            });
        }
        Ok(Self {
            soil_name,
            top,
            bottom,
            is_aquifer,
        })
    }

    /// The soil code before the first underscore, used to look up hydraulic
    /// parameters. A name without underscore is its own code.
    pub fn short_name(&self) -> &str {
        self.soil_name
            .split('_')
            .next()
            .unwrap_or(&self.soil_name)
    }

    /// Layer thickness (m).
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// A borehole soil profile: contiguous layers ordered top-down.
///
/// Layers are assumed contiguous (each layer's bottom is the next layer's
/// top); the z-coordinate walks below rely on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    /// Upstream identifier of the borehole profile.
    pub id: i64,
    /// Layers, shallowest first.
    pub soillayers: Vec<SoilLayer>,
    /// Which `is_aquifer` value marks the designated aquifer.
    pub aquifer_number: i32,
}

impl SoilProfile {
    /// Creates a profile from top-down layers.
    pub fn new(id: i64, soillayers: Vec<SoilLayer>, aquifer_number: i32) -> Self {
        Self {
            id,
            soillayers,
            aquifer_number,
        }
    }

    /// Top elevation of the shallowest layer.
    pub fn top(&self) -> Result<f64> {
        self.soillayers
            .first()
            .map(|l| l.top)
            .ok_or(ProfileError::EmptySoilProfile(self.id))
    }

    /// Bottom elevation of the deepest layer.
    pub fn bottom(&self) -> Result<f64> {
        self.soillayers
            .last()
            .map(|l| l.bottom)
            .ok_or(ProfileError::EmptySoilProfile(self.id))
    }

    /// The designated aquifer: the first layer whose `is_aquifer` flag
    /// equals the profile's aquifer number.
    pub fn aquifer(&self) -> Option<&SoilLayer> {
        self.soillayers
            .iter()
            .find(|l| l.is_aquifer == self.aquifer_number)
    }

    /// First layer whose top lies strictly below `z` and whose soil name
    /// contains `marker` (case-insensitive).
    ///
    /// Name-based heuristic kept alongside the flag-based lookup so
    /// divergence between the two can be reported.
    pub fn first_aquifer_below(&self, z: f64, marker: &str) -> Option<&SoilLayer> {
        let marker = marker.to_lowercase();
        self.soillayers
            .iter()
            .find(|l| l.top < z && l.soil_name.to_lowercase().contains(&marker))
    }

    /// All layer boundary elevations, ascending: the profile bottom, every
    /// internal boundary, and the profile top.
    ///
    /// One value per layer bottom plus the overall top, so the list is one
    /// longer than the layer count.
    pub fn soillayer_z_coordinates(&self) -> Result<Vec<f64>> {
        let top = self.top()?;
        let mut zs: Vec<f64> = self.soillayers.iter().rev().map(|l| l.bottom).collect();
        zs.push(top);
        Ok(zs)
    }

    /// Boundary elevations for the river-side head line: ascending from the
    /// profile bottom, stopping at (and including) the designated aquifer's
    /// top.
    ///
    /// `None` when the profile has no designated aquifer.
    pub fn entry_head_z_coordinates(&self) -> Option<Vec<f64>> {
        let mut zs = Vec::with_capacity(self.soillayers.len() + 1);
        for layer in self.soillayers.iter().rev() {
            zs.push(layer.bottom);
            if layer.is_aquifer == self.aquifer_number {
                zs.push(layer.top);
                return Some(zs);
            }
        }
        None
    }

    /// Removes everything above elevation `z`.
    ///
    /// Layers entirely above `z` are dropped; a layer straddling `z` keeps
    /// its identity with its top clamped to `z`; layers at or below `z` are
    /// untouched. Cutting below the profile empties it.
    pub fn cut_top_at_z(&mut self, z: f64) {
        let mut kept = Vec::with_capacity(self.soillayers.len());
        for layer in &self.soillayers {
            if layer.top <= z {
                kept.push(layer.clone());
            } else if layer.bottom < z {
                let mut clamped = layer.clone();
                clamped.top = z;
                kept.push(clamped);
            }
            // layer.bottom >= z: entirely above the cut, dropped
        }
        self.soillayers = kept;
    }
}

// ====== tests ======

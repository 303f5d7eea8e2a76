// Weight-to-color mapping and the seam towards map renderers

use crate::cluster::Marker;
use crate::edges::Edge;
use crate::record::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.0, self.1, self.2)
    }
}

/// Linear per-channel gradient between the colors at weight 0 and weight 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gradient {
    pub low: Rgb,
    pub high: Rgb,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            low: Rgb(255, 0, 0),
            high: Rgb(0, 0, 0),
        }
    }
}

impl Gradient {
    /// Weights outside [0, 1] are clamped; NaN maps to the low color.
    pub fn color_for(&self, weight: f64) -> Rgb {
        let w = if weight.is_nan() { 0.0 } else { weight.clamp(0.0, 1.0) };
        Rgb(
            lerp(self.low.0, self.high.0, w),
            lerp(self.low.1, self.high.1, w),
            lerp(self.low.2, self.high.2, w),
        )
    }
}

fn lerp(low: u8, high: u8, w: f64) -> u8 {
    let value = f64::from(low) + w * (f64::from(high) - f64::from(low));
    value.round().clamp(0.0, 255.0) as u8
}

/// Color on the default red-to-black gradient.
pub fn color_for(weight: f64) -> Rgb {
    Gradient::default().color_for(weight)
}

/// The marker with the smallest summed degree-space distance to all other
/// markers. Ties resolve to the earliest marker.
pub fn center_point(markers: &[Marker]) -> Option<Coordinate> {
    markers
        .iter()
        .map(|candidate| {
            let total: f64 = markers
                .iter()
                .map(|other| candidate.coordinate.planar_distance(&other.coordinate))
                .sum();
            (candidate.coordinate, total)
        })
        .fold(None, |best: Option<(Coordinate, f64)>, (coord, total)| match best {
            Some((_, best_total)) if best_total <= total => best,
            _ => Some((coord, total)),
        })
        .map(|(coord, _)| coord)
}

/// Visual parameters handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneStyle {
    pub gradient: Gradient,
    /// Initial zoom level, web-map convention (0 shows the whole world)
    pub zoom: u8,
    pub marker_radius: f64,
    pub marker_opacity: f64,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            gradient: Gradient::default(),
            zoom: 4,
            marker_radius: 6.0,
            marker_opacity: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub position: Coordinate,
    pub color: Rgb,
    pub opacity: f64,
    pub radius: f64,
    pub tooltip: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView {
    pub from: Coordinate,
    pub to: Coordinate,
    pub color: Rgb,
    pub tooltip: String,
    pub weight: f64,
}

/// Receives a scene. Implemented by map backends and exporters.
pub trait Renderer {
    fn set_view(&mut self, center: Coordinate, zoom: u8);
    fn draw_edge(&mut self, edge: &EdgeView);
    fn draw_marker(&mut self, marker: &MarkerView);
}

/// Everything a renderer needs: styled markers and edges plus the initial view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub center: Option<Coordinate>,
    pub zoom: u8,
    pub markers: Vec<MarkerView>,
    pub edges: Vec<EdgeView>,
}

impl Scene {
    pub fn build(markers: &[Marker], edges: &[Edge], style: &SceneStyle) -> Self {
        let marker_views = markers
            .iter()
            .map(|m| MarkerView {
                position: m.coordinate,
                color: style.gradient.color_for(m.weight),
                opacity: style.marker_opacity,
                radius: style.marker_radius,
                tooltip: m.title.clone(),
                weight: m.weight,
            })
            .collect();

        let edge_views = edges
            .iter()
            .map(|e| EdgeView {
                from: e.source.coordinate,
                to: e.target.coordinate,
                color: style.gradient.color_for(e.weight()),
                tooltip: e.title(),
                weight: e.weight(),
            })
            .collect();

        Self {
            center: center_point(markers),
            zoom: style.zoom,
            markers: marker_views,
            edges: edge_views,
        }
    }

    /// Edges are drawn before markers so pins stay on top.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        if let Some(center) = self.center {
            renderer.set_view(center, self.zoom);
        }
        for edge in &self.edges {
            renderer.draw_edge(edge);
        }
        for marker in &self.markers {
            renderer.draw_marker(marker);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

// World map canvas for the map page

use kinmap_core::presentation::{EdgeView, MarkerView, Renderer, Rgb};
use kinmap_core::record::Coordinate;
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::canvas::{Circle, Context, Line as CanvasLine};

pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 12;

/// Light paper tone so the dark end of the gradient stays visible
pub const MAP_BACKGROUND: Rgb = Rgb(235, 232, 220);

/// Visible region, centered on `center`. At zoom 0 the full 360 degrees of
/// longitude are visible; every zoom step halves the span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Coordinate,
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: Coordinate::new(0.0, 0.0),
            zoom: MIN_ZOOM,
        }
    }
}

impl Viewport {
    pub fn new(center: Coordinate, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    pub fn lon_span(&self) -> f64 {
        360.0 / f64::from(1u32 << self.zoom)
    }

    pub fn lat_span(&self) -> f64 {
        self.lon_span() / 2.0
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        let half = self.lon_span() / 2.0;
        [self.center.longitude - half, self.center.longitude + half]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        let half = self.lat_span() / 2.0;
        [self.center.latitude - half, self.center.latitude + half]
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    /// Move by a fraction of the visible span.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let lon = self.center.longitude + dx * self.lon_span();
        let lat = self.center.latitude + dy * self.lat_span();
        self.center = Coordinate::new(lat.clamp(-90.0, 90.0), lon.clamp(-180.0, 180.0));
    }
}

/// Draws scene elements onto a ratatui canvas.
pub struct CanvasPainter<'p, 'a> {
    pub ctx: &'p mut Context<'a>,
    /// Canvas degrees per braille dot, used to size marker circles
    pub degrees_per_dot: f64,
    pub selected: Option<Coordinate>,
}

impl Renderer for CanvasPainter<'_, '_> {
    fn set_view(&mut self, center: Coordinate, _zoom: u8) {
        self.ctx.print(
            center.longitude,
            center.latitude,
            Span::styled("+", Style::default().fg(Color::DarkGray)),
        );
    }

    fn draw_edge(&mut self, edge: &EdgeView) {
        self.ctx.draw(&CanvasLine::new(
            edge.from.longitude,
            edge.from.latitude,
            edge.to.longitude,
            edge.to.latitude,
            to_color(edge.color, 1.0),
        ));
    }

    fn draw_marker(&mut self, marker: &MarkerView) {
        let is_selected = self.selected == Some(marker.position);
        let color = if is_selected {
            Color::Blue
        } else {
            to_color(marker.color, marker.opacity)
        };
        let radius = marker.radius * self.degrees_per_dot * if is_selected { 1.5 } else { 1.0 };

        self.ctx.draw(&Circle {
            x: marker.position.longitude,
            y: marker.position.latitude,
            radius,
            color,
        });

        if is_selected && let Some(label) = marker.tooltip.lines().next() {
            self.ctx.print(
                marker.position.longitude,
                marker.position.latitude,
                Span::styled(
                    label.trim_end().to_string(),
                    Style::default().fg(Color::Blue).bg(Color::Yellow),
                ),
            );
        }
    }
}

/// Terminal color for a scene color blended over the map background.
pub fn to_color(rgb: Rgb, opacity: f64) -> Color {
    let alpha = opacity.clamp(0.0, 1.0);
    let blend = |c: u8, bg: u8| (f64::from(c) * alpha + f64::from(bg) * (1.0 - alpha)).round() as u8;
    Color::Rgb(
        blend(rgb.0, MAP_BACKGROUND.0),
        blend(rgb.1, MAP_BACKGROUND.1),
        blend(rgb.2, MAP_BACKGROUND.2),
    )
}

pub fn background() -> Color {
    Color::Rgb(MAP_BACKGROUND.0, MAP_BACKGROUND.1, MAP_BACKGROUND.2)
}

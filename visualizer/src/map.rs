use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Point, Rectangle, Renderer, Theme,
};
use pgcore::map::{MapView, TILE_SIZE};

/// Marker overlay drawn on top of the center tile.
///
/// When the tile could not be fetched the overlay paints its own backdrop so
/// the marker stays visible on an otherwise blank map.
#[derive(Clone)]
pub struct MarkerOverlay {
    pixel: Option<(f32, f32)>,
    color: Color,
    backdrop: bool,
}

impl MarkerOverlay {
    pub fn new(map: Option<&MapView>, tile_loaded: bool) -> Self {
        let pixel = map.map(|view| {
            (
                view.center_tile.pixel_x as f32,
                view.center_tile.pixel_y as f32,
            )
        });
        let color = map
            .map(|view| marker_color(&view.marker.icon.color))
            .unwrap_or(Color::from_rgb(0.85, 0.2, 0.2));
        Self {
            pixel,
            color,
            backdrop: !tile_loaded,
        }
    }
}

pub fn marker_color(name: &str) -> Color {
    match name {
        "red" => Color::from_rgb(0.85, 0.2, 0.2),
        "blue" => Color::from_rgb(0.2, 0.4, 0.85),
        "green" => Color::from_rgb(0.2, 0.65, 0.3),
        _ => Color::from_rgb(0.95, 0.55, 0.2),
    }
}

impl<Message> canvas::Program<Message> for MarkerOverlay {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        if self.backdrop {
            frame.fill_rectangle(
                Point::ORIGIN,
                bounds.size(),
                Color::from_rgb(0.9, 0.91, 0.93),
            );
            let grid = Path::new(|builder| {
                for step in 1..4 {
                    let offset = step as f32 * bounds.width / 4.0;
                    builder.move_to(Point::new(offset, 0.0));
                    builder.line_to(Point::new(offset, bounds.height));
                    let offset = step as f32 * bounds.height / 4.0;
                    builder.move_to(Point::new(0.0, offset));
                    builder.line_to(Point::new(bounds.width, offset));
                }
            });
            frame.stroke(
                &grid,
                Stroke::default()
                    .with_color(Color::from_rgb(0.8, 0.81, 0.84))
                    .with_width(1.0),
            );
        }

        if let Some((px, py)) = self.pixel {
            let scale = bounds.width / TILE_SIZE as f32;
            let center = Point::new(px * scale, py * scale);
            let outline = Path::new(|builder| builder.circle(center, 9.0));
            frame.fill(&outline, Color::WHITE);
            let marker = Path::new(|builder| builder.circle(center, 7.0));
            frame.fill(&marker, self.color);
            let dot = Path::new(|builder| builder.circle(center, 2.0));
            frame.fill(&dot, Color::WHITE);
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgcore::map::MapSettings;
    use pgcore::session::{Coordinate, ViewState, LOCATION_PLACEHOLDER};

    #[test]
    fn overlay_follows_center_tile_pixel() {
        let view = ViewState::new(Coordinate::default(), LOCATION_PLACEHOLDER);
        let map = MapView::render(&view, &MapSettings::default());
        let overlay = MarkerOverlay::new(Some(&map), true);
        let (px, py) = overlay.pixel.unwrap();
        assert!((px - map.center_tile.pixel_x as f32).abs() < 1e-3);
        assert!((py - map.center_tile.pixel_y as f32).abs() < 1e-3);
        assert_eq!(overlay.color, marker_color("red"));
        assert!(!overlay.backdrop);
    }

    #[test]
    fn overlay_without_session_only_paints_backdrop() {
        let overlay = MarkerOverlay::new(None, false);
        assert!(overlay.pixel.is_none());
        assert!(overlay.backdrop);
    }
}

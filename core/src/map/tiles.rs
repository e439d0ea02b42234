use crate::session::Coordinate;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Edge length of a slippy-map tile in pixels.
pub const TILE_SIZE: f64 = 256.0;
/// Latitude limit of the Web Mercator projection.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;
/// Deepest zoom served by the OSM tile layer.
pub const MAX_ZOOM: u8 = 19;
pub const OSM_TILE_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Tile containing a point, plus the point's pixel position inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileIndex {
    pub zoom: u8,
    pub x: u32,
    pub y: u32,
    pub pixel_x: f64,
    pub pixel_y: f64,
}

impl TileIndex {
    /// Zoom levels past [`MAX_ZOOM`] are addressed at `MAX_ZOOM`.
    pub fn containing(coordinate: Coordinate, zoom: u8) -> Self {
        let zoom = zoom.min(MAX_ZOOM);
        let n = f64::from(1u32 << u32::from(zoom));
        let lat = coordinate
            .latitude()
            .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
            .to_radians();

        let fx = (coordinate.longitude() + 180.0) / 360.0 * n;
        let fy = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n;

        let max_index = n - 1.0;
        let tx = fx.floor().clamp(0.0, max_index);
        let ty = fy.floor().clamp(0.0, max_index);

        Self {
            zoom,
            x: tx as u32,
            y: ty as u32,
            pixel_x: ((fx - tx) * TILE_SIZE).clamp(0.0, TILE_SIZE),
            pixel_y: ((fy - ty) * TILE_SIZE).clamp(0.0, TILE_SIZE),
        }
    }

    /// Expands a `{z}/{x}/{y}` template.
    pub fn url(&self, template: &str) -> String {
        template
            .replace("{z}", &self.zoom.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_lands_on_tile_corner() {
        let tile = TileIndex::containing(Coordinate::new(0.0, 0.0).unwrap(), 1);
        assert_eq!((tile.x, tile.y), (1, 1));
        assert!(tile.pixel_x.abs() < 1e-9);
        assert!(tile.pixel_y.abs() < 1e-9);
    }

    #[test]
    fn lima_at_street_zoom() {
        let tile = TileIndex::containing(Coordinate::default(), 15);
        assert_eq!((tile.x, tile.y), (9371, 17488));
        assert!((tile.pixel_x - 102.147).abs() < 0.01);
        assert!((tile.pixel_y - 105.396).abs() < 0.01);
        assert_eq!(
            tile.url(OSM_TILE_TEMPLATE),
            "https://tile.openstreetmap.org/15/9371/17488.png"
        );
    }

    #[test]
    fn extreme_coordinates_stay_inside_the_grid() {
        let corner = TileIndex::containing(Coordinate::new(90.0, 180.0).unwrap(), 3);
        assert_eq!((corner.x, corner.y), (7, 0));

        let south = TileIndex::containing(Coordinate::new(-90.0, -180.0).unwrap(), 3);
        assert_eq!((south.x, south.y), (0, 7));
    }

    #[test]
    fn zoom_past_the_layer_limit_keeps_url_and_indices_consistent() {
        let deep = TileIndex::containing(Coordinate::default(), 31);
        let capped = TileIndex::containing(Coordinate::default(), MAX_ZOOM);
        assert_eq!(deep, capped);
        assert!(deep.url(OSM_TILE_TEMPLATE).contains("/19/"));
    }
}

use crate::map::tiles::{TileIndex, MAX_ZOOM, OSM_TILE_TEMPLATE};
use crate::prelude::{DashboardError, DashboardResult};
use crate::session::{Coordinate, ViewState};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ZOOM: u8 = 15;
pub const MARKER_POPUP: &str = "Punto Personalizado";
pub const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Base layer settings shared by every map render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub width: u32,
    pub height: u32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            tile_url: OSM_TILE_TEMPLATE.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            width: 400,
            height: 300,
        }
    }
}

impl MapSettings {
    pub fn validate(&self) -> DashboardResult<()> {
        if self.zoom > MAX_ZOOM {
            return Err(DashboardError::InvalidZoom {
                zoom: self.zoom,
                max: MAX_ZOOM,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub color: String,
    pub glyph: String,
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            color: "red".into(),
            glyph: "info-sign".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Coordinate,
    pub popup: String,
    pub icon: MarkerIcon,
}

/// Everything a frontend needs to draw the map panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub width: u32,
    pub height: u32,
    pub marker: Marker,
    pub center_tile: TileIndex,
    pub caption: String,
}

impl MapView {
    /// Pure read of the view state; the same input always yields the same view.
    pub fn render(view: &ViewState, settings: &MapSettings) -> Self {
        let center = view.coordinate();
        Self {
            center,
            zoom: settings.zoom.min(MAX_ZOOM),
            tile_url: settings.tile_url.clone(),
            attribution: settings.attribution.clone(),
            width: settings.width,
            height: settings.height,
            marker: Marker {
                position: center,
                popup: MARKER_POPUP.into(),
                icon: MarkerIcon::default(),
            },
            center_tile: TileIndex::containing(center, settings.zoom),
            caption: center.to_string(),
        }
    }

    pub fn center_tile_url(&self) -> String {
        self.center_tile.url(&self.tile_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_sits_exactly_on_the_session_coordinate() {
        let coordinate = Coordinate::new(-13.163_068_123_456, -72.545_128_987_654).unwrap();
        let view = ViewState::new(coordinate, "Cusco");
        let map = MapView::render(&view, &MapSettings::default());

        assert_eq!(map.marker.position, coordinate);
        assert_eq!(map.center, coordinate);
        assert_eq!(
            map.marker.position.latitude().to_bits(),
            coordinate.latitude().to_bits()
        );
        assert_eq!(map.marker.popup, MARKER_POPUP);
        assert_eq!(map.zoom, DEFAULT_ZOOM);
    }

    #[test]
    fn render_is_idempotent() {
        let view = ViewState::default();
        let settings = MapSettings::default();
        assert_eq!(
            MapView::render(&view, &settings),
            MapView::render(&view, &settings)
        );
    }

    #[test]
    fn center_tile_url_uses_settings_template() {
        let settings = MapSettings {
            tile_url: "https://tiles.example.com/{z}/{x}/{y}.png".into(),
            ..MapSettings::default()
        };
        let map = MapView::render(&ViewState::default(), &settings);
        assert_eq!(
            map.center_tile_url(),
            "https://tiles.example.com/15/9371/17488.png"
        );
    }

    #[test]
    fn settings_reject_zoom_past_tile_layer() {
        assert!(MapSettings::default().validate().is_ok());
        let deep = MapSettings {
            zoom: 31,
            ..MapSettings::default()
        };
        assert_eq!(
            deep.validate(),
            Err(DashboardError::InvalidZoom { zoom: 31, max: MAX_ZOOM })
        );
    }
}

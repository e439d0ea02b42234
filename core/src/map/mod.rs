pub mod tiles;
pub mod view;

pub use tiles::{TileIndex, MAX_ZOOM, OSM_TILE_TEMPLATE, TILE_SIZE};
pub use view::{MapSettings, MapView, Marker, MarkerIcon, DEFAULT_ZOOM, MARKER_POPUP};

use anyhow::Context;
use pgcore::map::MapSettings;
use pgcore::session::{Coordinate, ViewState, LOCATION_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub bind: SocketAddr,
    pub coordinate: Coordinate,
    pub location_label: String,
    pub map: MapSettings,
    pub report_path: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
            coordinate: Coordinate::default(),
            location_label: LOCATION_PLACEHOLDER.to_string(),
            map: MapSettings::default(),
            report_path: PathBuf::from("tools/data/offline_results.log"),
        }
    }
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading dashboard config {}", path_ref.display()))?;
        let config: DashboardConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing dashboard config {}", path_ref.display()))?;
        config
            .map
            .validate()
            .with_context(|| format!("validating dashboard config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(bind: Option<SocketAddr>) -> Self {
        Self::default().with_bind(bind)
    }

    pub fn with_bind(mut self, bind: Option<SocketAddr>) -> Self {
        if let Some(bind) = bind {
            self.bind = bind;
        }
        self
    }

    pub fn to_view_state(&self) -> ViewState {
        ViewState::new(self.coordinate, self.location_label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_keeps_defaults() {
        let cfg = DashboardConfig::from_args(None);
        assert_eq!(cfg.bind, default_bind_address());
        assert_eq!(cfg.map.zoom, 15);
        assert_eq!(cfg.to_view_state().location_label(), LOCATION_PLACEHOLDER);

        let moved = DashboardConfig::from_args(Some("0.0.0.0:8080".parse().unwrap()));
        assert_eq!(moved.bind.port(), 8080);
    }

    #[test]
    fn config_load_reads_partial_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"bind: 0.0.0.0:8088\ncoordinate:\n  latitude: -13.5\n  longitude: -71.97\nmap:\n  zoom: 12\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = DashboardConfig::load(&path).unwrap();
        assert_eq!(cfg.bind.port(), 8088);
        assert_eq!(cfg.coordinate.latitude(), -13.5);
        assert_eq!(cfg.map.zoom, 12);
        assert_eq!(cfg.map.width, 400);
        assert_eq!(cfg.location_label, LOCATION_PLACEHOLDER);
    }

    #[test]
    fn config_load_rejects_invalid_coordinate() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"coordinate:\n  latitude: 95.0\n  longitude: 0.0\n")
            .unwrap();
        let path = temp.into_temp_path();
        assert!(DashboardConfig::load(&path).is_err());
    }

    #[test]
    fn config_load_rejects_zoom_past_tile_layer() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"map:\n  zoom: 31\n").unwrap();
        let path = temp.into_temp_path();
        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("zoom 31"));
    }
}

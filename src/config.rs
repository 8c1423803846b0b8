/// Initial map view and base tile layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub element_id: &'static str,
    pub center: (f64, f64),
    pub zoom: u8,
    pub tile_url: &'static str,
    pub max_zoom: u8,
    pub attribution: &'static str,
}

impl Default for MapConfig {
    fn default() -> Self {
        // UC San Diego
        Self {
            element_id: "map",
            center: (32.8801, -117.2340),
            zoom: 15,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            max_zoom: 19,
            attribution: "© OpenStreetMap contributors",
        }
    }
}

/// Rendering options handed to `GeoRasterLayer`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub opacity: f64,
    pub resolution: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            opacity: 0.7,
            resolution: 256,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub list_devices: &'static str,
    pub device: &'static str,
    pub upload_geotiff: &'static str,
    pub export_geojson: &'static str,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            list_devices: "/list_devices",
            device: "/device",
            upload_geotiff: "/upload_geotiff",
            export_geojson: "/export_geojson",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    pub map: MapConfig,
    pub overlay: OverlayStyle,
    pub endpoints: Endpoints,
}

/// Form field carrying the selected port on `POST /device`.
pub const DEVICE_FIELD: &str = "device";

pub const LOG_LEVEL: log::Level = if cfg!(debug_assertions) {
    log::Level::Debug
} else {
    log::Level::Info
};

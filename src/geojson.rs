use serde::{Deserialize, Serialize};

/// Position of the placeholder point, in the order the backend stores it.
pub const PLACEHOLDER_COORDINATES: [f64; 2] = [32.8801, -117.2340];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl FeatureCollection {
    pub fn placeholder() -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features: vec![Feature {
                kind: "Feature".to_string(),
                geometry: Geometry {
                    kind: "Point".to_string(),
                    coordinates: PLACEHOLDER_COORDINATES,
                },
            }],
        }
    }
}

/// Body of `POST /export_geojson`: the collection travels as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub geojson: String,
}

impl ExportRequest {
    pub fn placeholder() -> Result<Self, serde_json::Error> {
        Ok(Self {
            geojson: serde_json::to_string(&FeatureCollection::placeholder())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn placeholder_serializes_to_single_point_collection() {
        let value = serde_json::to_value(FeatureCollection::placeholder()).unwrap();
        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["features"].as_array().unwrap().len(), 1);
        let geometry = &value["features"][0]["geometry"];
        assert_eq!(geometry["type"], "Point");
        assert_eq!(geometry["coordinates"][0].as_f64(), Some(32.8801));
        assert_eq!(geometry["coordinates"][1].as_f64(), Some(-117.2340));
    }

    #[test]
    fn export_request_wraps_collection_as_string() {
        let request = ExportRequest::placeholder().unwrap();
        let body: Value = serde_json::to_value(&request).unwrap();
        let inner = body["geojson"].as_str().unwrap();
        let parsed: FeatureCollection = serde_json::from_str(inner).unwrap();
        assert_eq!(parsed, FeatureCollection::placeholder());
    }
}

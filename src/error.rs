use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no device selected")]
    NoDeviceSelected,
    #[error("request failed: {0}")]
    Network(#[from] gloo_net::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Server(String),
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
    #[error("raster parse failed: {0}")]
    Raster(String),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for AppError {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(text) => AppError::Js(text),
            None => AppError::Js(format!("{:?}", value)),
        }
    }
}

/// Which stage of the raster pipeline gave up.
#[derive(Debug, Error)]
pub enum UploadFailure {
    /// The upload endpoint answered with an `error` field.
    #[error("server rejected upload: {0}")]
    Rejected(String),
    #[error("upload request failed: {0}")]
    Upload(#[source] AppError),
    /// Fetching, parsing or attaching the raster failed.
    #[error("raster load failed: {0}")]
    Load(#[source] AppError),
}

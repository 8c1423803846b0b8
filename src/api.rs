use crate::config::{Endpoints, DEVICE_FIELD};
use crate::error::AppError;
use crate::geojson::ExportRequest;
use gloo_net::http::Request;
use serde::Deserialize;
use web_sys::FormData;

pub const PLACEHOLDER_LABEL: &str = "Select a device...";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceDescriptor {
    pub port: String,
    pub description: String,
    #[serde(default)]
    pub hwid: Option<String>,
}

impl DeviceDescriptor {
    pub fn label(&self) -> String {
        format!("{} - {}", self.port, self.description)
    }
}

/// One `<option>` of the device selector.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceOption {
    pub value: String,
    pub label: String,
    pub title: Option<String>,
}

impl DeviceOption {
    pub fn placeholder() -> Self {
        Self {
            value: String::new(),
            label: PLACEHOLDER_LABEL.to_string(),
            title: None,
        }
    }
}

/// Selector contents for a device list, placeholder first.
pub fn device_options(devices: &[DeviceDescriptor]) -> Vec<DeviceOption> {
    std::iter::once(DeviceOption::placeholder())
        .chain(devices.iter().map(|device| DeviceOption {
            value: device.port.clone(),
            label: device.label(),
            title: device.hwid.clone(),
        }))
        .collect()
}

/// `{message}` or `{error}` reply of `/device` and `/export_geojson`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerReply {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ServerReply {
    pub fn into_message(self) -> Result<String, AppError> {
        if let Some(error) = self.error {
            return Err(AppError::Server(error));
        }
        self.message.ok_or(AppError::MissingField("message"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UploadReply {
    pub message: Option<String>,
    pub file_path: Option<String>,
    pub error: Option<String>,
}

/// The HTTP backend the page talks to.
#[allow(async_fn_in_trait)]
pub trait Backend {
    /// Multipart body of an upload.
    type Form;

    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, AppError>;
    async fn connect_device(&self, port: &str) -> Result<ServerReply, AppError>;
    async fn upload_geotiff(&self, form: Self::Form) -> Result<UploadReply, AppError>;
    async fn fetch_raster(&self, path: &str) -> Result<Vec<u8>, AppError>;
    async fn export_geojson(&self, body: &ExportRequest) -> Result<ServerReply, AppError>;
}

/// `Backend` over the browser fetch API. Bodies are decoded regardless of
/// status since `/device` reports its error with a 404.
#[derive(Debug, Clone, Default)]
pub struct HttpBackend {
    endpoints: Endpoints,
}

impl HttpBackend {
    pub fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }
}

impl Backend for HttpBackend {
    type Form = FormData;

    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, AppError> {
        let response = Request::get(self.endpoints.list_devices).send().await?;
        Ok(response.json::<Vec<DeviceDescriptor>>().await?)
    }

    async fn connect_device(&self, port: &str) -> Result<ServerReply, AppError> {
        let form = FormData::new()?;
        form.append_with_str(DEVICE_FIELD, port)?;
        let response = Request::post(self.endpoints.device)
            .body(form)?
            .send()
            .await?;
        Ok(response.json::<ServerReply>().await?)
    }

    async fn upload_geotiff(&self, form: FormData) -> Result<UploadReply, AppError> {
        let response = Request::post(self.endpoints.upload_geotiff)
            .body(form)?
            .send()
            .await?;
        log::debug!("received response from {}", self.endpoints.upload_geotiff);
        Ok(response.json::<UploadReply>().await?)
    }

    async fn fetch_raster(&self, path: &str) -> Result<Vec<u8>, AppError> {
        let response = Request::get(path).send().await?;
        if !response.ok() {
            return Err(AppError::Server(format!(
                "GET {} returned {}",
                path,
                response.status()
            )));
        }
        Ok(response.binary().await?)
    }

    async fn export_geojson(&self, body: &ExportRequest) -> Result<ServerReply, AppError> {
        let response = Request::post(self.endpoints.export_geojson)
            .json(body)?
            .send()
            .await?;
        Ok(response.json::<ServerReply>().await?)
    }
}

use crate::api::{device_options, Backend, DeviceOption};
use crate::config::AppConfig;
use crate::error::{AppError, UploadFailure};
use crate::geojson::ExportRequest;
use crate::leaflet::MapSurface;
use std::cell::{Cell, RefCell};

pub const NO_DEVICE_SELECTED: &str = "Please select a device";
pub const DEVICES_FAILED: &str = "Failed to load devices.";
pub const RASTER_LOADED: &str = "GeoTIFF loaded successfully!";
pub const RASTER_UNBOUNDED: &str =
    "GeoTIFF loaded, but geographic boundaries are not available.";

/// Identifies one raster submission. Tickets are ordered; an overlay is never
/// replaced by one from an older ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterOutcome {
    /// Overlay attached and the view fitted to its bounds.
    Framed,
    /// Overlay attached but the raster carried no bounds.
    Unframed,
    /// A newer submission already attached its overlay.
    Superseded,
}

/// Owns the map and the single raster overlay; one method per page flow.
pub struct Controller<B: Backend, M: MapSurface> {
    backend: B,
    map: M,
    config: AppConfig,
    overlay: RefCell<Option<M::Overlay>>,
    generation: Cell<u64>,
    /// Ticket number of the attached overlay, 0 when none has been attached.
    attached_generation: Cell<u64>,
}

impl<B: Backend, M: MapSurface> Controller<B, M> {
    pub fn new(backend: B, map: M, config: AppConfig) -> Self {
        Self {
            backend,
            map,
            config,
            overlay: RefCell::new(None),
            generation: Cell::new(0),
            attached_generation: Cell::new(0),
        }
    }

    pub fn init_map(&self) -> Result<(), AppError> {
        self.map.mount(&self.config.map)
    }

    pub async fn load_devices(&self) -> Result<Vec<DeviceOption>, AppError> {
        let devices = self.backend.list_devices().await?;
        log::debug!("received {} device(s)", devices.len());
        Ok(device_options(&devices))
    }

    /// Posts the selected port. An empty selection fails before any request.
    pub async fn connect_device(&self, selection: &str) -> Result<String, AppError> {
        if selection.is_empty() {
            return Err(AppError::NoDeviceSelected);
        }
        let reply = self.backend.connect_device(selection).await?;
        reply.into_message()
    }

    pub fn begin_upload(&self) -> UploadTicket {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        UploadTicket(next)
    }

    /// Whether no submission has started after this one.
    pub fn is_current(&self, ticket: UploadTicket) -> bool {
        self.generation.get() == ticket.0
    }

    fn is_superseded(&self, ticket: UploadTicket) -> bool {
        self.attached_generation.get() > ticket.0
    }

    pub async fn upload_raster(
        &self,
        ticket: UploadTicket,
        form: B::Form,
    ) -> Result<RasterOutcome, UploadFailure> {
        let reply = self
            .backend
            .upload_geotiff(form)
            .await
            .map_err(UploadFailure::Upload)?;
        if let Some(error) = reply.error {
            return Err(UploadFailure::Rejected(error));
        }
        if let Some(message) = &reply.message {
            log::debug!("upload accepted: {}", message);
        }
        let path = reply
            .file_path
            .ok_or(UploadFailure::Load(AppError::MissingField("file_path")))?;
        log::debug!("geotiff stored at {}", path);

        let bytes = self
            .backend
            .fetch_raster(&path)
            .await
            .map_err(UploadFailure::Load)?;
        log::debug!("fetched {} bytes, parsing georaster", bytes.len());
        let raster = self
            .map
            .parse_raster(&bytes)
            .await
            .map_err(UploadFailure::Load)?;

        if self.is_superseded(ticket) {
            log::info!(
                "discarding raster from {:?}, a newer upload is already displayed",
                ticket
            );
            return Ok(RasterOutcome::Superseded);
        }

        self.replace_overlay(&raster).map_err(UploadFailure::Load)?;
        self.attached_generation.set(ticket.0);

        match self.map.raster_bounds(&raster) {
            Some(bounds) => {
                self.map.fit_bounds(&bounds);
                log::debug!("map fitted to {:?}", bounds);
                Ok(RasterOutcome::Framed)
            }
            None => {
                log::warn!("georaster has no bounds, leaving map view unchanged");
                Ok(RasterOutcome::Unframed)
            }
        }
    }

    fn replace_overlay(&self, raster: &M::Raster) -> Result<(), AppError> {
        let previous = self.overlay.borrow_mut().take();
        if let Some(previous) = previous {
            log::debug!("removing existing raster layer");
            self.map.detach_overlay(&previous);
        }
        let overlay = self.map.attach_overlay(raster, &self.config.overlay)?;
        *self.overlay.borrow_mut() = Some(overlay);
        log::debug!("raster layer added to the map");
        Ok(())
    }

    /// Posts the placeholder feature collection and returns the reply's
    /// message. Error replies are not told apart from successes.
    pub async fn export_geojson(&self) -> Result<String, AppError> {
        let body = ExportRequest::placeholder()?;
        let reply = self.backend.export_geojson(&body).await?;
        Ok(reply.message.unwrap_or_default())
    }
}

pub fn connect_succeeded_message(message: &str) -> String {
    format!("Successfully connected to: {}", message)
}

pub fn connect_failed_message(err: &AppError) -> String {
    match err {
        AppError::NoDeviceSelected => NO_DEVICE_SELECTED.to_string(),
        AppError::Server(error) => format!("Error: {}", error),
        _ => "Failed to connect to device".to_string(),
    }
}

pub fn upload_failed_message(failure: &UploadFailure) -> String {
    match failure {
        UploadFailure::Rejected(error) => error.clone(),
        UploadFailure::Upload(_) => "Failed to upload GeoTIFF".to_string(),
        UploadFailure::Load(_) => "Failed to load GeoTIFF file".to_string(),
    }
}

use crate::config::{MapConfig, OverlayStyle};
use crate::error::AppError;
use js_sys::{Array, Function, Object, Promise, Reflect, Uint8Array};
use std::cell::RefCell;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Geographic extent of a raster, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Option<Self> {
        [south, west, north, east]
            .iter()
            .all(|v| v.is_finite())
            .then_some(Self {
                south,
                west,
                north,
                east,
            })
    }

    /// `[[south, west], [north, east]]`, the corner order `fitBounds` takes.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }
}

/// The map the raster pipeline draws on.
#[allow(async_fn_in_trait)]
pub trait MapSurface {
    type Raster;
    type Overlay;

    fn mount(&self, config: &MapConfig) -> Result<(), AppError>;
    async fn parse_raster(&self, bytes: &[u8]) -> Result<Self::Raster, AppError>;
    fn raster_bounds(&self, raster: &Self::Raster) -> Option<Bounds>;
    fn attach_overlay(
        &self,
        raster: &Self::Raster,
        style: &OverlayStyle,
    ) -> Result<Self::Overlay, AppError>;
    fn detach_overlay(&self, overlay: &Self::Overlay);
    fn fit_bounds(&self, bounds: &Bounds);
}

/// A parsed georaster object and the bounds read off it.
#[derive(Debug, Clone)]
pub struct GeoRaster {
    handle: JsValue,
    bounds: Option<Bounds>,
}

/// Leaflet map plus the georaster globals loaded by the host page.
#[derive(Clone, Default)]
pub struct LeafletMap {
    map: std::rc::Rc<RefCell<Option<JsValue>>>,
}

impl LeafletMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self) -> Result<JsValue, AppError> {
        self.map
            .borrow()
            .as_ref()
            .cloned()
            .ok_or_else(|| AppError::Js("map not initialized".to_string()))
    }
}

fn global(name: &str) -> Result<JsValue, AppError> {
    let value = Reflect::get(&js_sys::global(), &JsValue::from_str(name))?;
    if value.is_undefined() || value.is_null() {
        return Err(AppError::Js(format!("`{}` is not loaded", name)));
    }
    Ok(value)
}

fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, AppError> {
    let function = Reflect::get(target, &JsValue::from_str(method))?.dyn_into::<Function>()?;
    let args: Array = args.iter().collect();
    Ok(function.apply(target, &args)?)
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), AppError> {
    Reflect::set(target, &JsValue::from_str(key), value)?;
    Ok(())
}

fn corners_to_js(bounds: &Bounds) -> JsValue {
    bounds
        .corners()
        .iter()
        .map(|[lat, lng]| Array::of2(&JsValue::from_f64(*lat), &JsValue::from_f64(*lng)))
        .collect::<Array>()
        .into()
}

fn read_bounds(raster: &JsValue) -> Option<Bounds> {
    let bounds = Reflect::get(raster, &JsValue::from_str("bounds")).ok()?;
    if bounds.is_undefined() || bounds.is_null() {
        return None;
    }
    let side = |key: &str| {
        Reflect::get(&bounds, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_f64())
    };
    Bounds::new(side("south")?, side("west")?, side("north")?, side("east")?)
}

impl MapSurface for LeafletMap {
    type Raster = GeoRaster;
    type Overlay = JsValue;

    fn mount(&self, config: &MapConfig) -> Result<(), AppError> {
        let leaflet = global("L")?;
        let map = call(&leaflet, "map", &[JsValue::from_str(config.element_id)])?;
        let (lat, lng) = config.center;
        let center = Array::of2(&JsValue::from_f64(lat), &JsValue::from_f64(lng));
        call(
            &map,
            "setView",
            &[center.into(), JsValue::from_f64(config.zoom as f64)],
        )?;

        let options = Object::new();
        set(&options, "maxZoom", &JsValue::from_f64(config.max_zoom as f64))?;
        set(&options, "attribution", &JsValue::from_str(config.attribution))?;
        let tiles = call(
            &leaflet,
            "tileLayer",
            &[JsValue::from_str(config.tile_url), options.into()],
        )?;
        call(&tiles, "addTo", &[map.clone()])?;

        *self.map.borrow_mut() = Some(map);
        Ok(())
    }

    async fn parse_raster(&self, bytes: &[u8]) -> Result<GeoRaster, AppError> {
        let parse = global("parseGeoraster")?.dyn_into::<Function>()?;
        let buffer = Uint8Array::from(bytes).buffer();
        let promise = parse.call1(&JsValue::NULL, &buffer)?;
        let handle = JsFuture::from(promise.dyn_into::<Promise>()?)
            .await
            .map_err(|err| AppError::Raster(format!("{:?}", err)))?;
        let bounds = read_bounds(&handle);
        Ok(GeoRaster { handle, bounds })
    }

    fn raster_bounds(&self, raster: &GeoRaster) -> Option<Bounds> {
        raster.bounds
    }

    fn attach_overlay(&self, raster: &GeoRaster, style: &OverlayStyle) -> Result<JsValue, AppError> {
        let map = self.handle()?;
        let layer_class = global("GeoRasterLayer")?.dyn_into::<Function>()?;

        let options = Object::new();
        set(&options, "georaster", &raster.handle)?;
        set(&options, "opacity", &JsValue::from_f64(style.opacity))?;
        set(&options, "resolution", &JsValue::from_f64(style.resolution as f64))?;
        let layer = Reflect::construct(&layer_class, &Array::of1(&options))?;

        call(&layer, "addTo", &[map])?;
        Ok(layer)
    }

    fn detach_overlay(&self, overlay: &JsValue) {
        let removed = self
            .handle()
            .and_then(|map| call(&map, "removeLayer", &[overlay.clone()]));
        if let Err(err) = removed {
            log::warn!("failed to remove raster layer: {}", err);
        }
    }

    fn fit_bounds(&self, bounds: &Bounds) {
        let fitted = self
            .handle()
            .and_then(|map| call(&map, "fitBounds", &[corners_to_js(bounds)]));
        if let Err(err) = fitted {
            log::warn!("failed to fit map to raster bounds: {}", err);
        }
    }
}

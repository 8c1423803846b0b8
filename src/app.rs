use crate::api::{DeviceOption, HttpBackend};
use crate::config::AppConfig;
use crate::controller::{
    connect_failed_message, connect_succeeded_message, upload_failed_message, Controller,
    RasterOutcome, DEVICES_FAILED, RASTER_LOADED, RASTER_UNBOUNDED,
};
use crate::error::{AppError, UploadFailure};
use crate::leaflet::LeafletMap;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{FormData, HtmlFormElement, HtmlSelectElement};
use yew::events::SubmitEvent;
use yew::prelude::*;

pub type BrowserController = Controller<HttpBackend, LeafletMap>;

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.alert_with_message(message) {
            log::warn!("alert failed: {:?}", err);
        }
    }
}

fn new_controller() -> Rc<BrowserController> {
    let config = AppConfig::default();
    let backend = HttpBackend::new(config.endpoints);
    Rc::new(Controller::new(backend, LeafletMap::new(), config))
}

#[function_component(App)]
pub fn app() -> Html {
    let controller = use_state(new_controller);
    let devices = use_state(|| vec![DeviceOption::placeholder()]);
    let selected_device = use_state(String::new);
    let loading = use_state(|| false);

    {
        let controller = (*controller).clone();
        let devices = devices.clone();
        let selected_device = selected_device.clone();
        use_effect_with((), move |_| {
            if let Err(err) = controller.init_map() {
                log::error!("map initialization failed: {}", err);
            }
            spawn_local(async move {
                match controller.load_devices().await {
                    Ok(options) => {
                        selected_device.set(String::new());
                        devices.set(options);
                    }
                    Err(err) => {
                        log::error!("error loading devices: {}", err);
                        alert(DEVICES_FAILED);
                    }
                }
            });
            || ()
        });
    }

    let on_device_change = {
        let selected_device = selected_device.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            selected_device.set(select.value());
        })
    };

    let on_device_submit = {
        let controller = (*controller).clone();
        let selection = (*selected_device).clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let controller = controller.clone();
            let selection = selection.clone();
            spawn_local(async move {
                match controller.connect_device(&selection).await {
                    Ok(message) => alert(&connect_succeeded_message(&message)),
                    Err(err) => {
                        if !matches!(err, AppError::NoDeviceSelected) {
                            log::error!("device connect failed: {}", err);
                        }
                        alert(&connect_failed_message(&err));
                    }
                }
            });
        })
    };

    let on_geotiff_submit = {
        let controller = (*controller).clone();
        let loading = loading.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let form: HtmlFormElement = e.target_unchecked_into();
            let form_data = match FormData::new_with_form(&form) {
                Ok(data) => data,
                Err(err) => {
                    let failure = UploadFailure::Upload(AppError::from(err));
                    log::error!("could not read geotiff form: {}", failure);
                    alert(&upload_failed_message(&failure));
                    return;
                }
            };

            let ticket = controller.begin_upload();
            loading.set(true);
            log::debug!("geotiff form submitted as {:?}", ticket);

            let controller = controller.clone();
            let loading = loading.clone();
            spawn_local(async move {
                let result = controller.upload_raster(ticket, form_data).await;
                // a newer submission owns the indicator
                let current = controller.is_current(ticket);
                match result {
                    Ok(RasterOutcome::Superseded) => {
                        log::info!("{:?} finished after a newer raster was displayed", ticket);
                    }
                    Ok(outcome) => {
                        if outcome == RasterOutcome::Unframed {
                            alert(RASTER_UNBOUNDED);
                        }
                        if current {
                            loading.set(false);
                        }
                        alert(RASTER_LOADED);
                    }
                    Err(failure) => {
                        log::error!("geotiff pipeline failed: {}", failure);
                        alert(&upload_failed_message(&failure));
                        if current {
                            loading.set(false);
                        }
                    }
                }
            });
        })
    };

    let on_export = {
        let controller = (*controller).clone();
        Callback::from(move |_: MouseEvent| {
            let controller = controller.clone();
            spawn_local(async move {
                match controller.export_geojson().await {
                    Ok(message) => alert(&message),
                    Err(err) => log::error!("geojson export failed: {}", err),
                }
            });
        })
    };

    let loading_style = if *loading {
        "display: block;"
    } else {
        "display: none;"
    };

    html! {
        <div class="app">
            <div class="controls">
                <form id="device-form" onsubmit={on_device_submit}>
                    <label for="device">{"Device"}</label>
                    <select id="device" name="device" onchange={on_device_change}>
                        { for devices.iter().map(|option| html! {
                            <option
                                value={option.value.clone()}
                                title={option.title.clone()}
                                selected={option.value == *selected_device}
                            >
                                { option.label.clone() }
                            </option>
                        }) }
                    </select>
                    <button type="submit">{"Connect"}</button>
                </form>
                <form id="geotiff-form" onsubmit={on_geotiff_submit}>
                    <input type="file" name="geotiff" accept=".tif,.tiff" />
                    <button type="submit">{"Upload GeoTIFF"}</button>
                </form>
                <button id="export-geojson" type="button" onclick={on_export}>
                    {"Export GeoJSON"}
                </button>
                <div class="loading" style={loading_style}>{"Loading..."}</div>
            </div>
            <div id="map"></div>
        </div>
    }
}

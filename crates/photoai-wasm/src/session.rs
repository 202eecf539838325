//! Edit session bindings.
//!
//! `JsEditSession` wraps one core `EditSession` for an editing surface.
//! Every method returns the new `current` image so the shell can repaint
//! straight away.
//!
//! Background removal is delegated to a JS callback so the segmentation
//! model can live wherever the shell loads it (worker, remote API):
//!
//! ```typescript
//! const session = new JsEditSession(bytes, { interpolation: 'lanczos3' });
//! const applied = await session.removeBackground(
//!   async (rgba: Uint8Array, width: number, height: number) => {
//!     return await segmenter.run(rgba, width, height); // RGBA Uint8Array
//!   },
//! );
//! session.addPresetBackground('Sunset');
//! const png = session.export();
//! ```
//!
//! The session is shared with the pending removal future through
//! `Rc<RefCell<..>>`; the borrow is never held across an await point.
//! `close()` empties the cell, after which every method fails with
//! "session closed" and a pending removal resolves to `false`.

use std::cell::RefCell;
use std::rc::Rc;

use photoai_core::composite::{BackgroundKind, BackgroundSpec};
use photoai_core::remover::{BackgroundRemover, ServiceError};
use photoai_core::{
    AdjustmentKind, Adjustments, CropRect, EditError, EditSession, EditorConfig, ExportFormat,
    GradientStops, RasterBuffer, RemovalOutcome,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

use crate::types::{from_js_or_default, to_js_error, JsRasterBuffer};

const SESSION_CLOSED: &str = "session closed";

/// Snapshot of session state for the UI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionState {
    width: u32,
    height: u32,
    adjustments: Adjustments,
    has_background_removed: bool,
    background: Option<BackgroundKind>,
    geometry_steps: usize,
}

impl SessionState {
    fn of(session: &EditSession) -> Self {
        Self {
            width: session.current().width(),
            height: session.current().height(),
            adjustments: session.adjustments(),
            has_background_removed: session.background_removed().is_some(),
            background: session.background().map(BackgroundSpec::kind),
            geometry_steps: session.geometry().len(),
        }
    }
}

#[wasm_bindgen]
pub struct JsEditSession {
    state: Rc<RefCell<Option<EditSession>>>,
}

#[wasm_bindgen]
impl JsEditSession {
    /// Decode `bytes` and open a session. `config` is an optional
    /// `EditorConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(bytes: &[u8], config: JsValue) -> Result<JsEditSession, JsValue> {
        let config: EditorConfig = from_js_or_default(config)?;
        let session = EditSession::load(bytes, config).map_err(to_js_error)?;
        Ok(Self::wrap(session))
    }

    /// Open a session on pixels the shell already decoded.
    #[wasm_bindgen(js_name = fromImage)]
    pub fn from_image(image: &JsRasterBuffer, config: JsValue) -> Result<JsEditSession, JsValue> {
        let config: EditorConfig = from_js_or_default(config)?;
        let session =
            EditSession::from_buffer(image.as_core().clone(), config).map_err(to_js_error)?;
        Ok(Self::wrap(session))
    }

    pub fn current(&self) -> Result<JsRasterBuffer, JsValue> {
        self.read(|s| s.current().clone())
    }

    pub fn original(&self) -> Result<JsRasterBuffer, JsValue> {
        self.read(|s| s.original().clone())
    }

    /// `{ width, height, adjustments, hasBackgroundRemoved, background, geometrySteps }`
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let state = self.with_session(|s| Ok(SessionState::of(s)))?;
        serde_wasm_bindgen::to_value(&state).map_err(to_js_error)
    }

    #[wasm_bindgen(getter, js_name = isClosed)]
    pub fn is_closed(&self) -> bool {
        self.state.borrow().is_none()
    }

    /// Set one slider: `"brightness"`, `"contrast"` or `"saturation"`.
    #[wasm_bindgen(js_name = setAdjustment)]
    pub fn set_adjustment(&self, kind: &str, value: i32) -> Result<JsRasterBuffer, JsValue> {
        let kind: AdjustmentKind = kind.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.update(|s| s.set_adjustment(kind, value).cloned())
    }

    /// Set all sliders from `{ brightness, contrast, saturation }`.
    #[wasm_bindgen(js_name = setAdjustments)]
    pub fn set_adjustments(&self, value: JsValue) -> Result<JsRasterBuffer, JsValue> {
        let adjustments: Adjustments = from_js_or_default(value)?;
        self.update(|s| s.set_adjustments(adjustments).cloned())
    }

    /// Crop by percentages of the current image.
    pub fn crop(&self, x: f64, y: f64, width: f64, height: f64) -> Result<JsRasterBuffer, JsValue> {
        let rect = CropRect::new(x, y, width, height);
        self.update(|s| s.crop(rect).cloned())
    }

    /// Rotate clockwise by `degrees`.
    pub fn rotate(&self, degrees: f64) -> Result<JsRasterBuffer, JsValue> {
        self.update(|s| s.rotate(degrees).cloned())
    }

    /// Rotate, then crop against the rotated image, as a single edit.
    #[wasm_bindgen(js_name = cropRotated)]
    pub fn crop_rotated(
        &self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        degrees: f64,
    ) -> Result<JsRasterBuffer, JsValue> {
        let rect = CropRect::new(x, y, width, height);
        self.update(|s| s.crop_rotated(rect, degrees).cloned())
    }

    /// Run background removal through `service`.
    ///
    /// `service(rgba, width, height)` must return (or resolve to) an RGBA
    /// `Uint8Array` or `Uint8ClampedArray` of the same size. The returned
    /// promise resolves to `true` when the result was applied and `false`
    /// when a reset or a newer removal made it stale, and rejects with the
    /// service error otherwise.
    #[wasm_bindgen(js_name = removeBackground)]
    pub fn remove_background(&self, service: js_sys::Function) -> Result<js_sys::Promise, JsValue> {
        let ticket = self.with_session(|s| Ok(s.begin_background_removal()))?;
        let state = Rc::clone(&self.state);

        Ok(future_to_promise(async move {
            let remover = JsBackgroundRemover { callback: service };
            let result = remover.remove_background(ticket.source()).await;

            let mut guard = state.borrow_mut();
            let Some(session) = guard.as_mut() else {
                web_sys::console::warn_1(&"Background removal finished after session close".into());
                return Ok(JsValue::FALSE);
            };
            match session
                .finish_background_removal(ticket, result)
                .map_err(to_js_error)?
            {
                RemovalOutcome::Applied => Ok(JsValue::TRUE),
                RemovalOutcome::Stale => {
                    web_sys::console::warn_1(&"Discarded stale background removal result".into());
                    Ok(JsValue::FALSE)
                }
            }
        }))
    }

    /// Composite the cut-out over a 135° gradient between two hex colors.
    #[wasm_bindgen(js_name = addGradientBackground)]
    pub fn add_gradient_background(
        &self,
        start: &str,
        end: &str,
    ) -> Result<JsRasterBuffer, JsValue> {
        let stops = GradientStops::from_hex(start, end).map_err(to_js_error)?;
        self.update(|s| s.add_background(BackgroundSpec::Gradient(stops)).cloned())
    }

    /// Composite the cut-out over a named gradient preset.
    #[wasm_bindgen(js_name = addPresetBackground)]
    pub fn add_preset_background(&self, name: &str) -> Result<JsRasterBuffer, JsValue> {
        let spec = BackgroundSpec::preset(name)
            .ok_or_else(|| JsValue::from_str(&format!("unknown background preset '{name}'")))?;
        self.update(|s| s.add_background(spec).cloned())
    }

    /// Composite the cut-out over an image, cover-fitted.
    #[wasm_bindgen(js_name = addImageBackground)]
    pub fn add_image_background(&self, image: &JsRasterBuffer) -> Result<JsRasterBuffer, JsValue> {
        let spec = BackgroundSpec::Image(image.as_core().clone());
        self.update(|s| s.add_background(spec).cloned())
    }

    #[wasm_bindgen(js_name = clearBackground)]
    pub fn clear_background(&self) -> Result<JsRasterBuffer, JsValue> {
        self.update(|s| s.clear_background().cloned())
    }

    /// Return to the original image, dropping every edit.
    pub fn reset(&self) -> Result<JsRasterBuffer, JsValue> {
        self.update(|s| Ok(s.reset().clone()))
    }

    /// Encode the current image. `format` is optional:
    /// `{ format: "png" }` or `{ format: "jpeg", quality: 90 }`.
    pub fn export(&self, format: JsValue) -> Result<Vec<u8>, JsValue> {
        let format: Option<ExportFormat> = if format.is_undefined() || format.is_null() {
            None
        } else {
            Some(serde_wasm_bindgen::from_value(format).map_err(to_js_error)?)
        };
        self.with_session(|s| match format {
            Some(format) => s.export_as(format),
            None => s.export(),
        })
    }

    /// Release all buffers. Later calls fail with "session closed".
    pub fn close(&self) {
        if let Some(session) = self.state.borrow_mut().take() {
            session.close();
        }
    }
}

impl JsEditSession {
    fn wrap(session: EditSession) -> Self {
        Self {
            state: Rc::new(RefCell::new(Some(session))),
        }
    }

    fn with_session<T>(
        &self,
        f: impl FnOnce(&mut EditSession) -> Result<T, EditError>,
    ) -> Result<T, JsValue> {
        let mut guard = self.state.borrow_mut();
        let session = guard
            .as_mut()
            .ok_or_else(|| to_js_error(EditError::PreconditionFailed(SESSION_CLOSED)))?;
        f(session).map_err(to_js_error)
    }

    fn update(
        &self,
        f: impl FnOnce(&mut EditSession) -> Result<RasterBuffer, EditError>,
    ) -> Result<JsRasterBuffer, JsValue> {
        self.with_session(f).map(JsRasterBuffer::from_core)
    }

    fn read(
        &self,
        f: impl FnOnce(&EditSession) -> RasterBuffer,
    ) -> Result<JsRasterBuffer, JsValue> {
        self.update(|s| Ok(f(s)))
    }
}

/// Calls a JS segmentation function as a [`BackgroundRemover`].
struct JsBackgroundRemover {
    callback: js_sys::Function,
}

impl BackgroundRemover for JsBackgroundRemover {
    async fn remove_background(&self, image: &RasterBuffer) -> Result<RasterBuffer, ServiceError> {
        let rgba = js_sys::Uint8Array::from(image.pixels());
        let returned = self
            .callback
            .call3(
                &JsValue::NULL,
                &rgba,
                &JsValue::from(image.width()),
                &JsValue::from(image.height()),
            )
            .map_err(|e| ServiceError::Unavailable(describe(&e)))?;

        // Accept plain values as well as promises.
        let resolved = JsFuture::from(js_sys::Promise::resolve(&returned))
            .await
            .map_err(|e| ServiceError::Failed(describe(&e)))?;

        if !(resolved.is_instance_of::<js_sys::Uint8Array>()
            || resolved.is_instance_of::<js_sys::Uint8ClampedArray>())
        {
            return Err(ServiceError::Failed(
                "service must resolve to RGBA bytes".to_string(),
            ));
        }
        let pixels = js_sys::Uint8Array::new(&resolved).to_vec();

        RasterBuffer::new(image.width(), image.height(), pixels)
            .map_err(|e| ServiceError::Failed(e.to_string()))
    }
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn session(width: u32, height: u32) -> JsEditSession {
        let image = RasterBuffer::filled(width, height, [200, 120, 40, 255]);
        JsEditSession::wrap(EditSession::from_buffer(image, EditorConfig::default()).unwrap())
    }

    /// `(rgba) => rgba` with every alpha byte cleared.
    fn clear_alpha_service() -> js_sys::Function {
        js_sys::Function::new_with_args(
            "rgba, width, height",
            "const out = new Uint8Array(rgba); \
             for (let i = 3; i < out.length; i += 4) out[i] = 0; \
             return Promise.resolve(out);",
        )
    }

    #[wasm_bindgen_test]
    fn test_set_adjustments_clamps_out_of_range_values() {
        let s = session(2, 2);
        let value = js_sys::JSON::parse(r#"{"brightness": 300}"#).unwrap();
        assert!(s.set_adjustments(value).is_ok());

        let state = s.state().unwrap();
        let adjustments = js_sys::Reflect::get(&state, &"adjustments".into()).unwrap();
        let brightness = js_sys::Reflect::get(&adjustments, &"brightness".into()).unwrap();
        assert_eq!(brightness.as_f64(), Some(200.0));
    }

    #[wasm_bindgen_test]
    async fn test_remove_background_applies_result() {
        let s = session(6, 4);
        let applied = JsFuture::from(s.remove_background(clear_alpha_service()).unwrap())
            .await
            .unwrap();
        assert_eq!(applied, JsValue::TRUE);
        assert_eq!(s.current().unwrap().pixels()[3], 0);

        let composited = s.add_gradient_background("#0000ff", "#0000ff").unwrap();
        assert_eq!(&composited.pixels()[..4], &[0, 0, 255, 255]);
    }

    #[wasm_bindgen_test]
    async fn test_reset_makes_pending_removal_stale() {
        let s = session(6, 4);
        let pending = s.remove_background(clear_alpha_service()).unwrap();
        s.reset().unwrap();
        let applied = JsFuture::from(pending).await.unwrap();
        assert_eq!(applied, JsValue::FALSE);
        assert!(s.current().unwrap().as_core().is_opaque());
    }

    #[wasm_bindgen_test]
    async fn test_service_rejection_surfaces() {
        let s = session(2, 2);
        let failing =
            js_sys::Function::new_no_args("return Promise.reject(new Error('model offline'));");
        let err = JsFuture::from(s.remove_background(failing).unwrap())
            .await
            .unwrap_err();
        assert!(err.as_string().unwrap().contains("model offline"));
    }

    #[wasm_bindgen_test]
    fn test_background_before_removal_fails() {
        let s = session(2, 2);
        let err = s.add_preset_background("Ocean").err().unwrap();
        assert_eq!(
            err.as_string().unwrap(),
            "Precondition failed: background removal required first"
        );
    }

    #[wasm_bindgen_test]
    fn test_closed_session_rejects_calls() {
        let s = session(2, 2);
        s.close();
        assert!(s.rotate(90.0).is_err());
        assert!(s.export(JsValue::UNDEFINED).is_err());
    }
}

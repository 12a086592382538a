// GPU Context Management
// Handles WebGPU initialization without a canvas: compute work needs no surface.
// Main responsibilities:
// - Check that the browser exposes navigator.gpu
// - Request the GPU adapter
// - Create the logical device and keep its queue
// - Share one device across runs and destroy it when it is dropped from the cache

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Gpu, GpuAdapter, GpuDevice, GpuQueue};

use crate::config::ComputeConfig;
use crate::error::{js_error_message, ComputeError, Result};

pub struct GpuContext {
    pub device: GpuDevice,
    pub queue: GpuQueue,
}

impl GpuContext {
    pub async fn new(config: &ComputeConfig) -> Result<Self> {
        let window = web_sys::window().ok_or(ComputeError::Unsupported)?;
        let navigator = window.navigator();

        // `Navigator::gpu` assumes the property exists, so probe it first
        let gpu = js_sys::Reflect::get(&navigator, &JsValue::from_str("gpu"))?;
        if gpu.is_undefined() || gpu.is_null() {
            return Err(ComputeError::Unsupported);
        }
        let gpu: Gpu = gpu.unchecked_into();

        // Request adapter
        let options = web_sys::GpuRequestAdapterOptions::new();
        options.set_power_preference(config.power_preference.to_web());
        let adapter_promise = gpu.request_adapter_with_options(&options);
        let adapter = wasm_bindgen_futures::JsFuture::from(adapter_promise).await?;
        if adapter.is_null() || adapter.is_undefined() {
            return Err(ComputeError::NoAdapter);
        }
        let adapter: GpuAdapter = adapter.into();

        // Request device
        let descriptor = web_sys::GpuDeviceDescriptor::new();
        descriptor.set_label(&config.label_for("device"));
        let device_promise = adapter.request_device_with_descriptor(&descriptor);
        let device = wasm_bindgen_futures::JsFuture::from(device_promise)
            .await
            .map_err(|e| ComputeError::DeviceRequest(js_error_message(&e)))?;
        let device: GpuDevice = device.into();
        let queue = device.queue();

        console_log!("GPU device ready ({:?})", config.power_preference);

        Ok(Self { device, queue })
    }
}

/// Holds at most one shared value per thread.
pub struct ContextSlot<T> {
    slot: RefCell<Option<Rc<T>>>,
}

impl<T> ContextSlot<T> {
    pub const fn new() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }

    pub fn get(&self) -> Option<Rc<T>> {
        self.slot.borrow().clone()
    }

    /// Stores `value` unless the slot is already filled. Returns the shared
    /// value, plus `value` back when another task got there first.
    pub fn insert_if_empty(&self, value: T) -> (Rc<T>, Option<T>) {
        let mut slot = self.slot.borrow_mut();
        match slot.as_ref() {
            Some(existing) => (existing.clone(), Some(value)),
            None => {
                let shared = Rc::new(value);
                *slot = Some(shared.clone());
                (shared, None)
            }
        }
    }

    pub fn take(&self) -> Option<Rc<T>> {
        self.slot.borrow_mut().take()
    }
}

thread_local! {
    static SHARED_CONTEXT: ContextSlot<GpuContext> = const { ContextSlot::new() };
}

/// Returns the page's GPU context, creating it on first use.
pub async fn shared_context(config: &ComputeConfig) -> Result<Rc<GpuContext>> {
    if let Some(existing) = SHARED_CONTEXT.with(|slot| slot.get()) {
        return Ok(existing);
    }

    let context = GpuContext::new(config).await?;
    let (shared, extra) = SHARED_CONTEXT.with(|slot| slot.insert_if_empty(context));
    if let Some(extra) = extra {
        extra.device.destroy();
    }
    Ok(shared)
}

/// Drops the cached context and destroys its device. The next run starts over.
pub fn reset_shared_context() {
    if let Some(context) = SHARED_CONTEXT.with(|slot| slot.take()) {
        console_log!("Destroying GPU device");
        context.device.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_starts_empty() {
        let slot: ContextSlot<u32> = ContextSlot::new();
        assert!(slot.get().is_none());
        assert!(slot.take().is_none());
    }

    #[test]
    fn test_slot_reuses_first_value() {
        let slot = ContextSlot::new();
        let (first, extra) = slot.insert_if_empty(1u32);
        assert_eq!(*first, 1);
        assert!(extra.is_none());

        // A second initializer loses and gets its value back for cleanup
        let (shared, extra) = slot.insert_if_empty(2u32);
        assert_eq!(*shared, 1);
        assert_eq!(extra, Some(2));
        assert!(Rc::ptr_eq(&first, &shared));
        assert!(Rc::ptr_eq(&first, &slot.get().unwrap()));
    }

    #[test]
    fn test_slot_take_clears() {
        let slot = ContextSlot::new();
        slot.insert_if_empty(7u32);
        assert_eq!(slot.take().map(|v| *v), Some(7));
        assert!(slot.get().is_none());

        let (fresh, extra) = slot.insert_if_empty(8u32);
        assert_eq!(*fresh, 8);
        assert!(extra.is_none());
    }
}

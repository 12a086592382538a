// GPU module - organizes all WebGPU-related functionality
// This module provides the pieces of a single compute dispatch:
// - Context management (adapter, device, queue)
// - Buffer creation and readback
// - Compute pipeline creation
// - WGSL shader generation
// - Command submission helpers

pub mod buffer;
pub mod compute;
pub mod context;
pub mod pipeline;
pub mod shaders;
pub mod utils;

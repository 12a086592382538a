use leptos::prelude::*;

#[macro_use]
mod console;

mod compute_panel;
mod config;
mod error;
mod gpu;

use compute_panel::ComputePanel;

fn main() {
    leptos::mount::mount_to_body(|| {
        view! {
            <div>
                <h1>"WebGPU Compute"</h1>
                <ComputePanel/>
            </div>
        }
    })
}

use leptos::prelude::*;

use crate::config::{load_config, ComputeConfig};
use crate::error::{ComputeError, Result};
use crate::gpu::compute::{run_add, ComputeOutcome};
use crate::gpu::context::{reset_shared_context, shared_context};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Running,
    Done(ComputeOutcome),
    Failed(String),
}

impl RunStatus {
    pub fn message(&self) -> String {
        match self {
            RunStatus::Idle => "Idle".to_string(),
            RunStatus::Running => "Running…".to_string(),
            RunStatus::Done(outcome) => format!("Result: {}", outcome),
            RunStatus::Failed(err) => format!("Error: {}", err),
        }
    }

    pub fn from_result(result: Result<ComputeOutcome>) -> Self {
        match result {
            Ok(outcome) => RunStatus::Done(outcome),
            Err(err) => RunStatus::Failed(err.to_string()),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, RunStatus::Running)
    }
}

/// Full sequence: read config, reuse or bring up the device, dispatch, read back.
pub async fn run_once() -> Result<ComputeOutcome> {
    let config: ComputeConfig = load_config()?;
    let context = shared_context(&config).await?;
    let result = run_add(&context, &config).await;
    if let Err(e) = &result {
        if e.invalidates_context() {
            drop(context);
            reset_shared_context();
        }
    }
    result
}

fn start_run(set_status: WriteSignal<RunStatus>) {
    set_status.set(RunStatus::Running);
    wasm_bindgen_futures::spawn_local(async move {
        let result = run_once().await;
        if let Err(e) = &result {
            report_error(e);
        }
        set_status.set(RunStatus::from_result(result));
    });
}

fn report_error(err: &ComputeError) {
    if err.is_fatal() {
        console_error!("WebGPU unavailable: {}", err);
    } else {
        console_error!("WebGPU compute error: {}", err);
    }
}

#[component]
pub fn ComputePanel() -> impl IntoView {
    let (status, set_status) = signal(RunStatus::Idle);

    // Run once on mount, matching a plain page load
    Effect::new(move |ran: Option<()>| {
        if ran.is_none() {
            start_run(set_status);
        }
    });

    view! {
        <div>
            <button
                disabled=move || status.get().is_running()
                on:click=move |_| start_run(set_status)
            >
                "Run compute"
            </button>
            <p id="compute-status">{move || status.get().message()}</p>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert_eq!(RunStatus::Idle.message(), "Idle");
        assert_eq!(RunStatus::Running.message(), "Running…");
        let done = RunStatus::Done(ComputeOutcome { lhs: 1, rhs: 2, value: 3, expected: 3 });
        assert_eq!(done.message(), "Result: 1 + 2 = 3");
    }

    #[test]
    fn test_status_from_result() {
        let ok = RunStatus::from_result(Ok(ComputeOutcome { lhs: 2, rhs: 2, value: 4, expected: 4 }));
        assert!(matches!(ok, RunStatus::Done(_)));

        let failed = RunStatus::from_result(Err(ComputeError::Unsupported));
        assert_eq!(
            failed.message(),
            "Error: WebGPU is not supported in this browser"
        );
        assert!(!failed.is_running());
    }

    #[test]
    fn test_only_running_is_running() {
        assert!(RunStatus::Running.is_running());
        assert!(!RunStatus::Idle.is_running());
    }
}

use rtchart_core::{
    ChartDescription, ChartImage, ImageFormat, MonitorSettings, RenderBackend, RenderError,
};
use rtchart_runtime::{
    spawn_runtime, MonitorService, RuntimeError, RuntimeEvent, RuntimeMessage,
    EVENT_QUEUE_CAPACITY,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone, Default)]
struct CountingBackend {
    renders: Arc<AtomicUsize>,
}

impl RenderBackend for CountingBackend {
    fn render(&self, description: &ChartDescription) -> Result<ChartImage, RenderError> {
        self.renders.fetch_add(1, Ordering::SeqCst);
        Ok(ChartImage {
            format: ImageFormat::Svg,
            width: description.width,
            height: description.height,
            bytes: b"<svg/>".to_vec(),
        })
    }
}

struct PanickingBackend;

impl RenderBackend for PanickingBackend {
    fn render(&self, _description: &ChartDescription) -> Result<ChartImage, RenderError> {
        panic!("render backend crashed");
    }
}

fn fast_settings() -> MonitorSettings {
    MonitorSettings {
        generation_step_ms: 20,
        render_period_ms: 250,
        ..MonitorSettings::default()
    }
}

fn is_artifact(event: &RuntimeEvent) -> bool {
    matches!(event, RuntimeEvent::Artifact(_))
}

#[test]
fn service_starts_and_shuts_down() {
    let service = MonitorService::new(&fast_settings(), CountingBackend::default()).unwrap();
    assert!(service.shutdown().is_ok());
}

#[test]
fn running_monitor_publishes_values_and_charts() {
    let backend = CountingBackend::default();
    let service = MonitorService::new(&fast_settings(), backend.clone()).unwrap();

    let mut values = 0;
    let mut artifacts = 0;
    service
        .run_for_duration(Duration::from_millis(700), |event| match event {
            RuntimeEvent::Values(latest) => {
                assert!(!latest.is_empty());
                values += 1;
            }
            RuntimeEvent::Artifact(_) => artifacts += 1,
        })
        .unwrap();

    assert!(values > 0);
    assert!(artifacts > 0);
    assert!(backend.renders.load(Ordering::SeqCst) >= artifacts);
    assert!(service.snapshot().is_populated());
    service.shutdown().unwrap();
}

#[test]
fn frozen_monitor_keeps_sampling_without_rendering() {
    let backend = CountingBackend::default();
    let settings = MonitorSettings {
        running: false,
        ..fast_settings()
    };
    let service = MonitorService::new(&settings, backend.clone()).unwrap();

    let mut artifacts = 0;
    service
        .run_for_duration(Duration::from_millis(600), |event| {
            if is_artifact(&event) {
                artifacts += 1;
            }
        })
        .unwrap();

    assert_eq!(artifacts, 0);
    assert_eq!(backend.renders.load(Ordering::SeqCst), 0);
    assert!(service.snapshot().is_populated());
    service.shutdown().unwrap();
}

#[test]
fn threshold_change_renders_while_frozen() {
    let settings = MonitorSettings {
        running: false,
        ..fast_settings()
    };
    let service = MonitorService::new(&settings, CountingBackend::default()).unwrap();
    std::thread::sleep(Duration::from_millis(100));

    service.set_threshold(95.0).unwrap();
    let event = service
        .wait_for(Duration::from_secs(2), is_artifact)
        .expect("threshold change should render");

    match event {
        RuntimeEvent::Artifact(artifact) => {
            let mark = artifact.description.threshold.expect("data is present");
            assert_eq!(mark.value, 95.0);
        }
        RuntimeEvent::Values(_) => unreachable!(),
    }
    service.shutdown().unwrap();
}

#[test]
fn render_request_and_resume() {
    let settings = MonitorSettings {
        running: false,
        ..fast_settings()
    };
    let service = MonitorService::new(&settings, CountingBackend::default()).unwrap();

    service.request_render().unwrap();
    assert!(service
        .wait_for(Duration::from_secs(2), is_artifact)
        .is_some());

    service.set_render_period(250).unwrap();
    service.set_running(true).unwrap();
    assert!(service
        .wait_for(Duration::from_secs(2), is_artifact)
        .is_some());
    service.shutdown().unwrap();
}

#[test]
fn dropping_every_handle_stops_thread() {
    let handle = spawn_runtime(&fast_settings(), CountingBackend::default()).unwrap();
    handle.send(RuntimeMessage::SetRunning(false)).unwrap();
    drop(handle);
}

#[test]
fn shutdown_message_stops_thread() {
    let handle = spawn_runtime(&fast_settings(), CountingBackend::default()).unwrap();
    let window = handle.window().clone();
    handle.send(RuntimeMessage::Shutdown).unwrap();
    std::thread::sleep(Duration::from_millis(50));
    assert!(handle.send(RuntimeMessage::RequestRender).is_err());
    assert_eq!(window.capacity(), 240);
    assert!(handle.shutdown().is_ok());
}

#[test]
fn shorter_render_period_applies_from_now() {
    let settings = MonitorSettings {
        render_period_ms: 2_000,
        ..fast_settings()
    };
    let service = MonitorService::new(&settings, CountingBackend::default()).unwrap();
    let changed = Instant::now();
    service.set_render_period(250).unwrap();

    service
        .wait_for(Duration::from_secs(2), is_artifact)
        .expect("chart at the new period");
    assert!(changed.elapsed() < Duration::from_millis(1_000));

    let previous = Instant::now();
    service
        .wait_for(Duration::from_secs(2), is_artifact)
        .expect("next chart at the new period");
    let gap = previous.elapsed();
    assert!(gap >= Duration::from_millis(100), "gap {gap:?}");
    assert!(gap < Duration::from_millis(750), "gap {gap:?}");
    service.shutdown().unwrap();
}

#[test]
fn undrained_events_stay_bounded() {
    let handle = spawn_runtime(&fast_settings(), CountingBackend::default()).unwrap();
    std::thread::sleep(Duration::from_millis(1_500));

    let queued = handle.events().try_iter().count();
    assert!(queued > 0);
    assert!(queued <= EVENT_QUEUE_CAPACITY, "{queued} events queued");

    assert!(handle
        .events()
        .recv_timeout(Duration::from_secs(2))
        .is_ok());
    handle.shutdown().unwrap();
}

#[test]
fn setters_report_a_stopped_runtime() {
    let settings = MonitorSettings {
        running: false,
        ..fast_settings()
    };
    let service = MonitorService::new(&settings, PanickingBackend).unwrap();
    service.request_render().unwrap();

    let deadline = Instant::now() + Duration::from_secs(2);
    while service.set_running(false).is_ok() {
        assert!(Instant::now() < deadline, "runtime thread kept running");
        std::thread::sleep(Duration::from_millis(10));
    }
    assert!(matches!(
        service.set_threshold(100.0),
        Err(RuntimeError::Stopped)
    ));
    assert!(matches!(service.shutdown(), Err(RuntimeError::Panicked)));
}

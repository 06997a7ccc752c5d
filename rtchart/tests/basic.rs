use std::process::Command;
use tempfile::tempdir;

fn rtchart() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_rtchart"));
    command.env("RTCHART_LOG", "warn");
    command
}

#[test]
fn render_writes_svg_chart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("chart.svg");

    let output = rtchart()
        .args(["render", "--samples", "120", "--threshold", "150", "--output"])
        .arg(&path)
        .output()
        .expect("run rtchart render");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[RTChart][INFO] Chart written to"));
    assert!(stdout.contains("Alpha: "));
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Alarm = 150"));
}

#[test]
fn describe_is_deterministic_json() {
    let run = || {
        let output = rtchart()
            .args(["describe", "--samples", "40"])
            .output()
            .expect("run rtchart describe");
        assert!(output.status.success());
        output.stdout
    };
    let first = run();
    assert_eq!(first, run());

    let description: serde_json::Value = serde_json::from_slice(&first).unwrap();
    assert_eq!(description["title"], "Realtime Chart Demonstration");
    assert_eq!(description["lines"].as_array().unwrap().len(), 3);
    assert_eq!(description["threshold"]["label"], "Alarm = 210");
}

#[test]
fn config_init_then_show() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings").join("monitor.toml");

    let init = rtchart()
        .args(["config", "init"])
        .arg(&path)
        .output()
        .expect("run config init");
    assert!(init.status.success());
    assert!(path.exists());

    let again = rtchart()
        .args(["config", "init"])
        .arg(&path)
        .output()
        .expect("run config init twice");
    assert!(!again.status.success());

    let show = rtchart()
        .args(["config", "show"])
        .arg(&path)
        .output()
        .expect("run config show");
    assert!(show.status.success());
    let stdout = String::from_utf8_lossy(&show.stdout);
    assert!(stdout.contains("threshold = 210.0"));
    assert!(stdout.contains("render_period_ms = 1000"));
}

#[test]
fn short_live_run_writes_chart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("live.svg");

    let output = rtchart()
        .args(["run", "--duration-seconds", "1", "--period-ms", "250", "--output"])
        .arg(&path)
        .output()
        .expect("run rtchart run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[RTChart][INFO] Monitoring for 1s"));
    assert!(stdout.contains("Beta: "));
    assert!(std::fs::read_to_string(&path).unwrap().starts_with("<svg"));
}

#[test]
fn describe_keeps_only_the_newest_window() {
    let describe = |samples: &str, start: &str| {
        let output = rtchart()
            .args(["describe", "--samples", samples, "--start", start])
            .output()
            .expect("run rtchart describe");
        assert!(output.status.success());
        output.stdout
    };
    // 760 evicted samples of 250 ms move the window start by 190 s.
    assert_eq!(
        describe("1000", "2024-01-01T12:00:00Z"),
        describe("240", "2024-01-01T12:03:10Z")
    );

    let many: serde_json::Value =
        serde_json::from_slice(&describe("50000000", "2024-01-01T12:00:00Z")).unwrap();
    assert_eq!(many["lines"].as_array().unwrap().len(), 3);
}

#[test]
fn describe_rejects_sample_counts_past_the_time_range() {
    let output = rtchart()
        .args(["describe", "--samples", "40000000000000000"])
        .output()
        .expect("run rtchart describe");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("representable time range"));
    assert!(!stderr.contains("panicked"));
}

//! Scheduler behavior against a mocked camera and a fast-forward clock.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;

use dusklapse::common::logger::Log;
use dusklapse::core::{
    CaptureMode, CycleOutcome, Lens, Scheduler, SchedulerParams, SchedulerState, SessionPlan,
};
use dusklapse::device::{CaptureResult, DeviceCapability, MockDeviceDriver};
use dusklapse::error::{CycleError, DriverError, SessionError};
use dusklapse::exposure::{ExposureCurve, ExposureEngine, TrailRule};
use dusklapse::geo::Location;
use dusklapse::io::SessionLog;
use dusklapse::time::{SimulatedTimeSource, TimeSource};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 21, 20, 0, 0).unwrap()
}

fn plan(mode: CaptureMode, focal_length_mm: u32, rule: TrailRule, hours: f64) -> SessionPlan {
    SessionPlan::new(
        mode,
        Location::named("teresin").unwrap(),
        Lens {
            focal_length_mm,
            aperture: 2.8,
        },
        rule,
        ExposureCurve::Phased {
            apply_day_gradient: false,
        },
        1600,
        hours,
        t0(),
    )
    .unwrap()
}

fn engine(plan: &SessionPlan) -> ExposureEngine {
    ExposureEngine::new(
        plan.curve,
        plan.lens.focal_length_mm,
        plan.trail_rule,
        plan.aggressiveness,
        DeviceCapability::default_table(),
        plan.max_iso,
    )
    .unwrap()
}

fn driver() -> MockDeviceDriver {
    let mut driver = MockDeviceDriver::new();
    driver.expect_driver_name().return_const("mock");
    driver.expect_battery_level().returning(|| None);
    driver
}

fn night(_: f64, _: f64, _: DateTime<Utc>) -> Result<f64, CycleError> {
    Ok(-30.0)
}

fn timelapse(seconds: u64) -> CaptureMode {
    CaptureMode::Timelapse {
        interval: Duration::from_secs(seconds),
    }
}

#[test]
fn test_star_trails_session_takes_every_frame() {
    Log::set_enabled(false);
    let plan = plan(
        CaptureMode::StarTrails {
            exposure: 20.0,
            gap: 1.0,
            iso: 800,
        },
        20,
        TrailRule::Rule500,
        3.0,
    );
    let engine = engine(&plan);
    let clock = SimulatedTimeSource::new(t0());

    let mut driver = driver();
    driver
        .expect_capture()
        .times(514)
        .withf(|request| request.settings.shutter_seconds == 20.0 && request.settings.iso == 800)
        .returning(|_| Ok(CaptureResult::default()));

    let scheduler = Scheduler::new(SchedulerParams {
        plan,
        engine,
        driver: &mut driver,
        oracle: &night,
        clock: &clock,
        log: SessionLog::sink(),
    })
    .unwrap();
    let report = scheduler.run();

    assert_eq!(report.captured(), 514);
    let sleeps = clock.sleeps();
    assert_eq!(sleeps.len(), 513);
    assert!(sleeps.iter().all(|s| *s == Duration::from_secs(1)));
    let indices: Vec<u32> = report.records().map(|r| r.sequence_index).collect();
    assert_eq!(indices, (1..=514).collect::<Vec<_>>());
}

#[test]
fn test_star_trails_exposure_over_rule_is_rejected() {
    Log::set_enabled(false);
    let result = SessionPlan::new(
        CaptureMode::StarTrails {
            exposure: 20.0,
            gap: 1.0,
            iso: 800,
        },
        Location::named("teresin").unwrap(),
        Lens {
            focal_length_mm: 35,
            aperture: 2.8,
        },
        TrailRule::Rule500,
        ExposureCurve::Logarithmic,
        1600,
        3.0,
        t0(),
    );
    assert!(matches!(result, Err(SessionError::Configuration(_))));

    // A plan edited after construction is checked again by the scheduler
    let mut plan = plan(
        CaptureMode::StarTrails {
            exposure: 20.0,
            gap: 1.0,
            iso: 800,
        },
        20,
        TrailRule::Rule500,
        3.0,
    );
    let engine = engine(&plan);
    plan.lens.focal_length_mm = 50;
    let clock = SimulatedTimeSource::new(t0());
    let mut driver = MockDeviceDriver::new();
    driver.expect_capture().never();

    let result = Scheduler::new(SchedulerParams {
        plan,
        engine,
        driver: &mut driver,
        oracle: &night,
        clock: &clock,
        log: SessionLog::sink(),
    });
    assert!(matches!(result, Err(SessionError::Configuration(_))));
}

#[test]
fn test_timelapse_overrun_starts_next_cycle_immediately() {
    Log::set_enabled(false);
    // 36 second session at one frame every 10 seconds
    let plan = plan(timelapse(10), 35, TrailRule::Rule600, 0.01);
    let engine = engine(&plan);
    let clock = Arc::new(SimulatedTimeSource::new(t0()));

    let mut driver = driver();
    let camera_clock = Arc::clone(&clock);
    driver.expect_capture().returning(move |request| {
        let busy = if request.sequence_index == 2 { 15 } else { 2 };
        camera_clock.advance(Duration::from_secs(busy));
        Ok(CaptureResult::default())
    });

    let scheduler = Scheduler::new(SchedulerParams {
        plan,
        engine,
        driver: &mut driver,
        oracle: &night,
        clock: &*clock,
        log: SessionLog::sink(),
    })
    .unwrap();
    let report = scheduler.run();

    assert_eq!(clock.sleeps(), vec![Duration::from_secs(8); 3]);
    assert_eq!(report.captured(), 4);

    let times: Vec<DateTime<Utc>> = report.records().map(|r| r.wall_clock_time).collect();
    assert_eq!(times[1], t0() + chrono::Duration::seconds(10));
    // No catch-up after the overrun
    assert_eq!(times[2], t0() + chrono::Duration::seconds(25));
    assert_eq!(times[3], t0() + chrono::Duration::seconds(35));
    assert!(clock.now() >= t0() + chrono::Duration::seconds(36));
}

#[test]
fn test_skipped_cycle_consumes_its_index() {
    Log::set_enabled(false);
    let plan = plan(timelapse(60), 35, TrailRule::Rule600, 0.05);
    let engine = engine(&plan);
    let clock = SimulatedTimeSource::new(t0());

    let oracle = |_: f64, _: f64, at: DateTime<Utc>| -> Result<f64, CycleError> {
        if at == t0() + chrono::Duration::seconds(60) {
            Err(CycleError::OracleUnavailable("no fix".to_string()))
        } else {
            Ok(-30.0)
        }
    };

    let mut driver = driver();
    driver
        .expect_capture()
        .times(2)
        .withf(|request| request.sequence_index != 2)
        .returning(|_| Ok(CaptureResult::default()));

    let scheduler = Scheduler::new(SchedulerParams {
        plan,
        engine,
        driver: &mut driver,
        oracle: &oracle,
        clock: &clock,
        log: SessionLog::sink(),
    })
    .unwrap();
    let report = scheduler.run();

    assert_eq!(report.outcomes.len(), 3);
    assert!(matches!(
        &report.outcomes[1],
        CycleOutcome::Skipped(skipped)
            if skipped.sequence_index == 2
                && matches!(skipped.error, CycleError::OracleUnavailable(_))
    ));
    let indices: Vec<u32> = report.records().map(|r| r.sequence_index).collect();
    assert_eq!(indices, vec![1, 3]);
    // The skipped cycle still waits out its interval
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(60); 3]);
}

#[test]
fn test_capture_failure_is_recorded_and_session_continues() {
    Log::set_enabled(false);
    let plan = plan(timelapse(60), 35, TrailRule::Rule600, 0.05);
    let engine = engine(&plan);
    let clock = SimulatedTimeSource::new(t0());

    let mut driver = driver();
    driver.expect_capture().times(3).returning(|request| {
        if request.sequence_index == 2 {
            Err(DriverError::CommandFailed {
                command: "gphoto2 --capture-image-and-download".to_string(),
                status: 1,
                stderr: "Could not claim the USB device".to_string(),
            })
        } else {
            Ok(CaptureResult::default())
        }
    });

    let scheduler = Scheduler::new(SchedulerParams {
        plan,
        engine,
        driver: &mut driver,
        oracle: &night,
        clock: &clock,
        log: SessionLog::sink(),
    })
    .unwrap();
    let report = scheduler.run();

    assert_eq!(report.captured(), 2);
    assert_eq!(report.failed(), 1);
    match &report.outcomes[1] {
        CycleOutcome::CaptureFailed { record, error } => {
            assert_eq!(record.sequence_index, 2);
            assert_eq!(record.shutter_seconds, 15.0);
            assert!(matches!(error, CycleError::Capture(_)));
        }
        other => panic!("expected a failed capture, got {other:?}"),
    }
}

#[test]
fn test_future_start_waits_first() {
    Log::set_enabled(false);
    let start = t0() + chrono::Duration::hours(1);
    let plan = SessionPlan::new(
        timelapse(60),
        Location::named("tivoli").unwrap(),
        Lens {
            focal_length_mm: 24,
            aperture: 1.4,
        },
        TrailRule::Rule500,
        ExposureCurve::Logarithmic,
        1600,
        0.05,
        start,
    )
    .unwrap();
    let engine = engine(&plan);
    let clock = SimulatedTimeSource::new(t0());

    let mut driver = driver();
    driver
        .expect_capture()
        .times(3)
        .returning(|_| Ok(CaptureResult::default()));

    let scheduler = Scheduler::new(SchedulerParams {
        plan,
        engine,
        driver: &mut driver,
        oracle: &night,
        clock: &clock,
        log: SessionLog::sink(),
    })
    .unwrap();
    assert_eq!(scheduler.state(), SchedulerState::Idle);
    let report = scheduler.run();

    assert_eq!(clock.sleeps()[0], Duration::from_secs(3600));
    let first = report.records().next().unwrap();
    assert_eq!(first.wall_clock_time, start);
    assert_eq!(report.captured(), 3);
}

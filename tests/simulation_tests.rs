use sunshade::backend::{DryRunBackend, create_gamma_table};
use sunshade::common::utils::Timestamp;
use sunshade::core::outputs::OutputRegistry;
use sunshade::core::period::{ForceMode, Schedule, Scheduler, Settings};
use sunshade::core::{Core, CoreParams};
use sunshade::logger::Log;
use sunshade::signals::{SignalMessage, SignalState};
use sunshade::time_source::{SimulatedTimeSource, TimeSource};

// 2024-03-20 00:00:00 UTC
const EQUINOX: Timestamp = 1_710_892_800;

fn equator_core(start: Timestamp, outputs: OutputRegistry) -> Core<DryRunBackend> {
    Log::set_enabled(false);
    let settings = Settings::new(
        6500,
        4000,
        1.0,
        Schedule::Solar {
            latitude: 0.0,
            longitude: 0.0,
        },
        vec![10, 25, 50, 100],
    )
    .unwrap();
    Core::new(CoreParams {
        scheduler: Scheduler::new(settings, start),
        outputs,
        backend: DryRunBackend::new(false),
    })
}

fn single_output(ramp_size: usize) -> OutputRegistry {
    let mut outputs = OutputRegistry::new(Vec::new());
    outputs.add(1);
    outputs.set_name(1, "DP-1");
    outputs.set_ramp_size(1, ramp_size);
    outputs
}

#[test]
fn test_fast_forward_day() {
    let time = SimulatedTimeSource::new(EQUINOX, EQUINOX + 86400, 0.0).unwrap();
    let mut core = equator_core(EQUINOX, single_output(256));
    let signals = SignalState::new();

    core.run(&time, &signals).unwrap();

    assert!(time.is_ended());
    let night = create_gamma_table(256, 4000, 1.0).unwrap();
    let day = create_gamma_table(256, 6500, 1.0).unwrap();
    let applied = core.backend().applied();

    // Night, a morning ramp, day, an evening ramp, night again
    assert!(applied.len() > 20, "only {} ramps applied", applied.len());
    assert_eq!(applied.first().unwrap().table, night);
    assert_eq!(applied.last().unwrap().table, night);
    assert!(applied.iter().any(|ramp| ramp.table == day));
    assert!(applied.iter().all(|ramp| ramp.output == 1));
    assert_eq!(core.applied_temperature(), Some(4000));

    // Every submission differs from the one before it
    assert!(applied.windows(2).all(|pair| pair[0].table != pair[1].table));
}

#[test]
fn test_stopped_before_start() {
    let time = SimulatedTimeSource::new(EQUINOX, EQUINOX + 86400, 0.0).unwrap();
    let mut core = equator_core(EQUINOX, single_output(256));
    let signals = SignalState::new();
    signals.request_shutdown();

    core.run(&time, &signals).unwrap();

    assert!(core.backend().applied().is_empty());
    assert_eq!(time.now(), EQUINOX);
}

#[test]
fn test_toggle_message_forces_day() {
    let time = SimulatedTimeSource::new(EQUINOX, EQUINOX + 86400, 0.0).unwrap();
    let mut core = equator_core(EQUINOX, single_output(256));
    let signals = SignalState::new();
    signals.sender.send(SignalMessage::ToggleForced).unwrap();

    core.run(&time, &signals).unwrap();

    assert!(time.is_ended());
    assert_eq!(core.scheduler().forced(), ForceMode::High);
    let applied = core.backend().applied();
    // Night before the toggle, then pinned to day for the rest of the run
    assert_eq!(applied.len(), 2);
    assert_eq!(applied[0].table, create_gamma_table(256, 4000, 1.0).unwrap());
    assert_eq!(applied[1].table, create_gamma_table(256, 6500, 1.0).unwrap());
}

#[test]
fn test_outputs_share_ramp_sizes() {
    let mut outputs = single_output(256);
    outputs.add(2);
    outputs.set_ramp_size(2, 1024);
    outputs.add(3);
    // Output 3 never reports a ramp size and is skipped
    let mut core = equator_core(EQUINOX, outputs);

    core.tick(EQUINOX).unwrap();

    let backend = core.backend();
    assert_eq!(backend.applied().len(), 2);
    assert_eq!(backend.last_for(1).unwrap().table.ramp_size(), 256);
    assert_eq!(backend.last_for(2).unwrap().table.ramp_size(), 1024);
    assert!(backend.last_for(3).is_none());
}

#[test]
fn test_late_output_joins_mid_day() {
    let mut core = equator_core(EQUINOX, single_output(256));
    let noon = EQUINOX + 12 * 3600;
    core.tick(noon).unwrap();
    assert_eq!(core.backend().applied().len(), 1);

    // A display plugged in later gets the current ramp on the next tick
    core.outputs_mut().add(2);
    core.outputs_mut().set_ramp_size(2, 256);
    core.tick(noon + 60).unwrap();

    let applied = core.backend().applied();
    assert_eq!(applied.len(), 2);
    assert_eq!(applied[1].output, 2);
    assert_eq!(applied[1].table, create_gamma_table(256, 6500, 1.0).unwrap());
}

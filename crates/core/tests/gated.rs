//! The `_gated` macro family follows the `enable-timing` feature; the plain
//! family is active either way.

use std::time::Duration;

use calltree_core::{
    ManualClock, finished_iteration, finished_iteration_gated, install_clock, is_at_root,
    long_tic_gated, long_toc_gated, lookup, reset_timing_gated, snapshot, tic, tic_gated, toc_gated,
};

fn instrumented_library_call(clock: &ManualClock) {
    tic_gated!(gated_library_call);
    clock.advance(Duration::from_micros(40));
    toc_gated!(gated_library_call);
    long_tic_gated!(gated_long_phase);
    clock.advance(Duration::from_micros(2));
    long_toc_gated!(gated_long_phase);
}

#[test]
fn always_active_forms_ignore_the_feature() {
    let clock = ManualClock::new();
    install_clock(clock.clone());
    {
        tic!(application_step);
        instrumented_library_call(&clock);
    }
    finished_iteration!();
    finished_iteration_gated!();

    let root = snapshot();
    let step = root.child("application_step").expect("application_step");
    assert_eq!(step.cpu_total_us, 42);
    assert!(is_at_root());
}

#[cfg(not(feature = "enable-timing"))]
#[test]
fn gated_forms_leave_no_trace_when_disabled() {
    let clock = ManualClock::new();
    install_clock(clock.clone());
    instrumented_library_call(&clock);

    let root = snapshot();
    assert_eq!(root.node_count(), 1);
    assert!(lookup("gated_library_call").is_none());
    assert!(lookup("gated_long_phase").is_none());
}

#[cfg(feature = "enable-timing")]
#[test]
fn gated_forms_record_when_enabled() {
    let clock = ManualClock::new();
    install_clock(clock.clone());
    instrumented_library_call(&clock);
    finished_iteration_gated!();

    let root = snapshot();
    let call = root.child("gated_library_call").expect("gated_library_call");
    assert_eq!((call.closes, call.cpu_total_us, call.iterations), (1, 40, 1));
    assert!(root.child("gated_long_phase").is_some());
    assert!(lookup("gated_library_call").is_some());

    reset_timing_gated!();
    assert_eq!(snapshot().node_count(), 1);
}

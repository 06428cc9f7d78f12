//! Noise rejection, link failure, and ordering edge cases

use rs_trackstate::{
    config::Config,
    hal::{MockClock, MockDisplay, MockLink, MockMux, MockProbe},
    mcan::DeviceHash,
    monitor::TrackMonitor,
    mux::{CHECK_MIN_ZEROS, PORTS_MAX},
    traits::ControllerLink,
};

type TestMonitor = TrackMonitor<MockMux, MockProbe, MockLink, MockDisplay, MockClock>;

fn monitor() -> TestMonitor {
    TrackMonitor::new(
        MockMux::new(),
        MockProbe::up(),
        MockLink::new(),
        MockDisplay::new(),
        MockClock::new(),
        DeviceHash::from_uid(0xCAFE_0001),
        &Config::default(),
    )
}

// ============================================================================
// Noise rejection
// ============================================================================

#[test]
fn short_glitch_does_not_report() {
    let mut m = monitor();
    m.start();

    // Burst of low readings shorter than the debounce threshold, the
    // line then settles back high.
    let glitch = vec![true; (CHECK_MIN_ZEROS - 1) as usize];
    m.bus_mut().push_samples(4, &glitch);

    let outcome = m.run_cycle();
    assert!(!outcome.changed);
    assert!(m.transport_mut().link().frames.is_empty());
}

#[test]
fn chattering_closed_contact_reports_once() {
    let mut m = monitor();
    m.start();

    // Wheel bounce: low readings interleaved with highs over a steadily
    // closed contact still accumulate to the threshold.
    let mut bounce = Vec::new();
    for _ in 0..CHECK_MIN_ZEROS {
        bounce.push(true);
        bounce.push(false);
    }
    m.bus_mut().push_samples(7, &bounce);
    m.bus_mut().set_contact(7, true);

    let outcome = m.run_cycle();
    assert!(outcome.changed);
    assert_eq!(outcome.frames_sent, 1);
    assert_eq!(m.transport_mut().link().frames[0].contact_no(), 7);
}

#[test]
fn glitch_on_one_channel_leaves_others_alone() {
    let mut m = monitor();
    m.bus_mut().set_contact(2, true);
    m.start();

    m.bus_mut().push_samples(9, &[true, true, true]);

    let outcome = m.run_cycle();
    assert!(!outcome.changed);
    assert_eq!(m.view().contacts.as_str(), "--#-------------");
}

// ============================================================================
// Link failure
// ============================================================================

#[test]
fn mid_batch_failure_drops_the_tail() {
    let mut m = monitor();
    m.start();

    m.transport_mut().link_mut().fail_after = Some(2);
    for ch in 0..5 {
        m.bus_mut().set_contact(ch, true);
    }

    let outcome = m.run_cycle();
    assert!(outcome.changed);
    assert_eq!(outcome.frames_sent, 2);
    assert!(!outcome.link_up);

    // The truncated batch is gone for good.
    m.transport_mut().link_mut().fail_after = None;
    m.transport_mut().probe_mut().queue_results(&[true]);
    m.clock_mut().advance(10_000);
    let outcome = m.run_cycle();
    assert!(!outcome.changed);
    assert_eq!(m.transport_mut().link().frames.len(), 2);
    assert!(outcome.link_up);
}

#[test]
fn connect_refused_marks_link_down() {
    let mut m = monitor();
    m.start();

    // Probe succeeds but the station refuses the data connection.
    m.transport_mut().link_mut().fail_connect = true;
    m.bus_mut().set_contact(0, true);

    let outcome = m.run_cycle();
    assert_eq!(outcome.frames_sent, 0);
    assert!(!outcome.link_up);
    assert!(m.transport_mut().link().frames.is_empty());
}

#[test]
fn connection_closed_after_every_batch() {
    let mut m = monitor();
    m.start();

    m.bus_mut().set_contact(0, true);
    m.run_cycle();
    m.bus_mut().set_contact(1, true);
    m.run_cycle();

    let link = m.transport_mut().link();
    assert_eq!(link.connect_calls, 2);
    assert_eq!(link.close_calls, 2);
    assert!(!link.is_connected());
}

// ============================================================================
// Ordering and counters
// ============================================================================

#[test]
fn mixed_transitions_stay_in_channel_order() {
    let mut m = monitor();
    m.bus_mut().set_contact(1, true);
    m.bus_mut().set_contact(14, true);
    m.start();

    // Channel 1 releases while 0 and 14 would sort around it.
    m.bus_mut().set_contact(0, true);
    m.bus_mut().set_contact(1, false);

    m.run_cycle();

    let frames = &m.transport_mut().link().frames;
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].contact_no(), 0);
    assert!(frames[0].new_state());
    assert_eq!(frames[1].contact_no(), 1);
    assert!(!frames[1].new_state());
}

#[test]
fn simultaneous_set_and_release_in_one_batch() {
    let mut m = monitor();
    for ch in 0..PORTS_MAX {
        m.bus_mut().set_contact(ch, ch % 2 == 0);
    }
    m.start();

    // Invert every channel at once.
    for ch in 0..PORTS_MAX {
        m.bus_mut().set_contact(ch, ch % 2 != 0);
    }

    let outcome = m.run_cycle();
    assert_eq!(outcome.frames_sent, 16);

    for frame in &m.transport_mut().link().frames {
        let even = frame.contact_no() % 2 == 0;
        assert_eq!(frame.old_state(), even);
        assert_eq!(frame.new_state(), !even);
    }
}

#[test]
fn time_counter_wraps_after_655_seconds() {
    let mut m = monitor();
    m.start();

    // 70_000 ticks of 10 ms exceed the u16 range by 4_464.
    m.clock_mut().set(700_000);
    m.bus_mut().set_contact(0, true);
    m.run_cycle();

    assert_eq!(m.transport_mut().link().frames[0].time_10ms(), 4_464);
}

#[test]
fn time_counter_is_relative_to_startup() {
    let mut m = monitor();
    m.clock_mut().set(50_000);
    m.start();

    m.clock_mut().advance(340);
    m.bus_mut().set_contact(0, true);
    m.run_cycle();

    assert_eq!(m.transport_mut().link().frames[0].time_10ms(), 34);
}

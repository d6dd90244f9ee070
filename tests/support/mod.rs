#![allow(dead_code)]

use now_playing::{
    resolver::{Asset, MemoryResolver},
    simulated::{silent_wav, ManualClock, SimulatedBackend},
    PlaybackSession,
};

pub type TestSession = PlaybackSession<SimulatedBackend, MemoryResolver>;

// Low sample rate keeps a three minute fixture small
const FIXTURE_RATE: u32 = 1000;

/// Assets: `forest` (180 s wav), `short` (2 s wav), `broken` (not audio).
pub fn resolver() -> MemoryResolver {
    MemoryResolver::new()
        .with(Asset::new("forest", silent_wav(180, FIXTURE_RATE)).with_extension("wav"))
        .with(Asset::new("short", silent_wav(2, FIXTURE_RATE)).with_extension("wav"))
        .with(Asset::new("broken", b"definitely not audio".to_vec()).with_extension("mp3"))
}

pub fn session() -> (ManualClock, TestSession) {
    let clock = ManualClock::new();
    let session = PlaybackSession::new(SimulatedBackend::new(clock.clone()), resolver());
    (clock, session)
}

pub fn loaded(name: &str) -> (ManualClock, TestSession) {
    let (clock, mut session) = session();
    session.load(name).expect("fixture loads");
    (clock, session)
}

pub fn assert_zeroed(session: &TestSession) {
    assert!(!session.is_loaded());
    assert!(!session.is_playing());
    assert_eq!(session.position_seconds(), 0.0);
    assert_eq!(session.duration_seconds(), 0.0);
}

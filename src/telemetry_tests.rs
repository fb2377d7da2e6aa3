use super::*;

#[test]
fn quiet_wins_over_verbose() {
    assert_eq!(level_for(3, true), Level::ERROR);
}

#[test]
fn verbosity_raises_level() {
    assert_eq!(level_for(0, false), Level::WARN);
    assert_eq!(level_for(1, false), Level::INFO);
    assert_eq!(level_for(2, false), Level::DEBUG);
    assert_eq!(level_for(5, false), Level::TRACE);
}

#[test]
fn init_is_idempotent() {
    init_tracing(Level::WARN);
    init_tracing(Level::DEBUG);
}

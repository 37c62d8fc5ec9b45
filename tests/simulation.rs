use flowdeck::model::{EdgeRef, SimulationStep};
use flowdeck::script::{DEFAULT_REGION, build_script};
use flowdeck::sim::{COMPLETION_LOG, CONSOLE_CAPACITY, ConsoleLog, SimPhase, SimulationEngine};

fn step(node: &str, edge: Option<(&str, &str)>, log: &str) -> SimulationStep {
    SimulationStep {
        step_id: 0,
        node: node.into(),
        edge: edge.map(|(a, b)| EdgeRef::new(a, b)),
        log: log.into(),
        payload: None,
    }
}

#[test]
fn test_engine_starts_idle() {
    let engine = SimulationEngine::new(DEFAULT_REGION);
    assert_eq!(engine.phase(), SimPhase::Idle);
    assert_eq!(engine.cursor(), None);
    assert!(engine.active_node().is_none());
    assert!(engine.active_edge().is_none());
    assert!(engine.payload().is_none());
    assert!(engine.console().is_empty());
}

#[test]
fn test_start_applies_first_step() {
    let mut engine = SimulationEngine::new(DEFAULT_REGION);
    engine.start();
    assert_eq!(engine.cursor(), Some(0));
    assert_eq!(engine.active_node(), Some("consumer_app"));
    assert!(engine.active_edge().is_none());
    assert_eq!(
        engine.console().newest(),
        Some("Usuário abre App em São Paulo")
    );
}

#[test]
fn test_start_while_running_is_noop() {
    let mut engine = SimulationEngine::new(DEFAULT_REGION);
    engine.start();
    engine.advance();
    let cursor = engine.cursor();
    let console_len = engine.console().len();
    engine.start();
    assert_eq!(engine.cursor(), cursor);
    assert_eq!(engine.console().len(), console_len);
}

#[test]
fn test_advance_outside_run_is_noop() {
    let mut engine = SimulationEngine::new(DEFAULT_REGION);
    engine.advance();
    assert_eq!(engine.phase(), SimPhase::Idle);
    assert!(engine.console().is_empty());
}

#[test]
fn test_cursor_advances_monotonically_to_completion() {
    let mut engine = SimulationEngine::new(DEFAULT_REGION);
    engine.start();
    let n = engine.step_count();
    for expected in 1..n {
        engine.advance();
        assert_eq!(engine.cursor(), Some(expected));
    }
    engine.advance();
    assert_eq!(engine.phase(), SimPhase::Completed);
    assert!(engine.active_node().is_none());
    assert!(engine.active_edge().is_none());
    assert_eq!(engine.console().newest(), Some(COMPLETION_LOG));
    // Completed is terminal for advance().
    engine.advance();
    assert_eq!(engine.phase(), SimPhase::Completed);
}

#[test]
fn test_each_step_logs_once() {
    let steps = vec![
        step("a", None, "first"),
        step("b", Some(("a", "b")), "second"),
    ];
    let mut engine = SimulationEngine::from_steps("Test", steps);
    engine.start();
    assert_eq!(engine.console().len(), 1);
    engine.advance();
    assert_eq!(engine.console().len(), 2);
    assert_eq!(engine.console().newest(), Some("second"));
    assert_eq!(engine.active_edge(), Some(&EdgeRef::new("a", "b")));
}

#[test]
fn test_reset_clears_highlight_keeps_console() {
    let mut engine = SimulationEngine::new(DEFAULT_REGION);
    engine.start();
    engine.advance();
    let console_len = engine.console().len();
    engine.reset();
    assert_eq!(engine.phase(), SimPhase::Idle);
    assert!(engine.active_node().is_none());
    assert!(engine.active_edge().is_none());
    assert!(engine.payload().is_none());
    assert_eq!(engine.console().len(), console_len);
}

#[test]
fn test_restart_clears_console() {
    let mut engine = SimulationEngine::new(DEFAULT_REGION);
    engine.start();
    engine.advance();
    engine.advance();
    engine.reset();
    engine.start();
    assert_eq!(engine.console().len(), 1);
    assert_eq!(engine.cursor(), Some(0));
}

#[test]
fn test_empty_script_completes_immediately() {
    let mut engine = SimulationEngine::from_steps("Test", vec![]);
    engine.start();
    assert_eq!(engine.phase(), SimPhase::Completed);
    assert_eq!(engine.console().newest(), Some(COMPLETION_LOG));
}

#[test]
fn test_region_switch_resets_and_rebuilds() {
    let mut engine = SimulationEngine::new(DEFAULT_REGION);
    engine.start();
    engine.advance();
    engine.set_region("Rio de Janeiro");
    assert_eq!(engine.region(), "Rio de Janeiro");
    assert_eq!(engine.phase(), SimPhase::Idle);
    assert_eq!(engine.steps()[0].log, build_script("Rio de Janeiro")[0].log);
    engine.start();
    assert_eq!(
        engine.console().newest(),
        Some("Usuário abre App em Rio de Janeiro")
    );
}

#[test]
fn test_region_switch_same_region_keeps_run() {
    let mut engine = SimulationEngine::new(DEFAULT_REGION);
    engine.start();
    engine.advance();
    engine.set_region(DEFAULT_REGION);
    assert_eq!(engine.cursor(), Some(1));
}

#[test]
fn test_console_capacity_evicts_oldest() {
    let mut console = ConsoleLog::new(CONSOLE_CAPACITY);
    for i in 0..CONSOLE_CAPACITY + 3 {
        console.push(format!("msg {i}"));
    }
    assert_eq!(console.len(), CONSOLE_CAPACITY);
    assert_eq!(console.newest(), Some("msg 11"));
    // Oldest surviving entry is the capacity-th newest.
    assert_eq!(console.entries().last(), Some("msg 3"));
}

#[test]
fn test_console_newest_first_ordering() {
    let mut console = ConsoleLog::new(3);
    console.push("one");
    console.push("two");
    console.push("three");
    let entries: Vec<_> = console.entries().collect();
    assert_eq!(entries, vec!["three", "two", "one"]);
}

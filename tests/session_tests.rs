// Integration tests for suspendable sessions

use tapetty::interpreter::{run, ConfigError, ExitCode, InterpreterConfig, SessionError};
use tapetty::session::Session;

fn start(chunks: &[&str], input: &str) -> Session {
    Session::initialize(chunks, input, &InterpreterConfig::default())
        .expect("default config is valid")
}

#[test]
fn test_single_chunk_runs_to_completion() {
    let session = start(&["(+):+++++"], "");

    assert!(!session.can_continue());
    assert!(session.breakpoints().is_empty());
    let result = session.result();
    assert_eq!(result.exit_code, ExitCode::SUCCESS | ExitCode::NO_OUTPUT);
    assert_eq!(result.tape.current_value(), 6);
    assert_eq!(result.total_operations, 7);
}

#[test]
fn test_pause_between_chunks() {
    let mut session = start(&["+++++", "---"], "");

    assert!(session.can_continue());
    let result = session.result();
    assert!(result.has_flag(ExitCode::BREAKPOINT_REACHED));
    assert!(result.exit_code.is_success());
    assert_eq!(result.breakpoint, Some(5));
    assert_eq!(result.tape.current_value(), 5);
    assert_eq!(result.total_operations, 5);

    session.resume().unwrap();
    assert!(!session.can_continue());
    let result = session.result();
    assert!(!result.has_flag(ExitCode::BREAKPOINT_REACHED));
    assert_eq!(result.breakpoint, None);
    assert_eq!(result.tape.current_value(), 2);
    assert_eq!(result.total_operations, 8);
}

#[test]
fn test_breakpoint_inside_function_body() {
    let mut session = start(&["++(>+", "-)>++:"], "");

    assert!(session.can_continue());
    assert_eq!(session.breakpoints(), vec![5]);
    assert_eq!(session.result().tape.current_value(), 1);
    assert_eq!(session.result().total_operations, 8);

    session.resume().unwrap();
    assert!(!session.can_continue());
    let result = session.result();
    assert!(result.exit_code.is_success());
    assert_eq!(result.tape.current_value(), 0);
    assert_eq!(result.total_operations, 9);
}

#[test]
fn test_function_called_twice_pauses_twice() {
    let mut session = start(&["(>+", "+<)::"], "");

    let mut pauses = 0;
    while session.can_continue() {
        assert_eq!(session.result().breakpoint, Some(3));
        pauses += 1;
        session.resume().unwrap();
    }

    assert_eq!(pauses, 2);
    let result = session.result();
    assert!(result.exit_code.is_success());
    assert_eq!(result.tape.cells()[..2], [0, 4]);
    assert_eq!(result.total_operations, 10);
}

#[test]
fn test_breakpoint_inside_loop_pauses_every_iteration() {
    let mut session = start(&["+++[>+<", "-]"], "");

    let mut pauses = 0;
    while session.can_continue() {
        pauses += 1;
        session.resume().unwrap();
    }

    assert_eq!(pauses, 3);
    let result = session.result();
    assert!(result.exit_code.is_success());
    assert_eq!(result.tape.cells()[..2], [0, 3]);
    assert_eq!(result.total_operations, 3 + 1 + 3 * 5);
}

#[test]
fn test_empty_chunks_add_no_breakpoints() {
    let session = start(&["++", "ab>", "", "xy", "-"], "");
    assert_eq!(session.breakpoints(), vec![4, 7]);
    assert_eq!(session.result().breakpoint, Some(4));
}

#[test]
fn test_output_and_input_carry_over() {
    let mut session = start(&[",.", ",."], "ab");

    let result = session.result();
    assert_eq!(result.output, "a");
    assert!(result.has_flag(ExitCode::TEXT_OUTPUT));
    let first_elapsed = result.elapsed;

    session.resume().unwrap();
    let result = session.result();
    assert_eq!(result.output, "ab");
    assert_eq!(result.total_operations, 4);
    assert!(result.elapsed >= first_elapsed);
}

#[test]
fn test_run_to_completion_ignores_breakpoints() {
    let mut session = start(&["+", "+", "+"], "");
    assert_eq!(session.result().breakpoint, Some(1));

    session.run_to_completion().unwrap();
    assert!(!session.can_continue());
    assert_eq!(session.result().tape.current_value(), 3);
}

#[test]
fn test_failure_after_resume() {
    let mut session = start(&["+", "<<"], "");
    session.resume().unwrap();

    assert!(!session.can_continue());
    let result = session.result();
    assert!(result
        .exit_code
        .contains(ExitCode::FAILURE | ExitCode::LOWER_BOUND_EXCEEDED));
    assert_eq!(result.trace.as_ref().expect("trace").offset, 1);
    assert_eq!(result.total_operations, 1);
}

#[test]
fn test_terminated_session_cannot_continue() {
    let mut session = start(&["+", "+"], "");
    session.resume().unwrap();

    assert_eq!(session.resume(), Err(SessionError::Terminated));
    assert_eq!(session.run_to_completion(), Err(SessionError::Terminated));
    // The last result is left untouched
    assert_eq!(session.result().tape.current_value(), 2);
}

#[test]
fn test_invalid_scripts_terminate_immediately() {
    let mut session = start(&["+[", "]]"], "");
    assert!(!session.can_continue());
    let result = session.result();
    assert!(result.has_flag(ExitCode::MISMATCHED_PARENTHESES));
    assert_eq!(result.trace.as_ref().expect("trace").offset, 3);
    assert_eq!(session.resume(), Err(SessionError::Terminated));

    let session = start(&["no code", "here"], "");
    assert!(!session.can_continue());
    assert!(session.result().has_flag(ExitCode::NO_CODE_INTERPRETED));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = InterpreterConfig::default().with_tape_size(0);
    let err = Session::initialize(&["+"], "", &config).unwrap_err();
    assert_eq!(err, ConfigError::EmptyTape);
}

#[test]
fn test_stepping_matches_one_shot_run() {
    let chunks = ["+(,[>+<-]>", ".)>", "+:", ">++[-]<"];
    let mut session = start(&chunks, "a");
    while session.can_continue() {
        session.resume().unwrap();
    }

    let expected = run(&chunks.concat(), "a", &InterpreterConfig::default()).unwrap();
    let result = session.result();
    assert_eq!(result.exit_code, expected.exit_code);
    assert_eq!(result.tape, expected.tape);
    assert_eq!(result.output, expected.output);
    assert_eq!(result.total_operations, expected.total_operations);
    assert_eq!(result.functions, expected.functions);
}

#[test]
fn test_pauses_at_every_depth_of_a_recursive_call() {
    // The breakpoint is the `:` inside the body, reached once per depth
    let config = InterpreterConfig::default().with_tape_size(4);
    let mut session = Session::initialize(&["+(>+", ":):"], "", &config).unwrap();

    let mut pauses = 0;
    while session.can_continue() {
        pauses += 1;
        assert_eq!(session.result().breakpoint, Some(4));
        assert_eq!(session.result().tape.position(), pauses);
        session.resume().unwrap();
    }

    assert_eq!(pauses, 3);
    let result = session.result();
    assert!(result
        .exit_code
        .contains(ExitCode::FAILURE | ExitCode::UPPER_BOUND_EXCEEDED));
    assert_eq!(result.trace.as_ref().expect("trace").frames.len(), 5);
}

use std::time::Duration;

use proptest::prelude::*;
use tapetty::interpreter::{run, ExitCode, InterpreterConfig};
use tapetty::memory::OverflowMode;
use tapetty::session::Session;

/// Programs that run to completion on the default tape with input "hi"
const PROGRAMS: &[&str] = &[
    "+++[>++<-]>.",
    "(+++):>:",
    "+(,[>+<-]>.)>+:",
    ">,[>+<-]>[-]<<,.",
    "++[>++[>+<-]<-]>>.",
];

fn text_without_operators() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 \n\t!?=_]{0,64}"
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn scripts_without_operators_are_rejected(source in text_without_operators()) {
        let result = run(&source, "", &InterpreterConfig::default()).unwrap();
        prop_assert_eq!(
            result.exit_code,
            ExitCode::FAILURE | ExitCode::NO_CODE_INTERPRETED | ExitCode::NO_OUTPUT
        );
        prop_assert_eq!(result.total_operations, 0);
        prop_assert!(result.tape.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn pausing_anywhere_does_not_change_the_outcome(
        program in proptest::sample::select(PROGRAMS),
        split in 0usize..=20,
        finish in any::<bool>(),
    ) {
        let split = split.min(program.len());
        let config = InterpreterConfig::default();
        let expected = run(program, "hi", &config).unwrap();

        let chunks = [&program[..split], &program[split..]];
        let mut session = Session::initialize(&chunks, "hi", &config).unwrap();
        if finish {
            if session.can_continue() {
                session.run_to_completion().unwrap();
            }
        } else {
            while session.can_continue() {
                session.resume().unwrap();
            }
        }

        let result = session.result();
        prop_assert_eq!(result.exit_code, expected.exit_code);
        prop_assert_eq!(&result.tape, &expected.tape);
        prop_assert_eq!(&result.output, &expected.output);
        prop_assert_eq!(result.total_operations, expected.total_operations);
    }

    #[test]
    fn byte_mode_arithmetic_wraps(ops in proptest::collection::vec(any::<bool>(), 1..600)) {
        let source: String = ops.iter().map(|&up| if up { '+' } else { '-' }).collect();
        let expected = ops
            .iter()
            .fold(0u8, |v, &up| if up { v.wrapping_add(1) } else { v.wrapping_sub(1) });

        let config = InterpreterConfig::default().with_mode(OverflowMode::ByteOverflow);
        let result = run(&source, "", &config).unwrap();
        prop_assert!(result.exit_code.is_success());
        prop_assert_eq!(result.tape[0], u16::from(expected));
        prop_assert_eq!(result.total_operations, ops.len() as u64);
    }

    #[test]
    fn results_are_always_well_formed(source in "[-+<>.,\\[\\]()]{0,40}") {
        let config = InterpreterConfig::default().with_time_budget(Duration::from_millis(20));
        let result = run(&source, "abc", &config).unwrap();

        let code = result.exit_code;
        prop_assert!(code.contains(ExitCode::SUCCESS) != code.contains(ExitCode::FAILURE));
        prop_assert!(code.contains(ExitCode::NO_OUTPUT) != code.contains(ExitCode::TEXT_OUTPUT));
        prop_assert_eq!(code.contains(ExitCode::TEXT_OUTPUT), !result.output.is_empty());
        if !code.contains(ExitCode::NO_CODE_INTERPRETED) {
            prop_assert_eq!(code.is_failure(), result.trace.is_some());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use proptest::prelude::*;

    fn run(source: &str) -> Vec<String> {
        run_source(source, Vec::new()).expect("program failed")
    }

    #[test]
    fn test_scalar_output() {
        assert_eq!(run("VAR a := 10; OUTPUT a;"), vec!["a=10"]);
    }

    #[test]
    fn test_parenthesised_arithmetic() {
        let source = "VAR x := 3; VAR y := 4; VAR z := (x + y) * 2; OUTPUT z;";
        assert_eq!(run(source), vec!["z=14"]);
    }

    #[test]
    fn test_conditional() {
        assert_eq!(run("VAR a := 7; IF (a >= 5) THEN { OUTPUT a; } ;"), vec!["a=7"]);
    }

    #[test]
    fn test_loop() {
        let source = "VAR a := 0; VAR n := 5; WHILE (a < n) DO { a := a + 1; } ; OUTPUT a;";
        assert_eq!(run(source), vec!["a=5"]);
    }

    #[test]
    fn test_array() {
        let source = "ARRAY v (3); v[0] := 10; v[1] := 20; v[2] := v[0] + v[1]; OUTPUT v[2];";
        assert_eq!(run(source), vec!["30"]);
    }

    #[test]
    fn test_input() {
        let output = run_source("VAR a; INPUT a; OUTPUT a;", vec![42]).unwrap();
        assert_eq!(output, vec!["a=42"]);
    }

    #[test]
    fn test_division_by_zero_is_fatal() {
        let err = run_source("VAR a := 1; OUTPUT a / 0;", Vec::new()).unwrap_err();
        assert!(matches!(err, OpsError::Runtime(RuntimeError::DivisionByZero)));
    }

    #[test]
    fn test_unclosed_block_is_a_parse_error() {
        let err = run_source("IF (1 < 2) THEN { OUTPUT 1;", Vec::new()).unwrap_err();
        assert!(matches!(err, OpsError::Parse(_)));
    }

    #[test]
    fn test_out_of_range_read_names_the_index() {
        let err = run_source("ARRAY v (3); OUTPUT v[5];", Vec::new()).unwrap_err();
        assert!(err.to_string().contains("index 5 out of range"));
    }

    #[test]
    fn test_unknown_character_is_a_lex_error() {
        let err = run_source("VAR a := 1 € 2;", Vec::new()).unwrap_err();
        assert!(matches!(err, OpsError::Lex(_)));
    }

    /// Every `M<n>` emitted by a successful parse points inside the
    /// program (the end position included), and no placeholder survives.
    #[test]
    fn test_labels_are_well_formed() {
        let source = "VAR a := 0; \
                      WHILE (a < 4) DO { \
                        IF (a == 2) THEN { OUTPUT a; } ELSE { OUTPUT 0; } ; \
                        a := a + 1; \
                      } ; \
                      OUTPUT a;";
        let program = compile(source).unwrap();
        for elem in program.iter() {
            assert_ne!(elem.kind, OpsKind::LabelPlaceholder);
            if elem.kind == OpsKind::Label {
                let target = ops::label_target(&elem.value).expect("unparsable label");
                assert!(target <= program.len(), "label {} past end", elem.value);
            }
        }
    }

    /// A loop whose condition eventually fails falls through past the
    /// back jump instead of spinning.
    #[test]
    fn test_loop_exit_falls_past_back_jump() {
        let source = "VAR i := 0; WHILE (i < 3) DO { i := i + 1; } ; OUTPUT done;";
        assert_eq!(run(source), vec!["done"]);
    }

    #[test]
    fn test_deeply_nested_control_flow() {
        let source = "VAR total := 0; VAR i := 0; \
                      WHILE (i < 4) DO { \
                        IF ((i > 0) AND (i < 3)) THEN { \
                          VAR j := 0; \
                          WHILE (j < i) DO { total := total + 1; j := j + 1; } ; \
                        } ; \
                        i := i + 1; \
                      } ; \
                      OUTPUT total;";
        // i=1 adds 1, i=2 adds 2.
        assert_eq!(run(source), vec!["total=3"]);
    }

    proptest! {
        /// Same source, same input: the compiled program and the output
        /// are identical across runs.
        #[test]
        fn prop_pipeline_is_deterministic(x in -1000i64..1000, y in -1000i64..1000) {
            let source = format!("VAR x := 0 - {}; VAR y := {}; OUTPUT x + y; OUTPUT x;", x.abs(), y);
            let first_program = compile(&source).unwrap();
            let second_program = compile(&source).unwrap();
            prop_assert_eq!(first_program.to_string(), second_program.to_string());
            let first_run = run_source(&source, Vec::new()).unwrap();
            let second_run = run_source(&source, Vec::new()).unwrap();
            prop_assert_eq!(first_run, second_run);
        }

        /// Declaring a scalar and echoing it round-trips the value.
        #[test]
        fn prop_scalar_round_trip(value in 0i64..1_000_000) {
            let source = format!("VAR x := {}; OUTPUT x;", value);
            let output = run_source(&source, Vec::new()).unwrap();
            prop_assert_eq!(output, vec![format!("x={}", value)]);
        }

        /// Arbitrary token soup never panics: it either compiles or
        /// reports a structured error.
        #[test]
        fn prop_compile_never_panics(source in "[a-z0-9+*/();:=<>!{}\\[\\] -]{0,64}") {
            let _ = compile(&source);
        }

        /// Whatever the operand mix, a runtime failure is an error
        /// value, not a wrap-around or a panic.
        #[test]
        fn prop_execution_errors_are_structured(a in 0i64..100, b in 0i64..100) {
            let source = format!("VAR q := {} / {}; OUTPUT q;", a, b);
            match run_source(&source, Vec::new()) {
                Ok(output) => prop_assert_eq!(output, vec![format!("q={}", a / b.max(1))]),
                Err(OpsError::Runtime(RuntimeError::DivisionByZero)) => prop_assert_eq!(b, 0),
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }
}

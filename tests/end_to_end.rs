// Library-level behaviour of the validate-then-run pipeline.
use std::collections::VecDeque;
use strict_bf::io::Empty;
use strict_bf::{build, run_source, BfError, Engine, ErrorKind, Instruction, DEFAULT_TAPE_SIZE};

#[test]
fn multiplication_loop_prints_64() {
    let mut out = Vec::new();
    run_source("++++++++[>++++++++<-]>.", DEFAULT_TAPE_SIZE, Empty, &mut out).unwrap();
    assert_eq!(out, vec![64]);
}

#[test]
fn echo_single_byte() {
    let mut out = Vec::new();
    run_source(",.", DEFAULT_TAPE_SIZE, &[65u8][..], &mut out).unwrap();
    assert_eq!(out, vec![65]);
}

#[test]
fn hello_world() {
    let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
    let mut out = Vec::new();
    run_source(code, DEFAULT_TAPE_SIZE, Empty, &mut out).unwrap();
    assert_eq!(out, b"Hello World!\n");
}

#[test]
fn lone_open_is_unclosed_loop() {
    let err = run_source("[", DEFAULT_TAPE_SIZE, Empty, Vec::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnclosedLoop);
    assert!(err.kind().is_structural());
}

#[test]
fn lone_close_is_mismatched_at_zero() {
    let err = run_source("]", DEFAULT_TAPE_SIZE, Empty, Vec::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MismatchedBrace);
    assert_eq!(err.position(), Some(0));
}

#[test]
fn structural_error_prevents_any_input_or_output() {
    let mut input: VecDeque<u8> = VecDeque::from(vec![1, 2, 3]);
    let mut out = Vec::new();
    let err = run_source(",.,.[", DEFAULT_TAPE_SIZE, &mut input, &mut out).unwrap_err();
    assert!(matches!(err, BfError::UnclosedLoop { ip: 4 }));
    assert_eq!(input.len(), 3);
    assert!(out.is_empty());
}

#[test]
fn cell_reaches_255_then_overflows() {
    let (program, jumps) = build(&"+".repeat(255)).unwrap();
    let mut engine = Engine::new(1);
    engine.run(&program, &jumps, Empty, Vec::new()).unwrap();
    assert_eq!(engine.tape().current(), 255);

    let err = run_source(&"+".repeat(256), 1, Empty, Vec::new()).unwrap_err();
    assert!(matches!(err, BfError::CellOverflow { ip: 255, .. }));
}

#[test]
fn pointer_bounds_are_strict_on_canonical_tape() {
    let to_last = ">".repeat(DEFAULT_TAPE_SIZE - 1);
    let (program, jumps) = build(&to_last).unwrap();
    let mut engine = Engine::default();
    engine.run(&program, &jumps, Empty, Vec::new()).unwrap();
    assert_eq!(engine.pointer(), DEFAULT_TAPE_SIZE - 1);

    let past_last = ">".repeat(DEFAULT_TAPE_SIZE);
    let err = run_source(&past_last, DEFAULT_TAPE_SIZE, Empty, Vec::new()).unwrap_err();
    assert!(matches!(err, BfError::PointerOverflow { ip, ptr } if ip == DEFAULT_TAPE_SIZE - 1 && ptr == DEFAULT_TAPE_SIZE - 1));

    let err = run_source("<", DEFAULT_TAPE_SIZE, Empty, Vec::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PointerUnderflow);
}

#[test]
fn jump_table_pairs_every_bracket() {
    let (program, jumps) = build("+[>[-]<[->+<]]>[.]").unwrap();
    let brackets = program
        .instructions()
        .iter()
        .filter(|i| matches!(i, Instruction::LoopOpen { .. } | Instruction::LoopClose { .. }))
        .count();
    assert_eq!(jumps.len(), brackets);
    for (open, close) in jumps.pairs() {
        assert!(open < close);
        assert_eq!(jumps.get(close), Some(open));
        assert_eq!(program.get(open), Some(Instruction::LoopOpen { matching_close_index: close }));
    }
}

#[test]
fn rerunning_is_deterministic() {
    let (program, jumps) = build(",[.-]").unwrap();
    let mut engine = Engine::new(16);
    let mut first = Vec::new();
    let mut second = Vec::new();
    let r1 = engine.run(&program, &jumps, &[3u8][..], &mut first);
    let r2 = engine.run(&program, &jumps, &[3u8][..], &mut second);
    assert!(r1.is_ok() && r2.is_ok());
    assert_eq!(first, vec![3, 2, 1]);
    assert_eq!(first, second);
}

#[test]
fn same_failure_on_every_run() {
    let (program, jumps) = build("+>>-").unwrap();
    let mut engine = Engine::new(8);
    let a = engine.run(&program, &jumps, Empty, Vec::new()).unwrap_err();
    let b = engine.run(&program, &jumps, Empty, Vec::new()).unwrap_err();
    assert_eq!((a.kind(), a.position()), (b.kind(), b.position()));
    assert_eq!(a.position(), Some(3));
}

#[test]
fn foreign_jump_table_is_an_error_not_a_panic() {
    let (program, _) = build("+[-]+.").unwrap();
    let (_, foreign) = build("[][]").unwrap();
    let mut out = Vec::new();
    let err = Engine::new(DEFAULT_TAPE_SIZE)
        .run(&program, &foreign, Empty, &mut out)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::JumpTableMismatch);
    assert_eq!(err.position(), Some(3));
    assert!(out.is_empty());
}

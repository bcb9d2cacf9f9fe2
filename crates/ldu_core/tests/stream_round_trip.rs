// crates/ldu_core/tests/stream_round_trip.rs
//!
//! 流格式集成测试
//!
//! 寻址、矩阵与求解记录写入同一文本流后按相同顺序读回。

use ldu_core::prelude::*;
use ldu_foundation::stream::{TokenReader, TokenWriter};

fn quad_addressing() -> LduAddressing {
    // 0-1
    // | |
    // 2-3
    LduAddressing::from_pairs(4, [(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap()
}

#[test]
fn test_system_round_trip() {
    let addr = quad_addressing();
    let mut m = LduMatrix::new(&addr);
    {
        let (lower, upper) = m.lower_upper_mut();
        lower.copy_from_slice(&[-2.0, -0.5, -1.25, -3.0]);
        upper.copy_from_slice(&[-1.0, -1.0, -1.0, -1.0]);
    }
    m.neg_sum_diag();
    m.diag_mut()[0] += 1.0;

    let mut psi = vec![0.0; 4];
    let perf = m
        .solve(
            "T",
            &mut psi,
            &[1.0, 2.0, 3.0, 4.0],
            &SolverControls::new("PBiCGStab")
                .with_preconditioner("DILU")
                .with_tolerance(1e-12, 0.0),
        )
        .unwrap();

    let mut w = TokenWriter::new(Vec::new());
    addr.write(&mut w).unwrap();
    m.write(&mut w).unwrap();
    perf.write(&mut w).unwrap();
    let text = String::from_utf8(w.into_inner()).unwrap();

    let mut r = TokenReader::new(&text).unwrap();
    let addr2 = LduAddressing::read(&mut r).unwrap();
    assert_eq!(addr2, addr);

    let m2 = LduMatrix::read(&addr2, &mut r).unwrap();
    assert_eq!(m2.matrix_type(), MatrixType::Asymmetric);
    assert_eq!(m2.diag(), m.diag());
    assert_eq!(m2.lower(), m.lower());
    assert_eq!(m2.upper(), m.upper());

    let perf2 = SolverPerformance::read(&mut r).unwrap();
    assert_eq!(perf2, perf);
    assert!(r.is_eof());
}

#[test]
fn test_read_handwritten_system() {
    let text = "\
nCells 3;
lowerAddr 2(0 1);
upperAddr 2(1 2);
diag 3{2};
upper 2(-1 -1);
";
    let mut r = TokenReader::new(text).unwrap();
    let addr = LduAddressing::read(&mut r).unwrap();
    let m = LduMatrix::read(&addr, &mut r).unwrap();
    assert!(m.is_symmetric());
    assert_eq!(m.diag(), &[2.0, 2.0, 2.0]);
    assert_eq!(m.lower(), &[-1.0, -1.0]);

    let mut psi = vec![0.0; 3];
    let perf = m
        .solve(
            "T",
            &mut psi,
            &[1.0, 0.0, 1.0],
            &SolverControls::new("PCG")
                .with_preconditioner("DIC")
                .with_tolerance(1e-12, 0.0),
        )
        .unwrap();
    assert!(perf.converged);
    for v in psi {
        assert!((v - 1.0).abs() < 1e-10);
    }
}

#[test]
fn test_invalid_addressing_reports_position() {
    let text = "nCells 2\nlowerAddr 1(0)\nupperAddr 1(5)\n";
    let mut r = TokenReader::new(text).unwrap();
    match LduAddressing::read(&mut r) {
        Err(LduError::Parse { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_performance_records_reduce() {
    let a = SolverPerformance::parse_str("(DICPCG p 1 1e-7 12 true false)").unwrap();
    let b = SolverPerformance::parse_str("(DICPCG p 0.5 1e-5 20 false false)").unwrap();
    let merged = SolverPerformance::max(&a, &b);
    assert_eq!(merged.initial_residual, 1.0);
    assert_eq!(merged.final_residual, 1e-5);
    assert_eq!(merged.n_iterations, 20);
    assert!(!merged.converged);
    assert!(!merged.singular);
}

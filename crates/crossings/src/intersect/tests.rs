use std::f64::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use super::*;

fn dom(lo: f64, hi: f64) -> Domain {
    Domain::new(lo, hi).unwrap()
}

fn constant(d: Domain, v: f64) -> CurveModel {
    CurveModel::from_fn(d, move |_| v)
}

/// Curve that records every abscissa it is queried at.
fn recording<F>(d: Domain, f: F) -> (CurveModel, Arc<Mutex<Vec<f64>>>)
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let c = CurveModel::from_fn(d, move |x| {
        sink.lock().unwrap().push(x);
        f(x)
    });
    (c, log)
}

#[test]
fn single_crossing_at_midpoint() {
    let a = CurveModel::from_fn(dom(0.0, 1.0), |x| x);
    let b = CurveModel::from_fn(dom(0.0, 1.0), |x| 1.0 - x);
    let out = find_intersections(&a, &b, &CompareCfg::default()).unwrap();
    let pts = out.points();
    assert_eq!(pts.len(), 1);
    assert_eq!(pts[0].index, 0);
    assert!((pts[0].x - 0.5).abs() < 1e-6);
    assert!((pts[0].y - 0.5).abs() < 1e-6);
    assert!(pts[0].residual < 1e-5);
    assert_eq!(out.overlap(), Some(dom(0.0, 1.0)));
}

#[test]
fn sine_against_zero_reports_every_multiple_of_pi() {
    let d = dom(0.0, 4.0 * PI);
    let a = CurveModel::from_fn(d, f64::sin);
    let b = constant(d, 0.0);
    let out = find_intersections(&a, &b, &CompareCfg::default()).unwrap();
    let pts = out.points();
    assert_eq!(pts.len(), 5, "got {pts:?}");
    for (k, p) in pts.iter().enumerate() {
        assert_eq!(p.index, k);
        assert!((p.x - k as f64 * PI).abs() < 1e-4, "root {k} at {}", p.x);
        assert!(p.y.abs() < 1e-4);
    }
    assert!(pts.windows(2).all(|w| w[0].x < w[1].x));
}

#[test]
fn identical_curves_are_coincident() {
    let a = CurveModel::from_fn(dom(0.0, 1.0), |x| x);
    let b = CurveModel::polyline(&[
        crate::curve::SamplePoint::new(0.0, 0.0),
        crate::curve::SamplePoint::new(1.0, 1.0),
    ])
    .unwrap();
    let out = find_intersections(&a, &b, &CompareCfg::default()).unwrap();
    assert_eq!(
        out,
        Intersections::Coincident {
            overlap: dom(0.0, 1.0)
        }
    );
    assert!(out.points().is_empty());
}

#[test]
fn large_magnitude_identical_curves_are_coincident() {
    let d = dom(0.0, 10.0);
    let a = CurveModel::from_fn(d, |x| 1e6 * x.sin());
    let b = CurveModel::from_fn(d, |x| 1e6 * (x - PI / 2.0).cos());
    let out = find_intersections(&a, &b, &CompareCfg::default()).unwrap();
    assert_eq!(
        out,
        Intersections::Coincident { overlap: d },
        "got {} crossings",
        out.points().len()
    );
}

#[test]
fn large_magnitude_crossings_are_still_found() {
    let d = dom(0.0, 10.0);
    let a = CurveModel::from_fn(d, |x| 1e6 * x.sin());
    let b = constant(d, 0.0);
    let out = find_intersections(&a, &b, &CompareCfg::default()).unwrap();
    let xs: Vec<f64> = out.points().iter().map(|p| p.x).collect();
    assert_eq!(xs.len(), 4, "got {xs:?}");
    for (k, x) in xs.iter().enumerate() {
        assert!((x - k as f64 * PI).abs() < 1e-4, "root {k} at {x}");
    }
}

#[test]
fn scaled_eps_never_drops_below_absolute() {
    assert_eq!(scaled_eps(1e-12, &[0.5, -0.25], &[0.0]), 1e-12);
    assert!((scaled_eps(1e-12, &[2.0], &[-1e6]) - 1e-6).abs() < 1e-18);
}

#[test]
fn disjoint_domains_do_not_overlap() {
    let (a, log_a) = recording(dom(0.0, 1.0), |x| x);
    let (b, log_b) = recording(dom(2.0, 3.0), |x| x);
    let out = find_intersections(&a, &b, &CompareCfg::default()).unwrap();
    assert_eq!(out, Intersections::NoOverlap);
    assert!(out.points().is_empty());
    assert!(out.overlap().is_none());
    assert!(log_a.lock().unwrap().is_empty());
    assert!(log_b.lock().unwrap().is_empty());
}

#[test]
fn touching_domains_do_not_overlap() {
    let a = constant(dom(0.0, 1.0), 0.0);
    let b = constant(dom(1.0, 2.0), 0.0);
    let out = find_intersections(&a, &b, &CompareCfg::default()).unwrap();
    assert_eq!(out, Intersections::NoOverlap);
}

#[test]
fn search_is_restricted_to_the_overlap() {
    let (a, log_a) = recording(dom(0.0, 10.0), |x| x - 7.0);
    let (b, log_b) = recording(dom(5.0, 15.0), |_| 0.0);
    let out = find_intersections(&a, &b, &CompareCfg::default()).unwrap();
    assert_eq!(out.overlap(), Some(dom(5.0, 10.0)));
    let pts = out.points();
    assert_eq!(pts.len(), 1);
    assert!((pts[0].x - 7.0).abs() < 1e-5);
    for log in [log_a, log_b] {
        let xs = log.lock().unwrap();
        assert!(!xs.is_empty());
        assert!(xs.iter().all(|&x| (5.0..=10.0).contains(&x)));
    }

    // A crossing at x = 2 lies in A's domain but outside the overlap.
    let a2 = CurveModel::from_fn(dom(0.0, 10.0), |x| x - 2.0);
    let b2 = constant(dom(5.0, 15.0), 0.0);
    let out2 = find_intersections(&a2, &b2, &CompareCfg::default()).unwrap();
    assert!(matches!(out2, Intersections::Crossings { ref points, .. } if points.is_empty()));
}

#[test]
fn grazing_pair_within_one_interval_collapses_to_one_root() {
    let d = dom(0.0, 1.0);
    let g = crate::sample::grid(d, 512).unwrap()[256];
    let half_gap = 3e-4;
    // Two roots at g ± half_gap, straddling the sample at g.
    let a = CurveModel::from_fn(d, move |x| (x - g) * (x - g) - half_gap * half_gap);
    let b = constant(d, 0.0);

    let out = find_intersections(&a, &b, &CompareCfg::default()).unwrap();
    let pts = out.points();
    assert_eq!(pts.len(), 1, "got {pts:?}");
    assert_eq!(pts[0].index, 0);
    assert!((pts[0].x - (g - half_gap)).abs() < 1e-5);

    let fine = CompareCfg {
        min_separation: Some(1e-4),
        ..CompareCfg::default()
    };
    let pts = find_intersections(&a, &b, &fine).unwrap().points().to_vec();
    assert_eq!(pts.len(), 2);
    assert!((pts[1].x - (g + half_gap)).abs() < 1e-5);
    assert_eq!(pts[1].index, 1);
}

#[test]
fn refining_resolution_moves_roots_less_than_tolerance() {
    let d = dom(0.0, 10.0);
    let a = CurveModel::from_fn(d, f64::sin);
    let b = constant(d, 0.3);
    let coarse_cfg = CompareCfg::default();
    let fine_cfg = CompareCfg::default().with_resolution(2048);
    let coarse = find_intersections(&a, &b, &coarse_cfg).unwrap();
    let fine = find_intersections(&a, &b, &fine_cfg).unwrap();
    let tol = coarse_cfg.resolve(d).unwrap().root_tolerance;
    assert_eq!(coarse.points().len(), 4);
    assert_eq!(coarse.points().len(), fine.points().len());
    for (p, q) in coarse.points().iter().zip(fine.points()) {
        assert!((p.x - q.x).abs() < tol, "{} vs {}", p.x, q.x);
    }
}

#[test]
fn invalid_resolution_fails_before_any_evaluation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (ca, cb) = (Arc::clone(&calls), Arc::clone(&calls));
    let a = CurveModel::from_fn(dom(0.0, 1.0), move |x| {
        ca.fetch_add(1, Ordering::SeqCst);
        x
    });
    let b = CurveModel::from_fn(dom(0.0, 1.0), move |x| {
        cb.fetch_add(1, Ordering::SeqCst);
        1.0 - x
    });
    let cfg = CompareCfg::default().with_resolution(1);
    assert_eq!(
        find_intersections(&a, &b, &cfg),
        Err(EngineError::InvalidResolution { resolution: 1 })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn evaluation_failure_aborts_the_search() {
    let d = dom(0.0, 1.0);
    let a = CurveModel::from_fn(d, f64::ln);
    let b = constant(d, -1.0);
    for parallel in [true, false] {
        let cfg = CompareCfg {
            parallel,
            ..CompareCfg::default()
        };
        assert!(matches!(
            find_intersections(&a, &b, &cfg),
            Err(EngineError::Evaluation { x, .. }) if x == 0.0
        ));
    }
}

#[test]
fn control_curves_are_not_searched() {
    let d = dom(0.0, 1.0);
    let a = CurveModel::from_fn(d, |x| x).with_role(CurveRole::Control);
    let b = constant(d, 0.5);
    assert!(matches!(
        find_intersections(&a, &b, &CompareCfg::default()),
        Err(EngineError::InvalidCurve { .. })
    ));
}

#[test]
fn polyline_against_spline() {
    use crate::curve::SamplePoint as P;
    let zigzag = CurveModel::polyline(&[
        P::new(0.0, 0.0),
        P::new(1.0, 2.0),
        P::new(2.0, 0.0),
        P::new(3.0, 2.0),
    ])
    .unwrap();
    let level = CurveModel::spline(&[P::new(-1.0, 1.0), P::new(1.5, 1.0), P::new(4.0, 1.0)]).unwrap();
    let out = find_intersections(&zigzag, &level, &CompareCfg::default()).unwrap();
    let xs: Vec<f64> = out.points().iter().map(|p| p.x).collect();
    assert_eq!(xs.len(), 3, "got {xs:?}");
    for (x, want) in xs.iter().zip([0.5, 1.5, 2.5]) {
        assert!((x - want).abs() < 1e-5);
    }
}

#[test]
fn results_are_bit_identical_across_runs_and_threads() {
    let d = dom(-3.0, 9.0);
    let a = CurveModel::from_fn(d, |x| (1.7 * x).sin() + 0.1 * x);
    let b = CurveModel::polynomial(d, vec![0.2, -0.05, 0.01]).unwrap();
    let par = CompareCfg::default();
    let seq = CompareCfg {
        parallel: false,
        ..par
    };
    let first = find_intersections(&a, &b, &par).unwrap();
    assert!(!first.points().is_empty());
    assert_eq!(first, find_intersections(&a, &b, &par).unwrap());
    assert_eq!(first, find_intersections(&a, &b, &seq).unwrap());
}

#[test]
fn dedup_keeps_lowest_and_reindexes() {
    let p = |x: f64| IntersectionPoint {
        index: 99,
        x,
        y: 0.0,
        residual: 0.0,
    };
    let kept = dedup_and_index(vec![p(0.5), p(0.1), p(0.15), p(0.21), p(0.9)], 0.1);
    let xs: Vec<f64> = kept.iter().map(|q| q.x).collect();
    assert_eq!(xs, vec![0.1, 0.21, 0.5, 0.9]);
    assert!(kept.iter().enumerate().all(|(i, q)| q.index == i));
}

proptest! {
    #[test]
    fn crossing_lines_yield_one_root(
        r in 0.05f64..0.95,
        s1 in -5.0f64..5.0,
        ds in 0.2f64..5.0,
        c in -2.0f64..2.0,
    ) {
        let d = dom(0.0, 1.0);
        let s2 = s1 + ds;
        let a = CurveModel::from_fn(d, move |x| s1 * (x - r) + c);
        let b = CurveModel::from_fn(d, move |x| s2 * (x - r) + c);
        let cfg = CompareCfg::default();
        let out = find_intersections(&a, &b, &cfg).unwrap();
        let pts = out.points();
        prop_assert_eq!(pts.len(), 1);
        let tol = cfg.resolve(d).unwrap().root_tolerance;
        prop_assert!((pts[0].x - r).abs() < tol);
        prop_assert!((pts[0].y - c).abs() < 1e-3);
        prop_assert!(pts[0].residual < 1e-4);
    }

    #[test]
    fn sine_roots_are_complete_sorted_and_separated(
        k in 0.5f64..6.0,
        phase in 0.0f64..3.0,
    ) {
        let (lo, hi) = (0.0, 10.0);
        let expected: Vec<f64> = (0..200)
            .map(|n| (n as f64 * PI - phase) / k)
            .filter(|&x| x >= lo && x <= hi)
            .collect();
        prop_assume!(expected.iter().all(|&x| (x - lo).abs() > 1e-9 && (hi - x).abs() > 1e-9));

        let d = dom(lo, hi);
        let a = CurveModel::from_fn(d, move |x| (k * x + phase).sin());
        let b = constant(d, 0.0);
        let cfg = CompareCfg::default();
        let out = find_intersections(&a, &b, &cfg).unwrap();
        let pts = out.points();
        let rc = cfg.resolve(d).unwrap();

        prop_assert_eq!(pts.len(), expected.len());
        for (i, (p, want)) in pts.iter().zip(&expected).enumerate() {
            prop_assert_eq!(p.index, i);
            prop_assert!((p.x - want).abs() < rc.root_tolerance);
        }
        for w in pts.windows(2) {
            prop_assert!(w[1].x - w[0].x >= rc.min_separation);
        }

        let seq = CompareCfg { parallel: false, ..cfg };
        prop_assert_eq!(out, find_intersections(&a, &b, &seq).unwrap());
    }
}

//! Sine against a tilted line, printed as the analysis table a renderer shows.
//!
//! Run: `cargo run -p crossings --example sine_crossings`

use std::f64::consts::PI;

use crossings::api::{compare, CompareCfg, CurveInput, CurveModel, Domain, Status};

fn main() {
    let domain = Domain::new(0.0, 4.0 * PI).expect("valid domain");
    let a = CurveInput::new(CurveModel::from_fn(domain, f64::sin))
        .with_control(CurveModel::from_fn(domain, f64::cos));
    let line = Domain::new(-1.0, 10.0).expect("valid domain");
    let b = CurveInput::new(CurveModel::polynomial(line, vec![-0.5, 0.1]).expect("polynomial"));

    let report = compare(&a, &b, &CompareCfg::default()).expect("comparison succeeds");
    assert_eq!(report.status, Status::Ok);
    println!(
        "overlap {:?}, {} intersections (tolerance {:?})",
        report.overlap, report.count, report.root_tolerance
    );
    println!("{:>5} {:>12} {:>12}", "index", "x", "y");
    for p in &report.intersections {
        println!("{:>5} {:>12.6} {:>12.6}", p.index, p.x, p.y);
    }
}

use std::hint::black_box;
use std::sync::LazyLock;

use gungraun::{library_benchmark, library_benchmark_group, main};
use nalgebra::DMatrix;
use ordistat::EllipseMethod;
use rand::SeedableRng;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use statrs::distribution::Normal;

const SEED: u64 = 123;
const VARIABLES: usize = 3;
const GROUPS: usize = 4;
static TINY: LazyLock<DMatrix<f64>> = LazyLock::new(|| sample_data(12));
static SMALL: LazyLock<DMatrix<f64>> = LazyLock::new(|| sample_data(100));
static MEDIUM: LazyLock<DMatrix<f64>> = LazyLock::new(|| sample_data(1000));
static LARGE: LazyLock<DMatrix<f64>> = LazyLock::new(|| sample_data(5000));

fn sample_data(n: usize) -> DMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let dist = Normal::new(0.0, 1.0).unwrap();

    DMatrix::from_iterator(n, VARIABLES, dist.sample_iter(&mut rng).take(n * VARIABLES))
}

fn to_matrix(data: &LazyLock<DMatrix<f64>>) -> DMatrix<f64> {
    (*data).clone()
}

fn to_scores(data: &LazyLock<DMatrix<f64>>) -> DMatrix<f64> {
    data.columns(0, 2).clone_owned()
}

fn with_groups(data: &LazyLock<DMatrix<f64>>) -> (DMatrix<f64>, Vec<usize>) {
    let groups = (0..data.nrows()).map(|i| i % GROUPS).collect();

    ((*data).clone(), groups)
}

fn setup() {
    let _ = TINY;
    let _ = SMALL;
    let _ = MEDIUM;
    let _ = LARGE;
}

#[library_benchmark(setup = to_matrix)]
#[bench::tiny(&TINY)]
#[bench::small(&SMALL)]
#[bench::medium(&MEDIUM)]
#[bench::large(&LARGE)]
fn scale(data: DMatrix<f64>) {
    let _ = black_box(ordistat::scale(&data, None, true, true, 1));
}

#[library_benchmark(setup = to_matrix)]
#[bench::tiny(&TINY)]
#[bench::small(&SMALL)]
#[bench::medium(&MEDIUM)]
#[bench::large(&LARGE)]
fn corr(data: DMatrix<f64>) {
    let _ = black_box(ordistat::corr(&data, None));
}

#[library_benchmark(setup = to_matrix)]
#[bench::tiny(&TINY)]
#[bench::small(&SMALL)]
#[bench::medium(&MEDIUM)]
#[bench::large(&LARGE)]
fn pairwise_correlation_tests(data: DMatrix<f64>) {
    let _ = black_box(ordistat::pairwise_correlation_tests(&data, 0.05));
}

#[library_benchmark(setup = to_scores)]
#[bench::tiny(&TINY)]
#[bench::small(&SMALL)]
#[bench::medium(&MEDIUM)]
#[bench::large(&LARGE)]
fn ellipse(scores: DMatrix<f64>) {
    let _ = black_box(ordistat::ellipse(&scores, 0.95, EllipseMethod::Deviation, 100));
}

#[library_benchmark(setup = to_matrix)]
#[bench::tiny(&TINY)]
#[bench::small(&SMALL)]
#[bench::medium(&MEDIUM)]
fn mardia_test(data: DMatrix<f64>) {
    let _ = black_box(ordistat::multivariate::mardia_test(&data, true));
}

#[library_benchmark(setup = with_groups)]
#[bench::tiny(&TINY)]
#[bench::small(&SMALL)]
#[bench::medium(&MEDIUM)]
#[bench::large(&LARGE)]
fn box_mtest(input: (DMatrix<f64>, Vec<usize>)) {
    let (data, groups) = input;
    let _ = black_box(ordistat::multivariate::box_mtest(&data, &groups));
}

library_benchmark_group!(
    name = benches;
    setup = setup();
    benchmarks = scale, corr, pairwise_correlation_tests, ellipse, mardia_test, box_mtest
);

main!(library_benchmark_groups = benches);

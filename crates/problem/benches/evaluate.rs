use criterion::{Criterion, criterion_group, criterion_main};
use egobox_doe::{Lhs, Random, SamplingMethod};
use ndarray::{Array2, Zip, array};
use ndarray_rand::rand::SeedableRng;
use paretobox_problem::{DataObjectiveEvaluator, ObjectiveDataset};
use paretobox_surrogate::LipschitzianParams;
use rand_xoshiro::Xoshiro256Plus;

fn evaluator(dim: usize, nt: usize) -> DataObjectiveEvaluator {
    let lim = array![[0., 1.]];
    let xlimits = lim.broadcast((dim, 2)).unwrap();
    let xt = Lhs::new(&xlimits)
        .with_rng(Xoshiro256Plus::seed_from_u64(42))
        .sample(nt);
    let mut ft = Array2::zeros((nt, 2));
    Zip::from(ft.rows_mut()).and(xt.rows()).par_for_each(|mut f, x| {
        f[0] = x.sum();
        f[1] = x.mapv(|v| (v - 0.5) * (v - 0.5)).sum();
    });
    DataObjectiveEvaluator::new(ObjectiveDataset::new(xt, ft).unwrap()).unwrap()
}

fn criterion_evaluate(c: &mut Criterion) {
    let dims = [2, 10];
    let nts = [1000, 5000];

    let mut group = c.benchmark_group("evaluate");
    group.sample_size(20);
    for (dim, nt) in dims.into_iter().zip(nts) {
        let mut evaluator = evaluator(dim, nt);
        let lim = array![[0., 1.]];
        let xlimits = lim.broadcast((dim, 2)).unwrap();
        let query = Random::new(&xlimits)
            .with_rng(Xoshiro256Plus::seed_from_u64(0))
            .sample(100);

        group.bench_function(format!("lookup {dim}d {nt}"), |b| {
            b.iter(|| std::hint::black_box(evaluator.evaluate(&query, false).unwrap()))
        });

        evaluator.train_all(LipschitzianParams::new()).unwrap();
        group.bench_function(format!("lipschitzian {dim}d {nt}"), |b| {
            b.iter(|| std::hint::black_box(evaluator.evaluate(&query, true).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_evaluate);
criterion_main!(benches);

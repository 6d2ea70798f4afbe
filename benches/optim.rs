use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::{ArrayD, IxDyn};
use roptim::{Adam, LrScheduler, Optimizer, StepLR, Tensor, SGD};

fn make_source() -> Vec<(Tensor, Tensor)> {
    let shapes: [&[usize]; 4] = [&[64, 64], &[64], &[64, 64], &[64]];
    shapes
        .iter()
        .map(|shape| {
            (
                ArrayD::zeros(IxDyn(shape)),
                ArrayD::from_elem(IxDyn(shape), 0.01f32),
            )
        })
        .collect()
}

fn bench_optimizer_step(c: &mut Criterion) {
    c.bench_function("sgd_step", |b| {
        let mut opt = SGD::new(0.01);
        let mut source = make_source();
        b.iter(|| opt.step(black_box(&mut source)).unwrap());
    });

    c.bench_function("adam_step", |b| {
        let mut opt = Adam::new(1e-3);
        let mut source = make_source();
        b.iter(|| opt.step(black_box(&mut source)).unwrap());
    });
}

fn bench_scheduler_step(c: &mut Criterion) {
    c.bench_function("step_lr_step", |b| {
        let mut sched = StepLR::new(SGD::new(1.0), 1000, 0.99).unwrap();
        b.iter(|| black_box(sched.step()));
    });
}

criterion_group!(benches, bench_optimizer_step, bench_scheduler_step);
criterion_main!(benches);

use criterion::{criterion_group, criterion_main, Criterion};
use envs::{BallPushEnv, BallPushSettings, CartPoleEnv, CartPoleSettings, Env};

fn bench_cart_pole(c: &mut Criterion) {
    let mut env = CartPoleEnv::new(CartPoleSettings::default(), fastrand::Rng::with_seed(1)).unwrap();
    env.reset();
    c.bench_function("cart_pole_step", |b| {
        b.iter(|| {
            if env.step(&[0.5]).unwrap().terminated {
                env.reset();
            }
        })
    });
}

fn bench_ball_push(c: &mut Criterion) {
    let mut env = BallPushEnv::new(BallPushSettings::default(), fastrand::Rng::with_seed(1)).unwrap();
    env.reset();
    let mut rng = fastrand::Rng::with_seed(2);
    c.bench_function("ball_push_step", |b| {
        b.iter(|| env.step(&[rng.f64() * 2.0 - 1.0, rng.f64() * 2.0 - 1.0]).unwrap())
    });
}

criterion_group!(benches, bench_cart_pole, bench_ball_push);
criterion_main!(benches);

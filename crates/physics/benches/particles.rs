use criterion::{criterion_group, criterion_main, Criterion};
use physics::{contain_in_circle, detect_circle_circle, DVec2, VerletParticle};

fn bench_particle_pair(c: &mut Criterion) {
    c.bench_function("particle_pair_step", |b| {
        let mut a = VerletParticle::new(DVec2::new(-5.0, 0.0), 1.0, 1.0 / 60.0).unwrap();
        let mut ball = VerletParticle::new(DVec2::new(5.0, 0.0), 1.0, 1.0 / 60.0).unwrap();
        a.set_velocity(DVec2::new(20.0, 3.0));
        b.iter(|| {
            if let Some(p) = contain_in_circle(a.position(), 1.0, 50.0) {
                a.slide_to_position(p);
            }
            if let Some(contact) = detect_circle_circle(a.position(), 1.0, ball.position(), 2.0) {
                let correction = contact.half_correction();
                a.slide_to_position(a.position() + correction);
                ball.slide_to_position(ball.position() - correction);
            }
            a.step();
            ball.step();
        })
    });
}

criterion_group!(benches, bench_particle_pair);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sim_core::{Decision, Level, PlantSize, PlayerId, SessionId, Submission};
use sim_engine::MarketConfig;

fn submission(level: Level, labor: f64, capital: Option<f64>, plant: Option<PlantSize>) -> Submission {
    Submission {
        player: PlayerId("bench".into()),
        session: SessionId("bench".into()),
        level,
        decision: Decision {
            labor,
            capital,
            plant_size: plant,
        },
    }
}

fn bench_all_levels(c: &mut Criterion) {
    let config = MarketConfig::default();
    let submissions = [
        submission(Level::SingleInput, 25.0, None, None),
        submission(Level::InputMix, 10.0, Some(10.0), None),
        submission(Level::ReturnsToScale, 5.0, Some(5.0), None),
        submission(Level::Shutdown, 15.0, None, None),
        submission(Level::PlantChoice, 20.0, None, Some(PlantSize::Small)),
    ];
    c.bench_function("evaluate all five levels", |b| {
        b.iter(|| {
            for sub in &submissions {
                let result = sim_engine::evaluate(sub, config.params(sub.level)).unwrap();
                black_box(result);
            }
        })
    });
}

criterion_group!(benches, bench_all_levels);
criterion_main!(benches);

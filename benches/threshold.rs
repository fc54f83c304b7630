use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_bigint::BigInt;
use paillier_threshold::{generate_keypair, RandomState, ThresholdPaillier};

const BITS: usize = 512;

fn bench_keygen(c: &mut Criterion) {
    let mut rng = RandomState::new().unwrap();
    let mut group = c.benchmark_group("keygen");
    group.sample_size(10);
    group.bench_function("generate_keypair_256", |b| {
        b.iter(|| generate_keypair(&mut rng, 256, 3, 5).unwrap())
    });
    group.finish();
}

fn bench_operations(c: &mut Criterion) {
    let mut rng = RandomState::new().unwrap();
    let tp = ThresholdPaillier::new(&mut rng, BITS, 3, 5).unwrap();
    let pk = &tp.pub_key;
    let m = BigInt::from(42);
    let ciphertext = pk.encrypt(&mut rng, &m).unwrap();
    let partials = tp.partial_decrypt(&[0, 2, 4], &ciphertext).unwrap();

    c.bench_function("encrypt", |b| {
        b.iter(|| pk.encrypt(&mut rng, black_box(&m)).unwrap())
    });
    c.bench_function("ee_add", |b| {
        b.iter(|| pk.ee_add(black_box(&ciphertext), black_box(&ciphertext)).unwrap())
    });
    c.bench_function("share_decrypt", |b| {
        b.iter(|| tp.key_shares[0].share_decrypt(pk, black_box(&ciphertext)).unwrap())
    });
    c.bench_function("combine_shares", |b| {
        b.iter(|| pk.combine_shares(black_box(&partials)).unwrap())
    });
}

criterion_group!(benches, bench_keygen, bench_operations);
criterion_main!(benches);

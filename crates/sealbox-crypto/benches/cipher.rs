use sealbox_core::Timestamp;
use sealbox_crypto::{decrypt, derive_key, encrypt};
use secrecy::SecretString;

fn make_data(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| (i.wrapping_mul(7) ^ (i >> 3)) as u8)
        .collect()
}

fn bench_key() -> sealbox_crypto::BundleKey {
    derive_key(
        &SecretString::from("bench-passphrase"),
        "bench.bin",
        1024,
        Timestamp::from_ticks(0),
    )
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_encrypt(bencher: divan::Bencher, size: usize) {
    let key = bench_key();
    let data = make_data(size);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| encrypt(divan::black_box(&data), divan::black_box(&key)));
}

#[divan::bench(args = [1024, 65536, 1048576])]
fn bench_decrypt(bencher: divan::Bencher, size: usize) {
    let key = bench_key();
    let data = make_data(size);
    let blob = encrypt(&data, &key);
    bencher
        .counter(divan::counter::BytesCount::new(size))
        .bench(|| decrypt(divan::black_box(&blob), divan::black_box(&key)).unwrap());
}

#[divan::bench]
fn bench_derive_key() -> sealbox_crypto::BundleKey {
    bench_key()
}

fn main() {
    divan::main();
}

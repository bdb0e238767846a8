//! # Provenance-Chain Subsystem Benchmarks
//!
//! | Subsystem | Path |
//! |-----------|------|
//! | pc-01 Identifier Sanitizer | id and address sanitizing |
//! | pc-02 QR Codec | payload encode / decode |
//! | pc-05 History Reconstructor | full six-stage timeline |

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pc_01_identifier_sanitizer::{sanitize_address, sanitize_product_id};
use pc_02_qr_codec::{decode, encode};
use pc_05_history::reconstruct;
use shared_types::{Address, ProductId, RawStageRecord, Stage};

fn bench_sanitizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-01-identifier-sanitizer");

    group.bench_function("product_id_noisy", |b| {
        b.iter(|| sanitize_product_id(black_box(" PRD-0010-01\n")))
    });
    group.bench_function("address_with_zero_width", |b| {
        b.iter(|| {
            sanitize_address(black_box(
                "\u{200b} 0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed \n",
            ))
        })
    });

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-02-qr-codec");
    let id = ProductId::from_u64(1_000_001).unwrap();

    group.bench_function("encode", |b| b.iter(|| encode(black_box(id))));
    group.bench_function("decode", |b| b.iter(|| decode(black_box(b" 1000001\0"))));

    group.finish();
}

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("pc-05-history");
    let owner = Address::from_bytes([0xa1; 20]);
    let records: Vec<RawStageRecord> = Stage::ALL
        .iter()
        .enumerate()
        .map(|(i, stage)| RawStageRecord {
            stage: u64::from(stage.index()),
            location: format!("Site {i}"),
            action: "Step".to_string(),
            timestamp: 1_700_000_000 + i as u64,
        })
        .collect();
    let owners = vec![owner; records.len()];

    group.bench_function("six_stages", |b| {
        b.iter(|| reconstruct(black_box(records.clone()), black_box(owners.clone())))
    });

    group.finish();
}

criterion_group!(benches, bench_sanitizer, bench_codec, bench_reconstruct);
criterion_main!(benches);

//! VM Translator Benchmarks
//!
//! Measures `CodeWriter` throughput for arithmetic, segment push/pop, and
//! the function call/return protocol.
//!
//! Run with:
//! ```bash
//! cargo bench
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vm_translator::CodeWriter;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

fn temp_writer() -> (CodeWriter, std::path::PathBuf) {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let path = std::env::temp_dir().join(format!("vm_translator_bench_{}_{n}.asm", std::process::id()));
    let writer = CodeWriter::new(path.to_str().unwrap()).unwrap();
    (writer, path)
}

fn bench_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("code_writer_arithmetic");

    group.bench_function("add_sequence", |b| {
        b.iter(|| {
            let (mut writer, path) = temp_writer();
            for _ in 0..50 {
                writer.write_arithmetic(black_box("add")).unwrap();
            }
            writer.close().unwrap();
            std::fs::remove_file(&path).ok();
        });
    });

    group.bench_function("comparison_sequence", |b| {
        b.iter(|| {
            let (mut writer, path) = temp_writer();
            for _ in 0..50 {
                writer.write_arithmetic(black_box("eq")).unwrap();
            }
            writer.close().unwrap();
            std::fs::remove_file(&path).ok();
        });
    });

    group.finish();
}

fn bench_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("code_writer_push_pop");

    group.bench_function("push_constant_batch", |b| {
        b.iter(|| {
            let (mut writer, path) = temp_writer();
            for i in 0..50 {
                writer
                    .write_push_pop(black_box("push"), black_box("constant"), i)
                    .unwrap();
            }
            writer.close().unwrap();
            std::fs::remove_file(&path).ok();
        });
    });

    group.bench_function("local_push_pop_roundtrip", |b| {
        b.iter(|| {
            let (mut writer, path) = temp_writer();
            for i in 0..50 {
                writer.write_push_pop("push", "local", i).unwrap();
                writer.write_push_pop("pop", "local", i).unwrap();
            }
            writer.close().unwrap();
            std::fs::remove_file(&path).ok();
        });
    });

    group.finish();
}

fn bench_call_return(c: &mut Criterion) {
    let mut group = c.benchmark_group("code_writer_call_return");

    group.bench_function("function_call_return", |b| {
        b.iter(|| {
            let (mut writer, path) = temp_writer();
            writer.write_function(black_box("Main.compute"), 3).unwrap();
            writer.write_call(black_box("Math.multiply"), 2).unwrap();
            writer.write_return().unwrap();
            writer.close().unwrap();
            std::fs::remove_file(&path).ok();
        });
    });

    group.bench_function("bootstrap", |b| {
        b.iter(|| {
            let (mut writer, path) = temp_writer();
            writer.write_bootstrap().unwrap();
            writer.close().unwrap();
            std::fs::remove_file(&path).ok();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_arithmetic, bench_push_pop, bench_call_return);
criterion_main!(benches);

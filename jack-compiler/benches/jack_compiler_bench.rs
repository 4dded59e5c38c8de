//! Jack Compiler Benchmarks
//!
//! Measures tokenizer throughput and end-to-end compilation for a handful of
//! representative Jack programs.
//!
//! Run with:
//! ```bash
//! cargo bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use jack_compiler::compilation_engine::CompilationEngine;
use jack_compiler::tokenizer::tokenize;

const SMALL_CLASS: &str = "\
class Main {
    function void main() {
        return;
    }
}";

const LOOP_CLASS: &str = "\
class Main {
    static int sum;

    function void main() {
        var int i;
        let sum = 0;
        let i = 1;
        while (i < 100) {
            let sum = sum + i;
            let i = i + 1;
        }
        do Output.printInt(sum);
        return;
    }
}";

const CLASS_WITH_METHODS: &str = "\
class Point {
    field int x, y;

    constructor Point new(int ax, int ay) {
        let x = ax;
        let y = ay;
        return this;
    }

    method int getX() {
        return x;
    }

    method int getY() {
        return y;
    }

    method void dispose() {
        do Memory.deAlloc(this);
        return;
    }
}";

fn bench_tokenizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenizer");

    for (name, source) in [
        ("small", SMALL_CLASS),
        ("loop", LOOP_CLASS),
        ("methods", CLASS_WITH_METHODS),
    ] {
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| black_box(tokenize(black_box(source)).unwrap()));
        });
    }

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for (name, source) in [
        ("small", SMALL_CLASS),
        ("loop", LOOP_CLASS),
        ("methods", CLASS_WITH_METHODS),
    ] {
        let tokens = tokenize(source).unwrap();
        group.throughput(Throughput::Elements(tokens.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut engine = CompilationEngine::new(black_box(&tokens), Vec::new());
                engine.compile_class().unwrap();
                black_box(engine.into_inner());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tokenizer, bench_compile);
criterion_main!(benches);

//! Criterion micro-benchmarks for view indexing, slicing, and cursors.

use std::hint::black_box;

use arrview_bench::{u64_data, words};
use arrview_core::{Array, LAST};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_index_sum(c: &mut Criterion) {
    let data = u64_data(10_000, 1);
    let view = Array::from_slice(&data);
    c.bench_function("view_index_sum_10k", |b| {
        b.iter(|| {
            let v = black_box(view);
            let mut sum = 0u64;
            for i in 0..v.len() {
                sum = sum.wrapping_add(v[i]);
            }
            black_box(sum)
        });
    });
}

fn bench_iter_sum(c: &mut Criterion) {
    let data = u64_data(10_000, 1);
    let view = Array::from_slice(&data);
    c.bench_function("view_iter_sum_10k", |b| {
        b.iter(|| {
            let sum = black_box(view)
                .iter()
                .fold(0u64, |acc, &x| acc.wrapping_add(x));
            black_box(sum)
        });
    });
}

fn bench_reverse_slicing(c: &mut Criterion) {
    let data = u64_data(1024, 2);
    let view = Array::from_slice(&data);
    c.bench_function("view_trim_from_both_ends", |b| {
        b.iter(|| {
            let mut v = black_box(view);
            while v.len() > 2 {
                v = v.slice(1, LAST);
            }
            black_box(v)
        });
    });
}

fn bench_cursor_tokenize(c: &mut Criterion) {
    let text = words(2_000, 200, 10, 3);
    c.bench_function("cursor_count_words_2k", |b| {
        b.iter(|| {
            let mut cursor = Array::from_slice(black_box(&text[..]));
            let mut count = 0usize;
            let mut in_word = false;
            while let Some(&ch) = cursor.take_first() {
                let letter = ch != b' ';
                if letter && !in_word {
                    count += 1;
                }
                in_word = letter;
            }
            black_box(count)
        });
    });
}

criterion_group!(
    benches,
    bench_index_sum,
    bench_iter_sum,
    bench_reverse_slicing,
    bench_cursor_tokenize
);
criterion_main!(benches);

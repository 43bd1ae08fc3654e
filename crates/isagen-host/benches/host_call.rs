//! Host-call overhead benchmarks
//!
//! Measures the adapter round trip (pop arguments, call, push results) at
//! small and maximal arity, with and without the typed `Machine::call`
//! wrapper.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use isagen_host::{HostError, HostFunction, Machine, MachineConfig, StackValue};

fn machine() -> Machine {
    Machine::new(MachineConfig {
        stack_slots: 1024,
        memory_bytes: 4096,
    })
}

fn bench_invoke(c: &mut Criterion) {
    let mut group = c.benchmark_group("invoke");

    let mut m = machine();
    let add = m
        .register(HostFunction::new("add", |a: i32, b: i32| a.wrapping_add(b)))
        .unwrap();
    group.bench_function(BenchmarkId::new("arity", 2), |b| {
        b.iter(|| {
            let stack = m.stack_mut();
            stack.push(StackValue::from_i32(3)).unwrap();
            stack.push(StackValue::from_i32(4)).unwrap();
            m.invoke(black_box(add)).unwrap();
            m.stack_mut().pop().unwrap()
        })
    });

    let mut m = machine();
    let sum = m
        .register(HostFunction::new(
            "sum16",
            |a: i64, b: i64, c: i64, d: i64, e: i64, f: i64, g: i64, h: i64,
             i: i64, j: i64, k: i64, l: i64, n: i64, o: i64, p: i64, q: i64| {
                a + b + c + d + e + f + g + h + i + j + k + l + n + o + p + q
            },
        ))
        .unwrap();
    group.bench_function(BenchmarkId::new("arity", 16), |b| {
        b.iter(|| {
            for value in 0..16 {
                m.stack_mut().push(StackValue::from_i64(value)).unwrap();
            }
            m.invoke(black_box(sum)).unwrap();
            m.stack_mut().pop().unwrap()
        })
    });

    group.finish();
}

fn bench_typed_call(c: &mut Criterion) {
    let mut m = machine();
    let add = m
        .register(HostFunction::new("add", |a: i32, b: i32| a.wrapping_add(b)))
        .unwrap();
    c.bench_function("call_typed_add", |b| {
        b.iter(|| m.call::<_, i32>(black_box(add), (3i32, 4i32)).unwrap())
    });

    let mut m = machine();
    let store = m
        .register(HostFunction::new(
            "store",
            |m: &mut Machine, address: u32, value: u32| -> Result<(), HostError> {
                m.memory_mut().store(address, value)
            },
        ))
        .unwrap();
    c.bench_function("call_with_machine_store", |b| {
        b.iter(|| m.call::<_, ()>(black_box(store), (64u32, 0xfeed_u32)).unwrap())
    });
}

criterion_group!(benches, bench_invoke, bench_typed_call);
criterion_main!(benches);

//! Benchmark for extraction and diff performance.

use compat_core::differ::{check, check_snapshots, CheckOptions, ObligationPolicy};
use compat_core::types::{MemberDef, ModuleDef, ParameterDef, TypeDef};
use compat_core::Snapshot;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Synthetic module with `types` classes of `members` overloaded methods each.
fn synthetic_module(types: usize, members: usize, return_type: &str) -> ModuleDef {
    let defs = (0..types)
        .map(|t| {
            let mut ty = TypeDef::class("Bench.Types", &format!("Type{}", t))
                .with_interface("System.IDisposable")
                .with_member(MemberDef::constructor())
                .with_member(MemberDef::property("Name", "string"));
            for m in 0..members {
                let mut method = MemberDef::method(&format!("Method{}", m % 10), return_type);
                for p in 0..=(m / 10) {
                    method = method.with_param(ParameterDef::new(&format!("p{}", p), "int"));
                }
                ty = ty.with_member(method);
            }
            ty
        })
        .collect();
    ModuleDef::new("Bench.dll", defs)
}

fn bench_extract(c: &mut Criterion) {
    let module = synthetic_module(500, 40, "int");

    c.bench_function("extract_500_types", |b| {
        b.iter(|| black_box(Snapshot::extract(&module.types)))
    });
}

fn bench_diff_snapshots(c: &mut Criterion) {
    let old = Snapshot::extract(&synthetic_module(500, 40, "int").types).unwrap();
    let same = Snapshot::extract(&synthetic_module(500, 40, "int").types).unwrap();
    let changed = Snapshot::extract(&synthetic_module(500, 40, "long").types).unwrap();

    c.bench_function("diff_identical_500_types", |b| {
        b.iter(|| black_box(check_snapshots(&old, &same, ObligationPolicy::Always)))
    });

    c.bench_function("diff_changed_500_types", |b| {
        b.iter(|| black_box(check_snapshots(&old, &changed, ObligationPolicy::Always)))
    });
}

fn bench_check_parallel(c: &mut Criterion) {
    let old = synthetic_module(2000, 20, "int");
    let new = synthetic_module(2000, 20, "long");
    let sequential = CheckOptions::default();
    let parallel = CheckOptions::new().with_parallel(true);

    c.bench_function("check_2000_types_sequential", |b| {
        b.iter(|| black_box(check(&old, &new, &sequential)))
    });

    c.bench_function("check_2000_types_parallel", |b| {
        b.iter(|| black_box(check(&old, &new, &parallel)))
    });
}

criterion_group!(benches, bench_extract, bench_diff_snapshots, bench_check_parallel);
criterion_main!(benches);

use burgeon::algo::{GrowthOptions, GrowthSystem};
use burgeon::mesh::build_from_triangles;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Point3;

/// Create an n x n grid mesh with a gentle height field, for benchmarks.
fn create_grid_mesh(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for i in 0..=n {
        for j in 0..=n {
            let x = i as f64 / n as f64;
            let y = j as f64 / n as f64;
            let z = 0.1 * (x * 6.0).sin() * (y * 6.0).cos();
            vertices.push(Point3::new(x, y, z));
        }
    }

    let mut faces = Vec::with_capacity(2 * n * n);
    for i in 0..n {
        for j in 0..n {
            let v0 = i * (n + 1) + j;
            let v1 = v0 + 1;
            let v2 = v0 + (n + 1);
            let v3 = v2 + 1;
            faces.push([v0, v1, v3]);
            faces.push([v0, v3, v2]);
        }
    }

    (vertices, faces)
}

fn bench_mesh_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_construction");
    for n in [10, 20, 40] {
        let (vertices, faces) = create_grid_mesh(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| build_from_triangles(black_box(&vertices), black_box(&faces)).unwrap());
        });
    }
    group.finish();
}

fn bench_step_brute_force(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_brute_force");
    for n in [10, 20] {
        let (vertices, faces) = create_grid_mesh(n);
        let options = GrowthOptions::default()
            .with_collision_distance(0.15)
            .sequential();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter_batched(
                || GrowthSystem::new(&vertices, &faces, options.clone()).unwrap(),
                |mut system| {
                    system.step();
                    black_box(system)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_step_spatial_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_spatial_index");
    for n in [10, 20, 40] {
        let (vertices, faces) = create_grid_mesh(n);
        let options = GrowthOptions::default()
            .with_collision_distance(0.15)
            .with_spatial_index(true);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter_batched(
                || GrowthSystem::new(&vertices, &faces, options.clone()).unwrap(),
                |mut system| {
                    system.step();
                    black_box(system)
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_growth_run(c: &mut Criterion) {
    let (vertices, faces) = create_grid_mesh(10);
    let options = GrowthOptions::default()
        .with_grow(true)
        .with_max_vertex_count(400)
        .with_collision_distance(0.12)
        .with_spatial_index(true);

    c.bench_function("growth_run_10_steps", |b| {
        b.iter_batched(
            || GrowthSystem::new(&vertices, &faces, options.clone()).unwrap(),
            |mut system| {
                system.run(10);
                black_box(system)
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_mesh_construction,
    bench_step_brute_force,
    bench_step_spatial_index,
    bench_growth_run
);
criterion_main!(benches);

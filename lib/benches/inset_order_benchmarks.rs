//! Wall ordering benchmarks
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use inset_order::{
    scale, variable_width_path_to_bin_junctions, ExtrusionLine, InsetOrderOptimizer, LayerPlan,
    LayerPlanner, MeshPathConfigs, MeshSettings, Point, Polygon, SliceLayerPart,
    SliceMeshStorage, VariableWidthPaths,
};

/// A 40mm square with a grid of round holes, `depth` walls around everything.
fn perforated_plate(depth: usize) -> VariableWidthPaths {
    let width = 0.45;
    (0..depth)
        .map(|d| {
            let inset = 0.225 + d as f64 * width;
            let mut lines = vec![ExtrusionLine::from_polygon(
                &Polygon::rectangle(
                    Point::new_scale(inset, inset),
                    Point::new_scale(40.0 - inset, 40.0 - inset),
                ),
                scale(width),
                d,
            )];
            for i in 0..4 {
                for j in 0..4 {
                    let center = Point::new_scale(5.0 + i as f64 * 10.0, 5.0 + j as f64 * 10.0);
                    let hole = Polygon::circle(center, scale(2.0 + inset), 48).reversed();
                    lines.push(ExtrusionLine::from_polygon(&hole, scale(width), d));
                }
            }
            lines
        })
        .collect()
}

fn binning_benchmark(c: &mut Criterion) {
    let toolpaths = perforated_plate(4);
    c.bench_function("bin_junctions_4_walls", |b| {
        b.iter(|| variable_width_path_to_bin_junctions(black_box(&toolpaths)))
    });
}

fn optimize_benchmark(c: &mut Criterion) {
    let part = SliceLayerPart::from_toolpaths(perforated_plate(3));
    let configs = MeshPathConfigs::default();

    for (name, optimize) in [("optimize_indexed", false), ("optimize_nesting", true)] {
        let mesh = SliceMeshStorage::new(
            MeshSettings::new().optimize_wall_printing_order(optimize),
            Default::default(),
        );
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut plan = LayerPlan::new(0, Point::zero());
                let added =
                    InsetOrderOptimizer::new(&mut plan, &mesh, 0, &configs, &part, 0).optimize();
                black_box((added, plan.commands().len()))
            })
        });
    }
}

fn move_inside_benchmark(c: &mut Criterion) {
    let part = SliceLayerPart::from_toolpaths(perforated_plate(1));
    let configs = MeshPathConfigs::default();
    let mesh = SliceMeshStorage::default();

    c.bench_function("move_inside", |b| {
        b.iter(|| {
            let mut plan = LayerPlan::new(0, Point::new_scale(20.0, 0.225));
            InsetOrderOptimizer::new(&mut plan, &mesh, 0, &configs, &part, 0).move_inside();
            black_box(plan.last_planned_position_or_starting_position())
        })
    });
}

criterion_group!(
    benches,
    binning_benchmark,
    optimize_benchmark,
    move_inside_benchmark
);
criterion_main!(benches);

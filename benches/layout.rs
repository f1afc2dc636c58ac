use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use cfm_editor::{
    Cardinality, CharCountEstimator, ExpandedState, FeatureId, FeatureModel, LayoutConfig,
    compute_layout,
};

/// Builds a tree where every feature at the given depth has `arity` children.
fn build_tree(depth: usize, arity: usize) -> FeatureModel {
    let mut model = FeatureModel::new("root", Cardinality::single(1, Some(1)));
    let mut frontier = vec![model.root()];
    let mut counter = 0usize;
    for _ in 0..depth {
        let mut next: Vec<FeatureId> = Vec::new();
        for parent in frontier {
            for _ in 0..arity {
                counter += 1;
                let id = model
                    .add_feature(
                        parent,
                        &format!("feature{counter}"),
                        Cardinality::single(0, Some(1)),
                    )
                    .expect("unique name");
                next.push(id);
            }
        }
        frontier = next;
    }
    model
}

fn bench_layout(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let estimator = CharCountEstimator::new(config.scale_text);

    let wide = build_tree(3, 8);
    let wide_expanded = ExpandedState::initialize(&wide);
    c.bench_function("layout wide tree (585 nodes)", |b| {
        b.iter(|| {
            black_box(compute_layout(
                black_box(&wide),
                &wide_expanded,
                &config,
                &estimator,
            ))
        })
    });

    let deep = build_tree(9, 2);
    let deep_expanded = ExpandedState::initialize(&deep);
    c.bench_function("layout deep tree (1023 nodes)", |b| {
        b.iter(|| {
            black_box(compute_layout(
                black_box(&deep),
                &deep_expanded,
                &config,
                &estimator,
            ))
        })
    });

    let mut collapsed = ExpandedState::initialize(&deep);
    for id in deep.iter() {
        if deep[id].parent == Some(deep.root()) {
            collapsed.collapse(id);
        }
    }
    c.bench_function("layout deep tree, top collapsed", |b| {
        b.iter(|| {
            black_box(compute_layout(
                black_box(&deep),
                &collapsed,
                &config,
                &estimator,
            ))
        })
    });
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);

use c4_rs_renderer::collect::collect_view;
use c4_rs_renderer::config::LayoutConfig;
use c4_rs_renderer::filter::Filters;
use c4_rs_renderer::layout::{compute_layout, translate};
use c4_rs_renderer::model::Workspace;
use c4_rs_renderer::parser::parse_workspace;
use c4_rs_renderer::render::render_svg;
use c4_rs_renderer::scene::{SceneOptions, build_scene};
use c4_rs_renderer::style::StyleResolver;
use c4_rs_renderer::theme::Theme;
use c4_rs_renderer::view::{ViewType, resolve_view};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// One person, then `systems` systems with `containers` containers each, all in
/// a single container view. Each container calls the next one.
fn synthetic_workspace(systems: usize, containers: usize) -> String {
    let mut system_json = Vec::new();
    let mut view_elements = vec!["{\"id\":\"user\"}".to_string()];
    let mut relationships = Vec::new();
    let mut view_relationships = Vec::new();

    for s in 0..systems {
        let mut children = Vec::new();
        for c in 0..containers {
            let id = format!("s{s}c{c}");
            let tags = if c % 5 == 4 {
                "Element,Container,Database"
            } else {
                "Element,Container"
            };
            children.push(format!(
                "{{\"id\":\"{id}\",\"name\":\"Container {s}.{c}\",\"technology\":\"Rust\",\"description\":\"Handles part {c} of system {s} requests\",\"tags\":\"{tags}\"}}"
            ));
            view_elements.push(format!("{{\"id\":\"{id}\"}}"));
            if c > 0 {
                let rel = format!("r{s}_{c}");
                relationships.push(format!(
                    "{{\"id\":\"{rel}\",\"sourceId\":\"s{s}c{}\",\"destinationId\":\"{id}\",\"description\":\"Calls\",\"technology\":\"gRPC\"}}",
                    c - 1
                ));
                view_relationships.push(format!("{{\"id\":\"{rel}\"}}"));
            }
        }
        system_json.push(format!(
            "{{\"id\":\"s{s}\",\"name\":\"System {s}\",\"tags\":\"Element,Software System\",\"containers\":[{}]}}",
            children.join(",")
        ));
        view_elements.push(format!("{{\"id\":\"s{s}\"}}"));
    }

    format!(
        "{{\"model\":{{\"people\":[{{\"id\":\"user\",\"name\":\"User\",\"tags\":\"Element,Person\"}}],\"softwareSystems\":[{}],\"relationships\":[{}]}},\"views\":{{\"containerViews\":[{{\"key\":\"all\",\"elements\":[{}],\"relationships\":[{}]}}]}}}}",
        system_json.join(","),
        relationships.join(","),
        view_elements.join(","),
        view_relationships.join(",")
    )
}

fn sizes() -> [(&'static str, usize, usize); 3] {
    [("small", 2, 4), ("medium", 6, 12), ("large", 12, 40)]
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, systems, containers) in sizes() {
        let input = synthetic_workspace(systems, containers);
        group.bench_with_input(BenchmarkId::from_parameter(name), &input, |b, data| {
            b.iter(|| {
                let workspace = parse_workspace(black_box(data)).expect("parse failed");
                black_box(workspace.model.software_systems.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let config = LayoutConfig::default();
    let mut group = c.benchmark_group("layout");
    for (name, systems, containers) in sizes() {
        let workspace = parse_workspace(&synthetic_workspace(systems, containers)).expect("parse failed");
        let view = resolve_view(&workspace, ViewType::Container, None).expect("view");
        let contents = collect_view(&workspace, view, &Filters::default());
        group.bench_with_input(BenchmarkId::from_parameter(name), &contents, |b, data| {
            b.iter(|| {
                let raw = compute_layout(black_box(&data.elements), &config);
                let layout = translate(&raw, &config);
                black_box(layout.width);
            });
        });
    }
    group.finish();
}

fn render_once(workspace: &Workspace, theme: &Theme, config: &LayoutConfig) -> usize {
    let Some(view) = resolve_view(workspace, ViewType::Container, None) else {
        return 0;
    };
    let contents = collect_view(workspace, view, &Filters::default());
    let layout = translate(&compute_layout(&contents.elements, config), config);
    let styles = StyleResolver::new(&workspace.views.configuration, &Default::default());
    let scene = build_scene(
        &contents,
        &layout,
        &SceneOptions {
            view_key: Some(view.key.as_str()),
            selected: None,
            styles: &styles,
            theme,
            config,
        },
    );
    render_svg(&scene, theme).len()
}

fn bench_end_to_end(c: &mut Criterion) {
    let theme = Theme::default();
    let config = LayoutConfig {
        fast_text_metrics: true,
        ..LayoutConfig::default()
    };
    let mut group = c.benchmark_group("end_to_end");
    for (name, systems, containers) in sizes() {
        let workspace = parse_workspace(&synthetic_workspace(systems, containers)).expect("parse failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &workspace, |b, data| {
            b.iter(|| black_box(render_once(black_box(data), &theme, &config)));
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_parse, bench_layout, bench_end_to_end
);
criterion_main!(benches);

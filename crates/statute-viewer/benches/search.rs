//! Benchmarks for highlighting, outline building and a full search cycle.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use statute_dom::parse_html;
use statute_viewer::highlight::{ControlRegions, SearchPattern, find_and_highlight};
use statute_viewer::outline::build_outline;
use statute_viewer::{MemoryStore, Viewer, ViewerConfig};

/// Generate a statute page with `acts` acts of `sections` sections each.
fn generate_statute(acts: usize, sections: usize) -> String {
    let mut html = String::from("<html><body><div id=\"content\">\n");
    for a in 0..acts {
        html.push_str(&format!(
            "<div class=\"act-section\" id=\"act-{a}\"><h2>Act {a}</h2>\
             <button class=\"toggle-sections-btn\" aria-controls=\"act-{a}-sections\">Collapse Sections</button>\
             <div id=\"act-{a}-sections\">\n"
        ));
        for s in 0..sections {
            html.push_str(&format!(
                "<div class=\"section\"><h3>Section {a}.{s} Duty of care</h3>\
                 <p>A person must take reasonable care under section {s} of this Act.</p>\
                 <p>Breach of the duty in subsection ({s}) is an offence.</p></div>\n"
            ));
        }
        html.push_str("</div></div>\n");
    }
    html.push_str("</div></body></html>");
    html
}

fn bench_highlight(c: &mut Criterion) {
    let mut group = c.benchmark_group("highlight");
    let regions = ControlRegions::new(&[]);

    for (acts, sections) in [(5, 20), (20, 50)] {
        let html = generate_statute(acts, sections);
        let doc = parse_html(&html);
        let Some(content) = doc.get_element_by_id("content") else {
            continue;
        };
        let label = format!("{acts}a_{sections}s");

        for term in ["duty", "reasonable care"] {
            let Some(pattern) = SearchPattern::new(term) else {
                continue;
            };
            group.bench_with_input(
                BenchmarkId::new(term.replace(' ', "_"), &label),
                &(&doc, &pattern),
                |b, (doc, pattern)| {
                    b.iter(|| {
                        let mut doc = (*doc).clone();
                        find_and_highlight(&mut doc, content, pattern, content, &regions)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_outline(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline");

    for (acts, sections) in [(5, 20), (20, 50)] {
        let html = generate_statute(acts, sections);
        let doc = parse_html(&html);
        let Some(content) = doc.get_element_by_id("content") else {
            continue;
        };
        let label = format!("{acts}a_{sections}s");

        group.bench_with_input(BenchmarkId::new("build", &label), &doc, |b, doc| {
            b.iter(|| {
                let mut doc = doc.clone();
                build_outline(&mut doc, content)
            });
        });
    }

    group.finish();
}

fn bench_search_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_cycle");
    group.sample_size(20);

    for (acts, sections) in [(5, 20), (20, 50)] {
        let html = generate_statute(acts, sections);
        let label = format!("{acts}a_{sections}s");
        let mut viewer = Viewer::from_html(&html, ViewerConfig::default(), Box::new(MemoryStore::new()));
        viewer.tick(0);

        group.bench_function(BenchmarkId::new("search_and_rebuild", &label), |b| {
            b.iter(|| {
                viewer.set_search_term("duty");
                viewer.perform_search();
                viewer.tick(viewer.now());
                viewer.search().len()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_highlight, bench_outline, bench_search_cycle);
criterion_main!(benches);

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use replytree_core::{Document, Reply, SiteRules, compute_reply_counts, extract_topic_detail, extract_topic_list};

fn bench_parse(c: &mut Criterion) {
    let listing = std::fs::read_to_string("../../tests/fixtures/listing.html").unwrap();
    let topic = std::fs::read_to_string("../../tests/fixtures/topic.html").unwrap();

    let mut group = c.benchmark_group("parse");

    group.bench_with_input(BenchmarkId::new("listing", "4 cards"), &listing, |b, html| {
        b.iter(|| Document::parse(black_box(html)))
    });

    group.bench_with_input(BenchmarkId::new("topic", "4 replies"), &topic, |b, html| {
        b.iter(|| Document::parse(black_box(html)))
    });

    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let rules = SiteRules::default();
    let listing = Document::parse(&std::fs::read_to_string("../../tests/fixtures/listing.html").unwrap()).unwrap();
    let topic = Document::parse(&std::fs::read_to_string("../../tests/fixtures/topic.html").unwrap()).unwrap();

    c.bench_function("extract_topic_list", |b| {
        b.iter(|| extract_topic_list(black_box(&listing), black_box(&rules)))
    });

    c.bench_function("extract_topic_detail", |b| {
        b.iter(|| extract_topic_detail(black_box(&topic), "https://www.v2ex.com/t/1001", black_box(&rules)))
    });
}

fn synthetic_replies(n: usize) -> Vec<Reply> {
    (0..n)
        .map(|i| {
            let author = format!("user{}", i % 50);
            let content = if i % 3 == 0 { format!("@user{} reply", (i * 7) % 50) } else { "plain".to_string() };
            Reply::new(author, "", content, i.to_string())
        })
        .collect()
}

fn bench_reply_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_reply_counts");

    for n in [50, 200, 500] {
        let replies = synthetic_replies(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &replies, |b, replies| {
            b.iter(|| compute_reply_counts(black_box(replies.clone())))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_extraction, bench_reply_counts);
criterion_main!(benches);

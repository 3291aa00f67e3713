use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use flate2::write::GzEncoder;
use logsift::PipelineBuilder;
use std::fs::File;
use std::hint::black_box;
use std::io::Write;
use tempfile::TempDir;

const LINES_PER_FILE: usize = 2_000;

fn create_log_tree(num_files: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();

    for i in 0..num_files {
        let dir = temp_dir.path().join(format!("host_{}", i % 4));
        std::fs::create_dir_all(&dir).unwrap();

        let mut body = String::new();
        for n in 0..LINES_PER_FILE {
            let level = if n % 50 == 0 { "WARNING" } else { "INFO" };
            body.push_str(&format!("2024-01-01T00:00:{:02} {} request {} served\n", n % 60, level, n));
        }

        if i % 2 == 0 {
            std::fs::write(dir.join(format!("access-{}.log", i)), body).unwrap();
        } else {
            let file = File::create(dir.join(format!("access-{}.log.gz", i))).unwrap();
            let mut encoder = GzEncoder::new(file, flate2::Compression::fast());
            encoder.write_all(body.as_bytes()).unwrap();
            encoder.finish().unwrap();
        }
    }

    temp_dir
}

fn bench_full_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_scan");
    group.sample_size(20);

    for num_files in [4, 16] {
        let tree = create_log_tree(num_files);
        group.bench_with_input(
            BenchmarkId::from_parameter(num_files),
            &tree,
            |b, tree| {
                b.iter(|| {
                    let pipeline = PipelineBuilder::new(tree.path())
                        .glob("access-*.log*")
                        .pattern("WARNING")
                        .build()
                        .unwrap();
                    black_box(pipeline.filter(Result::is_ok).count())
                })
            },
        );
    }

    group.finish();
}

fn bench_first_match(c: &mut Criterion) {
    let tree = create_log_tree(16);

    c.bench_function("first_match_then_cancel", |b| {
        b.iter(|| {
            let mut pipeline = PipelineBuilder::new(tree.path())
                .glob("access-*.log*")
                .pattern("WARNING")
                .build()
                .unwrap();
            let first = pipeline.next();
            pipeline.cancel();
            black_box(first.is_some())
        })
    });
}

criterion_group!(benches, bench_full_scan, bench_first_match);
criterion_main!(benches);

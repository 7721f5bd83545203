use astyle_fmt_core::lexer::tokenize;
use astyle_fmt_core::options::SourceMode;
use astyle_fmt_core::{format_source, parse_options};
use core::time::Duration;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

const UNIT: &str = r#"#include <stdio.h>

namespace demo {
class Counter {
public:
    Counter(int start) : value(start) {}
    int next(int step) { value+=step; return value; }
private:
    int value;
};
}

static int table[] = {
    1, 2, 3,
    4, 5, 6
};

int run(int argc, char **argv)
{
    demo::Counter counter(0);
    for (int i=0; i<argc; i++) {
        if (argv[i][0]=='-')
            continue;
        else if (counter.next(i) > 10) { printf("%s\n", argv[i]); }
        switch (i % 3) {
        case 0: break;
        default:
            counter.next(table[i % 6]);
        }
    }
    /* done
     * with everything */
    return 0;
}
"#;

/// Repeats the sample unit until the source is roughly `size` bytes long.
fn make_source(size: usize) -> String {
    let mut source = String::with_capacity(size + UNIT.len());
    while source.len() < size {
        source.push_str(UNIT);
    }
    source
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Format Source");
    let source = make_source(1024 * 1024);

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.warm_up_time(Duration::from_secs(5));
    group.measurement_time(Duration::from_secs(20));

    group.bench_function("tokenize", |b| {
        b.iter(|| tokenize(black_box(&source), SourceMode::C, 4))
    });

    for options in [
        "",
        "--style=allman",
        "--style=otbs --pad-oper --align-pointer=name",
        "--style=java --indent-switches --break-blocks --unpad-paren",
    ] {
        let parsed = parse_options(options).unwrap();
        let name = if options.is_empty() { "defaults" } else { options };
        group.bench_with_input(BenchmarkId::new("format", name), &parsed, |b, parsed| {
            b.iter(|| format_source(black_box(&source), parsed))
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

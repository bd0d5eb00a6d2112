//! Criterion benchmarks for condition parsing and evaluation.
//!
//! Run with: `cargo bench -p ottl`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use ottl::{Condition, EvalContextFamily, IndexExpr, ParseError, PathAccessor, PathExpr, Value};

// =====================================================================================================================
// Benchmark context family
// =====================================================================================================================

struct BenchContext<'a> {
    status: i64,
    enabled: bool,
    route: &'a str,
    labels: &'a [(&'a str, &'a str)],
}

struct BenchFamily;

#[derive(Debug)]
enum BenchPath {
    Status,
    Enabled,
    Route,
    Label(String),
}

impl EvalContextFamily for BenchFamily {
    type Context<'a> = BenchContext<'a>;
    type Path = BenchPath;

    fn resolve_path(path: &PathExpr) -> Result<BenchPath, ParseError> {
        match (path.segments().as_slice(), path.indexes.as_slice()) {
            (["status"], []) => Ok(BenchPath::Status),
            (["enabled"], []) => Ok(BenchPath::Enabled),
            (["route"], []) => Ok(BenchPath::Route),
            (["labels"], [IndexExpr::String(key)]) => Ok(BenchPath::Label(key.clone())),
            _ => Err(ParseError::unknown_path(path)),
        }
    }

    fn resolve_enum(name: &str) -> Option<i64> {
        match name {
            "STATUS_OK" => Some(200),
            "STATUS_ERROR" => Some(500),
            _ => None,
        }
    }
}

impl PathAccessor<BenchFamily> for BenchPath {
    fn get<'a>(&self, ctx: &BenchContext<'a>) -> Value<'a> {
        match self {
            BenchPath::Status => Value::Int(ctx.status),
            BenchPath::Enabled => Value::Bool(ctx.enabled),
            BenchPath::Route => Value::str(ctx.route),
            BenchPath::Label(key) => ctx
                .labels
                .iter()
                .find(|(k, _)| k == key)
                .map_or(Value::Nil, |(_, v)| Value::str(v)),
        }
    }
}

const REALISTIC: &str = r#"(status == STATUS_OK or status < STATUS_ERROR) and enabled and labels["env"] in ["dev", "staging"] and not IsMatch(route, "^/health")"#;

// =====================================================================================================================
// Criterion: parsing
// =====================================================================================================================

fn bench_parse_realistic(c: &mut Criterion) {
    c.bench_function("parse_realistic", |b| {
        b.iter(|| {
            let condition = Condition::<BenchFamily>::parse(black_box(REALISTIC));
            black_box(condition.is_ok())
        })
    });
}

// =====================================================================================================================
// Criterion: evaluation
// =====================================================================================================================

fn bench_evaluate_realistic(c: &mut Criterion) {
    let condition = match Condition::<BenchFamily>::parse(REALISTIC) {
        Ok(condition) => condition,
        Err(e) => panic!("Parse failed: {}", e),
    };

    let ctx = BenchContext {
        status: 200,
        enabled: true,
        route: "/api/checkout",
        labels: &[("env", "dev"), ("region", "us-east-1")],
    };

    c.bench_function("evaluate_realistic", |b| b.iter(|| black_box(condition.evaluate(black_box(&ctx)))));
}

fn bench_evaluate_missing_attribute(c: &mut Criterion) {
    let condition = match Condition::<BenchFamily>::parse(r#"labels["missing"] == "x" or labels["missing"] == nil"#) {
        Ok(condition) => condition,
        Err(e) => panic!("Parse failed: {}", e),
    };

    let ctx = BenchContext {
        status: 500,
        enabled: false,
        route: "/",
        labels: &[],
    };

    c.bench_function("evaluate_missing_attribute", |b| {
        b.iter(|| black_box(condition.evaluate(black_box(&ctx))))
    });
}

criterion_group!(
    benches,
    bench_parse_realistic,
    bench_evaluate_realistic,
    bench_evaluate_missing_attribute,
);
criterion_main!(benches);

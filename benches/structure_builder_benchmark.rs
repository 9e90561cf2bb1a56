use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use serde_json::{json, Value};
use std::sync::Arc;

use sisodb::core::config::Config;
use sisodb::core::types::DataTypeCode;
use sisodb::query::generator::DbQueryGenerator;
use sisodb::query::lambda::{Operator, ParsedLambda};
use sisodb::query::query::{Paging, StructureQuery};
use sisodb::sql::statements::DefaultSqlStatements;
use sisodb::structure::accessor::JsonAccessor;
use sisodb::structure::builder::StructureBuilder;
use sisodb::structure::id::StructureIdType;
use sisodb::structure::id_generator::DefaultStructureIdGenerator;
use sisodb::structure::index::UniqueMode;
use sisodb::structure::schema::StructureSchema;
use sisodb::structure::serializer::JsonStructureSerializer;

fn order_schema() -> StructureSchema {
    StructureSchema::new("Order", StructureIdType::Guid)
        .add_unique("OrderNo", DataTypeCode::IntegerNumber, UniqueMode::PerType)
        .add_index("Customer.Name", DataTypeCode::String)
        .add_index("Total", DataTypeCode::FractalNumber)
        .add_index("Shipped", DataTypeCode::Bool)
        .add_enumerable("Lines.Sku", DataTypeCode::String)
        .add_enumerable("Lines.Quantity", DataTypeCode::IntegerNumber)
}

/// Helper to create test orders
fn create_orders(count: usize) -> Vec<Value> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let lines: Vec<Value> = (0..rng.gen_range(1..8))
                .map(|l| json!({ "Sku": format!("SKU-{}", l), "Quantity": rng.gen_range(1..20) }))
                .collect();
            json!({
                "OrderNo": i as i64 + 1,
                "Customer": { "Name": format!("Customer {}", i % 100) },
                "Total": rng.gen_range(1.0..5000.0),
                "Shipped": rng.gen_bool(0.5),
                "Lines": lines,
            })
        })
        .collect()
}

fn builder(threshold: usize) -> StructureBuilder<Value> {
    StructureBuilder::new(
        Arc::new(JsonAccessor::new()),
        Arc::new(JsonStructureSerializer),
        Arc::new(DefaultStructureIdGenerator::in_memory()),
    )
    .with_parallel_threshold(threshold)
}

/// Serial vs parallel batch builds
fn bench_create_structures(c: &mut Criterion) {
    let schema = order_schema();
    let mut group = c.benchmark_group("create_structures");

    for batch_size in [10, 100, 1000, 5000].iter() {
        let orders = create_orders(*batch_size);

        group.bench_with_input(BenchmarkId::new("serial", batch_size), batch_size, |b, _| {
            let builder = builder(usize::MAX);
            b.iter(|| {
                let mut items = orders.clone();
                black_box(builder.create_structures(&mut items, &schema).unwrap());
            });
        });

        group.bench_with_input(BenchmarkId::new("parallel", batch_size), batch_size, |b, _| {
            let builder = builder(0);
            b.iter(|| {
                let mut items = orders.clone();
                black_box(builder.create_structures(&mut items, &schema).unwrap());
            });
        });
    }

    group.finish();
}

/// Query SQL generation
fn bench_generate_query(c: &mut Criterion) {
    let schema = order_schema();
    let generator =
        DbQueryGenerator::new(Arc::new(DefaultSqlStatements::new()), &Config::default()).unwrap();
    let query = StructureQuery::new()
        .filter(
            ParsedLambda::new()
                .member("Total", DataTypeCode::FractalNumber)
                .op(Operator::GreaterThan)
                .value(100.0)
                .op(Operator::And)
                .member("Shipped", DataTypeCode::Bool)
                .op(Operator::Equal)
                .value(true),
        )
        .sort_desc("Total", DataTypeCode::FractalNumber)
        .sort_asc("Customer.Name", DataTypeCode::String)
        .page(Paging::new(3, 50).unwrap());

    c.bench_function("generate_query", |b| {
        b.iter(|| black_box(generator.generate_query(&query, &schema).unwrap()));
    });
}

criterion_group!(benches, bench_create_structures, bench_generate_query);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;
use weft_ioc::{Arguments, Container, Parameter, TypeDescriptor, TypeRegistry, Value};

const CHAIN_DEPTH: usize = 16;

struct Leaf;
struct Node {
  _next: Value,
}

fn registry() -> TypeRegistry {
  let types = TypeRegistry::new().with(TypeDescriptor::class("Leaf", |_| Ok(Value::new(Leaf))));

  // Node0 -> Node1 -> ... -> Leaf
  for depth in 0..CHAIN_DEPTH {
    let next = if depth + 1 == CHAIN_DEPTH {
      "Leaf".to_string()
    } else {
      format!("Node{}", depth + 1)
    };
    types.register(
      TypeDescriptor::class(format!("Node{depth}"), |args: &Arguments| {
        Ok(Value::new(Node {
          _next: args.value("next").cloned().unwrap_or_else(|| Value::new(Leaf)),
        }))
      })
      .with_parameter(Parameter::named("next", next)),
    );
  }
  types
}

fn bench_resolution(c: &mut Criterion) {
  let container = Arc::new(Container::with_reflector(registry()));
  container.bind("transient", "Leaf");
  container.singleton("shared", "Leaf");
  container.when("Node0").needs("Node1").give("Leaf").unwrap();

  let mut group = c.benchmark_group("resolve");

  group.bench_function("build_unbound", |b| {
    b.iter(|| black_box(container.make("Leaf").unwrap()))
  });

  group.bench_function("transient_binding", |b| {
    b.iter(|| black_box(container.make("transient").unwrap()))
  });

  group.bench_function("singleton_hit", |b| {
    container.make("shared").unwrap();
    b.iter(|| black_box(container.make("shared").unwrap()))
  });

  group.bench_function("contextual_short_circuit", |b| {
    b.iter(|| black_box(container.make("Node0").unwrap()))
  });

  group.bench_function("deep_chain", |b| {
    b.iter(|| black_box(container.make("Node1").unwrap()))
  });

  group.finish();
}

criterion_group!(benches, bench_resolution);
criterion_main!(benches);

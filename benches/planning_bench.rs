use criterion::{criterion_group, criterion_main, Criterion};
use rv2_matrix::config::RunnerConfig;
use rv2_matrix::core::planner::{plan_execution, Action, CommandFactory};
use rv2_matrix::matrix::{Selection, FILTERS};
use rv2_matrix::reporting::report::ValidationReport;
use std::hint::black_box;

fn bench_plan_matrix(c: &mut Criterion) {
    let selection = Selection::default();
    c.bench_function("plan_matrix", |b| {
        b.iter(|| plan_execution(black_box(&selection), FILTERS, Action::ALL.to_vec()))
    });
}

fn bench_derive_commands(c: &mut Criterion) {
    let factory = CommandFactory::new(&RunnerConfig::default());
    let plan = plan_execution(&Selection::default(), FILTERS, Action::ALL.to_vec()).unwrap();
    c.bench_function("derive_commands", |b| {
        b.iter(|| {
            for config in &plan.configurations {
                black_box(factory.clean(config));
                black_box(factory.build(config));
                black_box(factory.run(config));
            }
        })
    });
}

fn bench_report_to_junit(c: &mut Criterion) {
    let mut output = String::from("<?xml version=\"1.0\"?>\n<report>\n<test>\n<title>Bench</title>\n<test_cases>\n");
    for no in 1..=200 {
        output.push_str(&format!(
            "<tc><no>{no}</no><func>TC_{no}</func><req></req><meth></meth><dbgi><detail><module>RV2.c</module><line>{no}</line></detail></dbgi><res>{}</res></tc>\n",
            if no % 10 == 0 { "FAILED" } else { "PASSED" }
        ));
    }
    output.push_str("</test_cases>\n<summary><tcnt>200</tcnt><exec>200</exec><pass>180</pass><fail>20</fail><warn>0</warn><tres>FAILED</tres></summary>\n</test>\n</report>\n");

    c.bench_function("report_to_junit", |b| {
        b.iter(|| {
            ValidationReport::from_output(black_box(&output))
                .map(|report| report.to_junit("RTX5.CMSDK_CM3_VHT.AC6.Bench"))
        })
    });
}

criterion_group!(benches, bench_plan_matrix, bench_derive_commands, bench_report_to_junit);
criterion_main!(benches);

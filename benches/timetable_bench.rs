//! Criterion benchmarks for timetable construction and search.
//!
//! Uses synthetic schools of increasing size: each class takes every
//! lecture, three teachers per lecture, rooms shared freely.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_timetable::prelude::*;

fn school(classes: usize) -> ScheduleRequest {
    let lectures = 6;
    let hours = [5, 4, 4, 3, 2, 2];

    let mut request = ScheduleRequest::new(WeekGrid::school_week());
    let mut grade = Grade::new("G1");
    for l in 0..lectures {
        request = request.with_lecture(Lecture::new(format!("L{l}"), format!("Lecture {l}")));
        for k in 0..3 {
            request = request.with_teacher(
                Teacher::new(format!("T{l}-{k}")).with_capability(format!("L{l}")),
            );
        }
        grade = grade.with_requirement(format!("L{l}"), hours[l]);
    }
    for r in 0..classes + 2 {
        request = request.with_room(Room::new(format!("R{r:02}")));
    }
    request = request.with_grade(grade);
    for c in 0..classes {
        request = request.with_class(Class::new(format!("C{c:02}"), "G1"));
    }
    request
}

fn bench_graph_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_build");
    for &classes in &[4, 12] {
        let request = school(classes);
        group.bench_with_input(BenchmarkId::from_parameter(classes), &request, |b, r| {
            b.iter(|| ConstraintGraph::build(black_box(r)));
        });
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    group.sample_size(10);
    let scheduler = Scheduler::new(SolverConfig::default().without_time_limit());

    for &classes in &[4, 8, 12] {
        let request = school(classes);
        group.bench_with_input(BenchmarkId::from_parameter(classes), &request, |b, r| {
            b.iter(|| {
                let solution = scheduler.solve(black_box(r));
                black_box(solution.map(|s| s.stats.nodes).unwrap_or(0))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_graph_build, bench_solve);
criterion_main!(benches);

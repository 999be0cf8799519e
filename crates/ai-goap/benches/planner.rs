use ai_goap::{Action, ActionDef, Effect, Goal, Planner, Requirement, SimpleAction, WorldState};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A chain of `len` actions where step `i` needs the fact produced by step `i - 1`.
fn chain(len: usize) -> Vec<SimpleAction> {
    (0..len)
        .map(|i| {
            let mut def =
                ActionDef::new(format!("step{i}")).effect(Effect::set(format!("f{i}"), true));
            if i > 0 {
                def = def.require(Requirement::equals(format!("f{}", i - 1), true));
            }
            SimpleAction::new(def)
        })
        .collect()
}

fn bench_plan_chain(c: &mut Criterion) {
    let actions = chain(16);
    let refs: Vec<&dyn Action> = actions.iter().map(|a| a as &dyn Action).collect();
    let world = WorldState::new();
    let goal = Goal::new("done").require(Requirement::equals("f15", true));
    let planner = Planner::new();

    c.bench_function("ai-goap/plan(chain=16)", |b| {
        b.iter(|| {
            let plan = planner.plan(&refs, black_box(&world), &goal);
            black_box(plan.map(|p| p.len()));
        })
    });
}

fn bench_plan_counter(c: &mut Criterion) {
    let actions = [
        SimpleAction::new(ActionDef::new("inc").effect(Effect::add("n", 1))),
        SimpleAction::new(ActionDef::new("inc_big").effect(Effect::add("n", 5)).with_cost(4.0)),
    ];
    let refs: Vec<&dyn Action> = actions.iter().map(|a| a as &dyn Action).collect();
    let world: WorldState = [("n", 0)].into_iter().collect();
    let goal = Goal::new("count").require(Requirement::equals("n", 23));
    let planner = Planner::new();

    c.bench_function("ai-goap/plan(counter=23)", |b| {
        b.iter(|| black_box(planner.search(&refs, &world, &goal).expansions))
    });
}

criterion_group!(benches, bench_plan_chain, bench_plan_counter);
criterion_main!(benches);

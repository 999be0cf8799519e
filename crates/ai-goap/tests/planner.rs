use ai_core::Value;
use ai_goap::{
    Action, ActionDef, Effect, Goal, Planner, PlannerConfig, Requirement, SimpleAction, WorldState,
};

fn action(def: ActionDef) -> SimpleAction {
    SimpleAction::new(def)
}

fn refs(actions: &[SimpleAction]) -> Vec<&dyn Action> {
    actions.iter().map(|a| a as &dyn Action).collect()
}

fn names(actions: &[SimpleAction], plan: &ai_goap::Plan) -> Vec<String> {
    plan.steps()
        .map(|id| actions[id.index()].name().to_owned())
        .collect()
}

#[test]
fn satisfied_goal_yields_empty_plan_without_expansions() {
    let actions = vec![action(
        ActionDef::new("arm").effect(Effect::set("has_weapon", true)),
    )];
    let world: WorldState = [("has_weapon", true)].into_iter().collect();
    let goal = Goal::new("armed").require(Requirement::equals("has_weapon", true));

    let search = Planner::new().search(&refs(&actions), &world, &goal);
    let plan = search.plan.unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.cost(), 0.0);
    assert_eq!(search.expansions, 0);
}

#[test]
fn single_action_plan() {
    let actions = vec![action(
        ActionDef::new("pick_up_weapon").effect(Effect::set("has_weapon", true)),
    )];
    let world: WorldState = [("has_weapon", false)].into_iter().collect();
    let goal = Goal::new("armed").require(Requirement::equals("has_weapon", true));

    let plan = Planner::new().plan(&refs(&actions), &world, &goal).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.cost(), 1.0);
    assert_eq!(plan.goal(), "armed");
    assert_eq!(names(&actions, &plan), vec!["pick_up_weapon"]);
}

#[test]
fn cheapest_chain_wins() {
    let actions = vec![
        action(
            ActionDef::new("buy_axe")
                .require(Requirement::at_least("gold", 5.0))
                .effect(Effect::set("has_axe", true))
                .effect(Effect::add("gold", -5))
                .with_cost(2.0),
        ),
        action(
            ActionDef::new("chop_with_axe")
                .require(Requirement::equals("has_axe", true))
                .effect(Effect::add("wood", 1))
                .with_cost(1.0),
        ),
        action(
            ActionDef::new("gather_by_hand")
                .effect(Effect::add("wood", 1))
                .with_cost(5.0),
        ),
    ];
    let world: WorldState = [("gold", 10)].into_iter().collect();
    let goal = Goal::new("wood").require(Requirement::at_least("wood", 1.0));

    let plan = Planner::new().plan(&refs(&actions), &world, &goal).unwrap();
    assert_eq!(names(&actions, &plan), vec!["buy_axe", "chop_with_axe"]);
    assert_eq!(plan.cost(), 3.0);
}

#[test]
fn unreachable_goal_has_no_plan() {
    let actions = vec![action(
        ActionDef::new("wander").effect(Effect::set("bored", true)),
    )];
    let world = WorldState::new();
    let goal = Goal::new("rich").require(Requirement::equals("rich", true));

    let search = Planner::new().search(&refs(&actions), &world, &goal);
    assert!(search.plan.is_none());
    assert_eq!(search.expansions, 2);
}

#[test]
fn iteration_cap_ends_an_unbounded_search() {
    let actions = vec![action(ActionDef::new("count").effect(Effect::add("n", 1)))];
    let world = WorldState::new();
    let goal = Goal::new("never").require(Requirement::less_than("n", 0.0));

    let planner = Planner::new().with_config(PlannerConfig { max_iterations: 50 });
    let search = planner.search(&refs(&actions), &world, &goal);
    assert!(search.plan.is_none());
    assert_eq!(search.expansions, 50);
}

#[test]
fn actions_only_expand_where_requirements_hold() {
    let actions = vec![
        action(
            ActionDef::new("open_door")
                .require(Requirement::equals("has_key", true))
                .effect(Effect::set("door_open", true)),
        ),
        action(ActionDef::new("take_key").effect(Effect::set("has_key", true))),
    ];
    let world = WorldState::new();
    let goal = Goal::new("inside").require(Requirement::equals("door_open", true));

    let plan = Planner::new().plan(&refs(&actions), &world, &goal).unwrap();
    assert_eq!(names(&actions, &plan), vec!["take_key", "open_door"]);
}

#[test]
fn composite_goals_plan_sub_goals_in_sequence() {
    let actions = vec![
        action(
            ActionDef::new("cook")
                .require(Requirement::equals("has_food", true))
                .effect(Effect::set("fed", true)),
        ),
        action(ActionDef::new("shop").effect(Effect::set("has_food", true)).with_cost(2.0)),
        action(
            ActionDef::new("sleep")
                .require(Requirement::equals("fed", true))
                .effect(Effect::set("rested", true)),
        ),
    ];
    let world = WorldState::new();
    let goal = Goal::composite(
        "evening",
        [
            Goal::new("eat").require(Requirement::equals("fed", true)),
            Goal::new("rest").require(Requirement::equals("rested", true)),
        ],
    );

    let plan = Planner::new().plan(&refs(&actions), &world, &goal).unwrap();
    assert_eq!(names(&actions, &plan), vec!["shop", "cook", "sleep"]);
    assert_eq!(plan.cost(), 4.0);
    assert_eq!(plan.goal(), "evening");
}

#[test]
fn composite_fails_when_any_sub_goal_fails() {
    let actions = vec![action(ActionDef::new("eat").effect(Effect::set("fed", true)))];
    let goal = Goal::composite(
        "day",
        [
            Goal::new("eat").require(Requirement::equals("fed", true)),
            Goal::new("fly").require(Requirement::equals("flying", true)),
        ],
    );

    assert!(Planner::new()
        .plan(&refs(&actions), &WorldState::new(), &goal)
        .is_none());
}

#[test]
fn composite_goal_satisfaction_and_distance() {
    let goal = Goal::composite(
        "ready",
        [
            Goal::new("a").require(Requirement::equals("a", true)),
            Goal::new("b").require(Requirement::equals("b", true).with_weight(3.0)),
        ],
    );
    let mut world = WorldState::new();
    assert_eq!(goal.distance(&world), 4.0);
    world.set("a", true);
    assert!(!goal.is_satisfied(&world));
    world.set("b", Value::Bool(true));
    assert!(goal.is_satisfied(&world));
    assert_eq!(goal.decompose().len(), 2);
}

#[test]
#[should_panic(expected = "composite goal")]
fn composite_goal_rejects_own_requirements() {
    let _ = Goal::composite("c", [Goal::new("x")]).require(Requirement::present("y"));
}

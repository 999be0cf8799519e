use ai_bt::{BuildError, NodeSpec, Registry, TreeSpec};
use ai_core::{BbKey, Blackboard, Status, TickContext};

const AMMO: BbKey<i64> = BbKey::new("ammo");
const SHOTS: BbKey<i64> = BbKey::new("shots");

fn registry() -> Registry {
    let mut registry = Registry::with_builtins();
    registry
        .register_condition("HasAmmo", |bb: &Blackboard| bb.read(AMMO).unwrap_or(0) > 0)
        .unwrap();
    registry
        .register_action("Shoot", |_ctx: &TickContext, bb: &mut Blackboard| {
            let ammo = bb.read(AMMO).unwrap_or(0);
            bb.write(AMMO, ammo - 1);
            let shots = bb.read(SHOTS).unwrap_or(0);
            bb.write(SHOTS, shots + 1);
            Status::Success
        })
        .unwrap();
    registry
        .register_callback("Reload", |bb: &mut Blackboard| {
            bb.write(AMMO, 2);
        })
        .unwrap();
    registry
}

fn combat() -> TreeSpec {
    TreeSpec::new("root")
        .with_node(NodeSpec::new("root", "Fallback").with_children(["attack", "reload"]))
        .with_node(NodeSpec::new("attack", "Sequence").with_children(["has_ammo", "shoot"]))
        .with_node(NodeSpec::new("has_ammo", "HasAmmo"))
        .with_node(NodeSpec::new("shoot", "Shoot"))
        .with_node(NodeSpec::new("reload", "Reload"))
}

#[test]
fn builds_and_runs_a_declared_tree() {
    let registry = registry();
    let mut tree = registry.build(&combat()).unwrap();
    let mut bb = Blackboard::new();

    for tick in 0..3 {
        assert_eq!(tree.tick(&TickContext::new(tick, 0.1), &mut bb), Status::Success);
    }
    assert_eq!(bb.read(SHOTS), Some(2));
    assert_eq!(bb.read(AMMO), Some(0));
    assert_eq!(tree.node_name(tree.root()), Some("root"));
    assert!(tree.find("shoot").is_some());
}

#[test]
fn registered_closures_are_cloned_per_tree() {
    let registry = registry();
    let first = registry.build(&combat()).unwrap();
    let second = registry.build(&combat()).unwrap();
    assert_eq!(first.len(), second.len());
}

#[test]
fn duplicate_kind_is_rejected() {
    let mut registry = registry();
    let err = registry
        .register_condition("HasAmmo", |_bb: &Blackboard| true)
        .unwrap_err();
    assert_eq!(err, BuildError::DuplicateKind("HasAmmo".into()));
}

#[test]
fn unknown_kind_and_references_are_config_errors() {
    let registry = registry();

    let spec = TreeSpec::new("root").with_node(NodeSpec::new("root", "Teleport"));
    assert_eq!(
        registry.build(&spec).unwrap_err(),
        BuildError::UnknownKind("Teleport".into())
    );

    let spec = TreeSpec::new("root")
        .with_node(NodeSpec::new("root", "Sequence").with_children(["ghost"]));
    assert_eq!(
        registry.build(&spec).unwrap_err(),
        BuildError::UnknownNode {
            parent: "root".into(),
            child: "ghost".into()
        }
    );

    let spec = TreeSpec::new("missing").with_node(NodeSpec::new("root", "Sequence"));
    assert_eq!(
        registry.build(&spec).unwrap_err(),
        BuildError::UnknownRoot("missing".into())
    );
}

#[test]
fn if_then_else_requires_two_or_three_children() {
    let registry = registry();
    let spec = TreeSpec::new("root")
        .with_node(NodeSpec::new("root", "IfThenElse").with_children(["cond"]))
        .with_node(NodeSpec::new("cond", "HasAmmo"));

    let err = registry.build(&spec).unwrap_err();
    assert!(matches!(
        err,
        BuildError::ChildCount { ref kind, found: 1, .. } if kind == "IfThenElse"
    ));
}

#[test]
fn cycles_and_shared_children_are_rejected() {
    let registry = registry();

    let spec = TreeSpec::new("a")
        .with_node(NodeSpec::new("a", "Sequence").with_children(["b"]))
        .with_node(NodeSpec::new("b", "Inverter").with_children(["a"]));
    assert_eq!(registry.build(&spec).unwrap_err(), BuildError::Cycle("a".into()));

    let spec = TreeSpec::new("root")
        .with_node(NodeSpec::new("root", "Sequence").with_children(["leaf", "leaf"]))
        .with_node(NodeSpec::new("leaf", "HasAmmo"));
    assert_eq!(
        registry.build(&spec).unwrap_err(),
        BuildError::SharedChild("leaf".into())
    );
}

#[test]
fn parameters_are_type_checked() {
    let registry = registry();

    let spec = TreeSpec::new("wait").with_node(NodeSpec::new("wait", "Wait"));
    assert_eq!(
        registry.build(&spec).unwrap_err(),
        BuildError::MissingParam {
            node: "wait".into(),
            param: "seconds".into()
        }
    );

    let spec = TreeSpec::new("wait")
        .with_node(NodeSpec::new("wait", "Wait").with_param("seconds", "soon"));
    assert!(matches!(
        registry.build(&spec).unwrap_err(),
        BuildError::InvalidParam { ref param, .. } if param == "seconds"
    ));
}

#[test]
fn switch_routes_by_blackboard_value() {
    let registry = registry();
    let spec = TreeSpec::new("mode")
        .with_node(
            NodeSpec::new("mode", "Switch")
                .with_param("key", "mode")
                .with_param("type", "int")
                .with_case("1", "shoot")
                .with_children(["reload"]),
        )
        .with_node(NodeSpec::new("shoot", "Shoot"))
        .with_node(NodeSpec::new("reload", "Reload"));
    let mut tree = registry.build(&spec).unwrap();
    let mut bb = Blackboard::new();

    tree.tick(&TickContext::default(), &mut bb);
    assert_eq!(bb.read(AMMO), Some(2));

    bb.set("mode", 1);
    tree.tick(&TickContext::default(), &mut bb);
    assert_eq!(bb.read(SHOTS), Some(1));
}

#[test]
fn switch_keeps_its_child_until_the_run_ends() {
    let mut registry = registry();
    for side in ["left", "right"] {
        let key = format!("{side}_ticks");
        registry
            .register_action(side, move |_ctx: &TickContext, bb: &mut Blackboard| {
                let ticks = bb.get_as::<i64>(&key).unwrap_or(0);
                bb.set(key.clone(), ticks + 1);
                Status::Running
            })
            .unwrap();
    }
    let spec = TreeSpec::new("mode")
        .with_node(
            NodeSpec::new("mode", "Switch")
                .with_param("key", "mode")
                .with_param("type", "int")
                .with_case("1", "go_left")
                .with_case("2", "go_right"),
        )
        .with_node(NodeSpec::new("go_left", "left"))
        .with_node(NodeSpec::new("go_right", "right"));
    let mut tree = registry.build(&spec).unwrap();
    let mut bb = Blackboard::new();
    bb.set("mode", 1);

    assert_eq!(tree.tick(&TickContext::new(0, 0.1), &mut bb), Status::Running);
    bb.set("mode", 2);
    assert_eq!(tree.tick(&TickContext::new(1, 0.1), &mut bb), Status::Running);

    assert_eq!(bb.get_as::<i64>("left_ticks"), Some(2));
    assert!(!bb.contains("right_ticks"));
}

#[test]
fn built_tree_debug_names_root_and_size() {
    let tree = registry().build(&combat()).unwrap();
    let debug = format!("{tree:?}");
    assert!(debug.starts_with("BehaviorTree"));
    assert!(debug.contains("len: 5"));
}

#[test]
fn switch_rejects_unparseable_case_labels() {
    let registry = registry();
    let spec = TreeSpec::new("mode")
        .with_node(
            NodeSpec::new("mode", "Switch")
                .with_param("key", "mode")
                .with_param("type", "int")
                .with_case("one", "shoot"),
        )
        .with_node(NodeSpec::new("shoot", "Shoot"));
    assert!(matches!(
        registry.build(&spec).unwrap_err(),
        BuildError::InvalidParam { ref param, .. } if param == "cases"
    ));
}

#[test]
fn sub_trees_are_instantiated_by_name() {
    let mut registry = registry();
    registry.register_tree("combat", combat()).unwrap();
    assert_eq!(
        registry.register_tree("combat", combat()).unwrap_err(),
        BuildError::DuplicateTree("combat".into())
    );

    let spec = TreeSpec::new("main")
        .with_node(NodeSpec::new("main", "Sequence").with_children(["fight"]))
        .with_node(NodeSpec::new("fight", "SubTree").with_param("tree", "combat"));
    let mut tree = registry.build(&spec).unwrap();
    let mut bb = Blackboard::new();

    assert_eq!(tree.tick(&TickContext::default(), &mut bb), Status::Success);
    assert_eq!(bb.read(AMMO), Some(2));

    let spec =
        TreeSpec::new("x").with_node(NodeSpec::new("x", "SubTree").with_param("tree", "nope"));
    assert_eq!(
        registry.build(&spec).unwrap_err(),
        BuildError::UnknownTree("nope".into())
    );
}

#[test]
fn self_referencing_sub_tree_is_a_cycle() {
    let mut registry = registry();
    let looped = TreeSpec::new("again")
        .with_node(NodeSpec::new("again", "SubTree").with_param("tree", "loop"));
    registry.register_tree("loop", looped).unwrap();

    assert_eq!(
        registry.build_named("loop").unwrap_err(),
        BuildError::Cycle("loop".into())
    );
}

#[test]
fn parallel_policies_come_from_params() {
    let registry = registry();
    let spec = TreeSpec::new("p")
        .with_node(
            NodeSpec::new("p", "Parallel")
                .with_param("success", "one")
                .with_children(["shoot", "wait"]),
        )
        .with_node(NodeSpec::new("shoot", "Shoot"))
        .with_node(NodeSpec::new("wait", "Wait").with_param("seconds", 5.0));
    let mut tree = registry.build(&spec).unwrap();

    assert_eq!(
        tree.tick(&TickContext::default(), &mut Blackboard::new()),
        Status::Success
    );
}

use std::sync::Arc;

use rstest::{fixture, rstest};

use topictree::application::services::TopicTreeController;
use topictree::application::{ErrorKind, Operation};
use topictree::domain::{
    Content, ContentKind, TitleScope, TopicCommand, TopicDocument, TopicElement,
};
use topictree::infrastructure::traits::MemoryTopicStore;
use topictree::util::testing;

fn sample_document() -> TopicDocument {
    TopicDocument {
        title: "Root".into(),
        topics: vec![
            TopicElement::new("Algebra").with_topics(vec![
                TopicElement::new("Linear Equations"),
                TopicElement::new("Quadratics"),
            ]),
            TopicElement::new("Geometry").with_topics(vec![TopicElement::new("Circles")]),
        ],
    }
}

struct Fixture {
    store: Arc<MemoryTopicStore>,
    controller: TopicTreeController,
}

fn open_with(scope: TitleScope) -> Fixture {
    testing::init_test_setup();
    let store = Arc::new(MemoryTopicStore::new(sample_document()));
    let controller = TopicTreeController::open(store.clone(), scope).unwrap();
    Fixture { store, controller }
}

#[fixture]
fn fx() -> Fixture {
    open_with(TitleScope::Siblings)
}

// ============================================================
// Queries
// ============================================================

#[rstest]
fn given_root_when_listing_children_then_returns_top_level_topics(fx: Fixture) {
    let children = fx.controller.get_children(None).unwrap();

    assert_eq!(children, vec!["Algebra", "Geometry"]);
}

#[rstest]
fn given_unknown_parent_when_listing_children_then_not_found(fx: Fixture) {
    let err = fx.controller.get_children(Some("Calculus")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NodeNotFound);
    assert_eq!(err.title(), Some("Calculus"));
}

#[rstest]
fn given_open_when_loading_then_does_not_write(fx: Fixture) {
    assert_eq!(fx.store.save_count(), 0);
    assert!(fx.controller.contains("Quadratics"));
    assert_eq!(fx.controller.location(), "<memory>");
}

// ============================================================
// Add
// ============================================================

#[rstest]
fn given_parent_when_adding_then_appends_last_and_persists(mut fx: Fixture) {
    fx.controller.add_node("Polynomials", Some("Algebra")).unwrap();

    assert_eq!(
        fx.controller.get_children(Some("Algebra")).unwrap(),
        vec!["Linear Equations", "Quadratics", "Polynomials"]
    );
    assert_eq!(fx.store.save_count(), 1);
    assert_eq!(fx.store.document(), fx.controller.tree().to_document());
}

#[rstest]
fn given_no_parent_when_adding_then_attaches_to_root(mut fx: Fixture) {
    fx.controller.add_node("Calculus", None).unwrap();

    assert_eq!(
        fx.controller.get_children(None).unwrap(),
        vec!["Algebra", "Geometry", "Calculus"]
    );
}

#[rstest]
fn given_sibling_title_when_adding_then_collision_and_tree_unchanged(mut fx: Fixture) {
    let before = fx.controller.tree().clone();

    let err = fx.controller.add_node("Quadratics", Some("Algebra")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TitleCollision);
    assert_eq!(err.operation(), Some(Operation::Add));
    assert_eq!(fx.controller.tree(), &before);
    assert_eq!(fx.store.save_count(), 0);
}

#[rstest]
fn given_unknown_parent_when_adding_then_not_found(mut fx: Fixture) {
    let err = fx.controller.add_node("Limits", Some("Calculus")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NodeNotFound);
    assert!(!fx.controller.contains("Limits"));
}

#[rstest]
#[case("")]
#[case("  ")]
#[case("nul\u{0}x")]
#[case("bell\u{7}")]
fn given_invalid_title_when_adding_then_rejected(mut fx: Fixture, #[case] title: &str) {
    let err = fx.controller.add_node(title, None).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidTitle);
    assert_eq!(fx.store.save_count(), 0);
}

#[rstest]
fn given_cousin_title_when_adding_with_sibling_scope_then_allowed(mut fx: Fixture) {
    fx.controller.add_node("Circles", Some("Algebra")).unwrap();

    assert!(fx
        .controller
        .get_children(Some("Algebra"))
        .unwrap()
        .contains(&"Circles".to_string()));
}

#[test]
fn given_cousin_title_when_adding_with_tree_scope_then_collision() {
    let mut fx = open_with(TitleScope::Tree);

    let err = fx.controller.add_node("Circles", Some("Algebra")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TitleCollision);
}

// ============================================================
// Rename
// ============================================================

#[rstest]
fn given_topic_when_renaming_then_keeps_children_and_position(mut fx: Fixture) {
    fx.controller.rename_node("Algebra", "Algebra I").unwrap();

    assert_eq!(
        fx.controller.get_children(None).unwrap(),
        vec!["Algebra I", "Geometry"]
    );
    assert_eq!(
        fx.controller.get_children(Some("Algebra I")).unwrap(),
        vec!["Linear Equations", "Quadratics"]
    );
    assert!(!fx.controller.contains("Algebra"));
    assert_eq!(fx.store.save_count(), 1);
}

#[rstest]
fn given_same_title_when_renaming_then_noop_without_write(mut fx: Fixture) {
    let before = fx.controller.tree().clone();

    fx.controller.rename_node("Geometry", "Geometry").unwrap();

    assert_eq!(fx.controller.tree(), &before);
    assert_eq!(fx.store.save_count(), 0);
}

#[rstest]
fn given_sibling_title_when_renaming_then_collision(mut fx: Fixture) {
    let err = fx
        .controller
        .rename_node("Linear Equations", "Quadratics")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TitleCollision);
    assert!(fx.controller.contains("Linear Equations"));
}

#[rstest]
fn given_unknown_topic_when_renaming_then_not_found(mut fx: Fixture) {
    let err = fx.controller.rename_node("Calculus", "Analysis").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NodeNotFound);
}

// ============================================================
// Remove
// ============================================================

#[rstest]
fn given_inner_topic_when_removing_then_cascades_to_descendants(mut fx: Fixture) {
    let removed = fx.controller.remove_node("Algebra").unwrap();

    assert_eq!(removed, 3);
    assert_eq!(fx.controller.get_children(None).unwrap(), vec!["Geometry"]);
    for gone in ["Algebra", "Linear Equations", "Quadratics"] {
        let err = fx.controller.get_children(Some(gone)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NodeNotFound, "{gone} still reachable");
    }
    assert_eq!(fx.controller.tree().len(), 3);
    assert_eq!(fx.store.document().topics.len(), 1);
}

#[rstest]
fn given_unknown_topic_when_removing_then_not_found(mut fx: Fixture) {
    let err = fx.controller.remove_node("Calculus").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NodeNotFound);
    assert_eq!(fx.store.save_count(), 0);
}

// ============================================================
// Move
// ============================================================

#[rstest]
fn given_topic_when_moving_then_subtree_follows(mut fx: Fixture) {
    fx.controller.move_node("Algebra", Some("Geometry")).unwrap();

    assert_eq!(fx.controller.get_children(None).unwrap(), vec!["Geometry"]);
    assert_eq!(
        fx.controller.get_children(Some("Geometry")).unwrap(),
        vec!["Circles", "Algebra"]
    );
    assert_eq!(
        fx.controller.get_children(Some("Algebra")).unwrap(),
        vec!["Linear Equations", "Quadratics"]
    );
}

#[rstest]
#[case("Algebra", "Algebra")]
#[case("Algebra", "Quadratics")]
fn given_own_subtree_as_target_when_moving_then_invalid_move(
    mut fx: Fixture,
    #[case] title: &str,
    #[case] target: &str,
) {
    let before = fx.controller.tree().clone();

    let err = fx.controller.move_node(title, Some(target)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidMove);
    assert_eq!(fx.controller.tree(), &before);
}

#[rstest]
fn given_current_parent_when_moving_then_noop(mut fx: Fixture) {
    fx.controller.move_node("Circles", Some("Geometry")).unwrap();

    assert_eq!(fx.store.save_count(), 0);
    assert_eq!(
        fx.controller.get_children(Some("Geometry")).unwrap(),
        vec!["Circles"]
    );
}

#[rstest]
fn given_clashing_title_at_target_when_moving_then_collision(mut fx: Fixture) {
    // "Circles" now resolves to the copy under Algebra (first in pre-order)
    fx.controller.add_node("Circles", Some("Algebra")).unwrap();
    let before = fx.controller.tree().clone();

    let err = fx
        .controller
        .move_node("Circles", Some("Geometry"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TitleCollision);
    assert_eq!(fx.controller.tree(), &before);
}

// ============================================================
// Contents
// ============================================================

#[rstest]
fn given_topic_when_attaching_content_then_listed_in_order(mut fx: Fixture) {
    let first = Content {
        kind: ContentKind::Geogebra,
        source: "unit-circle.ggb".into(),
        description: Some("unit circle".into()),
    };
    let second = Content {
        kind: ContentKind::Image,
        source: "circles.png".into(),
        description: None,
    };

    fx.controller.attach_content("Circles", first.clone()).unwrap();
    fx.controller.attach_content("Circles", second.clone()).unwrap();

    assert_eq!(fx.controller.contents("Circles").unwrap(), &[first, second]);
    assert!(fx.controller.contents("Geometry").unwrap().is_empty());
    assert_eq!(fx.store.save_count(), 2);
}

#[rstest]
fn given_unknown_topic_when_listing_contents_then_not_found(fx: Fixture) {
    let err = fx.controller.contents("Calculus").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NodeNotFound);
    assert_eq!(err.operation(), Some(Operation::Contents));
}

// ============================================================
// Write-through
// ============================================================

#[rstest]
#[case(TopicCommand::Add { title: "Calculus".into(), parent: None })]
#[case(TopicCommand::Rename { from: "Algebra".into(), to: "Algebra I".into() })]
#[case(TopicCommand::Remove { title: "Algebra".into() })]
#[case(TopicCommand::Move { title: "Circles".into(), parent: None })]
#[case(TopicCommand::Attach {
    title: "Circles".into(),
    content: Content { kind: ContentKind::Text, source: "notes.txt".into(), description: None },
})]
fn given_failing_store_when_mutating_then_tree_is_unchanged(
    mut fx: Fixture,
    #[case] command: TopicCommand,
) {
    let before = fx.controller.tree().clone();
    fx.store.set_failing(true);

    let err = fx.controller.apply(command).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
    assert!(err.title().is_some());
    assert_eq!(fx.controller.tree(), &before);
    assert_eq!(fx.store.document(), sample_document());
}

#[rstest]
fn given_recovered_store_when_retrying_then_change_lands(mut fx: Fixture) {
    fx.store.set_failing(true);
    let err = fx.controller.add_node("Calculus", None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
    assert_eq!(err.title(), Some("Calculus"));
    assert!(err.to_string().contains("\"Calculus\""));

    fx.store.set_failing(false);
    fx.controller.add_node("Calculus", None).unwrap();

    assert!(fx.controller.contains("Calculus"));
    assert_eq!(fx.store.save_count(), 1);
}

#[rstest]
fn given_command_sequence_when_applying_then_store_matches_tree(mut fx: Fixture) {
    let commands = vec![
        TopicCommand::Add {
            title: "Calculus".into(),
            parent: None,
        },
        TopicCommand::Add {
            title: "Limits".into(),
            parent: Some("Calculus".into()),
        },
        TopicCommand::Move {
            title: "Quadratics".into(),
            parent: Some("Calculus".into()),
        },
        TopicCommand::Remove {
            title: "Geometry".into(),
        },
    ];

    for command in commands {
        fx.controller.apply(command).unwrap();
    }

    assert_eq!(
        fx.controller.get_children(None).unwrap(),
        vec!["Algebra", "Calculus"]
    );
    assert_eq!(
        fx.controller.get_children(Some("Calculus")).unwrap(),
        vec!["Limits", "Quadratics"]
    );
    assert_eq!(fx.store.save_count(), 4);

    let reopened = TopicTreeController::open(fx.store.clone(), TitleScope::Siblings).unwrap();
    assert_eq!(reopened.tree(), fx.controller.tree());
}

// ============================================================
// Projection
// ============================================================

#[rstest]
fn given_mutation_when_projecting_again_then_view_reflects_it(mut fx: Fixture) {
    fx.controller.rename_node("Quadratics", "Quadratic Equations").unwrap();

    let view = fx.controller.filter("equation");

    assert_eq!(
        view.titles(),
        vec!["Root", "Algebra", "Linear Equations", "Quadratic Equations"]
    );
    assert_eq!(fx.controller.project().node_count(), 6);
}

#[test]
fn given_document_breaking_scope_when_opening_then_rejected() {
    testing::init_test_setup();
    let document = TopicDocument {
        title: String::new(),
        topics: vec![
            TopicElement::new("A").with_topics(vec![TopicElement::new("X")]),
            TopicElement::new("B").with_topics(vec![TopicElement::new("X")]),
        ],
    };
    let store = Arc::new(MemoryTopicStore::new(document));

    let err = TopicTreeController::open(store, TitleScope::Tree).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TitleCollision);
    assert_eq!(err.operation(), Some(Operation::Load));
}

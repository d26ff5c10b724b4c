//! Incremental rendering scenarios: attach order, slice budgets, resets,
//! and failure recovery.

use weft_engine::{Element, EngineError};
use weft_host::{AmpleDeadline, CountdownDeadline};

use super::harness::*;

// ============================================================================
// 1. Full traversals
// ============================================================================

#[test]
fn test_sample_tree_attach_sequence() {
    let (host, tree, renderer) = renderer_fixture();

    renderer.render(sample_tree(), tree.container());
    let slices = drain_renderer(&host);

    assert_eq!(slices, 1);
    assert_eq!(
        tree.attach_sequence(),
        [
            ("div".to_string(), "container".to_string()),
            ("p".to_string(), "div".to_string()),
            ("text:a".to_string(), "p".to_string()),
            ("text:b".to_string(), "div".to_string()),
        ]
    );
    assert!(!renderer.is_scheduled());
}

#[test]
fn test_full_traversal_visits_and_attaches_every_element_once() {
    let (host, tree, renderer) = renderer_fixture();

    // 8 elements: div, ul, 3×li, p, and two text nodes.
    let document = Element::new("div")
        .child(
            Element::new("ul")
                .child(Element::new("li"))
                .child(Element::new("li"))
                .child(Element::new("li")),
        )
        .child(Element::new("p").child(Element::text("body")))
        .child(Element::text("tail"));

    renderer.render(document, tree.container());
    drain_renderer(&host);

    // N elements plus the synthetic root; one node and one attach each.
    assert_eq!(renderer.stats().executed, 9);
    assert_eq!(tree.node_count(), 9);
    assert_eq!(tree.attach_count(), 8);
    for id in 1..tree.node_count() {
        assert!(
            tree.node(id).unwrap().parent.is_some(),
            "node {id} was never attached"
        );
    }
}

#[test]
fn test_attributes_reach_the_constructed_nodes() {
    let (host, tree, renderer) = renderer_fixture();

    let document = Element::new("a")
        .attribute("href", "/home")
        .attribute("target", "_blank")
        .child(Element::text("home"));
    renderer.render(document, tree.container());
    drain_renderer(&host);

    let anchor = tree.node(1).unwrap();
    assert_eq!(anchor.label, "a");
    assert_eq!(
        anchor.attributes,
        [
            ("href".to_string(), "/home".to_string()),
            ("target".to_string(), "_blank".to_string()),
        ]
    );
}

#[test]
fn test_attachments_happen_in_pre_order() {
    let (host, tree, renderer) = renderer_fixture();

    // Same tag at every level, so the raw node indices do the talking.
    let document = Element::new("div")
        .child(Element::new("div").child(Element::new("div")))
        .child(Element::new("div"));

    let container = tree.container();
    renderer.render(document, container);
    drain_renderer(&host);

    // Every parent is the container or was itself attached earlier.
    let mut attached = vec![container];
    for (child, parent) in tree.attachments() {
        assert!(
            attached.contains(&parent),
            "node {child} attached under unattached parent {parent}"
        );
        attached.push(child);
    }
    assert_eq!(attached.len(), 5);
}

// ============================================================================
// 2. Slice budgets
// ============================================================================

#[test]
fn test_exhausted_budget_yields_after_one_unit_and_resumes_exactly() {
    let (host, tree, renderer) = renderer_fixture();
    renderer.render(sample_tree(), tree.container());

    // Zero fresh budget queries: one unit per slice. Five units total,
    // and the fifth slice drains instead of re-arming.
    for slice in 0..5 {
        assert_eq!(host.pending_idle(), 1, "before slice {slice}");
        host.fire_idle_slice(&CountdownDeadline::new(0))
            .unwrap()
            .unwrap();
        assert_eq!(renderer.stats().executed, slice as u64 + 1);
    }

    assert_eq!(host.pending_idle(), 0);
    assert!(!renderer.is_scheduled());
    assert_eq!(renderer.stats().slices, 5);
    // No unit was skipped or repeated across the yield boundaries.
    assert_eq!(
        tree.attach_sequence(),
        [
            ("div".to_string(), "container".to_string()),
            ("p".to_string(), "div".to_string()),
            ("text:a".to_string(), "p".to_string()),
            ("text:b".to_string(), "div".to_string()),
        ]
    );
}

#[test]
fn test_wider_budget_takes_fewer_slices() {
    let (host, tree, renderer) = renderer_fixture();
    renderer.render(sample_tree(), tree.container());

    // Two fresh queries per slice: three units, then yield.
    host.fire_idle_slice(&CountdownDeadline::new(2))
        .unwrap()
        .unwrap();
    assert_eq!(renderer.stats().executed, 3);
    assert_eq!(tree.attach_count(), 2);

    host.fire_idle_slice(&CountdownDeadline::new(2))
        .unwrap()
        .unwrap();
    assert!(!renderer.is_scheduled());
    assert_eq!(renderer.stats().executed, 5);
    assert_eq!(tree.attach_count(), 4);
}

// ============================================================================
// 3. Re-render and termination
// ============================================================================

#[test]
fn test_render_resets_pending_work_without_rearming() {
    let (host, tree, renderer) = renderer_fixture();

    renderer.render(
        Element::new("div").child(Element::new("p")),
        tree.container(),
    );
    // Perform only the synthetic root of the first tree.
    host.fire_idle_slice(&CountdownDeadline::new(0))
        .unwrap()
        .unwrap();
    assert_eq!(host.pending_idle(), 1);

    // Re-render replaces the pending traversal; the armed driver stays.
    let second_container = tree.container();
    renderer.render(
        Element::new("span").child(Element::text("hello")),
        second_container,
    );
    assert_eq!(host.pending_idle(), 1);

    drain_renderer(&host);

    // Only the second tree's nodes were ever attached.
    assert_eq!(
        tree.attach_sequence(),
        [
            ("span".to_string(), "container".to_string()),
            ("text:hello".to_string(), "span".to_string()),
        ]
    );
    assert!(!renderer.is_scheduled());
}

#[test]
fn test_completed_render_goes_quiet_until_next_render() {
    let (host, tree, renderer) = renderer_fixture();
    renderer.render(sample_tree(), tree.container());
    drain_renderer(&host);

    assert!(!renderer.is_scheduled());
    assert!(host.fire_idle_slice(&CountdownDeadline::new(0)).is_none());

    // A new render arms a fresh driver generation.
    renderer.render(sample_tree(), tree.container());
    assert!(renderer.is_scheduled());
    assert_eq!(host.pending_idle(), 1);
}

// ============================================================================
// 4. Failure semantics
// ============================================================================

#[test]
fn test_malformed_element_fails_fast_and_is_retried_in_place() {
    let (host, tree, renderer) = renderer_fixture();

    let document = Element::new("div")
        .child(Element::new("span"))
        .child(Element::new(""));
    renderer.render(document, tree.container());

    // The error surfaces at the host's callback-invocation boundary.
    let err = host
        .fire_idle_slice(&AmpleDeadline)
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, EngineError::MissingKind));

    // Work before the failed unit landed exactly once, and the driver
    // re-armed with the cursor still on the malformed element.
    assert_eq!(
        tree.attach_sequence(),
        [
            ("div".to_string(), "container".to_string()),
            ("span".to_string(), "div".to_string()),
        ]
    );
    assert!(renderer.is_scheduled());
    assert_eq!(host.pending_idle(), 1);

    // The next slice retries the same unit: same error, no duplicate
    // attachments, no skipped work.
    let err = host
        .fire_idle_slice(&AmpleDeadline)
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, EngineError::MissingKind));
    assert_eq!(tree.attach_count(), 2);
}

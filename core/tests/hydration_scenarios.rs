//! End-to-end hydration passes over small server-rendered documents

use hydrakit_core::dom::Document;
use hydrakit_core::{ContainerPhase, HydrationConfig, Hydrator, NodeId};

fn config() -> HydrationConfig {
    HydrationConfig {
        verify_claim_orders: true,
        ..HydrationConfig::default()
    }
}

/// `<UL>` whose items are named after the keys, in document order
fn keyed_list(keys: &[u32]) -> (Document, NodeId) {
    let mut doc = Document::new();
    let ul = doc.append_element(doc.root(), "ul").unwrap();
    for key in keys {
        doc.append_element(ul, &format!("c{}", key)).unwrap();
    }
    (doc, ul)
}

#[test]
fn test_keyed_list_reordered_with_three_moves() {
    let (mut doc, ul) = keyed_list(&[3, 1, 4, 0, 2]);
    let before = doc.children(ul).unwrap().to_vec();

    let mut h = Hydrator::new(&mut doc, config());
    h.start();

    let mut nodes = h.children(ul).unwrap();
    let claimed: Vec<NodeId> = (0..5)
        .map(|k| h.claim_element(&mut nodes, &format!("c{}", k), &[]).unwrap())
        .collect();
    assert_eq!(h.detach_unclaimed(nodes).unwrap(), 0);

    let report = h.reconcile(ul).unwrap();
    assert_eq!(report.stable, 2);
    assert_eq!(report.moved, 3);
    assert_eq!(h.phase(ul), ContainerPhase::Reconciled);

    for &node in &claimed {
        h.append(ul, node).unwrap();
    }
    h.end();
    assert_eq!(h.phase(ul), ContainerPhase::Normal);

    // Every server node was reused
    let mut reused = claimed.clone();
    reused.sort();
    let mut original = before;
    original.sort();
    assert_eq!(reused, original);

    assert_eq!(
        doc.snapshot(ul).unwrap(),
        "<UL><C0></C0><C1></C1><C2></C2><C3></C3><C4></C4></UL>"
    );
}

#[test]
fn test_matching_and_reversed_lists() {
    for (keys, moved) in [(vec![0, 1, 2, 3, 4], 0), (vec![4, 3, 2, 1, 0], 4)] {
        let (mut doc, ul) = keyed_list(&keys);
        let mut h = Hydrator::new(&mut doc, config());
        h.start();

        let mut nodes = h.children(ul).unwrap();
        let claimed: Vec<NodeId> = (0..5)
            .map(|k| h.claim_element(&mut nodes, &format!("c{}", k), &[]).unwrap())
            .collect();

        assert_eq!(h.reconcile(ul).unwrap().moved, moved, "keys {:?}", keys);
        for &node in &claimed {
            h.append(ul, node).unwrap();
        }
        h.end();

        assert_eq!(
            doc.child_claim_orders(ul).unwrap(),
            vec![Some(0), Some(1), Some(2), Some(3), Some(4)]
        );
    }
}

#[test]
fn test_page_with_leftovers_missing_nodes_and_split_text() {
    // <BODY><DIV></DIV><SPAN class="a" data-ssr="1">Hello world</SPAN></BODY>
    let mut doc = Document::new();
    let body = doc.append_element(doc.root(), "body").unwrap();
    doc.append_element(body, "div").unwrap();
    let span = doc.append_element(body, "span").unwrap();
    doc.set_attribute(span, "class", "a").unwrap();
    doc.set_attribute(span, "data-ssr", "1").unwrap();
    doc.append_text(span, "Hello world").unwrap();

    let mut h = Hydrator::new(&mut doc, config());
    h.start();

    // Client renders <SPAN class>{"Hello"}{" world"}</SPAN><SECTION></SECTION>
    let mut body_nodes = h.children(body).unwrap();
    let claimed_span = h.claim_element(&mut body_nodes, "span", &["class"]).unwrap();
    assert_eq!(claimed_span, span);

    let mut span_nodes = h.children(span).unwrap();
    let hello = h.claim_text(&mut span_nodes, "Hello").unwrap();
    let world = h.claim_text(&mut span_nodes, " world").unwrap();
    assert_eq!(h.detach_unclaimed(span_nodes).unwrap(), 0);

    let section = h.claim_element(&mut body_nodes, "section", &[]).unwrap();
    assert_eq!(h.dom().parent(section).unwrap(), None);

    // The server's <DIV> is not part of the client tree
    assert_eq!(h.detach_unclaimed(body_nodes).unwrap(), 1);

    h.append(span, hello).unwrap();
    h.append(span, world).unwrap();
    h.append(body, span).unwrap();
    h.append(body, section).unwrap();
    h.end();

    assert_eq!(
        doc.snapshot(body).unwrap(),
        "<BODY><SPAN class=\"a\">Hello world</SPAN><SECTION></SECTION></BODY>"
    );
    assert_eq!(doc.children(span).unwrap(), &[hello, world]);
    assert_eq!(doc.text(hello).unwrap(), "Hello");
}

#[test]
fn test_head_keeps_injected_nodes() {
    // <HEAD><META></META><SCRIPT></SCRIPT><TITLE></TITLE></HEAD>, where the
    // script was added by something other than the renderer
    let mut doc = Document::new();
    let head = doc.append_element(doc.root(), "head").unwrap();
    let meta = doc.append_element(head, "meta").unwrap();
    let script = doc.append_element(head, "script").unwrap();
    let title = doc.append_element(head, "title").unwrap();

    let mut h = Hydrator::new(&mut doc, config());
    h.start();

    // Client renders <TITLE> before <META>; leftovers in HEAD are kept
    let mut nodes = h.children(head).unwrap();
    assert_eq!(h.claim_element(&mut nodes, "title", &[]).unwrap(), title);
    assert_eq!(h.claim_element(&mut nodes, "meta", &[]).unwrap(), meta);

    h.append(head, title).unwrap();
    h.append(head, meta).unwrap();
    h.end();

    assert_eq!(doc.children(head).unwrap(), &[script, title, meta]);
}

#[test]
fn test_second_session_after_clearing_state() {
    let (mut doc, ul) = keyed_list(&[1, 0]);

    {
        let mut h = Hydrator::new(&mut doc, config());
        h.start();
        let mut nodes = h.children(ul).unwrap();
        let c0 = h.claim_element(&mut nodes, "c0", &[]).unwrap();
        let c1 = h.claim_element(&mut nodes, "c1", &[]).unwrap();
        h.append(ul, c0).unwrap();
        h.append(ul, c1).unwrap();
        h.end();
    }

    // A fresh pass over the now-ordered tree moves nothing
    doc.clear_hydration_state();
    let mut h = Hydrator::new(&mut doc, config());
    h.start();
    let mut nodes = h.children(ul).unwrap();
    h.claim_element(&mut nodes, "c0", &[]).unwrap();
    h.claim_element(&mut nodes, "c1", &[]).unwrap();
    assert_eq!(h.reconcile(ul).unwrap().moved, 0);
    h.end();
}

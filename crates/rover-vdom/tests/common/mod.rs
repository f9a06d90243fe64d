use rover_vdom::{Command, Document, DocumentConfig, NodeId, RecordingBridge};

/// Route `tracing` output through the test harness. Honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Document with a recording bridge and one attached element `P`
pub fn mounted(config: DocumentConfig) -> (Document, RecordingBridge, NodeId) {
    init_tracing();
    let mut doc = Document::with_config("test", config);
    let bridge = RecordingBridge::new();
    doc.bind_bridge(bridge.clone());
    let parent = doc.create_element("div");
    let root = doc.document_element();
    doc.append_child(root, parent);
    doc.flush().expect("flush");
    bridge.clear();
    (doc, bridge, parent)
}

#[allow(dead_code)]
pub fn methods(commands: &[Command]) -> Vec<&'static str> {
    commands.iter().map(Command::method).collect()
}

/// Every element reachable from the root keeps its pure children in sync
#[allow(dead_code)]
pub fn assert_consistent(doc: &Document) {
    let mut stack = vec![doc.document_element()];
    while let Some(id) = stack.pop() {
        assert!(
            doc.pure_children_consistent(id),
            "pure children of {id} diverged: {:?} vs {:?}",
            doc.children(id),
            doc.pure_children(id)
        );
        stack.extend(doc.children(id).iter().copied());
    }
}

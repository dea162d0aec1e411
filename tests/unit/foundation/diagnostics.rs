use super::*;

#[test]
fn record_keeps_order_and_counts_by_kind() {
    let mut d = Diagnostics::new();
    d.record(DiagnosticKind::PointSkipped, "token '20'");
    d.record(DiagnosticKind::ElementSkipped, "rect: non-finite x");
    d.record(DiagnosticKind::PointSkipped, "token '7'");

    assert_eq!(d.len(), 3);
    assert_eq!(d.count(DiagnosticKind::PointSkipped), 2);
    assert!(d.contains(DiagnosticKind::ElementSkipped));
    assert!(!d.contains(DiagnosticKind::MalformedMarkup));

    let kinds: Vec<_> = d.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::PointSkipped,
            DiagnosticKind::ElementSkipped,
            DiagnosticKind::PointSkipped
        ]
    );
}

#[test]
fn serializes_as_plain_list() {
    let mut d = Diagnostics::new();
    d.record(DiagnosticKind::NamespaceInjected, "added xmlns");
    let v = serde_json::to_value(&d).unwrap();
    assert_eq!(
        v,
        serde_json::json!([{ "kind": "namespace_injected", "message": "added xmlns" }])
    );
}

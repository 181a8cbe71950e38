//! Tests for the port derivation engine.
use chatflow::prelude::*;

/// Every type outside the four branching ones derives exactly one generic
/// port, no matter what its data holds.
#[test]
fn test_static_types_derive_single_generic_port() {
    let branching = [
        NodeKind::Condition,
        NodeKind::Ai,
        NodeKind::QuestionClassifier,
        NodeKind::Buttons,
        NodeKind::Select,
    ];
    for kind in NodeKind::ALL {
        if branching.contains(&kind) {
            continue;
        }
        let ports = derive_ports(&NodeData::default_for(kind));
        assert_eq!(ports.len(), 1, "kind {} should have one port", kind);
        assert_eq!(ports[0].id, "out");
        assert_eq!(ports[0].label, None);
    }

    // Data content does not change the count for static types.
    let message = NodeData::Message(MessageData {
        text: "Thanks for reaching out!".to_string(),
    });
    assert_eq!(derive_ports(&message).len(), 1);
}

#[test]
fn test_condition_with_custom_outputs() {
    let data = NodeData::Condition(ConditionData {
        outputs: vec!["A".to_string(), "B".to_string()],
        ..ConditionData::default()
    });

    let ports = derive_ports(&data);
    assert_eq!(ports.len(), 3);
    assert_eq!(ports[0], OutputPort::new("out-0", "A"));
    assert_eq!(ports[1], OutputPort::new("out-1", "B"));
    assert_eq!(ports[2], OutputPort::new("else", "Else"));
}

#[test]
fn test_condition_without_outputs_is_binary() {
    let ports = derive_ports(&NodeData::default_for(NodeKind::Condition));
    assert_eq!(ports.len(), 2);
    assert_eq!(ports[0], OutputPort::new("true", "Yes"));
    assert_eq!(ports[1], OutputPort::new("else", "Else"));
}

/// Blank condition outputs are filtered before deciding whether custom
/// branches exist at all.
#[test]
fn test_condition_blank_outputs_are_filtered() {
    let data = NodeData::Condition(ConditionData {
        outputs: vec!["".to_string(), "   ".to_string(), "Escalate".to_string()],
        ..ConditionData::default()
    });
    let ports = derive_ports(&data);
    assert_eq!(ports.len(), 2);
    assert_eq!(ports[0], OutputPort::new("out-0", "Escalate"));
    assert_eq!(ports[1].id, "else");

    let all_blank = NodeData::Condition(ConditionData {
        outputs: vec!["".to_string(), " ".to_string()],
        ..ConditionData::default()
    });
    let ports = derive_ports(&all_blank);
    assert_eq!(ports[0], OutputPort::new("true", "Yes"));
}

/// Button entries are *not* filtered: every array index yields a port,
/// blank or not. This asymmetry with condition outputs is deliberate.
#[test]
fn test_buttons_keep_blank_entries() {
    let data = NodeData::Buttons(ButtonsData {
        text: String::new(),
        buttons: vec!["".to_string(), "Two".to_string(), "  ".to_string()],
    });

    let ports = derive_ports(&data);
    assert_eq!(ports.len(), 3);
    assert_eq!(ports[0], OutputPort::new("btn-0", "Button 1"));
    assert_eq!(ports[1], OutputPort::new("btn-1", "Two"));
    // Whitespace-only text is kept verbatim as the label.
    assert_eq!(ports[2], OutputPort::new("btn-2", "  "));
}

#[test]
fn test_empty_button_list_falls_back_to_generic_port() {
    let ports = derive_ports(&NodeData::default_for(NodeKind::Buttons));
    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0].id, "out");
}

#[test]
fn test_select_options_each_yield_a_port() {
    let data = NodeData::Select(SelectData {
        text: "Pick a topic".to_string(),
        options: vec!["Sales".to_string(), "".to_string()],
    });

    let ports = derive_ports(&data);
    assert_eq!(ports.len(), 2);
    assert_eq!(ports[0], OutputPort::new("opt-0", "Sales"));
    assert_eq!(ports[1], OutputPort::new("opt-1", "Option 2"));
}

#[test]
fn test_classifier_needs_more_than_one_class() {
    let single = NodeData::Ai(ClassifierData {
        prompt: String::new(),
        classes: vec!["refund".to_string()],
    });
    let ports = derive_ports(&single);
    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0].id, "out");

    let multi = NodeData::QuestionClassifier(ClassifierData {
        prompt: String::new(),
        classes: vec!["refund".to_string(), "shipping".to_string()],
    });
    let ports = derive_ports(&multi);
    assert_eq!(ports.len(), 2);
    assert_eq!(ports[0], OutputPort::new("class-0", "CLASS 1"));
    assert_eq!(ports[1], OutputPort::new("class-1", "CLASS 2"));
}

/// Derivation is a pure function of data: equal data, equal ports.
#[test]
fn test_derivation_is_deterministic() {
    let data = NodeData::Condition(ConditionData {
        outputs: vec!["A".to_string()],
        ..ConditionData::default()
    });
    assert_eq!(derive_ports(&data), derive_ports(&data));
}

//! Common test utilities for building flows, registries, and rule values.
use ahash::AHashMap;
use chatflow::prelude::*;

/// Creates a registry with one contact and one conversation attribute.
#[allow(dead_code)]
pub fn create_registry() -> AttributeRegistry {
    AttributeRegistry::new(vec![
        AttributeDefinition {
            id: "attr-1".to_string(),
            display_name: "Plan".to_string(),
            key: "plan".to_string(),
            description: "Subscription plan of the contact".to_string(),
            attribute_model: AttributeModel::Contact,
        },
        AttributeDefinition {
            id: "attr-2".to_string(),
            display_name: "Priority".to_string(),
            key: "priority".to_string(),
            description: "Ticket priority".to_string(),
            attribute_model: AttributeModel::Conversation,
        },
    ])
}

/// A small but realistic flow: trigger -> buttons -> message, with the
/// second button left unconnected.
#[allow(dead_code)]
pub struct SupportFlow {
    pub flow: FlowDefinition,
    pub trigger: String,
    pub buttons: String,
    pub message: String,
}

#[allow(dead_code)]
pub fn create_support_flow() -> SupportFlow {
    let mut flow = FlowDefinition::new("fl-support", "Support intake");

    let trigger = flow
        .add_node(NodeKind::Trigger, Position::new(0.0, 0.0))
        .id
        .clone();
    let buttons = flow
        .add_node(NodeKind::Buttons, Position::new(220.0, 0.0))
        .id
        .clone();
    let message = flow
        .add_node(NodeKind::Message, Position::new(440.0, 0.0))
        .id
        .clone();

    flow.set_node_data(
        &buttons,
        NodeData::Buttons(ButtonsData {
            text: "How can we help?".to_string(),
            buttons: vec!["Billing".to_string(), "Support".to_string()],
        }),
    )
    .expect("buttons node exists");
    flow.set_node_data(
        &message,
        NodeData::Message(MessageData {
            text: "An agent will be right with you.".to_string(),
        }),
    )
    .expect("message node exists");

    flow.connect(&trigger, "out", &buttons).expect("trigger connects");
    flow.connect(&buttons, "btn-0", &message).expect("button connects");

    SupportFlow {
        flow,
        trigger,
        buttons,
        message,
    }
}

/// Creates a flow declaring one required input, for sub-flow tests.
#[allow(dead_code)]
pub fn create_order_flow() -> FlowDefinition {
    let mut flow = FlowDefinition::new("fl-order", "Order lookup");
    flow.input_variables.push(InputVariable {
        key: "order_id".to_string(),
        label: "Order ID".to_string(),
        required: true,
    });
    flow.add_node(NodeKind::Start, Position::default());
    flow
}

/// Builds a catalog from a list of flows.
#[allow(dead_code)]
pub fn create_catalog(flows: Vec<FlowDefinition>) -> AHashMap<String, FlowDefinition> {
    flows.into_iter().map(|f| (f.id.clone(), f)).collect()
}

/// In-memory rule values, standing in for the external runtime's session.
#[allow(dead_code)]
#[derive(Default)]
pub struct TestValues {
    pub message: Option<String>,
    pub contact: AHashMap<String, String>,
    pub contact_attributes: AHashMap<String, String>,
    pub conversation_attributes: AHashMap<String, String>,
}

impl RuleValueSource for TestValues {
    fn message(&self) -> Option<String> {
        self.message.clone()
    }

    fn contact_field(&self, field: &str) -> Option<String> {
        self.contact.get(field).cloned()
    }

    fn attribute(&self, model: AttributeModel, key: &str) -> Option<String> {
        match model {
            AttributeModel::Contact => self.contact_attributes.get(key).cloned(),
            AttributeModel::Conversation => self.conversation_attributes.get(key).cloned(),
        }
    }
}

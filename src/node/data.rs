use crate::attribute::AttributeModel;
use crate::condition::{ConditionRule, LogicOperator};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of node type tags understood by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Start,
    Trigger,
    Condition,
    Ai,
    QuestionClassifier,
    Buttons,
    Select,
    Assign,
    Tag,
    SetAttribute,
    StartFlow,
    End,
    Message,
    Wait,
    Csat,
    Note,
    Webhook,
    Http,
    Code,
    Llm,
    QuickInput,
    InputForm,
    Carousel,
}

impl NodeKind {
    pub const ALL: [NodeKind; 23] = [
        NodeKind::Start,
        NodeKind::Trigger,
        NodeKind::Condition,
        NodeKind::Ai,
        NodeKind::QuestionClassifier,
        NodeKind::Buttons,
        NodeKind::Select,
        NodeKind::Assign,
        NodeKind::Tag,
        NodeKind::SetAttribute,
        NodeKind::StartFlow,
        NodeKind::End,
        NodeKind::Message,
        NodeKind::Wait,
        NodeKind::Csat,
        NodeKind::Note,
        NodeKind::Webhook,
        NodeKind::Http,
        NodeKind::Code,
        NodeKind::Llm,
        NodeKind::QuickInput,
        NodeKind::InputForm,
        NodeKind::Carousel,
    ];

    /// The wire tag for this kind, as stored in persisted documents.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Trigger => "trigger",
            NodeKind::Condition => "condition",
            NodeKind::Ai => "ai",
            NodeKind::QuestionClassifier => "question_classifier",
            NodeKind::Buttons => "buttons",
            NodeKind::Select => "select",
            NodeKind::Assign => "assign",
            NodeKind::Tag => "tag",
            NodeKind::SetAttribute => "set_attribute",
            NodeKind::StartFlow => "start_flow",
            NodeKind::End => "end",
            NodeKind::Message => "message",
            NodeKind::Wait => "wait",
            NodeKind::Csat => "csat",
            NodeKind::Note => "note",
            NodeKind::Webhook => "webhook",
            NodeKind::Http => "http",
            NodeKind::Code => "code",
            NodeKind::Llm => "llm",
            NodeKind::QuickInput => "quick_input",
            NodeKind::InputForm => "input_form",
            NodeKind::Carousel => "carousel",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Events that can fire a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    ConversationOpened,
    MessageReceived,
    ConversationResolved,
}

/// Payload of `start` and `trigger` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StartData {
    pub on: Option<TriggerEvent>,
    pub keywords: Vec<String>,
    /// Initial parameters captured when the flow fires.
    pub fields: Vec<String>,
}

/// Payload of `condition` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConditionData {
    pub rules: Vec<ConditionRule>,
    pub logic_operator: LogicOperator,
    /// Optional named branches. Blank entries are ignored; an empty list
    /// falls back to the binary Yes/Else pair.
    pub outputs: Vec<String>,
}

/// Payload of `ai` and `question_classifier` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassifierData {
    pub prompt: String,
    pub classes: Vec<String>,
}

/// Payload of `buttons` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonsData {
    pub text: String,
    pub buttons: Vec<String>,
}

/// Payload of `select` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectData {
    pub text: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignTarget {
    #[default]
    Team,
    Agent,
}

/// Payload of `assign` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssignData {
    pub assign_to: AssignTarget,
    pub team_name: Option<String>,
    pub agent_email: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagAction {
    #[default]
    Add,
    Remove,
}

/// Payload of `tag` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TagData {
    pub action: TagAction,
    pub tags: Vec<String>,
}

/// Payload of `set_attribute` nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetAttributeData {
    pub target: AttributeModel,
    pub attribute_name: String,
    pub attribute_value: String,
}

impl Default for SetAttributeData {
    fn default() -> Self {
        Self {
            target: AttributeModel::Contact,
            attribute_name: String::new(),
            attribute_value: String::new(),
        }
    }
}

/// Payload of `start_flow` nodes: the sub-flow invocation contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StartFlowData {
    pub flow_id: String,
    /// Bindings for the target flow's declared input variables. Values may
    /// contain `{{token}}` interpolation resolved in the caller's scopes.
    pub variable_bindings: AHashMap<String, String>,
    /// When set, the runtime conversationally collects any missing
    /// required inputs instead of failing the invocation.
    pub ai_collect_inputs: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndBehavior {
    #[default]
    Close,
    Handover,
    Stop,
}

/// Payload of `end` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EndData {
    pub behavior: EndBehavior,
}

/// Payload of `message` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageData {
    pub text: String,
}

/// Payload of `wait` nodes. Without `seconds` the flow waits for the next
/// inbound message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitData {
    pub seconds: Option<u64>,
}

/// Payload of `csat` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsatData {
    pub question: String,
}

/// Payload of `note` nodes (private note on the conversation).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteData {
    pub text: String,
}

/// Payload of `webhook` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookData {
    pub url: String,
    pub payload: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Payload of `http` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpData {
    pub method: HttpMethod,
    pub url: String,
    pub headers: AHashMap<String, String>,
    pub body: Option<String>,
}

/// Payload of `code` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeData {
    pub source: String,
}

/// Payload of `llm` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmData {
    pub prompt: String,
    pub model: Option<String>,
}

/// Payload of `quick_input` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuickInputData {
    pub label: String,
    /// Attribute key the captured value is stored under.
    pub save_to: Option<String>,
}

/// One field of an `input_form` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormField {
    pub key: String,
    pub label: String,
    pub required: bool,
}

/// Payload of `input_form` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFormData {
    pub fields: Vec<FormField>,
}

/// One card of a `carousel` node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselCard {
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
}

/// Payload of `carousel` nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselData {
    pub cards: Vec<CarouselCard>,
}

/// Type-specific node content: one payload shape per node type tag.
///
/// The variant is the node's type; a node never changes variant after
/// creation. On the wire this serializes as `{"type": <tag>, "data": {..}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum NodeData {
    Start(StartData),
    Trigger(StartData),
    Condition(ConditionData),
    Ai(ClassifierData),
    QuestionClassifier(ClassifierData),
    Buttons(ButtonsData),
    Select(SelectData),
    Assign(AssignData),
    Tag(TagData),
    SetAttribute(SetAttributeData),
    StartFlow(StartFlowData),
    End(EndData),
    Message(MessageData),
    Wait(WaitData),
    Csat(CsatData),
    Note(NoteData),
    Webhook(WebhookData),
    Http(HttpData),
    Code(CodeData),
    Llm(LlmData),
    QuickInput(QuickInputData),
    InputForm(InputFormData),
    Carousel(CarouselData),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Start(_) => NodeKind::Start,
            NodeData::Trigger(_) => NodeKind::Trigger,
            NodeData::Condition(_) => NodeKind::Condition,
            NodeData::Ai(_) => NodeKind::Ai,
            NodeData::QuestionClassifier(_) => NodeKind::QuestionClassifier,
            NodeData::Buttons(_) => NodeKind::Buttons,
            NodeData::Select(_) => NodeKind::Select,
            NodeData::Assign(_) => NodeKind::Assign,
            NodeData::Tag(_) => NodeKind::Tag,
            NodeData::SetAttribute(_) => NodeKind::SetAttribute,
            NodeData::StartFlow(_) => NodeKind::StartFlow,
            NodeData::End(_) => NodeKind::End,
            NodeData::Message(_) => NodeKind::Message,
            NodeData::Wait(_) => NodeKind::Wait,
            NodeData::Csat(_) => NodeKind::Csat,
            NodeData::Note(_) => NodeKind::Note,
            NodeData::Webhook(_) => NodeKind::Webhook,
            NodeData::Http(_) => NodeKind::Http,
            NodeData::Code(_) => NodeKind::Code,
            NodeData::Llm(_) => NodeKind::Llm,
            NodeData::QuickInput(_) => NodeKind::QuickInput,
            NodeData::InputForm(_) => NodeKind::InputForm,
            NodeData::Carousel(_) => NodeKind::Carousel,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.kind().tag()
    }

    /// The default payload a builder-created node of `kind` starts with.
    pub fn default_for(kind: NodeKind) -> NodeData {
        match kind {
            NodeKind::Start => NodeData::Start(StartData::default()),
            NodeKind::Trigger => NodeData::Trigger(StartData::default()),
            NodeKind::Condition => NodeData::Condition(ConditionData::default()),
            NodeKind::Ai => NodeData::Ai(ClassifierData::default()),
            NodeKind::QuestionClassifier => {
                NodeData::QuestionClassifier(ClassifierData::default())
            }
            NodeKind::Buttons => NodeData::Buttons(ButtonsData::default()),
            NodeKind::Select => NodeData::Select(SelectData::default()),
            NodeKind::Assign => NodeData::Assign(AssignData::default()),
            NodeKind::Tag => NodeData::Tag(TagData::default()),
            NodeKind::SetAttribute => NodeData::SetAttribute(SetAttributeData::default()),
            NodeKind::StartFlow => NodeData::StartFlow(StartFlowData::default()),
            NodeKind::End => NodeData::End(EndData::default()),
            NodeKind::Message => NodeData::Message(MessageData::default()),
            NodeKind::Wait => NodeData::Wait(WaitData::default()),
            NodeKind::Csat => NodeData::Csat(CsatData::default()),
            NodeKind::Note => NodeData::Note(NoteData::default()),
            NodeKind::Webhook => NodeData::Webhook(WebhookData::default()),
            NodeKind::Http => NodeData::Http(HttpData::default()),
            NodeKind::Code => NodeData::Code(CodeData::default()),
            NodeKind::Llm => NodeData::Llm(LlmData::default()),
            NodeKind::QuickInput => NodeData::QuickInput(QuickInputData::default()),
            NodeKind::InputForm => NodeData::InputForm(InputFormData::default()),
            NodeKind::Carousel => NodeData::Carousel(CarouselData::default()),
        }
    }
}

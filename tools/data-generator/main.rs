use chatflow::prelude::*;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;

/// A CLI tool to generate sample flow documents for the validator
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_flow.json")]
    output: String,

    /// How many nodes to chain after the trigger
    #[arg(long, default_value_t = 8)]
    nodes: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!("Generating a flow with {} chained node(s)...", cli.nodes);

    let flow = generate_flow(&mut rng, cli.nodes);
    let json_output = flow.to_document().to_json();
    fs::write(&cli.output, json_output)?;

    println!("Successfully generated and saved flow to '{}'", cli.output);
    Ok(())
}

/// Builds a trigger followed by a random chain of side-effecting and
/// branching nodes. Branch ports beyond the first are left unconnected,
/// which exercises the validator's warnings on purpose.
fn generate_flow(rng: &mut StdRng, count: usize) -> FlowDefinition {
    let mut flow = FlowDefinition::new("fl-generated", "Generated flow");
    flow.description = "Synthetic flow for exercising the validator".to_string();

    let mut previous = flow
        .add_node(NodeKind::Trigger, Position::new(0.0, 0.0))
        .id
        .clone();
    let mut previous_port = "out".to_string();

    for index in 0..count {
        let position = Position::new(220.0 * (index + 1) as f64, 0.0);
        let (id, first_port) = match rng.random_range(0..5u8) {
            0 => {
                let id = flow.add_node(NodeKind::Buttons, position).id.clone();
                let buttons: Vec<String> = (0..rng.random_range(1..=4usize))
                    .map(|i| format!("Choice {}", i + 1))
                    .collect();
                flow.set_node_data(
                    &id,
                    NodeData::Buttons(ButtonsData {
                        text: format!("Question {}?", index + 1),
                        buttons,
                    }),
                )
                .expect("node was just added");
                (id, "btn-0".to_string())
            }
            1 => {
                let id = flow.add_node(NodeKind::Condition, position).id.clone();
                flow.set_node_data(
                    &id,
                    NodeData::Condition(ConditionData {
                        rules: vec![ConditionRule {
                            subject: RuleSubject::Message,
                            operator: ConditionOperator::Contains,
                            value: "help".to_string(),
                            attribute_key: None,
                        }],
                        logic_operator: LogicOperator::And,
                        outputs: Vec::new(),
                    }),
                )
                .expect("node was just added");
                (id, "true".to_string())
            }
            2 => {
                let id = flow.add_node(NodeKind::Wait, position).id.clone();
                flow.set_node_data(
                    &id,
                    NodeData::Wait(chatflow::node::WaitData {
                        seconds: Some(rng.random_range(5..120)),
                    }),
                )
                .expect("node was just added");
                (id, "out".to_string())
            }
            3 => {
                let id = flow.add_node(NodeKind::Tag, position).id.clone();
                flow.set_node_data(
                    &id,
                    NodeData::Tag(chatflow::node::TagData {
                        action: TagAction::Add,
                        tags: vec![format!("step-{}", index + 1)],
                    }),
                )
                .expect("node was just added");
                (id, "out".to_string())
            }
            _ => {
                let id = flow.add_node(NodeKind::Message, position).id.clone();
                flow.set_node_data(
                    &id,
                    NodeData::Message(MessageData {
                        text: format!("Hello {{{{contact.name}}}}, step {}", index + 1),
                    }),
                )
                .expect("node was just added");
                (id, "out".to_string())
            }
        };

        flow.connect(&previous, &previous_port, &id)
            .expect("chained connect always targets a fresh node");
        previous = id;
        previous_port = first_port;
    }

    let end = flow
        .add_node(NodeKind::End, Position::new(220.0 * (count + 1) as f64, 0.0))
        .id
        .clone();
    flow.connect(&previous, &previous_port, &end)
        .expect("end node accepts inbound");

    flow
}

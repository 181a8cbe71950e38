//! The sub-flow invocation contract.
//!
//! A `start_flow` node supplies one binding per declared input variable of
//! its target flow. Bindings resolve in the *caller's* scopes at the point
//! of invocation; the callee's own scopes never leak in. Missing required
//! inputs either block the invocation or, with `ai_collect_inputs`, are
//! elicited conversationally by the runtime before the sub-flow starts.

use crate::graph::FlowDefinition;
use crate::node::StartFlowData;
use crate::variable::VariableResolver;
use itertools::Itertools;

/// One resolved binding handed to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinding {
    pub key: String,
    /// Binding value after interpolation in the caller's scopes. Tokens
    /// the caller only declares stay literal for the runtime to fill.
    pub value: String,
    /// Interpolation keys that resolved in no caller scope.
    pub unknown: Vec<String>,
}

/// Everything the runtime needs to start a sub-flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationPlan {
    pub flow_id: String,
    pub bindings: Vec<ResolvedBinding>,
    /// Required target inputs with no binding, in declaration order.
    pub missing: Vec<String>,
    /// When set, the runtime collects `missing` from the end user instead
    /// of refusing to invoke.
    pub ai_collect: bool,
}

impl InvocationPlan {
    /// True when the invocation can proceed: every required input is
    /// bound, or the AI is allowed to collect the rest.
    pub fn ready(&self) -> bool {
        self.missing.is_empty() || self.ai_collect
    }
}

/// Resolves a `start_flow` node's bindings against the target flow's
/// declared inputs, using the caller's resolver.
///
/// Bindings for keys the target never declared are passed through
/// untouched; `validate` flags the reverse case (required but unbound).
pub fn plan_invocation(
    call: &StartFlowData,
    target: &FlowDefinition,
    caller_scopes: &VariableResolver,
) -> InvocationPlan {
    let mut bindings = Vec::with_capacity(call.variable_bindings.len());
    let mut missing = Vec::new();

    for input in &target.input_variables {
        match call.variable_bindings.get(&input.key) {
            Some(raw) => {
                let resolution = caller_scopes.resolve(raw);
                bindings.push(ResolvedBinding {
                    key: input.key.clone(),
                    value: resolution.text,
                    unknown: resolution.unknown,
                });
            }
            None if input.required => missing.push(input.key.clone()),
            None => {}
        }
    }

    // Extra bindings the target does not declare still reach the runtime.
    for (key, raw) in call.variable_bindings.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        if !target.input_variables.iter().any(|v| &v.key == key) {
            let resolution = caller_scopes.resolve(raw);
            bindings.push(ResolvedBinding {
                key: key.clone(),
                value: resolution.text,
                unknown: resolution.unknown,
            });
        }
    }

    InvocationPlan {
        flow_id: call.flow_id.clone(),
        bindings,
        missing,
        ai_collect: call.ai_collect_inputs,
    }
}
